/// Masks a credential for display: at most the first four characters followed
/// by `***`, or `NOT SET` when absent.
pub fn redact_secret(secret: Option<&str>) -> String {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return "NOT SET".to_string();
    };

    if secret.chars().count() > 4 {
        format!("{}***", secret.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}
