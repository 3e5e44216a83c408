mod test_health_approve;
mod test_openai_client;
mod test_upload_base64;
