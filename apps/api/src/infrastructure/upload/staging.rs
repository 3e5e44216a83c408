use crate::domain::assessment::errors::AnalysisError;
use bytes::Bytes;
use std::{
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStorageMode {
    #[default]
    Memory,
    Disk,
}

impl FromStr for UploadStorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "disk" => Ok(Self::Disk),
            other => Err(format!("unknown upload storage '{}', expected memory or disk", other)),
        }
    }
}

/// Where multipart uploads sit between arrival and validation.
///
/// Disk staging writes the upload to a named temp file and reads it back. The
/// file is owned by a guard that deletes it on drop, so nothing is left behind
/// on either the success or the error path.
#[derive(Debug, Clone)]
pub enum UploadStaging {
    Memory,
    Disk { dir: PathBuf },
}

impl UploadStaging {
    pub fn new(mode: UploadStorageMode, dir: impl Into<PathBuf>) -> Self {
        match mode {
            UploadStorageMode::Memory => Self::Memory,
            UploadStorageMode::Disk => Self::Disk { dir: dir.into() },
        }
    }

    pub async fn stage(&self, data: Bytes, extension: &str) -> Result<Bytes, AnalysisError> {
        match self {
            Self::Memory => Ok(data),
            Self::Disk { dir } => {
                let dir = dir.clone();
                let suffix = format!(".{}", extension);
                tokio::task::spawn_blocking(move || stage_on_disk(&dir, &data, &suffix))
                    .await
                    .map_err(|e| AnalysisError::StagingFailure(format!("staging task failed: {}", e)))?
                    .map(Bytes::from)
                    .map_err(|e| {
                        error!(error = %e, "Disk staging failed");
                        AnalysisError::StagingFailure(e.to_string())
                    })
            }
        }
    }
}

fn stage_on_disk(dir: &Path, data: &[u8], suffix: &str) -> std::io::Result<Vec<u8>> {
    std::fs::create_dir_all(dir)?;

    let mut file = tempfile::Builder::new()
        .prefix("wound-")
        .suffix(suffix)
        .tempfile_in(dir)?;
    file.write_all(data)?;
    file.flush()?;
    debug!(path = %file.path().display(), size = data.len(), "Upload staged on disk");

    let read_back = std::fs::read(file.path())?;
    file.close()?;
    Ok(read_back)
}
