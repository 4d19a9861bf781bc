use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

/// URL prefix under which stored photos are served.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Longest original extension that is carried over to the stored name.
const MAX_EXTENSION_LEN: usize = 8;

/// On-disk storage for report photos.
///
/// Each photo is a flat file at `{dir}/{generated name}`; the public path
/// recorded on the report is `/uploads/{generated name}`.
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub async fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        info!("Photo upload directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one photo and return its public path.
    pub async fn save(&self, original_name: Option<&str>, data: &[u8]) -> Result<String> {
        let name = stored_name(original_name);
        let path = self.dir.join(&name);

        let mut file = fs::File::create(&path).await?;
        file.write_all(data).await?;
        file.flush().await?;

        Ok(format!("{}/{}", UPLOADS_PREFIX, name))
    }

    /// Remove photos written for a request that later failed.
    pub async fn discard(&self, public_paths: &[String]) {
        for public_path in public_paths {
            let Some(name) = public_path
                .strip_prefix(UPLOADS_PREFIX)
                .and_then(|p| p.strip_prefix('/'))
            else {
                continue;
            };
            if let Err(e) = fs::remove_file(self.dir.join(name)).await {
                warn!("Failed to remove orphaned upload {}: {}", name, e);
            }
        }
    }
}

/// Random 32-hex-char name, keeping a short alphanumeric extension from the
/// client's file name so the file is served with a sensible content type.
fn stored_name(original_name: Option<&str>) -> String {
    let id = Uuid::new_v4().simple().to_string();

    let extension = original_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| {
            !e.is_empty()
                && e.len() <= MAX_EXTENSION_LEN
                && e.chars().all(|c| c.is_ascii_alphanumeric())
        });

    match extension {
        Some(ext) => format!("{}.{}", id, ext.to_ascii_lowercase()),
        None => id,
    }
}
