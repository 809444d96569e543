use std::{
    io,
    path::{Path, PathBuf},
};

use crate::utils::error::AppError;

/// Path prefix under which uploaded files are served.
pub const UPLOADS_ROUTE: &str = "/uploads";
pub const ASSETS_ROUTE: &str = "/assets";
pub const PLACEHOLDER_IMAGE: &str = "placeholder.jpeg";

/// Filesystem-backed image store. Files are addressed by generated name and
/// exposed as `{public_base_url}/uploads/{name}`.
#[derive(Debug, Clone)]
pub struct AssetStore {
    upload_dir: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl AssetStore {
    pub fn new(upload_dir: impl Into<PathBuf>, public_base_url: &str, max_bytes: usize) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir).await
    }

    pub fn public_url(&self, filename: &str) -> String {
        format!("{}{}/{}", self.public_base_url, UPLOADS_ROUTE, filename)
    }

    /// Image used for stories edited without one.
    pub fn placeholder_url(&self) -> String {
        format!("{}{}/{}", self.public_base_url, ASSETS_ROUTE, PLACEHOLDER_IMAGE)
    }

    /// Writes `bytes` under a freshly generated name and returns that name.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, AppError> {
        if bytes.len() > self.max_bytes {
            return Err(AppError::validation("Image exceeds maximum upload size"));
        }

        let filename = generate_filename(original_name);
        tokio::fs::write(self.upload_dir.join(&filename), bytes).await?;

        log::info!("🖼️  Stored upload {} ({} bytes)", filename, bytes.len());
        Ok(filename)
    }

    /// Deletes the file named by the last path segment of `url`.
    ///
    /// Returns `Ok(false)` when no such file exists in the upload directory.
    pub async fn remove_by_url(&self, url: &str) -> io::Result<bool> {
        let Some(filename) = filename_from_url(url) else {
            return Ok(false);
        };

        match tokio::fs::remove_file(self.upload_dir.join(filename)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// `{epoch-millis}-{uuid}{.ext}`, keeping a sane extension from the client name.
fn generate_filename(original_name: Option<&str>) -> String {
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    format!(
        "{}-{}{}",
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple(),
        extension
    )
}

/// Basename of the URL path, ignoring query and fragment. Names that could
/// escape the upload directory yield `None`.
pub fn filename_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let name = path.rsplit('/').next().unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." || name.contains('\\') {
        return None;
    }
    Some(name)
}
