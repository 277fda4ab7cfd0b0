use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

/// Folder under the public root that holds cover images.
pub const IMAGES_DIR: &str = "images";

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Invalid file type. Only .jpg, .jpeg, .png, and .gif are allowed.")]
    UnsupportedFileType(String),

    #[error("Image I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file received with a form submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub struct ImageService {
    public_root: PathBuf,
}

impl ImageService {
    #[must_use]
    pub fn new(public_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
        }
    }

    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.public_root.join(IMAGES_DIR)
    }

    /// Writes the upload under a fresh unique name and returns its path
    /// relative to the public root. Empty uploads are ignored.
    pub async fn store(&self, upload: &UploadedFile) -> Result<Option<String>, ImageError> {
        if upload.is_empty() {
            debug!(file = %upload.file_name, "Ignoring empty upload");
            return Ok(None);
        }

        check_extension(&upload.file_name)?;

        let file_name = format!(
            "{}_{}",
            Uuid::new_v4(),
            sanitize_file_name(&upload.file_name)
        );

        let images_dir = self.images_dir();
        if !images_dir.exists() {
            fs::create_dir_all(&images_dir).await?;
        }

        let file_path = images_dir.join(&file_name);
        fs::write(&file_path, &upload.bytes).await?;

        info!(
            path = %file_path.display(),
            size = upload.bytes.len(),
            "Stored cover image"
        );

        Ok(Some(format!("{IMAGES_DIR}/{file_name}")))
    }

    /// Removes the image if it exists. Returns whether a file was removed.
    pub async fn delete(&self, relative_path: &str) -> Result<bool, ImageError> {
        let Some(path) = self.resolve(relative_path) else {
            debug!(path = %relative_path, "Not an image store path, skipping delete");
            return Ok(false);
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Deleted cover image");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Maps a stored relative path (`images/x.jpg`, `/images/x.jpg` or
    /// `images\x.jpg`) to its location on disk. Paths outside the images
    /// folder resolve to `None`.
    #[must_use]
    pub fn resolve(&self, relative_path: &str) -> Option<PathBuf> {
        let normalized = relative_path.trim().replace('\\', "/");
        let mut parts = normalized.trim_start_matches('/').split('/');

        let (Some(dir), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return None;
        };

        if dir != IMAGES_DIR || name.is_empty() || name == "." || name == ".." {
            return None;
        }

        Some(self.images_dir().join(name))
    }
}

fn check_extension(file_name: &str) -> Result<(), ImageError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(ImageError::UnsupportedFileType(extension))
    }
}

/// Keeps the last path component of a client-supplied name and replaces
/// anything outside `[A-Za-z0-9._-]`.
fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);

    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
