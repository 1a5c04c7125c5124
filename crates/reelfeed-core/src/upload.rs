//! Upload form state and local validation.
//!
//! Validation runs before any network call; a form that fails it never
//! reaches the backend.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Extension accepted for uploads (the backend only takes MP4)
const ACCEPTED_EXTENSION: &str = "mp4";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a video file.")]
    NoFile,

    #[error("Video title is required.")]
    EmptyTitle,

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Only MP4 videos can be uploaded.")]
    UnsupportedFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    pub file: Option<PathBuf>,
}

/// A form that passed validation, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidUpload {
    pub title: String,
    pub description: String,
    pub path: PathBuf,
    pub file_name: String,
}

impl UploadForm {
    /// Set the file from user input; blank input clears the selection
    pub fn select_file(&mut self, input: &str) {
        let trimmed = input.trim();
        self.file = if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        };
    }

    /// Check the form in the order a user fixes it: file, title, then the file itself
    pub fn validate(&self) -> Result<ValidUpload, ValidationError> {
        let path = self.file.as_ref().ok_or(ValidationError::NoFile)?;

        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        if !path.is_file() {
            return Err(ValidationError::FileNotFound(path.clone()));
        }

        if !has_accepted_extension(path) {
            return Err(ValidationError::UnsupportedFormat);
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video.mp4".to_string());

        Ok(ValidUpload {
            title: self.title.clone(),
            description: self.description.clone(),
            path: path.clone(),
            file_name,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(ACCEPTED_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn scratch_file(name: &str) -> PathBuf {
        let suffix: u64 = rand::thread_rng().gen();
        let dir = std::env::temp_dir().join(format!("reelfeed-upload-{:016x}", suffix));
        std::fs::create_dir_all(&dir).expect("mkdir failed");
        let path = dir.join(name);
        std::fs::write(&path, b"\x00\x00\x00\x18ftypmp42").expect("write failed");
        path
    }

    #[test]
    fn test_no_file_is_reported_first() {
        let form = UploadForm::default();
        assert_eq!(form.validate(), Err(ValidationError::NoFile));
        assert_eq!(
            ValidationError::NoFile.to_string(),
            "Please select a video file."
        );
    }

    #[test]
    fn test_blank_title() {
        let form = UploadForm {
            title: "   ".to_string(),
            description: String::new(),
            file: Some(scratch_file("clip.mp4")),
        };
        assert_eq!(form.validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_missing_file() {
        let form = UploadForm {
            title: "clip".to_string(),
            description: String::new(),
            file: Some(PathBuf::from("/definitely/not/here.mp4")),
        };
        assert!(matches!(form.validate(), Err(ValidationError::FileNotFound(_))));
    }

    #[test]
    fn test_wrong_extension() {
        let form = UploadForm {
            title: "clip".to_string(),
            description: String::new(),
            file: Some(scratch_file("clip.mov")),
        };
        assert_eq!(form.validate(), Err(ValidationError::UnsupportedFormat));
    }

    #[test]
    fn test_valid_form() {
        let path = scratch_file("Holiday.MP4");
        let form = UploadForm {
            title: "holiday".to_string(),
            description: String::new(),
            file: Some(path.clone()),
        };

        let upload = form.validate().expect("form should validate");
        assert_eq!(upload.file_name, "Holiday.MP4");
        assert_eq!(upload.path, path);
        assert_eq!(upload.description, "");
    }

    #[test]
    fn test_select_file_and_reset() {
        let mut form = UploadForm::default();
        form.select_file("  /tmp/a.mp4 ");
        assert_eq!(form.file, Some(PathBuf::from("/tmp/a.mp4")));
        form.select_file("   ");
        assert_eq!(form.file, None);

        form.title = "t".to_string();
        form.reset();
        assert_eq!(form, UploadForm::default());
    }
}
