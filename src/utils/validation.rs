//! Centralized validation of uploaded chromatogram images.

use std::fmt;
use std::path::Path;

use image::ImageFormat;

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;
pub const MIN_FILE_CONTENT_SIZE: usize = 1;

/// Image container formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Bmp,
    Gif,
}

impl ImageKind {
    /// Map a raster format onto the accepted upload kinds
    #[must_use]
    pub fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            ImageFormat::Bmp => Some(ImageKind::Bmp),
            ImageFormat::Gif => Some(ImageKind::Gif),
            _ => None,
        }
    }

    #[must_use]
    pub fn format(self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Bmp => ImageFormat::Bmp,
            ImageKind::Gif => ImageFormat::Gif,
        }
    }

    /// Detect the kind from the file signature
    #[must_use]
    pub fn from_magic(content: &[u8]) -> Option<Self> {
        image::guess_format(content).ok().and_then(Self::from_format)
    }

    /// Detect the kind from the filename extension, ignoring case
    #[must_use]
    pub fn from_filename(filename: &str) -> Option<Self> {
        ImageFormat::from_path(Path::new(filename))
            .ok()
            .and_then(Self::from_format)
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageKind::Png => "PNG",
            ImageKind::Jpeg => "JPEG",
            ImageKind::Bmp => "BMP",
            ImageKind::Gif => "GIF",
        };
        f.write_str(name)
    }
}

/// Security validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
    #[error("File content is empty")]
    InvalidFileContent,
    #[error("File is not a PNG, JPEG, BMP or GIF image")]
    UnsupportedFormat,
    #[error("File content is {actual} but the filename says {claimed}")]
    FormatValidationFailed { claimed: ImageKind, actual: ImageKind },
}

/// Secure filename validation to prevent directory traversal and other attacks
///
/// Validates and sanitizes filenames by:
/// - Checking length limits
/// - Preventing directory traversal (../, ..\\)
/// - Removing potentially dangerous characters
/// - Ensuring filename is not empty after sanitization
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the filename is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains invalid characters.
pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    if filename.contains('\0') || filename.chars().any(|c| ('\x01'..='\x1F').contains(&c)) {
        return Err(ValidationError::InvalidFilename);
    }

    let sanitized = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-' || *c == '_' || *c == ' ')
        .collect::<String>();

    if sanitized.trim().is_empty() {
        return Err(ValidationError::InvalidFilename);
    }

    // Hidden files only when they still name an image
    if sanitized.starts_with('.') && ImageKind::from_filename(&sanitized).is_none() {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}

/// Check the content is non-empty and carries a supported image signature
///
/// # Errors
///
/// Returns `ValidationError::InvalidFileContent` for empty content and
/// `ValidationError::UnsupportedFormat` when no known signature matches.
pub fn validate_file_content(content: &[u8]) -> Result<ImageKind, ValidationError> {
    if content.len() < MIN_FILE_CONTENT_SIZE {
        return Err(ValidationError::InvalidFileContent);
    }
    ImageKind::from_magic(content).ok_or(ValidationError::UnsupportedFormat)
}

/// An upload that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    /// Sanitized filename, if one was given
    pub filename: Option<String>,
    pub kind: ImageKind,
}

/// Comprehensive input validation combining filename and content checks
///
/// An image extension on the filename must agree with the content's
/// signature; filenames without a recognised extension are accepted as long
/// as the content is a supported image.
///
/// # Errors
///
/// Returns a `ValidationError` if filename validation fails, the content is
/// not a supported image, or the extension contradicts the content.
pub fn validate_upload(
    filename: Option<&str>,
    content: &[u8],
) -> Result<ValidatedUpload, ValidationError> {
    let filename = filename.map(validate_filename).transpose()?;
    let actual = validate_file_content(content)?;

    if let Some(claimed) = filename.as_deref().and_then(ImageKind::from_filename) {
        if claimed != actual {
            tracing::warn!(%claimed, %actual, "Upload extension does not match content");
            return Err(ValidationError::FormatValidationFailed { claimed, actual });
        }
    }

    Ok(ValidatedUpload {
        filename,
        kind: actual,
    })
}
