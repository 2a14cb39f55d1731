use std::fmt;

/// Central error types for the daily memento app
#[derive(Debug)]
pub enum AppError {
    /// The item store could not be opened or migrated (fatal)
    StoreInit(String),
    /// Database error while fetching or mutating records (rusqlite)
    Database(rusqlite::Error),
    /// Filesystem error
    Filesystem(std::io::Error),
    /// Photo file error (save, load, corrupted, invalid dimensions)
    Image(photo_gallery::PhotoGalleryError),
    /// A selection was requested from an empty collection
    EmptyCollection(String),
    /// Permission denied (e.g. notifications)
    PermissionDenied(String),
    /// Validation error (e.g. invalid inputs)
    Validation(String),
    /// Resource not found
    NotFound(String),
    /// Configuration file could not be parsed
    Config(String),
    /// Backup archive could not be written or read
    Backup(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::StoreInit(msg) => write!(f, "Store initialization failed: {}", msg),
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Image(e) => write!(f, "{}", e),
            AppError::EmptyCollection(what) => write!(f, "No {} available", what),
            AppError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Backup(msg) => write!(f, "Backup error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// Conversions from other error types
impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Database(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<photo_gallery::PhotoGalleryError> for AppError {
    fn from(e: photo_gallery::PhotoGalleryError) -> Self {
        AppError::Image(e)
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(e: zip::result::ZipError) -> Self {
        AppError::Backup(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Backup(e.to_string())
    }
}

/// User-friendly error messages for UI
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::StoreInit(_) => {
                "The photo library could not be opened. Please restart the app.".to_string()
            }
            AppError::Database(_) => "A database error occurred. Please try again.".to_string(),
            AppError::Filesystem(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
            AppError::Image(photo_gallery::PhotoGalleryError::Validation(msg)) => {
                format!("This image cannot be used: {}", msg)
            }
            AppError::Image(_) => "Error processing image.".to_string(),
            AppError::EmptyCollection(what) => {
                format!("No {} available yet. Add some to get started.", what)
            }
            AppError::PermissionDenied(msg) => {
                format!("Permission required: {}. You can enable it in Settings.", msg)
            }
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => format!("{} was not found.", msg),
            AppError::Config(_) => "The configuration file is invalid.".to_string(),
            AppError::Backup(_) => "The backup could not be processed.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_message() {
        let err = AppError::EmptyCollection("photos".to_string());
        assert_eq!(err.to_string(), "No photos available");
        assert!(err.user_message().contains("No photos available yet"));
    }

    #[test]
    fn test_validation_image_message_carries_reason() {
        let err = AppError::from(photo_gallery::PhotoGalleryError::Validation(
            "50x50 is smaller than 100x100".to_string(),
        ));
        assert!(err.user_message().contains("50x50"));
    }
}
