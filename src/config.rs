use crate::error::AppError;
use crate::filesystem;
use photo_gallery::{ImageLimits, PhotoGalleryConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// How the daily quote is picked
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSelection {
    /// `(day_of_year + (year - 2023)) * 73 + 37` modulo the quote count, no daily cache
    #[default]
    DayHash,
    /// Same epoch-day policy with a sticky daily cache as the photo selection
    Sticky,
}

/// App configuration, read from `config.toml` in the data directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory the configuration was loaded from
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Photo directory; relative paths are resolved against `data_dir`
    pub photo_dir: PathBuf,
    /// Database file; relative paths are resolved against `data_dir`
    pub database_file: PathBuf,
    /// Delay before the integrity check runs after a cold load
    pub integrity_check_delay_ms: u64,
    /// Delete `<uuid>.jpg` files that no photo record references
    pub remove_orphan_files: bool,
    pub quote_selection: QuoteSelection,
    pub import: ImageLimits,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: filesystem::get_app_data_dir(),
            photo_dir: PathBuf::from("photos"),
            database_file: PathBuf::from("daily_memento.db"),
            integrity_check_delay_ms: 500,
            remove_orphan_files: false,
            quote_selection: QuoteSelection::default(),
            import: ImageLimits::default(),
        }
    }
}

impl AppConfig {
    /// Loads `config.toml` from the platform data directory, falling back to defaults
    pub fn load() -> Result<Self, AppError> {
        Self::load_from_dir(&filesystem::get_app_data_dir())
    }

    /// Loads `config.toml` from `dir`; a missing file yields the defaults rooted at `dir`
    pub fn load_from_dir(dir: &Path) -> Result<Self, AppError> {
        let path = dir.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let parsed: AppConfig = toml::from_str(&raw)
                .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
            log::info!("Loaded configuration from {}", path.display());
            parsed
        } else {
            log::debug!("No {} found, using defaults", path.display());
            AppConfig::default()
        };

        config.data_dir = dir.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let limits = &self.import;
        if limits.min_dimension == 0 || limits.min_dimension > limits.max_dimension {
            return Err(AppError::Config(format!(
                "import.min_dimension ({}) must be between 1 and import.max_dimension ({})",
                limits.min_dimension, limits.max_dimension
            )));
        }
        if limits.downscale_threshold < limits.min_dimension {
            return Err(AppError::Config(format!(
                "import.downscale_threshold ({}) must not be below import.min_dimension ({})",
                limits.downscale_threshold, limits.min_dimension
            )));
        }
        if !(1..=100).contains(&limits.jpeg_quality) {
            return Err(AppError::Config(format!(
                "import.jpeg_quality ({}) must be between 1 and 100",
                limits.jpeg_quality
            )));
        }
        Ok(())
    }

    pub fn photo_path(&self) -> PathBuf {
        self.data_dir.join(&self.photo_dir)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn gallery_config(&self) -> PhotoGalleryConfig {
        PhotoGalleryConfig {
            storage_path: self.photo_path(),
            limits: self.import,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults_in_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_dir(tmp.path()).unwrap();
        assert_eq!(config.data_dir, tmp.path());
        assert_eq!(config.photo_path(), tmp.path().join("photos"));
        assert_eq!(config.quote_selection, QuoteSelection::DayHash);
        assert_eq!(config.import.jpeg_quality, 85);
    }

    #[test]
    fn test_partial_file_overrides_fields() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "quote_selection = \"sticky\"\nintegrity_check_delay_ms = 0\n\n[import]\nmin_dimension = 64\n",
        )
        .unwrap();

        let config = AppConfig::load_from_dir(tmp.path()).unwrap();
        assert_eq!(config.quote_selection, QuoteSelection::Sticky);
        assert_eq!(config.integrity_check_delay_ms, 0);
        assert_eq!(config.import.min_dimension, 64);
        assert_eq!(config.import.max_dimension, 4096);
    }

    #[test]
    fn test_invalid_quality_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[import]\njpeg_quality = 0\n",
        )
        .unwrap();

        assert!(matches!(
            AppConfig::load_from_dir(tmp.path()),
            Err(AppError::Config(_))
        ));
    }
}
