use crate::models::{ImageSource, PhotoGalleryConfig, StoredPhoto};
use crate::processing::{self, ProcessingError};
use image::GenericImageView;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Error type for photo gallery operations
#[derive(Debug)]
pub enum PhotoGalleryError {
    /// The image violates the import limits
    Validation(String),
    /// The source image could not be read or decoded
    ImageLoad(String),
    /// Encoding or writing the photo file failed
    ImageSave(String),
    /// A stored file exists but does not decode as an image
    CorruptedImage(String),
    NotFound(String),
    IoError(std::io::Error),
    PathError(String),
}

impl std::fmt::Display for PhotoGalleryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoGalleryError::Validation(msg) => write!(f, "Invalid image: {}", msg),
            PhotoGalleryError::ImageLoad(msg) => write!(f, "Image load error: {}", msg),
            PhotoGalleryError::ImageSave(msg) => write!(f, "Image save error: {}", msg),
            PhotoGalleryError::CorruptedImage(msg) => write!(f, "Corrupted image: {}", msg),
            PhotoGalleryError::NotFound(msg) => write!(f, "Not found: {}", msg),
            PhotoGalleryError::IoError(e) => write!(f, "IO error: {}", e),
            PhotoGalleryError::PathError(msg) => write!(f, "Path error: {}", msg),
        }
    }
}

impl std::error::Error for PhotoGalleryError {}

impl From<std::io::Error> for PhotoGalleryError {
    fn from(err: std::io::Error) -> Self {
        PhotoGalleryError::IoError(err)
    }
}

impl From<ProcessingError> for PhotoGalleryError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Decode(msg) => PhotoGalleryError::ImageLoad(msg),
            ProcessingError::Dimensions(msg) => PhotoGalleryError::Validation(msg),
            ProcessingError::Encode(msg) => PhotoGalleryError::ImageSave(msg),
        }
    }
}

/// Photo file storage rooted at a single directory.
///
/// All paths handed in and out are file names relative to the storage root.
pub struct PhotoGalleryService {
    config: PhotoGalleryConfig,
}

impl PhotoGalleryService {
    /// Initialize the photo storage with configuration
    pub fn new(config: PhotoGalleryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhotoGalleryConfig {
        &self.config
    }

    pub fn storage_dir(&self) -> &Path {
        &self.config.storage_path
    }

    /// Creates the storage directory if it is missing
    pub fn ensure_storage_dir(&self) -> Result<(), PhotoGalleryError> {
        fs::create_dir_all(&self.config.storage_path)?;
        Ok(())
    }

    /// Returns the absolute path to a photo.
    ///
    /// Only plain file names are accepted so that a record can never point
    /// outside the storage root.
    pub fn get_absolute_photo_path(&self, relative_path: &str) -> Result<PathBuf, PhotoGalleryError> {
        let is_plain = !relative_path.is_empty()
            && relative_path != "."
            && relative_path != ".."
            && !relative_path.contains(['/', '\\']);
        if !is_plain {
            return Err(PhotoGalleryError::PathError(format!(
                "Not a plain file name: {:?}",
                relative_path
            )));
        }
        Ok(self.config.storage_path.join(relative_path))
    }

    /// Decodes, validates, downscales and encodes an image, then writes it as
    /// `<uuid>.jpg` and verifies the write by reading the file back.
    pub fn store_image(&self, source: &ImageSource) -> Result<StoredPhoto, PhotoGalleryError> {
        let bytes = match source {
            ImageSource::Path(path) => fs::read(path).map_err(|e| {
                PhotoGalleryError::ImageLoad(format!("Failed to read {}: {}", path.display(), e))
            })?,
            ImageSource::Bytes(bytes) => bytes.clone(),
        };

        let img = processing::prepare_image(&bytes, &self.config.limits)?;
        let (width, height) = img.dimensions();
        let encoded = processing::encode_jpeg(&img, self.config.limits.jpeg_quality)?;

        let uuid = Uuid::new_v4();
        let file_name = format!("{}.jpg", uuid);
        self.write_photo(&file_name, &encoded)?;

        if let Err(e) = self.verify_written(&file_name, &encoded) {
            if let Err(cleanup) = self.delete_photo_file(&file_name) {
                log::warn!("Could not remove unverified file {}: {}", file_name, cleanup);
            }
            return Err(e);
        }

        log::debug!("Stored photo {} ({}x{}, {} bytes)", file_name, width, height, encoded.len());

        Ok(StoredPhoto {
            uuid,
            file_name,
            width,
            height,
            byte_len: encoded.len(),
        })
    }

    /// Writes bytes to a new file; an existing file is never overwritten
    pub fn write_photo(&self, relative_path: &str, bytes: &[u8]) -> Result<(), PhotoGalleryError> {
        let path = self.get_absolute_photo_path(relative_path)?;
        self.ensure_storage_dir()?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                PhotoGalleryError::ImageSave(format!("Failed to create {}: {}", path.display(), e))
            })?;
        file.write_all(bytes)
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                PhotoGalleryError::ImageSave(format!("Failed to write {}: {}", path.display(), e))
            })?;
        Ok(())
    }

    fn verify_written(&self, relative_path: &str, expected: &[u8]) -> Result<(), PhotoGalleryError> {
        let read_back = self.read_photo(relative_path)?;
        if read_back != expected {
            return Err(PhotoGalleryError::ImageSave(format!(
                "Verification failed for {}: wrote {} bytes, read {}",
                relative_path,
                expected.len(),
                read_back.len()
            )));
        }
        if !processing::is_decodable(&read_back) {
            return Err(PhotoGalleryError::CorruptedImage(relative_path.to_string()));
        }
        Ok(())
    }

    /// Reads the raw bytes of a stored photo
    pub fn read_photo(&self, relative_path: &str) -> Result<Vec<u8>, PhotoGalleryError> {
        let path = self.get_absolute_photo_path(relative_path)?;
        fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PhotoGalleryError::NotFound(relative_path.to_string()),
            _ => PhotoGalleryError::ImageLoad(format!("Failed to read {}: {}", path.display(), e)),
        })
    }

    /// Reads and decodes a stored photo
    pub fn load_image(&self, relative_path: &str) -> Result<image::DynamicImage, PhotoGalleryError> {
        let bytes = self.read_photo(relative_path)?;
        image::load_from_memory(&bytes)
            .map_err(|e| PhotoGalleryError::CorruptedImage(format!("{}: {}", relative_path, e)))
    }

    pub fn photo_exists(&self, relative_path: &str) -> bool {
        self.get_absolute_photo_path(relative_path)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    /// True when the stored file can be read and decoded
    pub fn is_decodable(&self, relative_path: &str) -> bool {
        match self.read_photo(relative_path) {
            Ok(bytes) => processing::is_decodable(&bytes),
            Err(e) => {
                log::debug!("Decodability check failed for {}: {}", relative_path, e);
                false
            }
        }
    }

    pub fn delete_photo_file(&self, relative_path: &str) -> Result<(), PhotoGalleryError> {
        let path = self.get_absolute_photo_path(relative_path)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PhotoGalleryError::NotFound(relative_path.to_string()),
            _ => PhotoGalleryError::IoError(e),
        })
    }

    /// Lists the file names in the storage directory (sorted)
    pub fn list_photo_files(&self) -> Result<Vec<String>, PhotoGalleryError> {
        let dir = &self.config.storage_path;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<String> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(|s| s.to_string()))
            .collect();
        entries.sort();

        Ok(entries)
    }
}
