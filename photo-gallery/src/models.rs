use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Dimension and encoding limits applied to every imported image
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageLimits {
    /// Smallest accepted width/height
    pub min_dimension: u32,
    /// Largest accepted width/height before any downscaling
    pub max_dimension: u32,
    /// Images with a side above this are downscaled to fit
    pub downscale_threshold: u32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            min_dimension: 100,
            max_dimension: 4096,
            downscale_threshold: 2048,
            jpeg_quality: 85,
        }
    }
}

/// Configuration for photo storage initialization
#[derive(Debug, Clone)]
pub struct PhotoGalleryConfig {
    /// Base directory for photo files
    pub storage_path: PathBuf,
    pub limits: ImageLimits,
}

impl Default for PhotoGalleryConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./data/photos"),
            limits: ImageLimits::default(),
        }
    }
}

/// Where an image to import comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// A file handed over by the platform picker or camera
    Path(PathBuf),
    /// Raw encoded bytes (e.g. from a share sheet)
    Bytes(Vec<u8>),
}

/// A photo file written and verified by [`crate::PhotoGalleryService::store_image`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPhoto {
    pub uuid: Uuid,
    /// File name relative to the storage root (`<uuid>.jpg`)
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub byte_len: usize,
}
