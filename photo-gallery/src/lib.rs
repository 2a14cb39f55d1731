//! # Photo Gallery
//!
//! Photo file storage for the daily memento app.
//!
//! This crate owns everything that touches image files:
//! - Validation of imported images (minimum/maximum dimensions)
//! - Downscaling and JPEG encoding
//! - Verified writes to `<uuid>.jpg` files under a single storage root
//! - Read, existence, decodability and delete checks used by the integrity checker
//!
//! ## Platform Separation
//!
//! Picking or capturing images is a platform concern and stays outside this
//! crate. Callers hand over either a file path or raw bytes.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use photo_gallery::{ImageSource, PhotoGalleryConfig, PhotoGalleryService};
//!
//! let service = PhotoGalleryService::new(PhotoGalleryConfig {
//!     storage_path: "/path/to/photos".into(),
//!     ..Default::default()
//! });
//! let stored = service.store_image(&ImageSource::Path("/tmp/picked.jpg".into()))?;
//! ```

pub mod models;
pub mod processing;
pub mod service;

pub use models::{ImageLimits, ImageSource, PhotoGalleryConfig, StoredPhoto};
pub use processing::ProcessingError;
pub use service::{PhotoGalleryError, PhotoGalleryService};
