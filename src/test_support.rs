//! Helpers shared by the unit tests.

use crate::models::PhotoRecord;
use chrono::NaiveDate;
use image::{ImageBuffer, Rgb};
use photo_gallery::{ImageLimits, PhotoGalleryConfig, PhotoGalleryService};
use std::io::Cursor;
use std::path::Path;
use uuid::Uuid;

/// Encodes a gradient image of the given size as JPEG
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128u8])
    });
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .unwrap();
    out.into_inner()
}

/// Photo storage under `<dir>/photos` with default limits
pub fn gallery_in(dir: &Path) -> PhotoGalleryService {
    PhotoGalleryService::new(PhotoGalleryConfig {
        storage_path: dir.join("photos"),
        limits: ImageLimits::default(),
    })
}

pub fn photo_with_path(day_number: i64, path: Option<&str>) -> PhotoRecord {
    let mut photo = PhotoRecord::new(
        Uuid::new_v4(),
        day_number,
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        String::new(),
    );
    photo.relative_path = path.map(|p| p.to_string());
    photo
}
