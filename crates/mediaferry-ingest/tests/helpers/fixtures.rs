//! Test fixtures: JPEG/PNG/PDF files written under the uploads directory.

use image::{ImageFormat, Rgb, RgbImage};
use mediaferry_core::{AttachmentMetadata, SizeVariant};
use std::path::Path;

/// Write a JPEG at `path`, creating parent directories.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_fn(width, height, |x, y| Rgb([(x * 3) as u8, (y * 3) as u8, 128]))
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

/// Minimal valid PDF.
pub fn create_test_pdf() -> Vec<u8> {
    b"%PDF-1.4
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj
3 0 obj
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>
endobj
trailer
<< /Size 4 /Root 1 0 R >>
%%EOF
"
    .to_vec()
}

pub fn write_pdf(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, create_test_pdf()).unwrap();
}

pub fn draft_metadata(relative_path: &str) -> AttachmentMetadata {
    let mut metadata = AttachmentMetadata::new(relative_path);
    metadata.width = Some(64);
    metadata.height = Some(48);
    metadata.sizes.insert(
        "thumbnail".to_string(),
        SizeVariant {
            file: "photo-150x150.jpg".to_string(),
            width: 150,
            height: 150,
            mime_type: Some("image/jpeg".to_string()),
        },
    );
    metadata
}
