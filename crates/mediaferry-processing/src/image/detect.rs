//! Image type detection from file content.

use image::ImageFormat;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Enough bytes for every signature `image::guess_format` knows.
const SNIFF_LEN: u64 = 64;

/// Identify the image type of a file by its leading bytes.
///
/// The extension is ignored: a text file named `photo.jpg` is `None`.
pub fn detect_image_format(path: &Path) -> io::Result<Option<ImageFormat>> {
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;
    Ok(image::guess_format(&head).ok())
}
