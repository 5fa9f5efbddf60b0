//! IDX binary format for image and label files.
//!
//! Headers are big-endian `u32`s. Image files: magic, count, rows, cols,
//! then `count * rows * cols` bytes. Label files: magic, count, then `count` bytes.

use crate::error::{DataError, Result};

/// Magic number of an IDX image file.
pub const IMAGE_MAGIC: u32 = 2051;

/// Magic number of an IDX label file.
pub const LABEL_MAGIC: u32 = 2049;

const IMAGE_HEADER_LEN: usize = 16;
const LABEL_HEADER_LEN: usize = 8;

/// A borrowed view of a parsed IDX image file.
#[derive(Debug, Clone, Copy)]
pub struct IdxImages<'a> {
    /// Number of images.
    pub count: usize,
    /// Rows per image.
    pub rows: usize,
    /// Columns per image.
    pub cols: usize,
    /// Pixel payload, `count * rows * cols` bytes.
    pub pixels: &'a [u8],
}

impl<'a> IdxImages<'a> {
    /// Pixels per image.
    #[must_use]
    pub fn image_len(&self) -> usize {
        self.rows * self.cols
    }

    /// Raw bytes of one image.
    pub fn image(&self, index: usize) -> Result<&'a [u8]> {
        if index >= self.count {
            return Err(DataError::IndexOutOfBounds {
                index,
                length: self.count,
            });
        }
        let start = index * self.image_len();
        Ok(&self.pixels[start..start + self.image_len()])
    }
}

fn read_u32_be(bytes: &[u8], offset: usize) -> Result<u32> {
    bytes
        .get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_be_bytes)
        .ok_or_else(|| DataError::FormatError(format!("truncated header at byte {}", offset)))
}

fn check_magic(bytes: &[u8], expected: u32, kind: &str) -> Result<()> {
    let magic = read_u32_be(bytes, 0)?;
    if magic != expected {
        return Err(DataError::FormatError(format!(
            "not a valid IDX {} file: magic {} (expected {})",
            kind, magic, expected
        )));
    }
    Ok(())
}

/// Parse an IDX image file.
///
/// # Errors
///
/// Returns [`DataError::FormatError`] on a wrong magic number or a payload
/// shorter than the header promises.
pub fn parse_idx_images(bytes: &[u8]) -> Result<IdxImages<'_>> {
    check_magic(bytes, IMAGE_MAGIC, "image")?;
    let count = read_u32_be(bytes, 4)? as usize;
    let rows = read_u32_be(bytes, 8)? as usize;
    let cols = read_u32_be(bytes, 12)? as usize;

    let needed = count
        .checked_mul(rows)
        .and_then(|n| n.checked_mul(cols))
        .ok_or_else(|| DataError::FormatError("image dimensions overflow".to_string()))?;
    let payload = &bytes[IMAGE_HEADER_LEN..];
    if payload.len() < needed {
        return Err(DataError::FormatError(format!(
            "image payload has {} bytes, header promises {}",
            payload.len(),
            needed
        )));
    }

    Ok(IdxImages {
        count,
        rows,
        cols,
        pixels: &payload[..needed],
    })
}

/// Parse an IDX label file into one byte per label.
pub fn parse_idx_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    check_magic(bytes, LABEL_MAGIC, "label")?;
    let count = read_u32_be(bytes, 4)? as usize;
    let payload = &bytes[LABEL_HEADER_LEN..];
    if payload.len() < count {
        return Err(DataError::FormatError(format!(
            "label payload has {} bytes, header promises {}",
            payload.len(),
            count
        )));
    }
    Ok(payload[..count].to_vec())
}

/// Number of images in an IDX image file.
pub fn count_images(bytes: &[u8]) -> Result<usize> {
    check_magic(bytes, IMAGE_MAGIC, "image")?;
    Ok(read_u32_be(bytes, 4)? as usize)
}

/// Raw pixels (0–255) of a single image.
pub fn extract_image(bytes: &[u8], index: usize) -> Result<Vec<u8>> {
    Ok(parse_idx_images(bytes)?.image(index)?.to_vec())
}

/// A single label.
pub fn extract_label(bytes: &[u8], index: usize) -> Result<u8> {
    let labels = parse_idx_labels(bytes)?;
    labels
        .get(index)
        .copied()
        .ok_or(DataError::IndexOutOfBounds {
            index,
            length: labels.len(),
        })
}
