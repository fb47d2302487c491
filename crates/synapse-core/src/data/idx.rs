// IDX container: big-endian u32 magic, u32 dimension sizes, then u8 payload.

use std::fs;
use std::path::Path;

use crate::errors::{NetError, Result};

pub const IMAGES_MAGIC: u32 = 0x0000_0803;
pub const LABELS_MAGIC: u32 = 0x0000_0801;

const IMAGES_HEADER: usize = 16;
const LABELS_HEADER: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdxImages {
    pub count: usize,
    pub rows: usize,
    pub cols: usize,
    /// `count * rows * cols` pixels, image after image.
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdxLabels {
    pub labels: Vec<u8>,
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    bytes
        .get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_be_bytes)
        .ok_or_else(|| NetError::Format(format!("header truncated at byte {offset}")))
}

fn check_magic(bytes: &[u8], want: u32) -> Result<()> {
    let magic = read_u32(bytes, 0)?;
    if magic != want {
        return Err(NetError::Format(format!(
            "magic {magic:#010x}, expected {want:#010x}"
        )));
    }
    Ok(())
}

pub fn parse_images(bytes: &[u8]) -> Result<IdxImages> {
    check_magic(bytes, IMAGES_MAGIC)?;
    let count = read_u32(bytes, 4)? as usize;
    let rows = read_u32(bytes, 8)? as usize;
    let cols = read_u32(bytes, 12)? as usize;

    let expected = count
        .checked_mul(rows)
        .and_then(|n| n.checked_mul(cols))
        .ok_or_else(|| NetError::Format("image dimensions overflow".into()))?;
    let payload = &bytes[IMAGES_HEADER..];
    if payload.len() != expected {
        return Err(NetError::Format(format!(
            "{count} images of {rows}x{cols} need {expected} bytes, found {}",
            payload.len()
        )));
    }

    Ok(IdxImages {
        count,
        rows,
        cols,
        pixels: payload.to_vec(),
    })
}

pub fn parse_labels(bytes: &[u8]) -> Result<IdxLabels> {
    check_magic(bytes, LABELS_MAGIC)?;
    let count = read_u32(bytes, 4)? as usize;
    let payload = &bytes[LABELS_HEADER..];
    if payload.len() != count {
        return Err(NetError::Format(format!(
            "{count} labels declared, found {}",
            payload.len()
        )));
    }
    Ok(IdxLabels {
        labels: payload.to_vec(),
    })
}

pub fn read_images(path: &Path) -> Result<IdxImages> {
    let bytes = fs::read(path)?;
    parse_images(&bytes).map_err(|e| NetError::Format(format!("{}: {e}", path.display())))
}

pub fn read_labels(path: &Path) -> Result<IdxLabels> {
    let bytes = fs::read(path)?;
    parse_labels(&bytes).map_err(|e| NetError::Format(format!("{}: {e}", path.display())))
}

/// Serialize images back to IDX. Used for fixtures and exports.
pub fn encode_images(images: &IdxImages) -> Vec<u8> {
    let mut out = Vec::with_capacity(IMAGES_HEADER + images.pixels.len());
    out.extend_from_slice(&IMAGES_MAGIC.to_be_bytes());
    out.extend_from_slice(&(images.count as u32).to_be_bytes());
    out.extend_from_slice(&(images.rows as u32).to_be_bytes());
    out.extend_from_slice(&(images.cols as u32).to_be_bytes());
    out.extend_from_slice(&images.pixels);
    out
}

pub fn encode_labels(labels: &IdxLabels) -> Vec<u8> {
    let mut out = Vec::with_capacity(LABELS_HEADER + labels.labels.len());
    out.extend_from_slice(&LABELS_MAGIC.to_be_bytes());
    out.extend_from_slice(&(labels.labels.len() as u32).to_be_bytes());
    out.extend_from_slice(&labels.labels);
    out
}
