// Payload classification by declared type and magic bytes

use anyhow::{Result, bail};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

use crate::resource::{TypeId, rt};

const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const GIF_MAGIC: &[u8] = b"GIF8";
const GIF_VERSIONS: [&[u8]; 2] = [b"7a", b"9a"];
const JPEG_SOI: &[u8] = &[0xFF, 0xD8, 0xFF];
const JPEG_JFIF: &[u8] = &[0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01];
const JPEG_EXIF_MARKER: u8 = 0xE1;
const JPEG_EXIF_ID: &[u8] = b"Exif\0\0";
// Right after SOI, APP1 marker and segment length, or two bytes further in
const JPEG_EXIF_GAPS: [usize; 2] = [6, 8];

pub const BMP_HEADER_SIZE: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Png,
    Gif,
    Jpeg,
    NeedsBitmapHeader,
    XmlManifest,
    Unknown,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Gif => "gif",
            Format::Jpeg => "jpg",
            Format::NeedsBitmapHeader => "bmp",
            Format::XmlManifest => "xml",
            Format::Unknown => "bin",
        }
    }

    pub fn is_image(self) -> bool {
        matches!(self, Format::Png | Format::Gif | Format::Jpeg)
    }
}

/// Classifies `data` stored under resource type `kind`.
///
/// BITMAP and MANIFEST are decided by type alone; every other type is
/// matched against the PNG, GIF and JPEG signatures.
pub fn classify(kind: &TypeId, data: &[u8]) -> Format {
    if kind.is(rt::BITMAP) {
        return Format::NeedsBitmapHeader;
    }
    if kind.is(rt::MANIFEST) {
        return if data.first() == Some(&b'<') {
            Format::XmlManifest
        } else {
            Format::Unknown
        };
    }
    sniff_image(data)
}

pub fn sniff_image(data: &[u8]) -> Format {
    if data.starts_with(PNG_MAGIC) {
        Format::Png
    } else if is_gif(data) {
        Format::Gif
    } else if is_jpeg(data) {
        Format::Jpeg
    } else {
        Format::Unknown
    }
}

fn is_gif(data: &[u8]) -> bool {
    data.starts_with(GIF_MAGIC)
        && GIF_VERSIONS
            .iter()
            .any(|v| data[GIF_MAGIC.len()..].starts_with(v))
}

fn is_jpeg(data: &[u8]) -> bool {
    if !data.starts_with(JPEG_SOI) {
        return false;
    }
    let rest = &data[JPEG_SOI.len()..];
    match rest.first().copied() {
        Some(0xD8 | 0xEE) => true,
        Some(JPEG_EXIF_MARKER) => JPEG_EXIF_GAPS.iter().any(|&gap| {
            data.get(gap..)
                .is_some_and(|tail| tail.starts_with(JPEG_EXIF_ID))
        }),
        Some(_) => rest.starts_with(JPEG_JFIF),
        None => false,
    }
}

/// Turns a DIB into a BMP file by prepending a BITMAPFILEHEADER.
///
/// The pixel offset is the DIB's header size plus the file header; palette
/// entries are not accounted for.
pub fn dib_to_bmp(dib: &[u8]) -> Result<Vec<u8>> {
    if dib.len() < 4 {
        bail!("DIB data too small ({} bytes)", dib.len());
    }
    let header_size = u32::from_le_bytes([dib[0], dib[1], dib[2], dib[3]]);
    let file_size = u32::try_from(BMP_HEADER_SIZE + dib.len())?;
    let pixel_data_offset = header_size
        .checked_add(BMP_HEADER_SIZE as u32)
        .ok_or_else(|| anyhow::anyhow!("DIB header size {} out of range", header_size))?;

    let mut bmp_data = Vec::with_capacity(file_size as usize);
    bmp_data.write_all(b"BM")?;
    bmp_data.write_u32::<LittleEndian>(file_size)?;
    bmp_data.write_u16::<LittleEndian>(0)?; // Reserved1
    bmp_data.write_u16::<LittleEndian>(0)?; // Reserved2
    bmp_data.write_u32::<LittleEndian>(pixel_data_offset)?;
    bmp_data.write_all(dib)?;

    Ok(bmp_data)
}
