//! Minimal truecolor PNG encoder
//!
//! Writes exactly what a placeholder icon needs: the signature, one `IHDR`,
//! one zlib-compressed `IDAT` and an empty `IEND`. No palettes, alpha,
//! interlacing or ancillary chunks.

use crate::error::IconError;
use crate::raster::{render_raster, IconSpec};
use log::debug;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub const IHDR: &[u8; 4] = b"IHDR";
pub const IDAT: &[u8; 4] = b"IDAT";
pub const IEND: &[u8; 4] = b"IEND";

const BIT_DEPTH: u8 = 8;
const COLOR_TYPE_TRUECOLOR: u8 = 2;

/// A chunk as read back from a PNG byte stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub tag: [u8; 4],
    pub data: Vec<u8>,
}

impl Chunk {
    /// CRC32 over tag followed by data
    pub fn crc(&self) -> u32 {
        chunk_crc(&self.tag, &self.data)
    }
}

fn chunk_crc(tag: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(tag);
    hasher.update(data);
    hasher.finalize()
}

/// Serialize a single chunk: length, tag, data, CRC32(tag ‖ data)
///
/// # Errors
/// Returns `IconError::Encoding` if `data` is too long for the 32-bit length
/// field.
pub fn build_chunk(tag: &[u8; 4], data: &[u8]) -> Result<Vec<u8>, IconError> {
    let len = u32::try_from(data.len()).map_err(|_| {
        IconError::Encoding(format!(
            "{} chunk payload of {} bytes does not fit a u32 length",
            String::from_utf8_lossy(tag),
            data.len()
        ))
    })?;

    let mut out = Vec::with_capacity(12 + data.len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(data);
    out.extend_from_slice(&chunk_crc(tag, data).to_be_bytes());
    Ok(out)
}

/// Contents of the IHDR chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression: u8,
    pub filter: u8,
    pub interlace: u8,
}

impl ImageHeader {
    /// 8-bit truecolor, non-interlaced square header
    pub fn truecolor(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            bit_depth: BIT_DEPTH,
            color_type: COLOR_TYPE_TRUECOLOR,
            compression: 0,
            filter: 0,
            interlace: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; 13] {
        let mut bytes = [0u8; 13];
        bytes[0..4].copy_from_slice(&self.width.to_be_bytes());
        bytes[4..8].copy_from_slice(&self.height.to_be_bytes());
        bytes[8] = self.bit_depth;
        bytes[9] = self.color_type;
        bytes[10] = self.compression;
        bytes[11] = self.filter;
        bytes[12] = self.interlace;
        bytes
    }
}

/// Encode the gradient icon described by `spec` as a complete PNG file
pub fn build_png_bytes(spec: &IconSpec) -> Result<Vec<u8>, IconError> {
    let raw = render_raster(spec);
    let compressed = compress_to_vec_zlib(&raw, CompressionLevel::BestCompression as u8);
    debug!(
        "icon{}: raster {} bytes, deflated to {} bytes",
        spec.size(),
        raw.len(),
        compressed.len()
    );

    let ihdr = build_chunk(IHDR, &ImageHeader::truecolor(spec.size()).to_bytes())?;
    let idat = build_chunk(IDAT, &compressed)?;
    let iend = build_chunk(IEND, &[])?;

    let mut png =
        Vec::with_capacity(PNG_SIGNATURE.len() + ihdr.len() + idat.len() + iend.len());
    png.extend_from_slice(&PNG_SIGNATURE);
    png.extend_from_slice(&ihdr);
    png.extend_from_slice(&idat);
    png.extend_from_slice(&iend);
    Ok(png)
}

/// Split a PNG byte stream into its chunks, returning each chunk together with
/// the CRC stored in the file. Returns `None` on a bad signature or truncation.
pub fn read_chunks(png: &[u8]) -> Option<Vec<(Chunk, u32)>> {
    let mut rest = png.strip_prefix(&PNG_SIGNATURE)?;
    let mut chunks = Vec::new();

    while !rest.is_empty() {
        let len = u32::from_be_bytes(rest.get(0..4)?.try_into().ok()?) as usize;
        let tag: [u8; 4] = rest.get(4..8)?.try_into().ok()?;
        let data = rest.get(8..8 + len)?.to_vec();
        let crc = u32::from_be_bytes(rest.get(8 + len..12 + len)?.try_into().ok()?);
        chunks.push((Chunk { tag, data }, crc));
        rest = &rest[12 + len..];
    }
    Some(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{raster_len, BRAND_COLOR};

    #[test]
    fn test_iend_chunk_bytes() {
        // The IEND chunk is the same in every PNG file
        assert_eq!(
            build_chunk(IEND, &[]).unwrap(),
            vec![0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn test_chunk_layout() {
        let data = [1u8, 2, 3, 4, 5];
        let bytes = build_chunk(b"tEST", &data).unwrap();
        assert_eq!(bytes.len(), 12 + data.len());
        assert_eq!(&bytes[0..4], &5u32.to_be_bytes());
        assert_eq!(&bytes[4..8], b"tEST");
        assert_eq!(&bytes[8..13], &data);

        let expected_crc = crc32fast::hash(b"tEST\x01\x02\x03\x04\x05");
        assert_eq!(&bytes[13..17], &expected_crc.to_be_bytes());
    }

    #[test]
    fn test_header_bytes() {
        let header = ImageHeader::truecolor(48).to_bytes();
        assert_eq!(header, [0, 0, 0, 48, 0, 0, 0, 48, 8, 2, 0, 0, 0]);
    }

    #[test]
    fn test_png_structure() {
        let spec = IconSpec::new(16, BRAND_COLOR).unwrap();
        let png = build_png_bytes(&spec).unwrap();
        assert!(png.starts_with(&PNG_SIGNATURE));

        let chunks = read_chunks(&png).expect("well-formed chunk stream");
        let tags: Vec<&[u8; 4]> = chunks.iter().map(|(c, _)| &c.tag).collect();
        assert_eq!(tags, vec![IHDR, IDAT, IEND]);

        for (chunk, stored_crc) in &chunks {
            assert_eq!(chunk.crc(), *stored_crc);
        }

        assert_eq!(chunks[0].0.data, ImageHeader::truecolor(16).to_bytes());
        assert!(chunks[2].0.data.is_empty());
    }

    #[test]
    fn test_png_is_signature_plus_built_chunks() {
        let spec = IconSpec::new(16, BRAND_COLOR).unwrap();
        let png = build_png_bytes(&spec).unwrap();
        let chunks = read_chunks(&png).unwrap();

        let mut expected = PNG_SIGNATURE.to_vec();
        for (chunk, _) in &chunks {
            expected.extend(build_chunk(&chunk.tag, &chunk.data).unwrap());
        }
        assert_eq!(png, expected);
    }

    #[test]
    fn test_idat_inflates_to_raster() {
        let spec = IconSpec::new(48, BRAND_COLOR).unwrap();
        let png = build_png_bytes(&spec).unwrap();
        let chunks = read_chunks(&png).unwrap();

        let inflated = miniz_oxide::inflate::decompress_to_vec_zlib(&chunks[1].0.data)
            .expect("IDAT is a valid zlib stream");
        assert_eq!(inflated.len(), raster_len(48));
        assert_eq!(inflated, render_raster(&spec));
    }

    #[test]
    fn test_deterministic_output() {
        let spec = IconSpec::new(128, BRAND_COLOR).unwrap();
        assert_eq!(build_png_bytes(&spec).unwrap(), build_png_bytes(&spec).unwrap());
    }

    #[test]
    fn test_read_chunks_rejects_garbage() {
        assert!(read_chunks(b"not a png").is_none());

        let spec = IconSpec::new(16, BRAND_COLOR).unwrap();
        let png = build_png_bytes(&spec).unwrap();
        assert!(read_chunks(&png[..png.len() - 2]).is_none());
    }
}
