//! Gradient raster generation
//!
//! Produces the unfiltered scanlines that go into an IDAT chunk. Every pixel is
//! the base color darkened along the top-left to bottom-right diagonal by up to
//! 30%.

use crate::error::IconError;
use std::str::FromStr;

/// Largest icon side accepted, about 48 MiB of raster at this size
pub const MAX_ICON_SIZE: u32 = 4096;

/// Icon sizes written when no sizes are requested
pub const DEFAULT_SIZES: [u32; 3] = [16, 48, 128];

/// Brand purple, `#667eea`
pub const BRAND_COLOR: Rgb = Rgb(102, 126, 234);

/// Scanline filter type "None"
const FILTER_NONE: u8 = 0;

/// An 8-bit-per-channel RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl FromStr for Rgb {
    type Err = IconError;

    /// Parses any CSS color (`#667eea`, `rgb(102, 126, 234)`, `purple`, ...).
    /// Alpha is ignored since the icons carry no alpha channel.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let color =
            css_color::Srgb::from_str(s).map_err(|_| IconError::InvalidColor(s.to_string()))?;
        Ok(Rgb(
            (color.red * 255.).round() as u8,
            (color.green * 255.).round() as u8,
            (color.blue * 255.).round() as u8,
        ))
    }
}

/// A square icon to render: side length in pixels and base color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    size: u32,
    color: Rgb,
}

impl IconSpec {
    pub fn new(size: u32, color: Rgb) -> Result<Self, IconError> {
        if size == 0 || size > MAX_ICON_SIZE {
            return Err(IconError::InvalidSize {
                size,
                max: MAX_ICON_SIZE,
            });
        }
        Ok(Self { size, color })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// File name the icon is written under, e.g. `icon48.png`
    pub fn file_name(&self) -> String {
        format!("icon{}.png", self.size)
    }
}

/// Shade one channel of the pixel at (x, y) in an icon of the given size.
///
/// `factor` stays below 1, so the multiplier stays in (0.7, 1] and the result
/// always fits in a u8 without clamping.
pub fn shade(channel: u8, x: u32, y: u32, size: u32) -> u8 {
    let factor = (x as f64 + y as f64) / (size as f64 + size as f64);
    (channel as f64 * (1.0 - factor * 0.3)) as u8
}

/// Number of raster bytes for a square icon: one filter byte plus three color
/// bytes per pixel, per row.
pub fn raster_len(size: u32) -> usize {
    let size = size as usize;
    size * (1 + 3 * size)
}

/// Render the filtered scanlines for `spec`
pub fn render_raster(spec: &IconSpec) -> Vec<u8> {
    let size = spec.size;
    let Rgb(r, g, b) = spec.color;

    let mut raw = Vec::with_capacity(raster_len(size));
    for y in 0..size {
        raw.push(FILTER_NONE);
        for x in 0..size {
            raw.extend_from_slice(&[
                shade(r, x, y, size),
                shade(g, x, y, size),
                shade(b, x, y, size),
            ]);
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_length() {
        for size in [1, 2, 16, 48, 128] {
            let spec = IconSpec::new(size, BRAND_COLOR).unwrap();
            assert_eq!(render_raster(&spec).len(), raster_len(size));
            assert_eq!(raster_len(size), (size * (1 + 3 * size)) as usize);
        }
    }

    #[test]
    fn test_every_row_starts_with_filter_none() {
        let spec = IconSpec::new(16, Rgb(255, 255, 255)).unwrap();
        let raw = render_raster(&spec);
        for row in raw.chunks(1 + 3 * 16) {
            assert_eq!(row[0], 0);
        }
    }

    #[test]
    fn test_top_left_pixel_is_base_color() {
        let spec = IconSpec::new(48, BRAND_COLOR).unwrap();
        let raw = render_raster(&spec);
        assert_eq!(&raw[1..4], &[102, 126, 234]);
    }

    #[test]
    fn test_known_brand_pixels() {
        // size 16, x = 15, y = 15: factor = 30/32, multiplier = 0.71875
        assert_eq!(shade(102, 15, 15, 16), 73);
        assert_eq!(shade(126, 15, 15, 16), 90);
        assert_eq!(shade(234, 15, 15, 16), 168);
    }

    #[test]
    fn test_shade_never_underflows_or_overflows() {
        for channel in [0u8, 1, 127, 254, 255] {
            let darkest = shade(channel, 127, 127, 128);
            assert!(darkest <= channel);
            assert!(darkest as f64 >= channel as f64 * 0.7 - 1.0);
        }
        assert_eq!(shade(0, 3, 5, 8), 0);
    }

    #[test]
    fn test_single_pixel_icon() {
        let spec = IconSpec::new(1, Rgb(10, 20, 30)).unwrap();
        assert_eq!(render_raster(&spec), vec![0, 10, 20, 30]);
    }

    #[test]
    fn test_invalid_sizes_rejected() {
        assert!(matches!(
            IconSpec::new(0, BRAND_COLOR),
            Err(IconError::InvalidSize { size: 0, .. })
        ));
        assert!(IconSpec::new(MAX_ICON_SIZE, BRAND_COLOR).is_ok());
        assert!(matches!(
            IconSpec::new(200_000, BRAND_COLOR),
            Err(IconError::InvalidSize {
                size: 200_000,
                max: MAX_ICON_SIZE
            })
        ));
    }

    #[test]
    fn test_parse_css_colors() {
        assert_eq!("#667eea".parse::<Rgb>().unwrap(), BRAND_COLOR);
        assert_eq!("rgb(102, 126, 234)".parse::<Rgb>().unwrap(), BRAND_COLOR);
        assert_eq!("#fff".parse::<Rgb>().unwrap(), Rgb(255, 255, 255));
        assert!(matches!(
            "not-a-color".parse::<Rgb>(),
            Err(IconError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_file_name() {
        let spec = IconSpec::new(128, BRAND_COLOR).unwrap();
        assert_eq!(spec.file_name(), "icon128.png");
    }
}
