//! Page header: geometry and encoding of one raster page.
//!
//! Numeric tags follow the CUPS raster `cups_cspace_t` / `cups_order_t`
//! enumerations so headers read from real streams map one-to-one.

use core::fmt;

use crate::error::RasterError;
use crate::pixel::PreviewLayout;

/// Maximum number of colorants in a page (Device1 through DeviceF).
pub const MAX_CHANNELS: u32 = 15;

/// Channel arrangement within a scanline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorOrder {
    /// All channels of a pixel stored together (`CUPS_ORDER_CHUNKED`).
    Chunked,
    /// Each channel stored as its own sub-row (`CUPS_ORDER_BANDED`).
    Banded,
    /// Each channel stored as a separate plane (`CUPS_ORDER_PLANAR`).
    /// Never decoded.
    Planar,
}

impl ColorOrder {
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::Chunked),
            1 => Some(Self::Banded),
            2 => Some(Self::Planar),
            _ => None,
        }
    }

    pub fn tag(self) -> u32 {
        match self {
            Self::Chunked => 0,
            Self::Banded => 1,
            Self::Planar => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Chunked => "CUPS_ORDER_CHUNKED",
            Self::Banded => "CUPS_ORDER_BANDED",
            Self::Planar => "CUPS_ORDER_PLANAR",
        }
    }
}

/// Page color space.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    W,
    Rgb,
    Rgba,
    K,
    Cmy,
    Ymc,
    Cmyk,
    Ymck,
    Kcmy,
    KcmyCm,
    Gmck,
    Gmcs,
    White,
    Gold,
    Silver,
    CieXyz,
    CieLab,
    Rgbw,
    /// Scaled (sGray) luminance.
    Sw,
    Srgb,
    AdobeRgb,
    /// ICC-based Lab encoding, `1..=15`.
    Icc(u8),
    /// N-colorant device space, `1..=15`.
    Device(u8),
}

const ICC_NAMES: [&str; 15] = [
    "CUPS_CSPACE_ICC1",
    "CUPS_CSPACE_ICC2",
    "CUPS_CSPACE_ICC3",
    "CUPS_CSPACE_ICC4",
    "CUPS_CSPACE_ICC5",
    "CUPS_CSPACE_ICC6",
    "CUPS_CSPACE_ICC7",
    "CUPS_CSPACE_ICC8",
    "CUPS_CSPACE_ICC9",
    "CUPS_CSPACE_ICCA",
    "CUPS_CSPACE_ICCB",
    "CUPS_CSPACE_ICCC",
    "CUPS_CSPACE_ICCD",
    "CUPS_CSPACE_ICCE",
    "CUPS_CSPACE_ICCF",
];

const DEVICE_NAMES: [&str; 15] = [
    "CUPS_CSPACE_DEVICE1",
    "CUPS_CSPACE_DEVICE2",
    "CUPS_CSPACE_DEVICE3",
    "CUPS_CSPACE_DEVICE4",
    "CUPS_CSPACE_DEVICE5",
    "CUPS_CSPACE_DEVICE6",
    "CUPS_CSPACE_DEVICE7",
    "CUPS_CSPACE_DEVICE8",
    "CUPS_CSPACE_DEVICE9",
    "CUPS_CSPACE_DEVICEA",
    "CUPS_CSPACE_DEVICEB",
    "CUPS_CSPACE_DEVICEC",
    "CUPS_CSPACE_DEVICED",
    "CUPS_CSPACE_DEVICEE",
    "CUPS_CSPACE_DEVICEF",
];

impl ColorSpace {
    pub fn from_tag(tag: u32) -> Option<Self> {
        Some(match tag {
            0 => Self::W,
            1 => Self::Rgb,
            2 => Self::Rgba,
            3 => Self::K,
            4 => Self::Cmy,
            5 => Self::Ymc,
            6 => Self::Cmyk,
            7 => Self::Ymck,
            8 => Self::Kcmy,
            9 => Self::KcmyCm,
            10 => Self::Gmck,
            11 => Self::Gmcs,
            12 => Self::White,
            13 => Self::Gold,
            14 => Self::Silver,
            15 => Self::CieXyz,
            16 => Self::CieLab,
            17 => Self::Rgbw,
            18 => Self::Sw,
            19 => Self::Srgb,
            20 => Self::AdobeRgb,
            32..=46 => Self::Icc((tag - 31) as u8),
            48..=62 => Self::Device((tag - 47) as u8),
            _ => return None,
        })
    }

    pub fn tag(self) -> u32 {
        match self {
            Self::W => 0,
            Self::Rgb => 1,
            Self::Rgba => 2,
            Self::K => 3,
            Self::Cmy => 4,
            Self::Ymc => 5,
            Self::Cmyk => 6,
            Self::Ymck => 7,
            Self::Kcmy => 8,
            Self::KcmyCm => 9,
            Self::Gmck => 10,
            Self::Gmcs => 11,
            Self::White => 12,
            Self::Gold => 13,
            Self::Silver => 14,
            Self::CieXyz => 15,
            Self::CieLab => 16,
            Self::Rgbw => 17,
            Self::Sw => 18,
            Self::Srgb => 19,
            Self::AdobeRgb => 20,
            Self::Icc(n) => 31 + u32::from(n),
            Self::Device(n) => 47 + u32::from(n),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::W => "CUPS_CSPACE_W",
            Self::Rgb => "CUPS_CSPACE_RGB",
            Self::Rgba => "CUPS_CSPACE_RGBA",
            Self::K => "CUPS_CSPACE_K",
            Self::Cmy => "CUPS_CSPACE_CMY",
            Self::Ymc => "CUPS_CSPACE_YMC",
            Self::Cmyk => "CUPS_CSPACE_CMYK",
            Self::Ymck => "CUPS_CSPACE_YMCK",
            Self::Kcmy => "CUPS_CSPACE_KCMY",
            Self::KcmyCm => "CUPS_CSPACE_KCMYcm",
            Self::Gmck => "CUPS_CSPACE_GMCK",
            Self::Gmcs => "CUPS_CSPACE_GMCS",
            Self::White => "CUPS_CSPACE_WHITE",
            Self::Gold => "CUPS_CSPACE_GOLD",
            Self::Silver => "CUPS_CSPACE_SILVER",
            Self::CieXyz => "CUPS_CSPACE_CIEXYZ",
            Self::CieLab => "CUPS_CSPACE_CIELab",
            Self::Rgbw => "CUPS_CSPACE_RGBW",
            Self::Sw => "CUPS_CSPACE_SW",
            Self::Srgb => "CUPS_CSPACE_SRGB",
            Self::AdobeRgb => "CUPS_CSPACE_ADOBERGB",
            Self::Icc(n) => ICC_NAMES
                .get(usize::from(n).wrapping_sub(1))
                .copied()
                .unwrap_or("UNKNOWN"),
            Self::Device(n) => DEVICE_NAMES
                .get(usize::from(n).wrapping_sub(1))
                .copied()
                .unwrap_or("UNKNOWN"),
        }
    }

    /// Whether higher sample values mean less reflected light.
    ///
    /// Covers K through Silver plus the Device-N spaces.
    pub fn is_subtractive(self) -> bool {
        matches!(
            self,
            Self::K
                | Self::Cmy
                | Self::Ymc
                | Self::Cmyk
                | Self::Ymck
                | Self::Kcmy
                | Self::KcmyCm
                | Self::Gmck
                | Self::Gmcs
                | Self::White
                | Self::Gold
                | Self::Silver
                | Self::Device(_)
        )
    }

    /// Whether samples are CIE Lab coordinates (CIELab and ICC1..ICCF).
    pub fn is_lab(self) -> bool {
        matches!(self, Self::CieLab | Self::Icc(_))
    }

    /// Channel count this space is encoded with.
    pub fn channel_count(self) -> u32 {
        match self {
            Self::W | Self::Sw | Self::K | Self::White | Self::Gold | Self::Silver => 1,
            Self::Rgb
            | Self::Srgb
            | Self::AdobeRgb
            | Self::Cmy
            | Self::Ymc
            | Self::CieXyz
            | Self::CieLab
            | Self::Icc(_) => 3,
            Self::Rgba
            | Self::Rgbw
            | Self::Cmyk
            | Self::Ymck
            | Self::Kcmy
            | Self::Gmck
            | Self::Gmcs => 4,
            Self::KcmyCm => 6,
            Self::Device(n) => u32::from(n),
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Geometry and encoding of one page. Immutable once read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageHeader {
    pub width: u32,
    pub height: u32,
    /// Bits per color sample: 1, 2, 4, 8 or 16.
    pub bits_per_sample: u32,
    /// Bits per chunked pixel; equals `bits_per_sample` for banded pages.
    pub bits_per_pixel: u32,
    pub bytes_per_line: u32,
    /// Number of color channels, 1 to 15.
    pub channel_count: u32,
    pub color_order: ColorOrder,
    pub color_space: ColorSpace,
    /// Horizontal and vertical resolution in dots per inch.
    pub resolution: (u32, u32),
}

impl PageHeader {
    /// Build a chunked header with the standard pixel padding for `space`.
    ///
    /// Three-channel spaces below 8 bits are padded to four samples per
    /// pixel and 1-bit KCMYcm to a whole byte, matching what raster writers
    /// emit.
    pub fn chunked(width: u32, height: u32, space: ColorSpace, bits_per_sample: u32) -> Self {
        let channels = space.channel_count();
        let bits_per_pixel = chunked_bits_per_pixel(bits_per_sample, channels);
        let bytes_per_line = bytes_for_bits(u64::from(width) * u64::from(bits_per_pixel));
        Self {
            width,
            height,
            bits_per_sample,
            bits_per_pixel,
            bytes_per_line: u32::try_from(bytes_per_line).unwrap_or(u32::MAX),
            channel_count: channels,
            color_order: ColorOrder::Chunked,
            color_space: space,
            resolution: (100, 100),
        }
    }

    /// Build a banded header for `space`.
    pub fn banded(width: u32, height: u32, space: ColorSpace, bits_per_sample: u32) -> Self {
        let channels = space.channel_count();
        let band = bytes_for_bits(u64::from(width) * u64::from(bits_per_sample));
        Self {
            width,
            height,
            bits_per_sample,
            bits_per_pixel: bits_per_sample,
            bytes_per_line: u32::try_from(band * u64::from(channels)).unwrap_or(u32::MAX),
            channel_count: channels,
            color_order: ColorOrder::Banded,
            color_space: space,
            resolution: (100, 100),
        }
    }

    /// Override the channel count (Device-N pages) and recompute line size.
    pub fn with_channels(mut self, channels: u32) -> Self {
        self.channel_count = channels;
        match self.color_order {
            ColorOrder::Chunked => {
                self.bits_per_pixel = chunked_bits_per_pixel(self.bits_per_sample, channels);
                self.bytes_per_line = u32::try_from(bytes_for_bits(
                    u64::from(self.width) * u64::from(self.bits_per_pixel),
                ))
                .unwrap_or(u32::MAX);
            }
            ColorOrder::Banded | ColorOrder::Planar => {
                let band =
                    bytes_for_bits(u64::from(self.width) * u64::from(self.bits_per_sample));
                self.bytes_per_line =
                    u32::try_from(band * u64::from(channels)).unwrap_or(u32::MAX);
            }
        }
        self
    }

    pub fn with_order(mut self, order: ColorOrder) -> Self {
        self.color_order = order;
        self
    }

    pub fn with_resolution(mut self, horizontal: u32, vertical: u32) -> Self {
        self.resolution = (horizontal, vertical);
        self
    }

    /// Bytes one channel occupies in a banded scanline.
    pub fn bytes_per_band(&self) -> usize {
        bytes_for_bits(u64::from(self.width) * u64::from(self.bits_per_sample)) as usize
    }

    /// Bytes the geometry needs from each scanline.
    pub fn required_line_bytes(&self) -> u64 {
        match self.color_order {
            ColorOrder::Chunked => {
                bytes_for_bits(u64::from(self.width) * u64::from(self.bits_per_pixel))
            }
            ColorOrder::Banded | ColorOrder::Planar => {
                bytes_for_bits(u64::from(self.width) * u64::from(self.bits_per_sample))
                    * u64::from(self.channel_count)
            }
        }
    }

    /// Bytes per pixel in the original buffer.
    ///
    /// `ceil(bits_per_pixel / 8)`, multiplied by the channel count for banded
    /// pages where every channel is stored byte-aligned.
    pub fn bytes_per_color(&self) -> usize {
        let per_pixel = self.bits_per_pixel.div_ceil(8) as usize;
        match self.color_order {
            ColorOrder::Chunked => per_pixel,
            ColorOrder::Banded | ColorOrder::Planar => per_pixel * self.channel_count as usize,
        }
    }

    /// Bytes per sample group shown together when inspecting a pixel.
    pub fn band_group_bytes(&self) -> usize {
        self.bits_per_pixel.div_ceil(8).max(1) as usize
    }

    /// Layout of the preview buffer.
    ///
    /// Grayscale only for single-channel pages that are either below 8 bits
    /// or additive; everything else previews as RGB.
    pub fn preview_layout(&self) -> PreviewLayout {
        if self.channel_count == 1
            && (self.bits_per_sample < 8 || !self.color_space.is_subtractive())
        {
            PreviewLayout::Gray8
        } else {
            PreviewLayout::Rgb8
        }
    }

    /// Structural checks independent of the color transform.
    /// Planar pages are rejected whatever their other fields say.
    pub(crate) fn check_order(&self) -> Result<(), RasterError> {
        if self.color_order == ColorOrder::Planar {
            return Err(RasterError::UnsupportedFormat(
                "planar color order is not supported".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<(), RasterError> {
        self.check_order()?;
        if !matches!(self.bits_per_sample, 1 | 2 | 4 | 8 | 16) {
            return Err(RasterError::UnsupportedFormat(format!(
                "{} bits per color",
                self.bits_per_sample
            )));
        }
        if self.channel_count == 0 || self.channel_count > MAX_CHANNELS {
            return Err(RasterError::UnsupportedFormat(format!(
                "{} color channels",
                self.channel_count
            )));
        }
        match self.color_order {
            ColorOrder::Chunked => {
                let needed = self.bits_per_sample * self.channel_count;
                if self.bits_per_pixel < needed {
                    return Err(RasterError::InvalidHeader(format!(
                        "{} bits per pixel cannot hold {} channels of {} bits",
                        self.bits_per_pixel, self.channel_count, self.bits_per_sample
                    )));
                }
                // Sub-byte samples are unpacked from a pixel word of at most 32 bits.
                let aligned = if self.bits_per_pixel < 8 {
                    8 % self.bits_per_pixel == 0
                } else {
                    self.bits_per_pixel % 8 == 0
                        && (self.bits_per_sample >= 8 || self.bits_per_pixel <= 32)
                };
                if !aligned {
                    return Err(RasterError::InvalidHeader(format!(
                        "{} bits per pixel is not byte aligned",
                        self.bits_per_pixel
                    )));
                }
            }
            ColorOrder::Banded | ColorOrder::Planar => {
                if self.bits_per_pixel != self.bits_per_sample {
                    return Err(RasterError::InvalidHeader(format!(
                        "banded page has {} bits per pixel but {} bits per color",
                        self.bits_per_pixel, self.bits_per_sample
                    )));
                }
            }
        }
        let required = self.required_line_bytes();
        if u64::from(self.bytes_per_line) < required {
            return Err(RasterError::InvalidHeader(format!(
                "{} bytes per line, geometry needs {required}",
                self.bytes_per_line
            )));
        }
        Ok(())
    }
}

fn bytes_for_bits(bits: u64) -> u64 {
    bits.div_ceil(8)
}

fn chunked_bits_per_pixel(bits_per_sample: u32, channels: u32) -> u32 {
    match (bits_per_sample, channels) {
        (_, 1) => bits_per_sample,
        (1 | 2 | 4, 3) => bits_per_sample * 4,
        (1, 6) => 8,
        _ => bits_per_sample * channels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for tag in (0..=20).chain(32..=46).chain(48..=62) {
            let space = ColorSpace::from_tag(tag).unwrap();
            assert_eq!(space.tag(), tag);
            assert!(space.name().starts_with("CUPS_CSPACE_"), "{tag}");
        }
        assert!(ColorSpace::from_tag(21).is_none());
        assert!(ColorSpace::from_tag(47).is_none());
        assert!(ColorSpace::from_tag(63).is_none());
        assert_eq!(ColorSpace::Device(6).name(), "CUPS_CSPACE_DEVICE6");
        assert_eq!(ColorSpace::Icc(15).name(), "CUPS_CSPACE_ICCF");
    }

    #[test]
    fn subtractive_ranges() {
        assert!(ColorSpace::K.is_subtractive());
        assert!(ColorSpace::Silver.is_subtractive());
        assert!(ColorSpace::Device(1).is_subtractive());
        assert!(!ColorSpace::W.is_subtractive());
        assert!(!ColorSpace::CieXyz.is_subtractive());
        assert!(!ColorSpace::Rgbw.is_subtractive());
    }

    #[test]
    fn chunked_padding() {
        let h = PageHeader::chunked(5, 1, ColorSpace::Cmy, 1);
        assert_eq!(h.bits_per_pixel, 4);
        assert_eq!(h.bytes_per_line, 3);
        assert_eq!(h.bytes_per_color(), 1);

        let h = PageHeader::chunked(3, 1, ColorSpace::Rgb, 4);
        assert_eq!(h.bits_per_pixel, 16);
        assert_eq!(h.bytes_per_line, 6);

        let h = PageHeader::chunked(3, 1, ColorSpace::KcmyCm, 1);
        assert_eq!(h.bits_per_pixel, 8);

        let h = PageHeader::chunked(3, 1, ColorSpace::Cmyk, 16);
        assert_eq!(h.bits_per_pixel, 64);
        assert_eq!(h.bytes_per_color(), 8);
    }

    #[test]
    fn banded_geometry() {
        let h = PageHeader::banded(10, 1, ColorSpace::Cmyk, 1);
        assert_eq!(h.bytes_per_band(), 2);
        assert_eq!(h.bytes_per_line, 8);
        assert_eq!(h.bytes_per_color(), 4);

        let h = PageHeader::banded(3, 1, ColorSpace::Rgb, 16);
        assert_eq!(h.bytes_per_color(), 6);
    }

    #[test]
    fn preview_layout_rules() {
        assert_eq!(
            PageHeader::chunked(1, 1, ColorSpace::W, 16).preview_layout(),
            PreviewLayout::Gray8
        );
        assert_eq!(
            PageHeader::chunked(1, 1, ColorSpace::K, 4).preview_layout(),
            PreviewLayout::Gray8
        );
        assert_eq!(
            PageHeader::chunked(1, 1, ColorSpace::K, 8).preview_layout(),
            PreviewLayout::Rgb8
        );
        assert_eq!(
            PageHeader::chunked(1, 1, ColorSpace::Rgb, 8).preview_layout(),
            PreviewLayout::Rgb8
        );
    }

    #[test]
    fn validate_rejects_inconsistent_headers() {
        let mut h = PageHeader::chunked(8, 1, ColorSpace::Rgb, 8);
        h.bytes_per_line = 23;
        assert!(matches!(h.validate(), Err(RasterError::InvalidHeader(_))));

        let mut h = PageHeader::chunked(8, 1, ColorSpace::Rgb, 8);
        h.bits_per_pixel = 16;
        assert!(matches!(h.validate(), Err(RasterError::InvalidHeader(_))));

        let h = PageHeader::chunked(8, 1, ColorSpace::Rgb, 8).with_order(ColorOrder::Planar);
        assert!(matches!(h.validate(), Err(RasterError::UnsupportedFormat(_))));

        let h = PageHeader::chunked(8, 1, ColorSpace::W, 3);
        assert!(matches!(h.validate(), Err(RasterError::UnsupportedFormat(_))));
    }

    #[test]
    fn longer_lines_are_accepted() {
        let mut h = PageHeader::chunked(8, 1, ColorSpace::Rgb, 8);
        h.bytes_per_line += 16;
        assert!(h.validate().is_ok());
    }
}
