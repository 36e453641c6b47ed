//! Per-row color conversion.
//!
//! [`ColorTransform::select`] picks one routine per page from the color
//! space and bit depth; [`ColorTransform::apply`] then turns each packed
//! scanline into one row of original samples and one row of preview pixels.

mod additive;
pub mod cie;
mod device;
mod subtractive;
pub(crate) mod unpack;

use crate::device::DeviceColorTable;
use crate::error::RasterError;
use crate::header::{ColorSpace, PageHeader};

use subtractive::InkOrder;
use unpack::RowLayout;

/// Conversion routine chosen for a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorTransform {
    /// Luminance to grayscale (W, SW).
    White,
    /// Inverted coverage to grayscale (K family below 8 bits).
    Black,
    Rgb,
    /// RGB over a checkerboard by alpha.
    Rgba,
    Rgbw,
    /// CMY-family inks below 8 bits.
    Inks(InkKind),
    /// 1-bit KCMYcm lookup.
    KcmyCm,
    /// Colorant blend against the device color table.
    DeviceN,
    Lab,
    Xyz,
}

/// Channel arrangement of a low bit depth ink page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InkKind {
    Cmy,
    Ymc,
    Cmyk,
    Kcmy,
    Ymck,
}

impl InkKind {
    fn order(self) -> InkOrder {
        match self {
            Self::Cmy => InkOrder::CMY,
            Self::Ymc => InkOrder::YMC,
            Self::Cmyk => InkOrder::CMYK,
            Self::Kcmy => InkOrder::KCMY,
            Self::Ymck => InkOrder::YMCK,
        }
    }
}

impl ColorTransform {
    /// Choose the routine for a validated header.
    ///
    /// Subtractive spaces at 8 bits and above are blended as Device-N.
    /// KCMYcm decodes at 1 bit and at 8 or 16 bits only; 2 and 4 bit
    /// KCMYcm pages are [`RasterError::UnsupportedFormat`].
    pub fn select(header: &PageHeader) -> Result<Self, RasterError> {
        let bits = header.bits_per_sample;
        let deep = bits >= 8;
        let space = header.color_space;
        let ink = |kind| if deep { Self::DeviceN } else { Self::Inks(kind) };

        let transform = match space {
            ColorSpace::Device(_) => Self::DeviceN,
            ColorSpace::W | ColorSpace::Sw => Self::White,
            ColorSpace::Rgb | ColorSpace::Srgb | ColorSpace::AdobeRgb => Self::Rgb,
            ColorSpace::Rgba => Self::Rgba,
            ColorSpace::Rgbw => Self::Rgbw,
            ColorSpace::K | ColorSpace::White | ColorSpace::Gold | ColorSpace::Silver => {
                if deep { Self::DeviceN } else { Self::Black }
            }
            ColorSpace::Cmy => ink(InkKind::Cmy),
            ColorSpace::Ymc => ink(InkKind::Ymc),
            ColorSpace::Cmyk => ink(InkKind::Cmyk),
            ColorSpace::Kcmy => ink(InkKind::Kcmy),
            ColorSpace::Ymck | ColorSpace::Gmck | ColorSpace::Gmcs => ink(InkKind::Ymck),
            ColorSpace::KcmyCm => match bits {
                1 => Self::KcmyCm,
                b if b >= 8 => Self::DeviceN,
                _ => {
                    return Err(RasterError::UnsupportedFormat(format!(
                        "{bits}-bit {space}"
                    )));
                }
            },
            ColorSpace::CieXyz => Self::Xyz,
            ColorSpace::CieLab | ColorSpace::Icc(_) => Self::Lab,
        };

        if !matches!(space, ColorSpace::Device(_))
            && header.channel_count != space.channel_count()
        {
            return Err(RasterError::InvalidHeader(format!(
                "{space} with {} channels",
                header.channel_count
            )));
        }
        if matches!(transform, Self::DeviceN | Self::Lab | Self::Xyz) && !deep {
            return Err(RasterError::UnsupportedFormat(format!("{bits}-bit {space}")));
        }
        Ok(transform)
    }

    /// Whether rows in this page can be converted.
    ///
    /// Device-N pages are only decoded in chunked order; banded rows stay
    /// at their initial fill.
    pub(crate) fn converts(self, layout: &RowLayout) -> bool {
        !(self == Self::DeviceN && layout.is_banded())
    }

    /// Convert one scanline.
    ///
    /// `original` must hold `width * bytes_per_color` bytes and `preview`
    /// `width` pixels of the page's preview layout.
    pub(crate) fn apply(
        self,
        layout: &RowLayout,
        table: &DeviceColorTable,
        raw: &[u8],
        y: u32,
        original: &mut [u8],
        preview: &mut [u8],
    ) {
        if !self.converts(layout) {
            return;
        }
        layout.copy_original_row(raw, original);
        match self {
            Self::White => additive::white_row(layout, raw, preview),
            Self::Black => subtractive::black_row(layout, raw, preview),
            Self::Rgb => additive::rgb_row(layout, raw, preview),
            Self::Rgba => additive::rgba_row(layout, raw, y, preview),
            Self::Rgbw => additive::rgbw_row(layout, raw, preview),
            Self::Inks(kind) => subtractive::ink_row(layout, kind.order(), raw, preview),
            Self::KcmyCm => subtractive::kcmycm_row(layout, raw, preview),
            Self::DeviceN => device::device_row(layout, table, raw, preview),
            Self::Lab => cie::lab_row(layout, raw, preview),
            Self::Xyz => cie::xyz_row(layout, raw, preview),
        }
    }
}
