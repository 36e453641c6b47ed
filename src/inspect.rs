//! Read-only views of the current page for status and attribute displays.

use core::fmt;

use crate::header::{ColorSpace, PageHeader};
use crate::pixel::SampleOrder;
use crate::transform::cie;

/// Colorimetric value of a CIE page pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CieValue {
    Lab([f32; 3]),
    Xyz([f32; 3]),
}

/// Both encodings of one pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelInfo {
    pub x: u32,
    pub y: u32,
    pub preview: Vec<u8>,
    pub original: Vec<u8>,
    /// Bytes shown together when printing `original`.
    pub group: usize,
    pub cie: Option<CieValue>,
}

impl PixelInfo {
    pub(crate) fn new(
        header: &PageHeader,
        order: SampleOrder,
        x: u32,
        y: u32,
        preview: &[u8],
        original: &[u8],
    ) -> Self {
        let bits = header.bits_per_sample;
        let cie = cie::samples_from_original(bits, order, original).and_then(|s| {
            match header.color_space {
                ColorSpace::CieXyz => Some(CieValue::Xyz(cie::xyz_from_samples(bits, s))),
                space if space.is_lab() => Some(CieValue::Lab(cie::lab_from_samples(bits, s))),
                _ => None,
            }
        });
        Self {
            x,
            y,
            preview: preview.to_vec(),
            original: original.to_vec(),
            group: header.band_group_bytes(),
            cie,
        }
    }

    /// Original bytes as uppercase hex, grouped like the status line.
    pub fn original_hex(&self) -> String {
        let mut out = String::with_capacity(self.original.len() * 3);
        for (i, byte) in self.original.iter().enumerate() {
            if i > 0 && i % self.group == 0 {
                out.push(' ');
            }
            out.push_str(&format!("{byte:02X}"));
        }
        out
    }
}

/// ` 255 0 0 : FF0000 (53.233 80.109 67.220)`
impl fmt::Display for PixelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.preview {
            write!(f, " {v}")?;
        }
        write!(f, " : {}", self.original_hex())?;
        match self.cie {
            Some(CieValue::Lab([a, b, c]) | CieValue::Xyz([a, b, c])) => {
                write!(f, " ({a:.3} {b:.3} {c:.3})")
            }
            None => Ok(()),
        }
    }
}

/// Header fields plus derived sizes, for an attributes panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageAttributes {
    pub header: PageHeader,
    /// Bytes per pixel in the original buffer.
    pub bytes_per_color: usize,
    /// Bytes per pixel in the preview buffer.
    pub bytes_per_pixel: usize,
}

impl PageAttributes {
    pub fn new(header: &PageHeader) -> Self {
        Self {
            header: header.clone(),
            bytes_per_color: header.bytes_per_color(),
            bytes_per_pixel: header.preview_layout().bytes_per_pixel(),
        }
    }
}

impl fmt::Display for PageAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;
        writeln!(f, "HWResolution = [ {} {} ]", h.resolution.0, h.resolution.1)?;
        writeln!(f, "cupsWidth = {}", h.width)?;
        writeln!(f, "cupsHeight = {}", h.height)?;
        writeln!(f, "cupsBitsPerColor = {}", h.bits_per_sample)?;
        writeln!(f, "cupsBitsPerPixel = {}", h.bits_per_pixel)?;
        writeln!(f, "cupsBytesPerLine = {}", h.bytes_per_line)?;
        writeln!(f, "cupsColorOrder = {}", h.color_order.name())?;
        writeln!(f, "cupsColorSpace = {}", h.color_space)?;
        writeln!(f, "cupsNumColors = {}", h.channel_count)?;
        writeln!(f, "BytesPerColor = {}", self.bytes_per_color)?;
        writeln!(f, "BytesPerPixel = {}", self.bytes_per_pixel)
    }
}
