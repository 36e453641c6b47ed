//! Sample extraction from packed scanlines.
//!
//! Chunked pixels occupy `bits_per_pixel` consecutive bits, most significant
//! first. Below 8 bits per sample the channels sit right-aligned inside the
//! pixel word, so padded layouts (three channels stored in four slots, six
//! KCMYcm bits in a byte) fall out of the same shift arithmetic. Banded rows
//! hold one sub-row per channel, each `ceil(width * bits / 8)` bytes long.

use crate::header::{ColorOrder, PageHeader};
use crate::pixel::SampleOrder;

/// Scale factors taking an N-bit sample to 0..=255.
const fn intensity_scale(bits: u32) -> u32 {
    match bits {
        1 => 255,
        2 => 85,
        4 => 17,
        _ => 1,
    }
}

/// Precomputed addressing for one page's scanlines.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RowLayout {
    pub width: usize,
    pub bits: u32,
    pub channels: usize,
    bits_per_pixel: u32,
    banded: bool,
    band: usize,
    bytes_per_color: usize,
    order: SampleOrder,
    mask: u32,
    scale: u32,
}

impl RowLayout {
    /// Header must already have passed validation.
    pub fn new(header: &PageHeader, order: SampleOrder) -> Self {
        let bits = header.bits_per_sample;
        Self {
            width: header.width as usize,
            bits,
            channels: header.channel_count as usize,
            bits_per_pixel: header.bits_per_pixel,
            banded: header.color_order != ColorOrder::Chunked,
            band: header.bytes_per_band(),
            bytes_per_color: header.bytes_per_color(),
            order,
            mask: if bits >= 16 { 0xffff } else { (1 << bits) - 1 },
            scale: intensity_scale(bits),
        }
    }

    pub fn is_banded(&self) -> bool {
        self.banded
    }

    pub fn bytes_per_color(&self) -> usize {
        self.bytes_per_color
    }

    /// The whole chunked pixel word for sub-byte sample depths.
    fn pixel_word(&self, raw: &[u8], x: usize) -> u32 {
        let bpp = self.bits_per_pixel as usize;
        if bpp < 8 {
            let bit = x * bpp;
            let shift = 8 - bpp - bit % 8;
            (u32::from(raw[bit / 8]) >> shift) & ((1 << bpp) - 1)
        } else {
            let len = bpp / 8;
            raw[x * len..x * len + len]
                .iter()
                .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
        }
    }

    /// Byte offset of a sample at 8 or 16 bits.
    fn sample_offset(&self, x: usize, c: usize) -> usize {
        let bytes = (self.bits / 8) as usize;
        if self.banded {
            c * self.band + x * bytes
        } else {
            x * (self.bits_per_pixel / 8) as usize + c * bytes
        }
    }

    /// Raw value of channel `c` at pixel `x`, at full precision.
    pub fn sample(&self, raw: &[u8], x: usize, c: usize) -> u32 {
        match self.bits {
            16 => {
                let off = self.sample_offset(x, c);
                u32::from(self.order.read_u16([raw[off], raw[off + 1]]))
            }
            8 => u32::from(raw[self.sample_offset(x, c)]),
            bits => {
                if self.banded {
                    let bit = x * bits as usize;
                    let shift = 8 - bits as usize - bit % 8;
                    (u32::from(raw[c * self.band + bit / 8]) >> shift) & self.mask
                } else {
                    let shift = bits as usize * (self.channels - 1 - c);
                    (self.pixel_word(raw, x) >> shift) & self.mask
                }
            }
        }
    }

    /// Channel `c` at pixel `x` scaled to 0..=255.
    ///
    /// Sub-byte depths multiply by 255, 85 or 17; 16-bit samples keep their
    /// significant byte.
    #[inline]
    pub fn intensity(&self, raw: &[u8], x: usize, c: usize) -> i32 {
        match self.bits {
            16 => i32::from(raw[self.sample_offset(x, c) + self.order.high_byte_offset()]),
            _ => (self.sample(raw, x, c) * self.scale) as i32,
        }
    }

    /// Write the original encoding of pixel `x` into `dst`.
    ///
    /// Chunked pixels keep their packed bytes (a sub-byte pixel becomes one
    /// byte holding its word). Banded pixels store each channel in its own
    /// byte, or its own two bytes at 16 bits.
    pub fn copy_original(&self, raw: &[u8], x: usize, dst: &mut [u8]) {
        if !self.banded {
            let bpp = self.bits_per_pixel as usize;
            if bpp < 8 {
                dst[0] = self.pixel_word(raw, x) as u8;
            } else {
                let len = bpp / 8;
                dst[..len].copy_from_slice(&raw[x * len..x * len + len]);
            }
            return;
        }
        for c in 0..self.channels {
            match self.bits {
                16 => {
                    let off = self.sample_offset(x, c);
                    dst[2 * c..2 * c + 2].copy_from_slice(&raw[off..off + 2]);
                }
                _ => dst[c] = self.sample(raw, x, c) as u8,
            }
        }
    }

    /// Copy every pixel's original encoding into `original_row`.
    pub fn copy_original_row(&self, raw: &[u8], original_row: &mut [u8]) {
        let stride = self.bytes_per_color;
        for (x, dst) in original_row
            .chunks_exact_mut(stride)
            .take(self.width)
            .enumerate()
        {
            self.copy_original(raw, x, dst);
        }
    }
}
