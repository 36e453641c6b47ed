//! Additive spaces: W, RGB, RGBA and RGBW.

use super::unpack::RowLayout;

#[inline]
pub(crate) fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Gray checkerboard behind transparent pixels, alternating every 128 pixels.
#[inline]
pub(crate) fn checkerboard(x: usize, y: u32) -> i32 {
    if (x as u32 ^ y) & 128 != 0 { 128 } else { 192 }
}

/// Luminance copied straight to a grayscale preview.
pub(crate) fn white_row(layout: &RowLayout, raw: &[u8], preview: &mut [u8]) {
    for (x, px) in preview.iter_mut().take(layout.width).enumerate() {
        *px = clamp_u8(layout.intensity(raw, x, 0));
    }
}

pub(crate) fn rgb_row(layout: &RowLayout, raw: &[u8], preview: &mut [u8]) {
    for (x, px) in preview.chunks_exact_mut(3).take(layout.width).enumerate() {
        for (c, out) in px.iter_mut().enumerate() {
            *out = clamp_u8(layout.intensity(raw, x, c));
        }
    }
}

/// RGB composited over the checkerboard by the fourth (alpha) channel.
pub(crate) fn rgba_row(layout: &RowLayout, raw: &[u8], y: u32, preview: &mut [u8]) {
    for (x, px) in preview.chunks_exact_mut(3).take(layout.width).enumerate() {
        let a = layout.intensity(raw, x, 3);
        if a >= 255 {
            for (c, out) in px.iter_mut().enumerate() {
                *out = clamp_u8(layout.intensity(raw, x, c));
            }
            continue;
        }
        let bg = checkerboard(x, y);
        for (c, out) in px.iter_mut().enumerate() {
            *out = if a <= 0 {
                bg as u8
            } else {
                let v = layout.intensity(raw, x, c);
                clamp_u8((a * v + (255 - a) * bg) / 255)
            };
        }
    }
}

/// RGB darkened by the missing part of the white channel.
pub(crate) fn rgbw_row(layout: &RowLayout, raw: &[u8], preview: &mut [u8]) {
    for (x, px) in preview.chunks_exact_mut(3).take(layout.width).enumerate() {
        let white = layout.intensity(raw, x, 3) - 255;
        for (c, out) in px.iter_mut().enumerate() {
            *out = clamp_u8(layout.intensity(raw, x, c) + white);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{ColorSpace, PageHeader};
    use crate::pixel::SampleOrder;

    fn layout(h: &PageHeader) -> RowLayout {
        RowLayout::new(h, SampleOrder::HighByteFirst)
    }

    #[test]
    fn checkerboard_blocks() {
        assert_eq!(checkerboard(0, 0), 192);
        assert_eq!(checkerboard(127, 0), 192);
        assert_eq!(checkerboard(128, 0), 128);
        assert_eq!(checkerboard(128, 128), 192);
        assert_eq!(checkerboard(5, 200), 128);
    }

    #[test]
    fn white_scales_sub_byte_depths() {
        let h = PageHeader::chunked(4, 1, ColorSpace::W, 2);
        let mut out = [0u8; 4];
        white_row(&layout(&h), &[0b00_01_10_11], &mut out);
        assert_eq!(out, [0, 85, 170, 255]);
    }

    #[test]
    fn rgba_alpha_extremes() {
        let h = PageHeader::chunked(2, 1, ColorSpace::Rgba, 8);
        let raw = [10, 20, 30, 255, 200, 100, 50, 0];
        let mut out = [0u8; 6];
        rgba_row(&layout(&h), &raw, 0, &mut out);
        assert_eq!(out, [10, 20, 30, 192, 192, 192]);

        rgba_row(&layout(&h), &raw, 128, &mut out);
        assert_eq!(&out[3..], &[128, 128, 128]);
    }

    #[test]
    fn rgba_blends_half_alpha() {
        let h = PageHeader::chunked(1, 1, ColorSpace::Rgba, 8);
        let mut out = [0u8; 3];
        rgba_row(&layout(&h), &[255, 0, 192, 128], 0, &mut out);
        // (128 * v + 127 * 192) / 255
        assert_eq!(out, [223, 95, 192]);
    }

    #[test]
    fn rgba_one_bit_matches_blend() {
        let h = PageHeader::chunked(2, 1, ColorSpace::Rgba, 1);
        let mut out = [0u8; 6];
        // Pixel 0: R+A set. Pixel 1: G only, alpha clear.
        rgba_row(&layout(&h), &[0b1001_0100], 0, &mut out);
        assert_eq!(out, [255, 0, 0, 192, 192, 192]);
    }

    #[test]
    fn rgbw_clamps() {
        let h = PageHeader::chunked(2, 1, ColorSpace::Rgbw, 8);
        let raw = [200, 100, 0, 255, 200, 100, 0, 100];
        let mut out = [0u8; 6];
        rgbw_row(&layout(&h), &raw, &mut out);
        assert_eq!(out, [200, 100, 0, 45, 0, 0]);
    }

    #[test]
    fn rgbw_one_bit_without_white_is_black() {
        let h = PageHeader::chunked(2, 1, ColorSpace::Rgbw, 1);
        let mut out = [9u8; 6];
        rgbw_row(&layout(&h), &[0b1110_1111], &mut out);
        assert_eq!(out, [0, 0, 0, 255, 255, 255]);
    }
}
