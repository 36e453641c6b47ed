//! Low bit depth subtractive spaces: K, the CMY/CMYK family and KCMYcm.
//!
//! At 8 bits and above these pages go through the Device-N blend instead.

use super::additive::clamp_u8;
use super::unpack::RowLayout;

/// Which channel carries each ink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct InkOrder {
    cyan: usize,
    magenta: usize,
    yellow: usize,
    black: Option<usize>,
}

impl InkOrder {
    pub const CMY: Self = Self::new(0, 1, 2, None);
    pub const YMC: Self = Self::new(2, 1, 0, None);
    pub const CMYK: Self = Self::new(0, 1, 2, Some(3));
    pub const KCMY: Self = Self::new(1, 2, 3, Some(0));
    pub const YMCK: Self = Self::new(2, 1, 0, Some(3));

    const fn new(cyan: usize, magenta: usize, yellow: usize, black: Option<usize>) -> Self {
        Self {
            cyan,
            magenta,
            yellow,
            black,
        }
    }
}

/// Inverted single-channel coverage on a grayscale preview.
pub(crate) fn black_row(layout: &RowLayout, raw: &[u8], preview: &mut [u8]) {
    for (x, px) in preview.iter_mut().take(layout.width).enumerate() {
        *px = clamp_u8(255 - layout.intensity(raw, x, 0));
    }
}

/// Each ink removes its complementary primary; black removes all three.
pub(crate) fn ink_row(layout: &RowLayout, inks: InkOrder, raw: &[u8], preview: &mut [u8]) {
    for (x, px) in preview.chunks_exact_mut(3).take(layout.width).enumerate() {
        let k = inks.black.map_or(0, |c| layout.intensity(raw, x, c));
        px[0] = clamp_u8(255 - layout.intensity(raw, x, inks.cyan) - k);
        px[1] = clamp_u8(255 - layout.intensity(raw, x, inks.magenta) - k);
        px[2] = clamp_u8(255 - layout.intensity(raw, x, inks.yellow) - k);
    }
}

const KCMYCM_K: u8 = 0x20;
const KCMYCM_C: u8 = 0x10;
const KCMYCM_M: u8 = 0x08;
const KCMYCM_Y: u8 = 0x04;
const KCMYCM_LC: u8 = 0x02;
const KCMYCM_LM: u8 = 0x01;

const fn kcmycm_entry(bits: u8) -> [u8; 3] {
    if bits & KCMYCM_K != 0 {
        return [0, 0, 0];
    }
    let mut r: i32 = 255;
    let mut g: i32 = 255;
    if bits & KCMYCM_C != 0 {
        r -= 255;
    }
    if bits & KCMYCM_M != 0 {
        g -= 255;
    }
    if bits & KCMYCM_LC != 0 {
        r -= 127;
    }
    if bits & KCMYCM_LM != 0 {
        g -= 127;
    }
    let b = if bits & KCMYCM_Y != 0 { 0 } else { 255 };
    [
        if r < 0 { 0 } else { r as u8 },
        if g < 0 { 0 } else { g as u8 },
        b,
    ]
}

const fn build_kcmycm_table() -> [[u8; 3]; 64] {
    let mut table = [[0u8; 3]; 64];
    let mut i = 0;
    while i < 64 {
        table[i] = kcmycm_entry(i as u8);
        i += 1;
    }
    table
}

/// Preview color for each 1-bit KCMYcm combination, indexed by
/// `K C M Y c m` from bit 5 down to bit 0.
pub(crate) static KCMYCM_TABLE: [[u8; 3]; 64] = build_kcmycm_table();

pub(crate) fn kcmycm_row(layout: &RowLayout, raw: &[u8], preview: &mut [u8]) {
    for (x, px) in preview.chunks_exact_mut(3).take(layout.width).enumerate() {
        let index = (0..6).fold(0usize, |acc, c| (acc << 1) | layout.sample(raw, x, c) as usize);
        px.copy_from_slice(&KCMYCM_TABLE[index & 63]);
    }
}
