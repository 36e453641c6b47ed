//! CIE Lab and XYZ pages.
//!
//! Decoding maps samples to colorimetric coordinates, converts Lab to XYZ
//! against the D65 white point, applies the linear sRGB matrix and then the
//! sRGB transfer curve. The inverse encoders build test pages.

use super::unpack::RowLayout;
use crate::pixel::SampleOrder;

/// D65 white point, the row sums of the sRGB to XYZ matrix.
pub const D65_WHITE: [f32; 3] = [
    0.412453 + 0.357580 + 0.180423,
    0.212671 + 0.715160 + 0.072169,
    0.019334 + 0.119193 + 0.950227,
];

const RGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412453, 0.357580, 0.180423],
    [0.212671, 0.715160, 0.072169],
    [0.019334, 0.119193, 0.950227],
];

const XYZ_TO_RGB: [[f32; 3]; 3] = [
    [3.240479, -1.537150, -0.498535],
    [-0.969256, 1.875992, 0.041556],
    [0.055648, -0.204043, 1.057311],
];

/// 8-bit XYZ code for 1.0.
const XYZ8_SCALE: f32 = 231.8181;
/// 16-bit XYZ code for 1.0.
const XYZ16_SCALE: f32 = 59577.2727;

fn mat3(m: &[[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    m.map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2])
}

/// Lab coordinates from raw samples at 8 or 16 bits.
pub fn lab_from_samples(bits: u32, s: [u32; 3]) -> [f32; 3] {
    if bits == 16 {
        [
            s[0] as f32 / 655.35,
            s[1] as f32 / 256.0 - 128.0,
            s[2] as f32 / 256.0 - 128.0,
        ]
    } else {
        [s[0] as f32 / 2.55, s[1] as f32 - 128.0, s[2] as f32 - 128.0]
    }
}

/// XYZ coordinates from raw samples at 8 or 16 bits.
pub fn xyz_from_samples(bits: u32, s: [u32; 3]) -> [f32; 3] {
    let scale = if bits == 16 { XYZ16_SCALE } else { XYZ8_SCALE };
    s.map(|v| v as f32 / scale)
}

/// Three samples from an original-buffer pixel (chunked or banded, which
/// store 8 and 16 bit samples identically).
pub fn samples_from_original(bits: u32, order: SampleOrder, pixel: &[u8]) -> Option<[u32; 3]> {
    match bits {
        8 => {
            let s = pixel.get(..3)?;
            Some([s[0], s[1], s[2]].map(u32::from))
        }
        16 => {
            let s = pixel.get(..6)?;
            Some([0, 1, 2].map(|c| u32::from(order.read_u16([s[2 * c], s[2 * c + 1]]))))
        }
        _ => None,
    }
}

pub fn lab_to_xyz(lab: [f32; 3]) -> [f32; 3] {
    let [l, a, b] = lab;
    let p = if l < 8.0 { l / 903.3 } else { (l + 16.0) / 116.0 };
    [
        D65_WHITE[0] * (p + a * 0.002).powi(3),
        D65_WHITE[1] * p.powi(3),
        D65_WHITE[2] * (p - b * 0.005).powi(3),
    ]
}

/// sRGB transfer curve applied to a linear component.
pub fn gamma_encode(v: f32) -> f32 {
    if v <= 0.0 {
        0.0
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

fn to_u8(v: f32) -> u8 {
    if v <= 0.0 {
        0
    } else if v < 1.0 {
        (255.0 * v + 0.5) as u8
    } else {
        255
    }
}

pub fn xyz_to_rgb(xyz: [f32; 3]) -> [u8; 3] {
    mat3(&XYZ_TO_RGB, xyz).map(|v| to_u8(gamma_encode(v)))
}

pub fn lab_to_rgb(lab: [f32; 3]) -> [u8; 3] {
    xyz_to_rgb(lab_to_xyz(lab))
}

pub(crate) fn lab_row(layout: &RowLayout, raw: &[u8], preview: &mut [u8]) {
    for (x, px) in preview.chunks_exact_mut(3).take(layout.width).enumerate() {
        let s = [0, 1, 2].map(|c| layout.sample(raw, x, c));
        px.copy_from_slice(&lab_to_rgb(lab_from_samples(layout.bits, s)));
    }
}

pub(crate) fn xyz_row(layout: &RowLayout, raw: &[u8], preview: &mut [u8]) {
    for (x, px) in preview.chunks_exact_mut(3).take(layout.width).enumerate() {
        let s = [0, 1, 2].map(|c| layout.sample(raw, x, c));
        px.copy_from_slice(&xyz_to_rgb(xyz_from_samples(layout.bits, s)));
    }
}

/// Gamma-encoded sRGB in 0..=1 to XYZ.
pub fn rgb_to_xyz(rgb: [f32; 3]) -> [f32; 3] {
    let linear = rgb.map(|v| ((v + 0.055) / 1.055).powf(2.4));
    mat3(&RGB_TO_XYZ, linear)
}

fn lab_f(t: f32) -> f32 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

pub fn xyz_to_lab(xyz: [f32; 3]) -> [f32; 3] {
    let [x, y, z] = xyz;
    let y_yn = y / D65_WHITE[1];
    let l = if y_yn > 0.008856 {
        116.0 * y_yn.cbrt() - 16.0
    } else {
        903.3 * y_yn
    };
    let fx = lab_f(x / D65_WHITE[0]);
    let fy = lab_f(y_yn);
    let fz = lab_f(z / D65_WHITE[2]);
    [l, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

fn quantize(v: f32, max: f32) -> u32 {
    if v < 0.0 {
        0
    } else if v < max {
        v as u32
    } else {
        max as u32
    }
}

pub fn encode_lab8(lab: [f32; 3]) -> [u8; 3] {
    [
        quantize(lab[0] * 2.55 + 0.5, 255.0),
        quantize(lab[1] + 128.5, 255.0),
        quantize(lab[2] + 128.5, 255.0),
    ]
    .map(|v| v as u8)
}

pub fn encode_lab16(lab: [f32; 3]) -> [u16; 3] {
    [
        quantize(lab[0] * 655.35 + 0.5, 65535.0),
        quantize((lab[1] + 128.0) * 256.0 + 0.5, 65535.0),
        quantize((lab[2] + 128.0) * 256.0 + 0.5, 65535.0),
    ]
    .map(|v| v as u16)
}

/// Components at or above 1.1 saturate.
pub fn encode_xyz8(xyz: [f32; 3]) -> [u8; 3] {
    xyz.map(|v| {
        if v < 0.0 {
            0
        } else if v < 1.1 {
            (XYZ8_SCALE * v + 0.5) as u8
        } else {
            255
        }
    })
}

pub fn encode_xyz16(xyz: [f32; 3]) -> [u16; 3] {
    xyz.map(|v| {
        if v < 0.0 {
            0
        } else if v < 1.1 {
            (XYZ16_SCALE * v + 0.5) as u16
        } else {
            65535
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMARIES: [[u8; 3]; 8] = [
        [0, 0, 0],
        [255, 0, 0],
        [0, 255, 0],
        [255, 255, 0],
        [0, 0, 255],
        [255, 0, 255],
        [0, 255, 255],
        [255, 255, 255],
    ];

    fn assert_close(a: [u8; 3], b: [u8; 3], tol: i32) {
        for c in 0..3 {
            let d = (i32::from(a[c]) - i32::from(b[c])).abs();
            assert!(d <= tol, "{a:?} vs {b:?}");
        }
    }

    fn unit(rgb: [u8; 3]) -> [f32; 3] {
        rgb.map(|v| f32::from(v) / 255.0)
    }

    #[test]
    fn white_point_is_unit_luminance() {
        assert!((D65_WHITE[1] - 1.0).abs() < 1e-6);
        assert_eq!(lab_to_rgb([100.0, 0.0, 0.0]), [255, 255, 255]);
        assert_eq!(lab_to_rgb([0.0, 0.0, 0.0]), [0, 0, 0]);
    }

    #[test]
    fn lab16_round_trip_primaries() {
        for rgb in PRIMARIES {
            let code = encode_lab16(xyz_to_lab(rgb_to_xyz(unit(rgb))));
            let lab = lab_from_samples(16, code.map(u32::from));
            assert_close(lab_to_rgb(lab), rgb, 2);
        }
    }

    #[test]
    fn xyz16_round_trip_primaries() {
        for rgb in PRIMARIES {
            let code = encode_xyz16(rgb_to_xyz(unit(rgb)));
            let xyz = xyz_from_samples(16, code.map(u32::from));
            assert_close(xyz_to_rgb(xyz), rgb, 2);
        }
    }

    #[test]
    fn lab8_neutral_axis() {
        assert_eq!(lab_to_rgb(lab_from_samples(8, [255, 128, 128])), [255, 255, 255]);
        assert_eq!(lab_to_rgb(lab_from_samples(8, [0, 128, 128])), [0, 0, 0]);
        let [r, g, b] = lab_to_rgb(lab_from_samples(8, [128, 128, 128]));
        assert!(r == g && g == b && r > 100 && r < 140, "{r} {g} {b}");
    }

    #[test]
    fn encoders_saturate() {
        assert_eq!(encode_xyz8([-0.5, 2.0, 1.0]), [0, 255, 232]);
        assert_eq!(encode_xyz16([-0.5, 2.0, 0.0]), [0, 65535, 0]);
        assert_eq!(encode_lab8([120.0, -200.0, 200.0]), [255, 0, 255]);
    }

    #[test]
    fn original_samples_follow_order() {
        let px = [0x12, 0x34, 0, 1, 0xff, 0xff];
        assert_eq!(
            samples_from_original(16, SampleOrder::HighByteFirst, &px),
            Some([0x1234, 1, 0xffff])
        );
        assert_eq!(
            samples_from_original(16, SampleOrder::LowByteFirst, &px),
            Some([0x3412, 0x100, 0xffff])
        );
        assert_eq!(
            samples_from_original(8, SampleOrder::LowByteFirst, &px),
            Some([0x12, 0x34, 0])
        );
        assert_eq!(samples_from_original(16, SampleOrder::LowByteFirst, &px[..4]), None);
    }
}
