//! Device-N blend: every colorant subtracts its tint from white.

use super::unpack::RowLayout;
use crate::device::DeviceColorTable;

/// Chunked 8 or 16 bit rows only.
pub(crate) fn device_row(
    layout: &RowLayout,
    table: &DeviceColorTable,
    raw: &[u8],
    preview: &mut [u8],
) {
    let tints = table.tints();
    for (x, px) in preview.chunks_exact_mut(3).take(layout.width).enumerate() {
        let mut rgb = [255i32; 3];
        for (c, tint) in tints.iter().enumerate().take(layout.channels) {
            let v = layout.intensity(raw, x, c);
            for (out, &t) in rgb.iter_mut().zip(tint) {
                *out -= v * i32::from(t) / 255;
            }
        }
        for (dst, v) in px.iter_mut().zip(rgb) {
            *dst = v.max(0) as u8;
        }
    }
}
