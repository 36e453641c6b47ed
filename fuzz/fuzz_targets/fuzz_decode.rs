#![no_main]

use libfuzzer_sys::fuzz_target;
use zenraster::{ColorOrder, ColorSpace, Limits, PageDecoder, PageHeader, SampleOrder};

/// 12-byte header prefix, then row data.
///
/// `w w h h bits bpp bpl bpl channels order space vres`
fn header(data: &[u8]) -> Option<PageHeader> {
    let &[w0, w1, h0, h1, bits, bpp, l0, l1, channels, order, space, vres] = data.get(..12)?
    else {
        return None;
    };
    Some(PageHeader {
        width: u32::from(u16::from_le_bytes([w0, w1]) % 512),
        height: u32::from(u16::from_le_bytes([h0, h1]) % 512),
        bits_per_sample: u32::from(bits),
        bits_per_pixel: u32::from(bpp),
        bytes_per_line: u32::from(u16::from_le_bytes([l0, l1])),
        channel_count: u32::from(channels),
        color_order: ColorOrder::from_tag(u32::from(order % 3))?,
        color_space: ColorSpace::from_tag(u32::from(space))?,
        resolution: (100, u32::from(vres)),
    })
}

fuzz_target!(|data: &[u8]| {
    let Some(header) = header(data) else {
        return;
    };
    let order = if data[11] & 1 == 0 {
        SampleOrder::HighByteFirst
    } else {
        SampleOrder::LowByteFirst
    };
    let limits = Limits {
        max_pixels: Some(1 << 18),
        max_memory_bytes: Some(1 << 24),
        ..Limits::default()
    };
    let mut decoder = PageDecoder::new()
        .with_limits(limits)
        .with_sample_order(order);
    let _ = decoder.decode_page(header.clone(), &data[12..], &enough::Unstoppable);

    if decoder.header().is_some() {
        let _ = decoder.attributes().map(|a| a.to_string());
        let _ = decoder.inspect(0, 0).map(|p| p.to_string());
        let _ = decoder.inspect(header.width.saturating_sub(1), header.height.saturating_sub(1));
    }
});
