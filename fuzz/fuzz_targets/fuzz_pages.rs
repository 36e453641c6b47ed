#![no_main]

use libfuzzer_sys::fuzz_target;
use zenraster::{ColorOrder, ColorSpace, Limits, MemoryPageSource, PageDecoder, PageHeader};

/// Each page: 12 header bytes, a little-endian u16 row-data length, then the
/// row data. Header layout matches `fuzz_decode`.
fn next_page(data: &mut &[u8]) -> Option<(PageHeader, Vec<u8>)> {
    let (&[w0, w1, h0, h1, bits, bpp, l0, l1, channels, order, space, vres, n0, n1], rest) =
        data.split_first_chunk::<14>()?;
    let len = usize::from(u16::from_le_bytes([n0, n1])).min(rest.len());
    let (rows, rest) = rest.split_at(len);
    *data = rest;
    let header = PageHeader {
        width: u32::from(u16::from_le_bytes([w0, w1]) % 256),
        height: u32::from(u16::from_le_bytes([h0, h1]) % 256),
        bits_per_sample: u32::from(bits),
        bits_per_pixel: u32::from(bpp),
        bytes_per_line: u32::from(u16::from_le_bytes([l0, l1])),
        channel_count: u32::from(channels),
        color_order: ColorOrder::from_tag(u32::from(order % 3))?,
        color_space: ColorSpace::from_tag(u32::from(space))?,
        resolution: (100, u32::from(vres)),
    };
    Some((header, rows.to_vec()))
}

fuzz_target!(|data: &[u8]| {
    let mut data = data;
    let mut source = MemoryPageSource::new();
    while let Some((header, rows)) = next_page(&mut data) {
        source.push_page(header, rows);
    }

    let limits = Limits {
        max_pixels: Some(1 << 16),
        max_memory_bytes: Some(1 << 22),
        ..Limits::default()
    };
    let mut decoder = PageDecoder::new().with_limits(limits);
    // Stop at the first page that fails; a stream cannot resync after a bad header.
    while let Ok(Some(_)) = decoder.load_page(&mut source, &enough::Unstoppable) {
        let _ = decoder.set_device_color(0, [0, 128, 255]);
        let _ = decoder.inspect(0, 0);
    }
});
