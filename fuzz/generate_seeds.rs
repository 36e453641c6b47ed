#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

/// `fuzz_decode` header prefix.
fn header(w: u16, h: u16, bits: u8, bpp: u8, bpl: u16, channels: u8, order: u8, space: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(12);
    out.extend_from_slice(&w.to_le_bytes());
    out.extend_from_slice(&h.to_le_bytes());
    out.extend_from_slice(&[bits, bpp]);
    out.extend_from_slice(&bpl.to_le_bytes());
    out.extend_from_slice(&[channels, order, space, 0]);
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // RGB 8-bit chunked 2x2
    let mut rgb = header(2, 2, 8, 24, 6, 3, 0, 1);
    rgb.extend_from_slice(&[255, 0, 0, 0, 255, 0, 0, 0, 255, 128, 128, 128]);
    fs::write(format!("{dir}/rgb8_2x2.bin"), rgb).unwrap();

    // CMYK 2-bit chunked 2x1
    let mut cmyk = header(2, 1, 2, 8, 2, 4, 0, 6);
    cmyk.extend_from_slice(&[0b1100_0000, 0b0000_0011]);
    fs::write(format!("{dir}/cmyk2_2x1.bin"), cmyk).unwrap();

    // KCMYcm 1-bit chunked 3x1
    let mut kcmycm = header(3, 1, 1, 8, 3, 6, 0, 9);
    kcmycm.extend_from_slice(&[0b10_0000, 0b01_0000, 0b11_1111]);
    fs::write(format!("{dir}/kcmycm1_3x1.bin"), kcmycm).unwrap();

    // CIE Lab 16-bit banded 1x1
    let mut lab = header(1, 1, 16, 16, 6, 3, 1, 16);
    lab.extend_from_slice(&[0xff, 0xff, 0x80, 0x00, 0x80, 0x00]);
    fs::write(format!("{dir}/lab16_banded_1x1.bin"), lab).unwrap();

    // Device3 8-bit chunked 1x1
    let mut device = header(1, 1, 8, 24, 3, 3, 0, 50);
    device.extend_from_slice(&[255, 0, 128]);
    fs::write(format!("{dir}/device3_1x1.bin"), device).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/header_only.bin"), header(4, 4, 8, 8, 4, 1, 0, 18)).unwrap();
    fs::write(format!("{dir}/planar.bin"), header(1, 1, 8, 8, 1, 1, 2, 0)).unwrap();
    fs::write(format!("{dir}/short_line.bin"), header(8, 1, 8, 24, 3, 3, 0, 1)).unwrap();

    println!("Generated seed corpus in {dir}/");
}
