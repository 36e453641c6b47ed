/// Memory layout of the preview buffer.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewLayout {
    /// Single channel, 8-bit grayscale.
    Gray8,
    /// 3 channels, 8-bit RGB.
    Rgb8,
}

impl PreviewLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb8 => 3,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.bytes_per_pixel()
    }
}

/// Byte order of 16-bit samples inside a delivered scanline.
///
/// Page sources hand over rows already normalized to the host's byte order,
/// so the decoder needs to know which byte of each 16-bit sample carries the
/// most significant half.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleOrder {
    HighByteFirst,
    LowByteFirst,
}

impl SampleOrder {
    /// Probe the byte order of the running host.
    pub fn host() -> Self {
        let probe = 1u16.to_ne_bytes();
        if probe[1] == 1 {
            Self::HighByteFirst
        } else {
            Self::LowByteFirst
        }
    }

    /// Offset (0 or 1) of the significant byte within a 16-bit sample.
    #[inline]
    pub fn high_byte_offset(self) -> usize {
        match self {
            Self::HighByteFirst => 0,
            Self::LowByteFirst => 1,
        }
    }

    /// Read a 16-bit sample from two bytes in this order.
    #[inline]
    pub fn read_u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::HighByteFirst => u16::from_be_bytes(bytes),
            Self::LowByteFirst => u16::from_le_bytes(bytes),
        }
    }

    /// Write a 16-bit sample as two bytes in this order.
    pub fn write_u16(self, value: u16) -> [u8; 2] {
        match self {
            Self::HighByteFirst => value.to_be_bytes(),
            Self::LowByteFirst => value.to_le_bytes(),
        }
    }
}

impl Default for SampleOrder {
    fn default() -> Self {
        Self::host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_order_matches_native_reads() {
        let order = SampleOrder::host();
        let bytes = 0x1234u16.to_ne_bytes();
        assert_eq!(order.read_u16(bytes), 0x1234);
        assert_eq!(bytes[order.high_byte_offset()], 0x12);
    }

    #[test]
    fn explicit_orders() {
        assert_eq!(SampleOrder::HighByteFirst.read_u16([0xAB, 0xCD]), 0xABCD);
        assert_eq!(SampleOrder::LowByteFirst.read_u16([0xAB, 0xCD]), 0xCDAB);
        assert_eq!(SampleOrder::LowByteFirst.write_u16(0x0102), [0x02, 0x01]);
    }
}
