use crate::error::RasterError;

/// Largest width or height accepted by default.
pub const DEFAULT_MAX_DIMENSION: u32 = 1_000_000;

/// Largest single output buffer accepted by default (256 MiB).
pub const DEFAULT_MAX_MEMORY_BYTES: u64 = 256 * 1024 * 1024;

/// Resource limits for page decoding.
///
/// The memory ceiling applies to each output buffer separately, so a page
/// may hold up to twice `max_memory_bytes` across its original and preview
/// buffers.
#[derive(Clone, Debug)]
pub struct Limits {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for either output buffer.
    pub max_memory_bytes: Option<u64>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_width: Some(DEFAULT_MAX_DIMENSION),
            max_height: Some(DEFAULT_MAX_DIMENSION),
            max_pixels: None,
            max_memory_bytes: Some(DEFAULT_MAX_MEMORY_BYTES),
        }
    }
}

impl Limits {
    /// No ceilings beyond the non-zero dimension check.
    pub fn none() -> Self {
        Self {
            max_width: None,
            max_height: None,
            max_pixels: None,
            max_memory_bytes: None,
        }
    }

    /// Check dimensions against limits.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::DimensionsOutOfRange { width, height });
        }
        if self.max_width.is_some_and(|max_w| width > max_w)
            || self.max_height.is_some_and(|max_h| height > max_h)
        {
            return Err(RasterError::DimensionsOutOfRange { width, height });
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(RasterError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Check that a buffer of `bytes` fits the memory ceiling.
    pub(crate) fn check_memory(
        &self,
        bytes: u64,
        width: u32,
        height: u32,
    ) -> Result<(), RasterError> {
        if self.max_memory_bytes.is_some_and(|max_mem| bytes > max_mem) {
            return Err(RasterError::DimensionsOutOfRange { width, height });
        }
        if usize::try_from(bytes).is_err() {
            return Err(RasterError::DimensionsOutOfRange { width, height });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rejects_zero_and_oversized() {
        let limits = Limits::default();
        assert!(limits.check(1, 1).is_ok());
        assert!(limits.check(1_000_000, 1).is_ok());
        assert!(matches!(
            limits.check(0, 10),
            Err(RasterError::DimensionsOutOfRange { .. })
        ));
        assert!(matches!(
            limits.check(10, 0),
            Err(RasterError::DimensionsOutOfRange { .. })
        ));
        assert!(matches!(
            limits.check(1_000_001, 1),
            Err(RasterError::DimensionsOutOfRange { .. })
        ));
    }

    #[test]
    fn memory_ceiling_is_inclusive() {
        let limits = Limits::default();
        assert!(limits.check_memory(DEFAULT_MAX_MEMORY_BYTES, 1, 1).is_ok());
        assert!(
            limits
                .check_memory(DEFAULT_MAX_MEMORY_BYTES + 1, 1, 1)
                .is_err()
        );
    }

    #[test]
    fn pixel_limit_reports_limit_exceeded() {
        let limits = Limits {
            max_pixels: Some(4),
            ..Default::default()
        };
        assert!(matches!(
            limits.check(3, 2),
            Err(RasterError::LimitExceeded(_))
        ));
    }

    #[test]
    fn none_still_rejects_zero() {
        assert!(Limits::none().check(0, 1).is_err());
        assert!(Limits::none().check(u32::MAX, 1).is_ok());
    }
}
