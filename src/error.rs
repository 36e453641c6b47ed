use enough::StopReason;

/// Errors from raster page decoding.
///
/// Every variant is fatal to the page being decoded. Rows decoded before a
/// [`RasterError::TruncatedPageData`] or [`RasterError::Cancelled`] remain
/// in the decoder's buffers and can still be displayed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RasterError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("dimensions out of range: {width}x{height}")]
    DimensionsOutOfRange { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("page data truncated at row {row} of {height}")]
    TruncatedPageData { row: u32, height: u32 },

    #[error("unable to allocate {bytes} bytes for page data")]
    AllocationFailure { bytes: usize },

    #[error("page source error: {0}")]
    Io(#[from] std::io::Error),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for RasterError {
    fn from(r: StopReason) -> Self {
        RasterError::Cancelled(r)
    }
}

impl RasterError {
    /// Whether rows decoded before the failure are still valid.
    pub fn is_partial_page(&self) -> bool {
        matches!(
            self,
            RasterError::TruncatedPageData { .. } | RasterError::Cancelled(_)
        )
    }
}
