#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::error::RasterError;

/// Grow-only pixel storage for one decoded page.
///
/// Capacity only ever increases within a decoder, so peak memory reflects
/// the largest page seen so far rather than the current one. The visible
/// region is always `width * height * bytes_per_pixel` bytes.
#[derive(Clone, Debug, Default)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
}

impl PixelBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure at least `bytes` bytes can be held without reallocating.
    pub fn ensure_capacity(&mut self, bytes: usize) -> Result<(), RasterError> {
        if self.data.capacity() >= bytes {
            return Ok(());
        }
        let additional = bytes - self.data.len();
        self.data
            .try_reserve_exact(additional)
            .map_err(|_| RasterError::AllocationFailure { bytes })?;
        log::trace!("pixel buffer grown to {} bytes", self.data.capacity());
        Ok(())
    }

    /// Resize the visible region for a new page and fill it with `fill`.
    pub(crate) fn reset(
        &mut self,
        width: u32,
        height: u32,
        bytes_per_pixel: usize,
        fill: u8,
    ) -> Result<(), RasterError> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(bytes_per_pixel))
            .ok_or(RasterError::DimensionsOutOfRange { width, height })?;
        self.ensure_capacity(len)?;
        self.data.clear();
        self.data.resize(len, fill);
        self.width = width;
        self.height = height;
        self.bytes_per_pixel = bytes_per_pixel;
        Ok(())
    }

    /// Forget the visible region. Capacity is kept.
    pub(crate) fn clear(&mut self) {
        self.data.clear();
        self.width = 0;
        self.height = 0;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Allocated bytes, including space beyond the current page.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes of the current page, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn row_bytes(&self) -> usize {
        self.width as usize * self.bytes_per_pixel
    }

    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.row_bytes();
        let start = y as usize * stride;
        self.data.get(start..start + stride)
    }

    pub(crate) fn row_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.row_bytes();
        let start = y as usize * stride;
        self.data.get_mut(start..start + stride)
    }

    /// Bytes of the pixel at (`x`, `y`), or `None` outside the page.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width {
            return None;
        }
        let bpp = self.bytes_per_pixel;
        let start = x as usize * bpp;
        self.row(y)?.get(start..start + bpp)
    }

    /// Typed RGB view of a 3-byte-per-pixel buffer.
    #[cfg(feature = "rgb")]
    pub fn as_rgb8(&self) -> Option<&[rgb::RGB8]> {
        if self.bytes_per_pixel != 3 {
            return None;
        }
        Some(self.data.as_pixels())
    }

    /// Zero-copy [`imgref::ImgRef`] over an RGB preview.
    #[cfg(feature = "imgref")]
    pub fn as_imgref_rgb8(&self) -> Option<imgref::ImgRef<'_, rgb::RGB8>> {
        let pixels = self.as_rgb8()?;
        Some(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Zero-copy [`imgref::ImgRef`] over a grayscale preview.
    #[cfg(feature = "imgref")]
    pub fn as_imgref_gray8(&self) -> Option<imgref::ImgRef<'_, u8>> {
        if self.bytes_per_pixel != 1 {
            return None;
        }
        Some(imgref::ImgRef::new(
            &self.data,
            self.width as usize,
            self.height as usize,
        ))
    }
}
