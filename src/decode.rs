use enough::Stop;

use crate::buffer::PixelBuffer;
use crate::device::{DeviceColorTable, MemoryPreferences, PreferenceStore};
use crate::error::RasterError;
use crate::header::PageHeader;
use crate::inspect::{PageAttributes, PixelInfo};
use crate::limits::Limits;
use crate::pixel::SampleOrder;
use crate::source::{PageSource, RowSource};
use crate::transform::ColorTransform;
use crate::transform::unpack::RowLayout;

/// Rows between progress ticks when the page has no vertical resolution.
const DEFAULT_PROGRESS_ROWS: u32 = 16;

/// Progress notification delivered while a page decodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowProgress {
    /// 1-based page number.
    pub page: u32,
    pub rows_done: u32,
    pub height: u32,
}

/// A page that was decoded by [`PageDecoder::load_page`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based page number.
    pub page: u32,
    pub header: PageHeader,
    /// Whether the source already yielded the next page's header.
    pub has_next: bool,
}

/// Decodes raster pages into an original-sample buffer and a preview buffer.
///
/// Both buffers are owned by the decoder and reused across pages; their
/// capacity only grows. A failed page leaves any rows decoded before the
/// failure in place.
///
/// ```
/// use zenraster::{ColorSpace, MemoryPageSource, PageDecoder, PageHeader, Unstoppable};
///
/// let header = PageHeader::chunked(2, 1, ColorSpace::Rgb, 8);
/// let mut source = MemoryPageSource::new().with_page(header, vec![255, 0, 0, 0, 0, 255]);
/// let mut decoder = PageDecoder::new();
///
/// let info = decoder.load_page(&mut source, &Unstoppable)?.unwrap();
/// assert_eq!(info.page, 1);
/// assert!(!info.has_next);
/// assert_eq!(decoder.preview_at(1, 0), Some(&[0u8, 0, 255][..]));
/// # Ok::<(), zenraster::RasterError>(())
/// ```
pub struct PageDecoder {
    limits: Limits,
    sample_order: SampleOrder,
    preferences: Box<dyn PreferenceStore>,
    progress: Option<Box<dyn FnMut(RowProgress)>>,
    header: Option<PageHeader>,
    transform: Option<ColorTransform>,
    device_colors: DeviceColorTable,
    original: PixelBuffer,
    preview: PixelBuffer,
    line: Vec<u8>,
    page: u32,
    lookahead: Option<PageHeader>,
}

impl Default for PageDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PageDecoder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PageDecoder")
            .field("limits", &self.limits)
            .field("sample_order", &self.sample_order)
            .field("header", &self.header)
            .field("transform", &self.transform)
            .field("page", &self.page)
            .field("lookahead", &self.lookahead)
            .finish_non_exhaustive()
    }
}

impl PageDecoder {
    /// Decoder with default limits, the host's sample order and in-memory
    /// preferences.
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
            sample_order: SampleOrder::host(),
            preferences: Box::new(MemoryPreferences::new()),
            progress: None,
            header: None,
            transform: None,
            device_colors: DeviceColorTable::default(),
            original: PixelBuffer::new(),
            preview: PixelBuffer::new(),
            line: Vec::new(),
            page: 0,
            lookahead: None,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Byte order of 16-bit samples delivered by the page source.
    pub fn with_sample_order(mut self, order: SampleOrder) -> Self {
        self.sample_order = order;
        self
    }

    /// Store consulted for custom device colors.
    pub fn with_preferences(mut self, store: Box<dyn PreferenceStore>) -> Self {
        self.preferences = store;
        self
    }

    /// Callback invoked every `resolution.1` rows while decoding.
    pub fn with_progress(mut self, callback: impl FnMut(RowProgress) + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn sample_order(&self) -> SampleOrder {
        self.sample_order
    }

    /// Decode the next page of `source`.
    ///
    /// Returns `Ok(None)` once the stream has no more pages. After a page
    /// decodes, the next header is read ahead so [`PageInfo::has_next`] is
    /// known; a failure to read it ends the stream instead of failing the
    /// page.
    pub fn load_page<S: PageSource + ?Sized>(
        &mut self,
        source: &mut S,
        stop: &dyn Stop,
    ) -> Result<Option<PageInfo>, RasterError> {
        let header = match self.lookahead.take() {
            Some(header) => header,
            None => match source.read_header()? {
                Some(header) => header,
                None => return Ok(None),
            },
        };
        self.page += 1;
        self.decode_page(header.clone(), &mut *source, stop)?;

        self.lookahead = match source.read_header() {
            Ok(next) => next,
            Err(e) => {
                log::debug!("no page after page {}: {e}", self.page);
                None
            }
        };
        Ok(Some(PageInfo {
            page: self.page,
            header,
            has_next: self.lookahead.is_some(),
        }))
    }

    /// Decode one page from an explicit header and its rows.
    ///
    /// The header is checked against the limits and for consistency before
    /// any buffer is touched or any row is read.
    pub fn decode_page<R: RowSource>(
        &mut self,
        header: PageHeader,
        mut rows: R,
        stop: &dyn Stop,
    ) -> Result<(), RasterError> {
        self.header = None;
        self.transform = None;
        self.original.clear();
        self.preview.clear();

        let (width, height) = (header.width, header.height);
        header.check_order()?;
        self.limits.check(width, height)?;
        header.validate()?;
        let transform = ColorTransform::select(&header)?;

        let pixels = u64::from(width) * u64::from(height);
        let original_bpp = header.bytes_per_color();
        let preview_bpp = header.preview_layout().bytes_per_pixel();
        self.limits
            .check_memory(pixels.saturating_mul(original_bpp as u64), width, height)?;
        self.limits
            .check_memory(pixels.saturating_mul(preview_bpp as u64), width, height)?;
        self.limits
            .check_memory(u64::from(header.bytes_per_line), width, height)?;
        stop.check()?;

        let line_len = header.bytes_per_line as usize;
        if self.line.capacity() < line_len {
            self.line
                .try_reserve_exact(line_len - self.line.len())
                .map_err(|_| RasterError::AllocationFailure { bytes: line_len })?;
        }
        self.line.clear();
        self.line.resize(line_len, 0);
        self.original.reset(width, height, original_bpp, 0)?;
        self.preview.reset(width, height, preview_bpp, 255)?;

        self.device_colors = DeviceColorTable::load(
            header.color_space,
            header.bits_per_sample,
            header.channel_count,
            self.preferences.as_ref(),
        );

        let layout = RowLayout::new(&header, self.sample_order);
        log::debug!(
            "page {}: {width}x{height} {} {}-bit {} channels {:?} -> {transform:?}",
            self.page,
            header.color_space,
            header.bits_per_sample,
            header.channel_count,
            header.color_order,
        );
        if !transform.converts(&layout) {
            log::warn!(
                "{} pages must be chunked to decode as Device-N; rows skipped",
                header.color_space
            );
        }

        let tick = match header.resolution.1 {
            0 => DEFAULT_PROGRESS_ROWS,
            rows => rows,
        };
        self.header = Some(header);
        self.transform = Some(transform);

        for y in 0..height {
            let read = match rows.read_row(&mut self.line) {
                Ok(n) => n,
                Err(e) => {
                    log::debug!("row {y} read failed: {e}");
                    return Err(RasterError::TruncatedPageData { row: y, height });
                }
            };
            if read < line_len {
                return Err(RasterError::TruncatedPageData { row: y, height });
            }
            if let (Some(original), Some(preview)) =
                (self.original.row_mut(y), self.preview.row_mut(y))
            {
                transform.apply(
                    &layout,
                    &self.device_colors,
                    &self.line,
                    y,
                    original,
                    preview,
                );
            }

            let done = y + 1;
            if done % tick == 0 && done < height {
                stop.check()?;
                if let Some(progress) = self.progress.as_mut() {
                    progress(RowProgress {
                        page: self.page,
                        rows_done: done,
                        height,
                    });
                }
            }
        }
        Ok(())
    }

    /// Header of the current page.
    pub fn header(&self) -> Option<&PageHeader> {
        self.header.as_ref()
    }

    pub fn transform(&self) -> Option<ColorTransform> {
        self.transform
    }

    /// Number of the last page started by [`load_page`](Self::load_page).
    pub fn page_number(&self) -> u32 {
        self.page
    }

    pub fn has_next_page(&self) -> bool {
        self.lookahead.is_some()
    }

    /// Original samples of the current page.
    pub fn original(&self) -> &PixelBuffer {
        &self.original
    }

    /// Display approximation of the current page.
    pub fn preview(&self) -> &PixelBuffer {
        &self.preview
    }

    pub fn original_at(&self, x: u32, y: u32) -> Option<&[u8]> {
        self.original.pixel(x, y)
    }

    pub fn preview_at(&self, x: u32, y: u32) -> Option<&[u8]> {
        self.preview.pixel(x, y)
    }

    /// Both encodings of one pixel, ready for a status line.
    pub fn inspect(&self, x: u32, y: u32) -> Option<PixelInfo> {
        let header = self.header.as_ref()?;
        Some(PixelInfo::new(
            header,
            self.sample_order,
            x,
            y,
            self.preview_at(x, y)?,
            self.original_at(x, y)?,
        ))
    }

    pub fn attributes(&self) -> Option<PageAttributes> {
        self.header.as_ref().map(PageAttributes::new)
    }

    pub fn device_colors(&self) -> &DeviceColorTable {
        &self.device_colors
    }

    /// Set the swatch color for colorant `index` and persist the table.
    ///
    /// The new color takes effect when the page is decoded again. Returns
    /// `false` without changing anything if `index` is not a colorant slot
    /// or no page is current (before the first page or after a page that
    /// failed its header checks), since the table is keyed by the page's
    /// color space.
    pub fn set_device_color(&mut self, index: usize, rgb: [u8; 3]) -> Result<bool, RasterError> {
        let Some(header) = &self.header else {
            return Ok(false);
        };
        if !self.device_colors.set_display_color(index, rgb) {
            return Ok(false);
        }
        self.device_colors.save(
            header.color_space,
            header.bits_per_sample,
            header.channel_count,
            self.preferences.as_mut(),
        )?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{ColorOrder, ColorSpace};
    use crate::source::MemoryPageSource;
    use enough::Unstoppable;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn decoder() -> PageDecoder {
        PageDecoder::new().with_sample_order(SampleOrder::HighByteFirst)
    }

    #[test]
    fn rejects_before_reading_rows() {
        struct Panicky;
        impl RowSource for Panicky {
            fn read_row(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                panic!("row read");
            }
        }
        let mut d = decoder();
        let planar = PageHeader::chunked(4, 4, ColorSpace::Rgb, 8).with_order(ColorOrder::Planar);
        assert!(matches!(
            d.decode_page(planar, Panicky, &Unstoppable),
            Err(RasterError::UnsupportedFormat(_))
        ));
        let wide = PageHeader::chunked(1_000_001, 1, ColorSpace::W, 8);
        assert!(matches!(
            d.decode_page(wide, Panicky, &Unstoppable),
            Err(RasterError::DimensionsOutOfRange { .. })
        ));
        assert!(d.header().is_none());
        assert_eq!(d.original().capacity(), 0);
    }

    #[test]
    fn memory_ceiling_applies_per_buffer() {
        let mut d = decoder();
        // 20000 x 20000 RGB preview is 1.2 GB.
        let h = PageHeader::chunked(20_000, 20_000, ColorSpace::Rgb, 8);
        assert!(matches!(
            d.decode_page(h, &[0u8; 0][..], &Unstoppable),
            Err(RasterError::DimensionsOutOfRange { .. })
        ));
        assert_eq!(d.preview().capacity(), 0);
    }

    #[test]
    fn pages_sequence_with_lookahead() {
        let h = PageHeader::chunked(2, 1, ColorSpace::W, 8);
        let mut src = MemoryPageSource::new()
            .with_page(h.clone(), vec![0, 255])
            .with_page(h, vec![128, 64]);
        let mut d = decoder();

        let first = d.load_page(&mut src, &Unstoppable).unwrap().unwrap();
        assert_eq!(first.page, 1);
        assert!(first.has_next);
        assert!(d.has_next_page());
        assert_eq!(d.preview().as_bytes(), &[0, 255]);

        let second = d.load_page(&mut src, &Unstoppable).unwrap().unwrap();
        assert_eq!(second.page, 2);
        assert!(!second.has_next);
        assert_eq!(d.preview().as_bytes(), &[128, 64]);
        assert_eq!(d.page_number(), 2);

        assert!(d.load_page(&mut src, &Unstoppable).unwrap().is_none());
    }

    #[test]
    fn progress_ticks_on_resolution() {
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&ticks);
        let mut d = decoder().with_progress(move |p| sink.borrow_mut().push(p.rows_done));
        let h = PageHeader::chunked(1, 10, ColorSpace::W, 8).with_resolution(72, 3);
        d.decode_page(h, &[0u8; 10][..], &Unstoppable).unwrap();
        assert_eq!(*ticks.borrow(), [3, 6, 9]);
    }

    #[test]
    fn cancellation_keeps_decoded_rows() {
        use core::sync::atomic::{AtomicBool, Ordering};
        use enough::StopReason;

        struct Flag(AtomicBool);
        impl Stop for Flag {
            fn check(&self) -> Result<(), StopReason> {
                if self.0.load(Ordering::Relaxed) {
                    Err(StopReason::Cancelled)
                } else {
                    Ok(())
                }
            }
        }
        struct Rows<'a>(&'a Flag, u32);
        impl RowSource for Rows<'_> {
            fn read_row(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                self.1 += 1;
                if self.1 == 2 {
                    self.0.0.store(true, Ordering::Relaxed);
                }
                buf.fill(10);
                Ok(buf.len())
            }
        }

        let flag = Flag(AtomicBool::new(false));
        let mut d = decoder();
        let h = PageHeader::chunked(1, 8, ColorSpace::W, 8).with_resolution(0, 2);
        let err = d.decode_page(h, Rows(&flag, 0), &flag).unwrap_err();
        assert!(err.is_partial_page());
        assert_eq!(d.preview().as_bytes(), &[10, 10, 255, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn device_color_changes_persist() {
        let mut d = decoder();
        let h = PageHeader::chunked(1, 1, ColorSpace::Cmyk, 8);
        d.decode_page(h.clone(), &[0u8, 0, 0, 255][..], &Unstoppable)
            .unwrap();
        assert_eq!(d.preview_at(0, 0), Some(&[0u8, 0, 0][..]));

        // Make K print as pure red ink: swatch red removes green and blue.
        assert!(d.set_device_color(3, [255, 0, 0]).unwrap());
        assert!(!d.set_device_color(15, [0, 0, 0]).unwrap());
        d.decode_page(h, &[0u8, 0, 0, 255][..], &Unstoppable).unwrap();
        assert_eq!(d.preview_at(0, 0), Some(&[255u8, 0, 0][..]));
    }

    #[test]
    fn device_color_needs_a_current_page() {
        let mut d = decoder();
        assert!(!d.set_device_color(0, [255, 0, 0]).unwrap());
        assert_eq!(
            d.device_colors().tint(0),
            DeviceColorTable::default().tint(0)
        );

        let h = PageHeader::chunked(1, 1, ColorSpace::Cmyk, 8);
        d.decode_page(h, &[0u8, 0, 0, 255][..], &Unstoppable)
            .unwrap();
        let planar = PageHeader::chunked(1, 1, ColorSpace::Cmyk, 8).with_order(ColorOrder::Planar);
        assert!(d.decode_page(planar, &[0u8; 4][..], &Unstoppable).is_err());
        assert!(!d.set_device_color(3, [255, 0, 0]).unwrap());
    }

    #[test]
    fn short_line_buffer_is_reused() {
        let mut d = decoder();
        let big = PageHeader::chunked(8, 2, ColorSpace::Rgb, 8);
        d.decode_page(big, &[7u8; 48][..], &Unstoppable).unwrap();
        let cap = d.original().capacity();
        let small = PageHeader::chunked(2, 2, ColorSpace::Rgb, 8);
        d.decode_page(small, &[9u8; 12][..], &Unstoppable).unwrap();
        assert_eq!(d.original().capacity(), cap);
        assert_eq!(d.original().as_bytes(), &[9u8; 12]);
    }
}
