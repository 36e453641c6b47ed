//! Page sources: where headers and raw scanlines come from.
//!
//! Stream framing and run-length decoding live outside this crate. A source
//! hands over one fully reconstructed scanline per call, with multi-byte
//! samples already in the byte order configured on the decoder.

use std::collections::VecDeque;
use std::io;

use crate::header::PageHeader;

/// Pull source of raw scanlines for one page.
pub trait RowSource {
    /// Fill `buf` with the next scanline.
    ///
    /// Returns the number of bytes written. Fewer than `buf.len()` bytes
    /// means the page data ended early.
    fn read_row(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// A [`RowSource`] that also yields successive page headers.
pub trait PageSource: RowSource {
    /// Read the next page header, or `None` at end of stream.
    fn read_header(&mut self) -> io::Result<Option<PageHeader>>;
}

impl<R: RowSource + ?Sized> RowSource for &mut R {
    fn read_row(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_row(buf)
    }
}

impl<P: PageSource + ?Sized> PageSource for &mut P {
    fn read_header(&mut self) -> io::Result<Option<PageHeader>> {
        (**self).read_header()
    }
}

impl<R: RowSource + ?Sized> RowSource for Box<R> {
    fn read_row(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_row(buf)
    }
}

/// Rows packed back to back in a byte slice.
impl RowSource for &[u8] {
    fn read_row(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

/// Rows read from any [`io::Read`] until each buffer is full or the reader
/// reports end of file.
#[derive(Debug)]
pub struct ReaderRows<R> {
    inner: R,
}

impl<R: io::Read> ReaderRows<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: io::Read> RowSource for ReaderRows<R> {
    fn read_row(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

/// In-memory stream of pages, each a header plus its concatenated rows.
///
/// Rows of a page that were not consumed are discarded when the next header
/// is read.
#[derive(Clone, Debug, Default)]
pub struct MemoryPageSource {
    pages: VecDeque<(PageHeader, Vec<u8>)>,
    current: Vec<u8>,
    pos: usize,
}

impl MemoryPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page. `data` need not hold every row; a short page
    /// reproduces a truncated stream.
    pub fn push_page(&mut self, header: PageHeader, data: Vec<u8>) {
        self.pages.push_back((header, data));
    }

    pub fn with_page(mut self, header: PageHeader, data: Vec<u8>) -> Self {
        self.push_page(header, data);
        self
    }

    /// Pages whose headers have not been read yet.
    pub fn remaining_pages(&self) -> usize {
        self.pages.len()
    }
}

impl RowSource for MemoryPageSource {
    fn read_row(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut rest = self.current.get(self.pos..).unwrap_or_default();
        let n = rest.read_row(buf)?;
        self.pos += n;
        Ok(n)
    }
}

impl PageSource for MemoryPageSource {
    fn read_header(&mut self) -> io::Result<Option<PageHeader>> {
        match self.pages.pop_front() {
            Some((header, data)) => {
                self.current = data;
                self.pos = 0;
                Ok(Some(header))
            }
            None => {
                self.current.clear();
                self.pos = 0;
                Ok(None)
            }
        }
    }
}
