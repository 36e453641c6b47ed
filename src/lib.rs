//! # zenraster
//!
//! Decoder for CUPS/PWG raster pages: the line-oriented pixel encoding that
//! printing pipelines hand to device drivers.
//!
//! Every page decodes into two buffers. The **original** buffer keeps each
//! pixel's samples exactly as encoded, for inspection. The **preview**
//! buffer holds an 8-bit grayscale or RGB approximation ready for display.
//!
//! ## Supported Encodings
//!
//! - **Additive**: W, sGray, RGB, sRGB, AdobeRGB, RGBA (composited over a
//!   checkerboard), RGBW
//! - **Subtractive**: K, White, Gold, Silver, CMY, YMC, CMYK, YMCK, KCMY,
//!   GMCK, GMCS, KCMYcm
//! - **Device-N**: Device1 through DeviceF, blended through a
//!   [`DeviceColorTable`]
//! - **Colorimetric**: CIE XYZ, CIE Lab and ICC1 through ICCF
//!
//! Samples of 1, 2, 4, 8 and 16 bits in chunked or banded order. Subtractive
//! pages at 8 bits and above are previewed through the Device-N blend.
//!
//! ## Non-Goals
//!
//! - Planar color order (rejected with [`RasterError::UnsupportedFormat`])
//! - Stream framing and compression (supply rows through [`PageSource`])
//! - Color management beyond the built-in Lab/XYZ to sRGB math
//!
//! ## Usage
//!
//! ```
//! use zenraster::{ColorSpace, MemoryPageSource, PageDecoder, PageHeader, Unstoppable};
//!
//! // Two pixels of 2-bit CMYK: pure cyan, then pure black.
//! let header = PageHeader::chunked(2, 1, ColorSpace::Cmyk, 2);
//! let mut source = MemoryPageSource::new().with_page(header, vec![0b11_00_00_00, 0b00_00_00_11]);
//!
//! let mut decoder = PageDecoder::new();
//! while let Some(page) = decoder.load_page(&mut source, &Unstoppable)? {
//!     println!("page {}: {}", page.page, page.header.color_space);
//!     assert_eq!(decoder.preview_at(0, 0), Some(&[0u8, 255, 255][..]));
//!     assert_eq!(decoder.original_at(1, 0), Some(&[0b11u8][..]));
//! }
//! # Ok::<(), zenraster::RasterError>(())
//! ```

#![forbid(unsafe_code)]

mod buffer;
mod decode;
mod device;
mod error;
mod header;
mod inspect;
mod limits;
mod pixel;
mod source;
pub mod transform;

// Re-exports
pub use buffer::PixelBuffer;
pub use decode::{PageDecoder, PageInfo, RowProgress};
pub use device::{DeviceColorTable, MemoryPreferences, PreferenceStore};
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::RasterError;
pub use header::{ColorOrder, ColorSpace, MAX_CHANNELS, PageHeader};
pub use inspect::{CieValue, PageAttributes, PixelInfo};
pub use limits::{DEFAULT_MAX_DIMENSION, DEFAULT_MAX_MEMORY_BYTES, Limits};
pub use pixel::{PreviewLayout, SampleOrder};
pub use source::{MemoryPageSource, PageSource, ReaderRows, RowSource};
pub use transform::ColorTransform;
