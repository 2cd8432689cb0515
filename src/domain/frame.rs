// SPDX-License-Identifier: MPL-2.0
//! Borrowed camera frames.
//!
//! A [`Frame`] is a view over pixel data owned by the caller. Classifiers only
//! see it for the duration of a single call, which the borrow enforces.

use std::fmt;

// =============================================================================
// PixelFormat
// =============================================================================

/// Pixel layout of a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed 8-bit blue, green, red, alpha (the usual camera output).
    Bgra8,
    /// Packed 8-bit red, green, blue, alpha.
    Rgba8,
    /// Packed 8-bit red, green, blue.
    Rgb8,
    /// Single 8-bit luma channel.
    Gray8,
    /// Bi-planar YUV 4:2:0: a full-resolution luma plane followed by an
    /// interleaved, half-resolution CbCr plane. Both planes share the stride.
    Nv12,
}

impl PixelFormat {
    /// Bytes per pixel of the first (or only) plane.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra8 | PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Gray8 | PixelFormat::Nv12 => 1,
        }
    }

    /// Returns `true` for formats that store more than one plane.
    #[must_use]
    pub const fn is_planar(self) -> bool {
        matches!(self, PixelFormat::Nv12)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::Bgra8 => "BGRA8",
            PixelFormat::Rgba8 => "RGBA8",
            PixelFormat::Rgb8 => "RGB8",
            PixelFormat::Gray8 => "GRAY8",
            PixelFormat::Nv12 => "NV12",
        };
        f.write_str(name)
    }
}

// =============================================================================
// FrameDefect
// =============================================================================

/// Reasons a frame cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameDefect {
    /// The buffer holds no bytes at all.
    Empty,
    /// Width or height is zero.
    ZeroDimension { width: u32, height: u32 },
    /// The stride is shorter than one row of pixels (or, for NV12, one
    /// interleaved chroma row).
    StrideTooSmall { stride: usize, row_bytes: usize },
    /// The buffer is shorter than its geometry requires.
    BufferTooSmall { expected: usize, actual: usize },
    /// The geometry describes more bytes than can be addressed.
    GeometryOverflow {
        width: u32,
        height: u32,
        stride: usize,
    },
}

impl fmt::Display for FrameDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameDefect::Empty => write!(f, "frame buffer is empty"),
            FrameDefect::ZeroDimension { width, height } => {
                write!(f, "frame has a zero dimension ({width}x{height})")
            }
            FrameDefect::StrideTooSmall { stride, row_bytes } => {
                write!(f, "stride {stride} is shorter than a row ({row_bytes} bytes)")
            }
            FrameDefect::BufferTooSmall { expected, actual } => {
                write!(f, "buffer holds {actual} bytes, geometry needs {expected}")
            }
            FrameDefect::GeometryOverflow {
                width,
                height,
                stride,
            } => write!(
                f,
                "frame of {width}x{height} with stride {stride} is too large to address"
            ),
        }
    }
}

// =============================================================================
// Frame
// =============================================================================

/// A single video frame borrowed from the caller.
///
/// Construction never fails; geometry is checked by [`Frame::validate`], which
/// every classifier calls before touching the pixels. This keeps empty or
/// truncated buffers representable so they surface as inference errors rather
/// than panics at the call site.
///
/// # Example
///
/// ```
/// use formcheck::domain::frame::{Frame, PixelFormat};
///
/// let pixels = vec![0u8; 4 * 2 * 2];
/// let frame = Frame::new(2, 2, PixelFormat::Bgra8, &pixels);
/// assert!(frame.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    data: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Creates a tightly packed frame (stride = width * bytes per pixel).
    #[must_use]
    pub fn new(width: u32, height: u32, format: PixelFormat, data: &'a [u8]) -> Self {
        let stride = width as usize * format.bytes_per_pixel();
        Self::with_stride(width, height, stride, format, data)
    }

    /// Creates a frame whose rows are `stride` bytes apart.
    #[must_use]
    pub fn with_stride(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        data: &'a [u8],
    ) -> Self {
        Self {
            width,
            height,
            stride,
            format,
            data,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Number of bytes the geometry requires, including the chroma plane for
    /// planar formats. The last row of each plane may omit its padding.
    ///
    /// Returns `None` if the size does not fit in `usize`.
    #[must_use]
    pub fn required_len(&self) -> Option<usize> {
        let rows = self.height as usize;
        if rows == 0 {
            return Some(0);
        }
        if self.format.is_planar() {
            // The chroma plane starts after a full luma plane including padding.
            let chroma_rows = rows.div_ceil(2);
            self.stride
                .checked_mul(rows + chroma_rows - 1)?
                .checked_add(self.chroma_row_bytes())
        } else {
            self.stride
                .checked_mul(rows - 1)?
                .checked_add(self.row_bytes())
        }
    }

    /// Checks that the buffer is non-empty and large enough for its geometry.
    ///
    /// # Errors
    ///
    /// Returns the first [`FrameDefect`] found.
    pub fn validate(&self) -> Result<(), FrameDefect> {
        if self.data.is_empty() {
            return Err(FrameDefect::Empty);
        }
        if self.width == 0 || self.height == 0 {
            return Err(FrameDefect::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        let row_bytes = if self.format.is_planar() {
            self.row_bytes().max(self.chroma_row_bytes())
        } else {
            self.row_bytes()
        };
        if self.stride < row_bytes {
            return Err(FrameDefect::StrideTooSmall {
                stride: self.stride,
                row_bytes,
            });
        }
        let expected = self
            .required_len()
            .ok_or(FrameDefect::GeometryOverflow {
                width: self.width,
                height: self.height,
                stride: self.stride,
            })?;
        if self.data.len() < expected {
            return Err(FrameDefect::BufferTooSmall {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Returns row `y` of the first plane without padding.
    ///
    /// Only meaningful after [`Frame::validate`] succeeded.
    #[must_use]
    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    /// Returns the interleaved CbCr row covering luma row `y` of an NV12 frame.
    #[must_use]
    pub fn chroma_row(&self, y: u32) -> &'a [u8] {
        let plane = self.stride * self.height as usize;
        let start = plane + (y as usize / 2) * self.stride;
        &self.data[start..start + self.chroma_row_bytes()]
    }

    fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    fn chroma_row_bytes(&self) -> usize {
        (self.width as usize).div_ceil(2) * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_frame_validates() {
        let pixels = vec![0u8; 3 * 4 * 2];
        let frame = Frame::new(4, 2, PixelFormat::Rgb8, &pixels);
        assert_eq!(frame.stride(), 12);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn empty_buffer_is_rejected() {
        let frame = Frame::new(96, 96, PixelFormat::Bgra8, &[]);
        assert_eq!(frame.validate(), Err(FrameDefect::Empty));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let pixels = vec![0u8; 16];
        let frame = Frame::new(0, 4, PixelFormat::Gray8, &pixels);
        assert!(matches!(
            frame.validate(),
            Err(FrameDefect::ZeroDimension { width: 0, height: 4 })
        ));
    }

    #[test]
    fn truncated_buffer_is_rejected() {
        let pixels = vec![0u8; 10];
        let frame = Frame::new(4, 4, PixelFormat::Rgba8, &pixels);
        assert_eq!(
            frame.validate(),
            Err(FrameDefect::BufferTooSmall {
                expected: 64,
                actual: 10
            })
        );
    }

    #[test]
    fn short_stride_is_rejected() {
        let pixels = vec![0u8; 64];
        let frame = Frame::with_stride(4, 4, 8, PixelFormat::Rgba8, &pixels);
        assert!(matches!(
            frame.validate(),
            Err(FrameDefect::StrideTooSmall { stride: 8, row_bytes: 16 })
        ));
    }

    #[test]
    fn padded_rows_skip_padding() {
        // 2x2 gray with 4-byte stride; padding bytes are 9.
        let pixels = [1, 2, 9, 9, 3, 4];
        let frame = Frame::with_stride(2, 2, 4, PixelFormat::Gray8, &pixels);
        assert!(frame.validate().is_ok());
        assert_eq!(frame.row(0), &[1, 2]);
        assert_eq!(frame.row(1), &[3, 4]);
    }

    #[test]
    fn nv12_requires_chroma_plane() {
        // 4x2 luma = 8 bytes, chroma = one row of 4 bytes.
        let luma_only = vec![16u8; 8];
        let frame = Frame::new(4, 2, PixelFormat::Nv12, &luma_only);
        assert_eq!(
            frame.validate(),
            Err(FrameDefect::BufferTooSmall {
                expected: 12,
                actual: 8
            })
        );

        let full = vec![128u8; 12];
        let frame = Frame::new(4, 2, PixelFormat::Nv12, &full);
        assert!(frame.validate().is_ok());
        assert_eq!(frame.chroma_row(1).len(), 4);
    }

    #[test]
    fn huge_stride_is_rejected_without_panicking() {
        let pixels = [0u8; 16];
        let frame = Frame::with_stride(2, 4, usize::MAX / 2, PixelFormat::Gray8, &pixels);
        assert_eq!(frame.required_len(), None);
        assert_eq!(
            frame.validate(),
            Err(FrameDefect::GeometryOverflow {
                width: 2,
                height: 4,
                stride: usize::MAX / 2
            })
        );

        let nv12 = Frame::with_stride(2, 4, usize::MAX / 3, PixelFormat::Nv12, &pixels);
        assert!(matches!(
            nv12.validate(),
            Err(FrameDefect::GeometryOverflow { .. })
        ));
    }

    #[test]
    fn nv12_odd_width_needs_stride_for_chroma_pair() {
        // Width 3: luma rows are 3 bytes, but each chroma row holds 2 CbCr pairs.
        let pixels = vec![128u8; 16];
        let packed = Frame::new(3, 2, PixelFormat::Nv12, &pixels);
        assert_eq!(
            packed.validate(),
            Err(FrameDefect::StrideTooSmall {
                stride: 3,
                row_bytes: 4
            })
        );

        let padded = Frame::with_stride(3, 2, 4, PixelFormat::Nv12, &pixels);
        assert!(padded.validate().is_ok());
        assert_eq!(padded.chroma_row(0).len(), 4);
    }
}
