//! Orientation, panel geometry and the host side frame store.
//!
//! The controller addresses a GRAM that can be larger than the visible
//! glass. Panels whose active area does not start at GRAM address zero
//! carry an `OFFSET`, which is added to either the page (row) or the
//! column address depending on orientation.

use crate::color::ColorOrder;

/// Rotation of the display.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DisplayRotation {
    /// Native scan, rows and columns in address order
    #[default]
    Rotate0,
    /// Rows and columns exchanged, columns reversed. Width and height swap.
    Rotate90,
    /// Rows and columns both reversed
    Rotate180,
    /// Rows and columns exchanged, rows reversed. Native width and height.
    Rotate270,
}

impl DisplayRotation {
    /// Out of range values wrap, `4` is `Rotate0` again.
    pub const fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => DisplayRotation::Rotate0,
            1 => DisplayRotation::Rotate90,
            2 => DisplayRotation::Rotate180,
            _ => DisplayRotation::Rotate270,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Scan direction for this rotation. Color order is filled in later.
    pub const fn memory_access(self) -> MemoryAccess {
        use AddressOrder::*;
        let (row_order, column_order, exchange) = match self {
            DisplayRotation::Rotate0 => (Normal, Normal, false),
            DisplayRotation::Rotate90 => (Normal, Reversed, true),
            DisplayRotation::Rotate180 => (Reversed, Reversed, false),
            DisplayRotation::Rotate270 => (Reversed, Normal, true),
        };
        MemoryAccess {
            row_order,
            column_order,
            exchange,
            ..MemoryAccess::DEFAULT
        }
    }

    /// Logical (width, height).
    ///
    /// Only `Rotate90` swaps the axes. `Rotate270` exchanges rows and
    /// columns in the scan but keeps the native extent, this is how the
    /// panel behaves and must not be "fixed".
    pub const fn logical_size<P: Panel>(self) -> (u16, u16) {
        match self {
            DisplayRotation::Rotate90 => (P::HEIGHT, P::WIDTH),
            _ => (P::WIDTH, P::HEIGHT),
        }
    }

    /// Map a logical rectangle onto GRAM addresses.
    ///
    /// Columns are shifted only for `Rotate90`, pages only for `Rotate0`.
    pub const fn window<P: Panel>(self, x0: u16, y0: u16, x1: u16, y1: u16) -> AddressWindow {
        let (col_offset, page_offset) = match self {
            DisplayRotation::Rotate0 => (0, P::OFFSET),
            DisplayRotation::Rotate90 => (P::OFFSET, 0),
            _ => (0, 0),
        };
        AddressWindow {
            x0: x0.wrapping_add(col_offset),
            y0: y0.wrapping_add(page_offset),
            x1: x1.wrapping_add(col_offset),
            y1: y1.wrapping_add(page_offset),
        }
    }
}

/// A rectangle in GRAM coordinates, inclusive on both ends.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressWindow {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressOrder {
    /// top to bottom, left to right
    Normal,
    /// bottom to top, right to left
    Reversed,
}

/// Memory Access Control register, decoded.
///
/// MY, MX, MV, ML, BGR, MH, 0, 0
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryAccess {
    /// MY, row address order
    pub row_order: AddressOrder,
    /// MX, column address order
    pub column_order: AddressOrder,
    /// MV, row/column exchange
    pub exchange: bool,
    /// ML, vertical refresh order
    pub vertical_refresh: AddressOrder,
    pub color_order: ColorOrder,
    /// MH, horizontal refresh order
    pub horizontal_refresh: AddressOrder,
}

impl MemoryAccess {
    pub const DEFAULT: Self = MemoryAccess {
        row_order: AddressOrder::Normal,
        column_order: AddressOrder::Normal,
        exchange: false,
        vertical_refresh: AddressOrder::Normal,
        color_order: ColorOrder::Rgb,
        horizontal_refresh: AddressOrder::Normal,
    };

    pub const fn with_color_order(mut self, color_order: ColorOrder) -> Self {
        self.color_order = color_order;
        self
    }

    pub const fn to_byte(self) -> u8 {
        const fn bit(set: bool, pos: u8) -> u8 {
            (set as u8) << pos
        }
        bit(matches!(self.row_order, AddressOrder::Reversed), 7)
            | bit(matches!(self.column_order, AddressOrder::Reversed), 6)
            | bit(self.exchange, 5)
            | bit(matches!(self.vertical_refresh, AddressOrder::Reversed), 4)
            | bit(matches!(self.color_order, ColorOrder::Bgr), 3)
            | bit(matches!(self.horizontal_refresh, AddressOrder::Reversed), 2)
    }
}

impl Default for MemoryAccess {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Trait that defines panel geometry, fixed per module variant.
pub trait Panel {
    /// Visible width in pixels
    const WIDTH: u16;
    /// Visible height in pixels
    const HEIGHT: u16;
    /// Column extent of the controller memory
    const GRAM_WIDTH: u16;
    /// Page extent of the controller memory
    const GRAM_HEIGHT: u16;
    /// First GRAM row/column of the active area
    const OFFSET: u16;
    const COLOR_ORDER: ColorOrder;

    /// `WIDTH * HEIGHT * 2` bytes.
    type FrameBuffer: AsRef<[u8]> + AsMut<[u8]>;

    fn new_frame_buffer() -> Self::FrameBuffer;
}

/// 1.44" red PCB, 128x128 glass on a 128x160 GRAM, starts at row 32.
#[derive(Clone, Copy, Debug)]
pub struct RedPcb144;

impl Panel for RedPcb144 {
    const WIDTH: u16 = 128;
    const HEIGHT: u16 = 128;
    const GRAM_WIDTH: u16 = 128;
    const GRAM_HEIGHT: u16 = 160;
    const OFFSET: u16 = 32;
    const COLOR_ORDER: ColorOrder = ColorOrder::Bgr;

    type FrameBuffer = [u8; 128 * 128 * 2];

    fn new_frame_buffer() -> Self::FrameBuffer {
        [0; 128 * 128 * 2]
    }
}

/// 1.44" black PCB
#[derive(Clone, Copy, Debug)]
pub struct BlackPcb144;

impl Panel for BlackPcb144 {
    const WIDTH: u16 = 128;
    const HEIGHT: u16 = 128;
    const GRAM_WIDTH: u16 = 128;
    const GRAM_HEIGHT: u16 = 128;
    const OFFSET: u16 = 0;
    const COLOR_ORDER: ColorOrder = ColorOrder::Bgr;

    type FrameBuffer = [u8; 128 * 128 * 2];

    fn new_frame_buffer() -> Self::FrameBuffer {
        [0; 128 * 128 * 2]
    }
}

/// 2.2" red PCB, 128x160
#[derive(Clone, Copy, Debug)]
pub struct RedPcb22;

impl Panel for RedPcb22 {
    const WIDTH: u16 = 128;
    const HEIGHT: u16 = 160;
    const GRAM_WIDTH: u16 = 128;
    const GRAM_HEIGHT: u16 = 160;
    const OFFSET: u16 = 0;
    const COLOR_ORDER: ColorOrder = ColorOrder::Bgr;

    type FrameBuffer = [u8; 128 * 160 * 2];

    fn new_frame_buffer() -> Self::FrameBuffer {
        [0; 128 * 160 * 2]
    }
}

/// Host mirror of the panel RAM, big endian 5-6-5 words.
///
/// Always laid out in native (unrotated) rows of `P::WIDTH` pixels. A
/// rotated logical coordinate may land on another row, callers bounds
/// check against the logical size first.
pub struct FrameStore<P: Panel> {
    buf: P::FrameBuffer,
}

impl<P: Panel> FrameStore<P> {
    pub fn new() -> Self {
        Self {
            buf: P::new_frame_buffer(),
        }
    }

    fn offset(x: usize, y: usize) -> usize {
        (y * P::WIDTH as usize + x) * 2
    }

    /// Returns false when the offset falls outside the buffer.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: u16) -> bool {
        let offset = Self::offset(x, y);
        match self.buf.as_mut().get_mut(offset..offset + 2) {
            Some(px) => {
                px.copy_from_slice(&color.to_be_bytes());
                true
            }
            None => false,
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u16> {
        let offset = Self::offset(x, y);
        self.buf
            .as_ref()
            .get(offset..offset + 2)
            .map(|px| u16::from_be_bytes([px[0], px[1]]))
    }

    /// Copy pre-encoded pixel bytes into row `y`, starting at column `x`.
    /// Returns the number of bytes copied.
    pub fn write_bytes(&mut self, x: usize, y: usize, bytes: &[u8]) -> usize {
        let buf = self.buf.as_mut();
        let offset = Self::offset(x, y);
        if offset >= buf.len() {
            return 0;
        }
        let n = bytes.len().min(buf.len() - offset);
        buf[offset..offset + n].copy_from_slice(&bytes[..n]);
        n
    }

    pub fn fill(&mut self, color: u16) {
        let [hi, lo] = color.to_be_bytes();
        for px in self.buf.as_mut().chunks_exact_mut(2) {
            px[0] = hi;
            px[1] = lo;
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_ref()
    }
}

impl<P: Panel> Default for FrameStore<P> {
    fn default() -> Self {
        Self::new()
    }
}
