//! Driver for ILI9163C based SPI TFT modules.
//!
//! Pixels are 16 bit 5-6-5, sent high byte first. Drawing either goes
//! straight to the controller through a column/page window, or into an
//! optional [`FrameStore`] that is pushed in one transfer by
//! [`Ili9163c::commit_frame_store`].
//!
//! The handle owns the bus. Every multi step operation (window then
//! data) assumes nothing else talks to the chip in between, so use it
//! from one thread only or wrap it in a mutex.

#![cfg_attr(not(test), no_std)]

pub mod color;
pub mod command;
pub mod display;
pub mod init;
pub mod interface;
pub mod surface;

use core::iter;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::{Dimensions, DrawTarget, OriginDimensions, Point, Size},
    primitives::Rectangle,
    Pixel,
};
use embedded_hal::delay::DelayNs;

use color::raw_color;
pub use color::{color24_to_565, color565, ColorOrder};
use command::Command;
pub use display::{
    AddressWindow, BlackPcb144, DisplayRotation, FrameStore, MemoryAccess, Panel, RedPcb144,
    RedPcb22,
};
pub use interface::{DisplayError, DisplayInterface, NoResetPin, SPIInterface};
pub use surface::PixelSurface;

pub struct Ili9163c<DI: DisplayInterface, P: Panel> {
    pub interface: DI,
    framebuf: Option<FrameStore<P>>,
    rotation: DisplayRotation,
    width: u16,
    height: u16,
    color_order: ColorOrder,
    memory_access: u8,
    sleeping: bool,
    strict: bool,
    init_error: u8,
}

impl<DI: DisplayInterface, P: Panel> Ili9163c<DI, P> {
    /// Unbuffered display, every pixel goes out on the bus. Nothing is
    /// transmitted until [`Ili9163c::init`].
    pub fn new(interface: DI) -> Self {
        Self::with_buffer(interface, None)
    }

    /// Buffered display, pixels are collected in a [`FrameStore`].
    pub fn with_frame_store(interface: DI) -> Self {
        Self::with_buffer(interface, Some(FrameStore::new()))
    }

    fn with_buffer(interface: DI, framebuf: Option<FrameStore<P>>) -> Self {
        Self {
            interface,
            framebuf,
            rotation: DisplayRotation::Rotate0,
            width: P::WIDTH,
            height: P::HEIGHT,
            color_order: P::COLOR_ORDER,
            memory_access: 0,
            sleeping: false,
            strict: false,
            init_error: 0,
        }
    }

    /// Reset and bring the chip up to a cleared, display-on state.
    ///
    /// Safe to call again at any time, it always ends in the same state.
    pub fn init<DELAY>(&mut self, delay: &mut DELAY) -> Result<(), DisplayError>
    where
        DELAY: DelayNs,
    {
        self.sleeping = false;
        self.init_error = 0;

        if self.interface.reset(delay)? {
            #[cfg(feature = "defmt")]
            defmt::debug!("hardware reset done");
        }

        init::wake_up(&mut self.interface, delay)?;
        init::configure_power(&mut self.interface, delay)?;
        init::set_full_extent::<P, _>(&mut self.interface)?;

        self.color_order = P::COLOR_ORDER;
        self.set_rotation(0)?;

        self.interface.send_command(Command::DisplayOn)?;
        delay.delay_ms(1);
        self.interface.send_command(Command::MemoryWrite)?;
        delay.delay_ms(1);

        self.clear_memory(color::BLACK)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("display ready {}x{}", self.width, self.height);

        Ok(())
    }

    /// Reserved for hardware fault reporting, the write-only bus gives
    /// nothing to report yet so this is 0 after init.
    pub fn error_code(&self) -> u8 {
        self.init_error
    }

    /// Reject bad geometry with an error instead of silently ignoring it.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Last memory access control byte sent to the chip.
    pub fn memory_access(&self) -> u8 {
        self.memory_access
    }

    pub fn color_order(&self) -> ColorOrder {
        self.color_order
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn frame_store(&self) -> Option<&FrameStore<P>> {
        self.framebuf.as_ref()
    }

    pub fn frame_store_mut(&mut self) -> Option<&mut FrameStore<P>> {
        self.framebuf.as_mut()
    }

    /// Consume the driver and return the display interface.
    pub fn release(self) -> DI {
        self.interface
    }

    /// Rotation is taken modulo 4.
    pub fn set_rotation(&mut self, rotation: u8) -> Result<(), DisplayError> {
        if self.strict && rotation > 3 {
            #[cfg(feature = "defmt")]
            defmt::warn!("rejected rotation {}", rotation);
            return Err(DisplayError::InvalidRotation);
        }
        self.rotation = DisplayRotation::from_index(rotation);
        (self.width, self.height) = self.rotation.logical_size::<P>();
        self.send_memory_access()
    }

    /// Change subpixel order, survives later rotation changes.
    pub fn set_color_order(&mut self, color_order: ColorOrder) -> Result<(), DisplayError> {
        self.color_order = color_order;
        self.send_memory_access()
    }

    fn send_memory_access(&mut self) -> Result<(), DisplayError> {
        let mactl = self
            .rotation
            .memory_access()
            .with_color_order(self.color_order)
            .to_byte();
        self.interface
            .send_command_data(Command::MemoryAccessControl, &[mactl])?;
        self.memory_access = mactl;
        Ok(())
    }

    /// Address the rectangle (x0,y0)-(x1,y1), inclusive, and start a RAM write.
    pub fn set_address_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), DisplayError> {
        set_window::<P, _>(&mut self.interface, self.rotation, x0, y0, x1, y1)
    }

    /// Address a single pixel.
    pub fn set_cursor(&mut self, x: i32, y: i32) -> Result<(), DisplayError> {
        match self.checked_point(x, y)? {
            Some((x, y)) => self.set_address_window(x, y, x, y),
            None => Ok(()),
        }
    }

    /// Out of range coordinates are dropped, or rejected in strict mode.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u16) -> Result<(), DisplayError> {
        match self.checked_point(x, y)? {
            Some((x, y)) => self.put_pixel(x, y, color),
            None => Ok(()),
        }
    }

    fn checked_point(&self, x: i32, y: i32) -> Result<Option<(u16, u16)>, DisplayError> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            if self.strict {
                #[cfg(feature = "defmt")]
                defmt::warn!("rejected pixel {},{}", x, y);
                return Err(DisplayError::OutOfBounds);
            }
            #[cfg(feature = "defmt")]
            defmt::trace!("dropped pixel {},{}", x, y);
            return Ok(None);
        }
        Ok(Some((x as u16, y as u16)))
    }

    fn put_pixel(&mut self, x: u16, y: u16, color: u16) -> Result<(), DisplayError> {
        match self.framebuf.as_mut() {
            Some(fb) => {
                fb.set_pixel(x as usize, y as usize, color);
                Ok(())
            }
            None => {
                self.set_address_window(x, y, x, y)?;
                self.interface.send_data16(color)
            }
        }
    }

    /// Open a window for a run of [`Ili9163c::push_color`] calls.
    pub fn begin_window_write(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), DisplayError> {
        self.set_address_window(x0, y0, x1, y1)
    }

    pub fn push_color(&mut self, color: u16) -> Result<(), DisplayError> {
        self.interface.send_data16(color)
    }

    /// Stream colors into the open window, returns the number sent.
    pub fn push_colors<I>(&mut self, colors: I) -> Result<usize, DisplayError>
    where
        I: IntoIterator<Item = u16>,
    {
        self.interface.send_words_from_iter(colors)
    }

    pub fn end_window_write(&mut self) -> Result<(), DisplayError> {
        self.home_address()
    }

    /// Window over the whole GRAM, the state every bulk transfer ends in.
    fn home_address(&mut self) -> Result<(), DisplayError> {
        self.set_address_window(0, 0, P::GRAM_WIDTH, P::GRAM_HEIGHT)
    }

    /// Push the frame store to the chip. No-op without one.
    pub fn commit_frame_store(&mut self) -> Result<(), DisplayError> {
        let Self {
            interface,
            framebuf,
            rotation,
            ..
        } = self;
        let Some(fb) = framebuf.as_ref() else {
            return Ok(());
        };
        set_window::<P, _>(interface, *rotation, 0, 0, P::GRAM_WIDTH, P::GRAM_HEIGHT)?;
        interface.send_command(Command::MemoryWrite)?;
        interface.send_data(fb.as_bytes())?;
        set_window::<P, _>(interface, *rotation, 0, 0, P::GRAM_WIDTH, P::GRAM_HEIGHT)
    }

    /// Write pre-encoded big endian pixels from the current address.
    pub fn write_screen16(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.interface.send_command(Command::MemoryWrite)?;
        self.interface.send_data(bytes)?;
        self.home_address()
    }

    /// Write 0x00RRGGBB pixels from the current address, see [`color24_to_565`].
    pub fn write_screen24(&mut self, bitmap: &[u32]) -> Result<(), DisplayError> {
        self.interface.send_command(Command::MemoryWrite)?;
        self.interface
            .send_words_from_iter(bitmap.iter().map(|&c| color24_to_565(c)))?;
        self.home_address()
    }

    /// Write `len` pre-encoded pixels of one row, clipped to the width.
    pub fn write_row(
        &mut self,
        row: u16,
        start_col: u16,
        len: u16,
        row_bytes: &[u8],
    ) -> Result<(), DisplayError> {
        if row >= self.height || start_col >= self.width {
            if self.strict {
                return Err(DisplayError::OutOfBounds);
            }
            return Ok(());
        }
        let n = len
            .min(self.width - start_col)
            .min(u16::try_from(row_bytes.len() / 2).unwrap_or(u16::MAX));
        if n == 0 {
            return Ok(());
        }
        let bytes = &row_bytes[..n as usize * 2];
        match self.framebuf.as_mut() {
            Some(fb) => {
                fb.write_bytes(start_col as usize, row as usize, bytes);
                Ok(())
            }
            None => {
                self.set_address_window(start_col, row, start_col + n - 1, row)?;
                self.interface.send_data(bytes)
            }
        }
    }

    /// Fill the logical screen, or the frame store when buffered.
    pub fn fill_screen(&mut self, color: u16) -> Result<(), DisplayError> {
        match self.framebuf.as_mut() {
            Some(fb) => {
                fb.fill(color);
                Ok(())
            }
            None => self.fill_window(0, 0, self.width, self.height, color),
        }
    }

    fn fill_window(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        color: u16,
    ) -> Result<(), DisplayError> {
        self.set_address_window(x, y, x + w - 1, y + h - 1)?;
        let count = usize::from(w) * usize::from(h);
        self.interface
            .send_words_from_iter(iter::repeat(color).take(count))?;
        Ok(())
    }

    /// Clear all of GRAM, including rows hidden behind the panel offset.
    ///
    /// The window is raw GRAM, the rotation offset rule does not apply.
    fn clear_memory(&mut self, color: u16) -> Result<(), DisplayError> {
        if let Some(fb) = self.framebuf.as_mut() {
            fb.fill(color);
        }
        let gram = AddressWindow {
            x0: 0,
            y0: 0,
            x1: P::GRAM_WIDTH - 1,
            y1: P::GRAM_HEIGHT - 1,
        };
        write_window(&mut self.interface, gram)?;
        let count = usize::from(P::GRAM_WIDTH) * usize::from(P::GRAM_HEIGHT);
        self.interface
            .send_words_from_iter(iter::repeat(color).take(count))?;
        self.home_address()
    }

    pub fn set_sleep<DELAY>(&mut self, enter: bool, delay: &mut DELAY) -> Result<(), DisplayError>
    where
        DELAY: DelayNs,
    {
        if enter == self.sleeping {
            return Ok(());
        }
        if enter {
            self.interface.send_command(Command::SleepIn)?;
            delay.delay_ms(init::SLEEP_IN_MS);
        } else {
            self.interface.send_command(Command::SleepOut)?;
            delay.delay_ms(init::SLEEP_OUT_MS);
        }
        self.sleeping = enter;

        #[cfg(feature = "defmt")]
        defmt::debug!("sleep {}", enter);

        Ok(())
    }

    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        self.interface.send_command(if on {
            Command::DisplayOn
        } else {
            Command::DisplayOff
        })
    }

    pub fn set_idle_mode(&mut self, on: bool) -> Result<(), DisplayError> {
        self.interface.send_command(if on {
            Command::IdleModeOn
        } else {
            Command::IdleModeOff
        })
    }

    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.interface.send_command(if inverted {
            Command::InversionOn
        } else {
            Command::InversionOff
        })
    }

    /// Split GRAM rows into top fixed, scrolling and bottom fixed areas.
    ///
    /// The panel offset counts towards the top area. Nothing is sent when
    /// the fixed areas do not fit.
    pub fn set_scroll_region(
        &mut self,
        top_fixed: u16,
        bottom_fixed: u16,
    ) -> Result<(), DisplayError> {
        let tfa = u32::from(top_fixed) + u32::from(P::OFFSET);
        let bfa = u32::from(bottom_fixed);
        let Some(vsa) = u32::from(P::GRAM_HEIGHT)
            .checked_sub(tfa)
            .and_then(|rows| rows.checked_sub(bfa))
        else {
            if self.strict {
                return Err(DisplayError::InvalidScrollRegion);
            }
            #[cfg(feature = "defmt")]
            defmt::trace!("dropped scroll region {} {}", top_fixed, bottom_fixed);
            return Ok(());
        };

        self.interface
            .send_command(Command::VerticalScrollingDefinition)?;
        self.interface.send_data16(tfa as u16)?;
        self.interface.send_data16(vsa as u16)?;
        self.interface.send_data16(bottom_fixed)
    }

    /// Set the first row shown at the top of the scroll area.
    pub fn set_scroll_offset(&mut self, address: u16) -> Result<(), DisplayError> {
        if address > P::GRAM_HEIGHT {
            if self.strict {
                return Err(DisplayError::InvalidScrollRegion);
            }
            return Ok(());
        }
        self.interface
            .send_command(Command::VerticalScrollingStartAddress)?;
        self.interface.send_data16(address + P::OFFSET)
    }
}

fn set_window<P: Panel, DI: DisplayInterface>(
    di: &mut DI,
    rotation: DisplayRotation,
    x0: u16,
    y0: u16,
    x1: u16,
    y1: u16,
) -> Result<(), DisplayError> {
    write_window(di, rotation.window::<P>(x0, y0, x1, y1))
}

fn write_window<DI: DisplayInterface>(
    di: &mut DI,
    win: AddressWindow,
) -> Result<(), DisplayError> {
    di.send_command(Command::ColumnAddressSet)?;
    di.send_data16(win.x0)?;
    di.send_data16(win.x1)?;

    di.send_command(Command::PageAddressSet)?;
    di.send_data16(win.y0)?;
    di.send_data16(win.y1)?;

    di.send_command(Command::MemoryWrite)
}

impl<DI: DisplayInterface, P: Panel> PixelSurface for Ili9163c<DI, P> {
    type Error = DisplayError;

    fn set_pixel(&mut self, x: i32, y: i32, color: u16) -> Result<(), Self::Error> {
        Ili9163c::set_pixel(self, x, y, color)
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn set_rotation(&mut self, rotation: u8) -> Result<(), Self::Error> {
        Ili9163c::set_rotation(self, rotation)
    }
}

impl<DI: DisplayInterface, P: Panel> OriginDimensions for Ili9163c<DI, P> {
    fn size(&self) -> Size {
        Size::new(self.width.into(), self.height.into())
    }
}

impl<DI: DisplayInterface, P: Panel> DrawTarget for Ili9163c<DI, P> {
    type Color = Rgb565;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = (i32::from(self.width), i32::from(self.height));
        for Pixel(Point { x, y }, rgb) in pixels.into_iter() {
            // clipping is expected of a draw target, never strict here
            if x >= 0 && y >= 0 && x < w && y < h {
                self.put_pixel(x as u16, y as u16, raw_color(rgb))?;
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        let raw = raw_color(color);
        let (x0, y0) = (area.top_left.x as u16, area.top_left.y as u16);
        let (x1, y1) = (bottom_right.x as u16, bottom_right.y as u16);

        match self.framebuf.as_mut() {
            Some(fb) => {
                for y in y0..=y1 {
                    for x in x0..=x1 {
                        fb.set_pixel(x as usize, y as usize, raw);
                    }
                }
                Ok(())
            }
            None => self.fill_window(x0, y0, x1 - x0 + 1, y1 - y0 + 1, raw),
        }
    }
}
