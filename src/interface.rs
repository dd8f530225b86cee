//! The display interface for ILI9163C TFT displays.
//!
//! The bus is write-only: commands and data are clocked out with no
//! handshake, so only errors reported by the HAL itself are observable.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal::spi::{Mode, SpiBus, MODE_0};

use crate::command::Command;

/// SPI mode expected by the controller, MSB first.
pub const SPI_MODE: Mode = MODE_0;

/// Highest SPI clock the controller is known to accept.
pub const SPI_FREQUENCY_HZ: u32 = 32_000_000;

/// Time each phase of the hardware reset pulse is held, in ms.
pub const RESET_HOLD_MS: u32 = 500;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayError {
    BusWriteError,
    DCError,
    CSError,
    RSTError,
    /// Coordinates outside the logical display area (strict mode only)
    OutOfBounds,
    /// Rotation index above 3 (strict mode only)
    InvalidRotation,
    /// Fixed areas exceed the addressable rows (strict mode only)
    InvalidScrollRegion,
}

/// Trait implemented by displays to provide implemenation of core functionality.
pub trait DisplayInterface {
    fn send_command_data(&mut self, command: Command, data: &[u8]) -> Result<(), DisplayError> {
        self.send_command(command)?;
        self.send_data(data)?;
        Ok(())
    }

    /// Send a command to the controller.
    fn send_command(&mut self, command: Command) -> Result<(), DisplayError>;

    /// Send data for a command.
    fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError>;

    /// Send a 16 bit word, high byte first.
    fn send_data16(&mut self, word: u16) -> Result<(), DisplayError> {
        self.send_data(&word.to_be_bytes())
    }

    /// Send a stream of 16 bit words within one chip-select cycle.
    fn send_words_from_iter<I>(&mut self, iter: I) -> Result<usize, DisplayError>
    where
        I: IntoIterator<Item = u16>;

    /// Hard reset, returns false when no reset line is wired.
    fn reset<D>(&mut self, delay: &mut D) -> Result<bool, DisplayError>
    where
        D: DelayNs;
}

/// Placeholder for modules whose reset line is tied high.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoResetPin;

impl ErrorType for NoResetPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for NoResetPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// ILI9163C 4-wire SPI display interface.
pub struct SPIInterface<SPI, CS, DC, RST> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: Option<RST>,
}

impl<SPI, CS, DC, RST> SPIInterface<SPI, CS, DC, RST>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST) -> Self {
        SPIInterface {
            spi,
            cs,
            dc,
            rst: Some(rst),
        }
    }

    /// Consume the display interface and return
    /// the underlying peripherial driver and GPIO pins used by it
    pub fn release(self) -> (SPI, CS, DC, Option<RST>) {
        (self.spi, self.cs, self.dc, self.rst)
    }

    fn write_framed(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        // Assert chip select pin
        self.cs.set_low().map_err(|_| DisplayError::CSError)?;

        // Send words over SPI
        let ret = self
            .spi
            .write(data)
            .and_then(|_| self.spi.flush())
            .map_err(|_| DisplayError::BusWriteError);

        // Deassert chip select pin
        self.cs.set_high().ok();

        ret
    }
}

impl<SPI, CS, DC> SPIInterface<SPI, CS, DC, NoResetPin>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DC: OutputPin,
{
    pub fn new_without_reset(spi: SPI, cs: CS, dc: DC) -> Self {
        SPIInterface {
            spi,
            cs,
            dc,
            rst: None,
        }
    }
}

impl<SPI, CS, DC, RST> DisplayInterface for SPIInterface<SPI, CS, DC, RST>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn send_command(&mut self, command: Command) -> Result<(), DisplayError> {
        // 1 = data, 0 = command
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        let ret = self.write_framed(&[command.into()]);
        // parameters follow in data mode
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        ret
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.write_framed(data)
    }

    fn send_words_from_iter<I>(&mut self, iter: I) -> Result<usize, DisplayError>
    where
        I: IntoIterator<Item = u16>,
    {
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.cs.set_low().map_err(|_| DisplayError::CSError)?;

        let mut chunk = [0u8; 64];
        let mut filled = 0;
        let mut n = 0;
        let mut ret = Ok(());
        for word in iter {
            chunk[filled..filled + 2].copy_from_slice(&word.to_be_bytes());
            filled += 2;
            n += 1;
            if filled == chunk.len() {
                ret = self.spi.write(&chunk);
                filled = 0;
                if ret.is_err() {
                    break;
                }
            }
        }
        if ret.is_ok() && filled > 0 {
            ret = self.spi.write(&chunk[..filled]);
        }
        let ret = ret
            .and_then(|_| self.spi.flush())
            .map_err(|_| DisplayError::BusWriteError);

        // Deassert chip select pin
        self.cs.set_high().ok();

        ret.map(|_| n)
    }

    fn reset<D>(&mut self, delay: &mut D) -> Result<bool, DisplayError>
    where
        D: DelayNs,
    {
        let Some(rst) = self.rst.as_mut() else {
            return Ok(false);
        };
        rst.set_high().map_err(|_| DisplayError::RSTError)?;
        delay.delay_ms(RESET_HOLD_MS);
        rst.set_low().map_err(|_| DisplayError::RSTError)?;
        delay.delay_ms(RESET_HOLD_MS);
        rst.set_high().map_err(|_| DisplayError::RSTError)?;
        delay.delay_ms(RESET_HOLD_MS);
        Ok(true)
    }
}
