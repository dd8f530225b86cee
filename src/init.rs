//! Power-on register sequence.
//!
//! The values below are vendor calibrated for the cheap 1.44"/2.2"
//! modules. Delays may be tuned down to the datasheet minimums but the
//! ordering is fixed: the chip ignores most registers until it has left
//! sleep, and the voltage block must be written before display on.

use embedded_hal::delay::DelayNs;

use crate::command::Command;
use crate::display::Panel;
use crate::interface::{DisplayError, DisplayInterface};

/// Settle time after software reset.
pub const SOFTWARE_RESET_MS: u32 = 500;
/// Settle time after sleep out during bring-up.
pub const SLEEP_OUT_INIT_MS: u32 = 5;
/// Settle time after entering sleep.
pub const SLEEP_IN_MS: u32 = 5;
/// Settle time after leaving sleep, must exceed `SLEEP_IN_MS`.
pub const SLEEP_OUT_MS: u32 = 120;

/// 16 bit/pixel on both DBI and DPI.
const PIXEL_FORMAT_16BIT: u8 = 0x05;
/// Gamma curve 3.
const GAMMA_CURVE: u8 = 0x04;

/// Software reset and leave sleep, then select pixel format and gamma.
pub fn wake_up<DI, DELAY>(di: &mut DI, delay: &mut DELAY) -> Result<(), DisplayError>
where
    DI: DisplayInterface,
    DELAY: DelayNs,
{
    di.send_command(Command::SoftwareReset)?;
    delay.delay_ms(SOFTWARE_RESET_MS);

    di.send_command(Command::SleepOut)?;
    delay.delay_ms(SLEEP_OUT_INIT_MS);

    di.send_command_data(Command::PixelFormat, &[PIXEL_FORMAT_16BIT])?;
    delay.delay_ms(5);

    di.send_command_data(Command::GammaSet, &[GAMMA_CURVE])?;
    delay.delay_ms(1);

    // enable gamma adjustment
    di.send_command_data(Command::GammaAdjustmentSelect, &[0x01])?;
    delay.delay_ms(1);

    Ok(())
}

/// Frame rate, inversion, power and VCOM block.
pub fn configure_power<DI, DELAY>(di: &mut DI, delay: &mut DELAY) -> Result<(), DisplayError>
where
    DI: DisplayInterface,
    DELAY: DelayNs,
{
    di.send_command(Command::NormalMode)?;

    di.send_command_data(Command::DisplayFunctionControl, &[0b1111_1111, 0b0000_0110])?;

    // DIVA, VPA
    di.send_command_data(Command::FrameRateControl1, &[0x08, 0x02])?;
    delay.delay_ms(1);

    // line inversion in all modes
    di.send_command_data(Command::DisplayInversionControl, &[0x07])?;
    delay.delay_ms(1);

    // VRH1 = 4.30V, VC
    di.send_command_data(Command::PowerControl1, &[0x0a, 0x02])?;
    delay.delay_ms(1);

    // BT for AVDD, VCL, VGH, VGL
    di.send_command_data(Command::PowerControl2, &[0x02])?;
    delay.delay_ms(1);

    // VMH, VML
    di.send_command_data(Command::VcomControl1, &[0x50, 0x63])?;
    delay.delay_ms(1);

    di.send_command_data(Command::VcomOffsetControl, &[0x00])?;
    delay.delay_ms(1);

    Ok(())
}

/// Open the column/page window over all of GRAM and define the default
/// scroll region below the panel offset.
pub fn set_full_extent<P, DI>(di: &mut DI) -> Result<(), DisplayError>
where
    P: Panel,
    DI: DisplayInterface,
{
    di.send_command(Command::ColumnAddressSet)?;
    di.send_data16(0)?;
    di.send_data16(P::GRAM_WIDTH)?;

    di.send_command(Command::PageAddressSet)?;
    di.send_data16(0)?;
    di.send_data16(P::GRAM_HEIGHT)?;

    di.send_command(Command::VerticalScrollingDefinition)?;
    di.send_data16(P::OFFSET)?;
    di.send_data16(P::GRAM_HEIGHT - P::OFFSET)?;
    di.send_data16(0)?;

    Ok(())
}
