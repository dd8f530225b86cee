//! Command Table

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    Nop = 0x00,
    /// Software reset, wait 120ms (500ms on cheap modules) before the next command.
    SoftwareReset = 0x01,
    /// Enter sleep mode, booster and oscillator stop.
    SleepIn = 0x10,
    /// Exit sleep mode, at least 120ms before SleepIn may follow.
    SleepOut = 0x11,
    PartialModeOn = 0x12,
    /// Normal display mode on (partial/scroll mode off).
    NormalMode = 0x13,
    InversionOff = 0x20,
    InversionOn = 0x21,
    /// Select one of the 4 gamma curves.
    ///
    /// <<0:b4, GC:b4>>, one-hot: 0x01, 0x02, 0x04, 0x08
    GammaSet = 0x26,
    DisplayOff = 0x28,
    DisplayOn = 0x29,
    /// <<SC:u16, EC:u16>>
    ColumnAddressSet = 0x2a,
    /// <<SP:u16, EP:u16>>
    PageAddressSet = 0x2b,
    /// Begin RAM write at the start of the current window.
    MemoryWrite = 0x2c,
    ColorSet = 0x2d,
    MemoryRead = 0x2e,
    PartialArea = 0x30,
    /// <<TFA:u16, VSA:u16, BFA:u16>>
    VerticalScrollingDefinition = 0x33,
    TearingEffectLineOff = 0x34,
    TearingEffectLineOn = 0x35,
    /// Memory Access Control
    ///
    /// <<MY:b1, MX:b1, MV:b1, ML:b1, BGR:b1, MH:b1, 0:b2>>
    MemoryAccessControl = 0x36,
    /// <<VSP:u16>>
    VerticalScrollingStartAddress = 0x37,
    IdleModeOff = 0x38,
    IdleModeOn = 0x39,
    /// Interface pixel format
    ///
    /// <<0:b1, DPI:b3, 0:b1, DBI:b3>>, 0x05 = 16 bit/pixel
    PixelFormat = 0x3a,
    /// Frame rate control in normal mode / full colors.
    ///
    /// <<DIVA:u8, VPA:u8>>
    FrameRateControl1 = 0xb1,
    FrameRateControl2 = 0xb2,
    FrameRateControl3 = 0xb3,
    /// <<0:b5, NLA:b1, NLB:b1, NLC:b1>>
    DisplayInversionControl = 0xb4,
    DisplayFunctionControl = 0xb6,
    /// GVDD and VCI1 voltage
    ///
    /// <<0:b3, VRH:b5>>, <<0:b5, VC:b3>>
    PowerControl1 = 0xc0,
    /// AVDD, VCL, VGH and VGL step-up factor
    PowerControl2 = 0xc1,
    PowerControl3 = 0xc2,
    PowerControl4 = 0xc3,
    PowerControl5 = 0xc4,
    /// VCOMH and VCOML voltage
    VcomControl1 = 0xc5,
    VcomControl2 = 0xc6,
    VcomOffsetControl = 0xc7,
    PositiveGammaCorrection = 0xe0,
    NegativeGammaCorrection = 0xe1,
    /// Enable the gamma adjustment registers.
    GammaAdjustmentSelect = 0xf2,
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}
