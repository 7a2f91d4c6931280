//! ILI9341 command set and power-on sequence

// ---------------------------------------------------------------------------
// Command enum
// ---------------------------------------------------------------------------

/// ILI9341 command codes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// No operation.
    Nop = 0x00,
    /// Software reset: wait ≥5 ms before the next command.
    SoftwareReset = 0x01,
    /// Read display identification information.
    ReadDisplayId = 0x04,
    /// Read display status.
    ReadDisplayStatus = 0x09,
    /// Enter sleep mode.
    SleepIn = 0x10,
    /// Sleep out: wait ≥120 ms before sleep-in.
    SleepOut = 0x11,
    /// Partial mode on.
    PartialModeOn = 0x12,
    /// Normal display mode on.
    NormalModeOn = 0x13,
    /// Display inversion off.
    InversionOff = 0x20,
    /// Display inversion on.
    InversionOn = 0x21,
    /// Gamma set: 1 data byte.
    GammaSet = 0x26,
    /// Display off.
    DisplayOff = 0x28,
    /// Display on.
    DisplayOn = 0x29,
    /// Column address set: 4 data bytes (start, end; big-endian).
    ColumnAddressSet = 0x2A,
    /// Page (row) address set: 4 data bytes (start, end; big-endian).
    PageAddressSet = 0x2B,
    /// Memory write: pixel data follows.
    MemoryWrite = 0x2C,
    /// Color set (lookup table for 16→18 bit expansion).
    ColorSet = 0x2D,
    /// Memory read.
    MemoryRead = 0x2E,
    /// Partial area: 4 data bytes.
    PartialArea = 0x30,
    /// Vertical scrolling definition: 6 data bytes.
    VerticalScrollDefinition = 0x33,
    /// Tearing effect line off.
    TearingEffectOff = 0x34,
    /// Tearing effect line on: 1 data byte.
    TearingEffectOn = 0x35,
    /// Memory access control: 1 data byte (orientation, BGR).
    MemoryAccessControl = 0x36,
    /// Vertical scrolling start address: 2 data bytes.
    VerticalScrollStart = 0x37,
    /// Idle mode off.
    IdleModeOff = 0x38,
    /// Idle mode on.
    IdleModeOn = 0x39,
    /// Pixel format set: 1 data byte (0x55 = 16 bit/pixel).
    PixelFormatSet = 0x3A,
    /// Write memory continue.
    WriteMemoryContinue = 0x3C,
    /// Read memory continue.
    ReadMemoryContinue = 0x3E,
    /// RGB interface signal control.
    RgbInterfaceControl = 0xB0,
    /// Frame rate control, normal mode: 2 data bytes.
    FrameRateNormal = 0xB1,
    /// Frame rate control, idle mode.
    FrameRateIdle = 0xB2,
    /// Frame rate control, partial mode.
    FrameRatePartial = 0xB3,
    /// Display inversion control.
    InversionControl = 0xB4,
    /// Blanking porch control.
    BlankingPorch = 0xB5,
    /// Display function control: 3 data bytes.
    DisplayFunctionControl = 0xB6,
    /// Entry mode set: 1 data byte.
    EntryModeSet = 0xB7,
    /// Power control 1: 1 data byte (GVDD level).
    PowerControl1 = 0xC0,
    /// Power control 2: 1 data byte (step-up factor).
    PowerControl2 = 0xC1,
    /// VCOM control 1: 2 data bytes.
    VcomControl1 = 0xC5,
    /// VCOM control 2: 1 data byte.
    VcomControl2 = 0xC7,
    /// Power control A: 5 data bytes.
    PowerControlA = 0xCB,
    /// Power control B: 3 data bytes.
    PowerControlB = 0xCF,
    /// Read ID1.
    ReadId1 = 0xDA,
    /// Read ID2.
    ReadId2 = 0xDB,
    /// Read ID3.
    ReadId3 = 0xDC,
    /// Positive gamma correction: 15 data bytes.
    PositiveGamma = 0xE0,
    /// Negative gamma correction: 15 data bytes.
    NegativeGamma = 0xE1,
    /// Driver timing control A: 3 data bytes.
    DriverTimingA = 0xE8,
    /// Driver timing control B: 2 data bytes.
    DriverTimingB = 0xEA,
    /// Power on sequence control: 4 data bytes.
    PowerOnSequence = 0xED,
    /// Enable 3-gamma control: 1 data byte.
    Enable3Gamma = 0xF2,
    /// Pump ratio control: 1 data byte.
    PumpRatioControl = 0xF7,
}

impl Command {
    /// Opcode as sent on the bus.
    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

// ---------------------------------------------------------------------------
// Init table
// ---------------------------------------------------------------------------

/// One entry of the power-on table: opcode, its argument bytes and the pause
/// the controller needs afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitCommand {
    /// Opcode to send.
    pub command: Command,
    /// Milliseconds to wait once the arguments are committed.
    pub delay_ms: u16,
    /// Argument bytes, sent in data mode.
    pub args: &'static [u8],
}

impl InitCommand {
    const fn new(command: Command, delay_ms: u16, args: &'static [u8]) -> Self {
        Self {
            command,
            delay_ms,
            args,
        }
    }

    /// Number of argument bytes.
    pub const fn arg_count(&self) -> usize {
        self.args.len()
    }
}

/// Power-on sequence, replayed verbatim by [`crate::Ili9341::init`].
///
/// Portrait orientation with BGR order (`MADCTL = 0x48`), 16 bit/pixel
/// (`COLMOD = 0x55`), ~70 Hz frame rate.
pub const INIT_SEQUENCE: [InitCommand; 12] = [
    InitCommand::new(Command::SoftwareReset, 50, &[]),
    InitCommand::new(Command::DisplayOff, 0, &[]),
    InitCommand::new(Command::PowerControl1, 0, &[0x23]),
    InitCommand::new(Command::PowerControl2, 0, &[0x10]),
    InitCommand::new(Command::VcomControl1, 0, &[0x2B, 0x2B]),
    InitCommand::new(Command::VcomControl2, 0, &[0xC0]),
    InitCommand::new(Command::MemoryAccessControl, 0, &[0x48]),
    InitCommand::new(Command::PixelFormatSet, 0, &[0x55]),
    InitCommand::new(Command::FrameRateNormal, 0, &[0x00, 0x1B]),
    // Low-voltage detection off, normal display.
    InitCommand::new(Command::EntryModeSet, 0, &[0x07]),
    InitCommand::new(Command::SleepOut, 150, &[]),
    InitCommand::new(Command::DisplayOn, 200, &[]),
];
