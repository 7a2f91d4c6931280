//! Control-line levels
//!
//! Boards disagree about the electrical polarity of the reset, data/command
//! and chip-select lines, so the transport contract names the *meaning* of a
//! level and each backend maps it onto a [`PinState`].

/// Electrical pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// Level of the controller's reset line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetLevel {
    /// Reset released; the controller runs.
    Released,
    /// Reset asserted; the controller is held in reset.
    Asserted,
}

impl ResetLevel {
    /// Electrical level on a board with the usual active-low RESX line.
    pub const fn active_low(self) -> PinState {
        match self {
            Self::Released => PinState::High,
            Self::Asserted => PinState::Low,
        }
    }
}

/// Meaning of the byte currently on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DcMode {
    /// The byte is an opcode.
    Command,
    /// The byte is a command argument or pixel data.
    Data,
}

impl DcMode {
    /// Electrical level on the usual D/CX line (low = command).
    pub const fn pin_state(self) -> PinState {
        match self {
            Self::Command => PinState::Low,
            Self::Data => PinState::High,
        }
    }
}

/// Chip-select state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipSelect {
    /// Controller selected; it listens to the bus.
    Selected,
    /// Controller deselected.
    Deselected,
}

impl ChipSelect {
    /// Electrical level on the usual active-low CSX line.
    pub const fn active_low(self) -> PinState {
        match self {
            Self::Selected => PinState::Low,
            Self::Deselected => PinState::High,
        }
    }
}
