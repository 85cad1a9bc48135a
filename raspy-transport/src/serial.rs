//! Serial line settings
//!
//! Opening the device node is up to the host; these settings describe the
//! line the module expects so the host can open it correctly.

use std::fmt;

/// Parity setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

/// Line configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: u8,
}

impl SerialSettings {
    /// What the module speaks: 19200 baud, 8N1
    pub const MODULE: Self = Self {
        baud_rate: 19_200,
        data_bits: 8,
        parity: Parity::None,
        stop_bits: 1,
    };

    /// Check the settings against what the module speaks
    pub fn matches_module(&self) -> bool {
        *self == Self::MODULE
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self::MODULE
    }
}

impl fmt::Display for SerialSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Odd => 'O',
            Parity::Even => 'E',
        };
        write!(
            f,
            "{} {}{}{}",
            self.baud_rate, self.data_bits, parity, self.stop_bits
        )
    }
}
