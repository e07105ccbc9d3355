//! PCF8523 register map and control bit masks

/// Fixed I2C address of the PCF8523
pub const ADDRESS: u8 = 0x68;

/// Registers touched by the driver
///
/// The alarm, offset and timer registers past `Year` are not used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Control 1: hour mode, oscillator stop, interrupt enables
    Control1 = 0x00,
    /// Control 2: timer and alarm flags
    Control2 = 0x01,
    /// Control 3: battery switch-over and battery low
    Control3 = 0x02,
    /// Seconds, BCD
    Second = 0x03,
    /// Minutes, BCD
    Minute = 0x04,
    /// Hours, BCD with 12/24-hour layout
    Hour = 0x05,
    /// Day of the month, BCD
    Day = 0x06,
    /// Day of the week, raw 0-6
    Weekday = 0x07,
    /// Month, BCD
    Month = 0x08,
    /// Years since 1970, BCD
    Year = 0x09,
}

impl Register {
    /// Register address on the chip
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Control 1, bit 3: set for 12-hour mode
pub const CTRL1_12_24: u8 = 0b0000_1000;

/// Control 3, bit 0: battery low interrupt enable
pub const CTRL3_BLIE: u8 = 0b0000_0001;

/// Control 3, bit 2: battery low flag
pub const CTRL3_BLF: u8 = 0b0000_0100;

/// Control 3, bit 3: battery switch-over interrupt flag
pub const CTRL3_BSF: u8 = 0b0000_1000;

/// Control 3, bits 5-7: power management (switch-over mode)
pub const CTRL3_PM: u8 = 0b1110_0000;
