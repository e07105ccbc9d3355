//! Conversions between calendar values and PCF8523 register bytes
//!
//! Everything here is pure: no bus access and no hidden state. Encoders take an `i32` so that
//! out-of-range input (including negative values) can be reported instead of wrapping.

use crate::{
    error::{Field, RangeError},
    registers::{CTRL1_12_24, CTRL3_BLF, CTRL3_BLIE, CTRL3_BSF, CTRL3_PM},
};

/// Weekday names, indexed by register value (0 = Sunday)
pub static WEEKDAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Month names, indexed by month - 1
pub static MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Year stored as 0 in the year register
pub const YEAR_BASE: i32 = 1970;

/// Latest year accepted by [`encode_year`]
///
/// The register itself can hold up to [`YEAR_REGISTER_MAX`], but writes stop short of that
pub const YEAR_MAX: i32 = 2119;

/// Latest year the year register can represent (offset 159 from [`YEAR_BASE`])
pub const YEAR_REGISTER_MAX: i32 = 2129;

/// Last day accepted by [`encode_day`]
///
/// Day 31 is refused; there is no cross-check against the month's actual length either
pub const DAY_MAX: i32 = 30;

/// Hour register layout, selected by control 1 bit 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HourMode {
    /// 0-23 hours, 2-bit tens digit
    #[default]
    TwentyFourHour,
    /// 1-12 hours with a meridiem bit
    TwelveHour,
}

/// Weekday or month given either as its register number or as a three-letter name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberOrName<'a> {
    /// Numeric value, validated against the field's range
    Number(u8),
    /// Upper-case three-letter name, e.g. `"WED"` or `"OCT"`
    Name(&'a str),
}

impl From<u8> for NumberOrName<'_> {
    fn from(value: u8) -> Self {
        Self::Number(value)
    }
}

impl<'a> From<&'a str> for NumberOrName<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

// Time fields

/// Encode seconds (0-59) as BCD
///
/// # Errors
/// Returns a [`RangeError`] if `second` is outside `[0, 59]`
pub const fn encode_second(second: i32) -> Result<u8, RangeError> {
    if let Err(e) = RangeError::check(Field::Second, second, 0, 59) {
        return Err(e);
    }
    Ok(encode_bcd(second as u8))
}

/// Decode the seconds register
#[must_use]
pub const fn decode_second(byte: u8) -> u8 {
    decode_bcd7b(byte)
}

/// Encode minutes (0-59) as BCD
///
/// # Errors
/// Returns a [`RangeError`] if `minute` is outside `[0, 59]`
pub const fn encode_minute(minute: i32) -> Result<u8, RangeError> {
    if let Err(e) = RangeError::check(Field::Minute, minute, 0, 59) {
        return Err(e);
    }
    Ok(encode_bcd(minute as u8))
}

/// Decode the minutes register
#[must_use]
pub const fn decode_minute(byte: u8) -> u8 {
    decode_bcd7b(byte)
}

/// Encode a 24-hour value (0-23) using the register layout of `mode`
///
/// In 12-hour mode hours after noon get the meridiem bit and are folded onto 1-11, while noon
/// itself stays 12 with the bit clear. Midnight encodes as 0.
///
/// # Errors
/// Returns a [`RangeError`] if `hour` is outside `[0, 23]`, whatever the mode
pub const fn encode_hour(hour: i32, mode: HourMode) -> Result<u8, RangeError> {
    if let Err(e) = RangeError::check(Field::Hour, hour, 0, 23) {
        return Err(e);
    }
    let hour = hour as u8;

    match mode {
        HourMode::TwentyFourHour => Ok(encode_bcd(hour)),
        HourMode::TwelveHour => {
            let meridiem: u8 = if hour <= 12 { 0 } else { 1 };
            let hour12 = if hour == 12 { 12 } else { hour % 12 };
            Ok((meridiem << 5) | encode_bcd(hour12))
        }
    }
}

/// Decode the hours register according to `mode`, returning a 0-23 value
///
/// 12-hour decoding adds 12 when the meridiem bit is set, so 12 with the bit clear reads as 12
#[must_use]
pub const fn decode_hour(byte: u8, mode: HourMode) -> u8 {
    match mode {
        HourMode::TwentyFourHour => decode_bcd6b(byte),
        HourMode::TwelveHour => 12 * ((byte & 0b0010_0000) >> 5) + decode_bcd5b(byte),
    }
}

/// Encode the day of the month as BCD
///
/// # Errors
/// Returns a [`RangeError`] if `day` is outside `[1, 30]`; see [`DAY_MAX`]
pub const fn encode_day(day: i32) -> Result<u8, RangeError> {
    if let Err(e) = RangeError::check(Field::Day, day, 1, DAY_MAX) {
        return Err(e);
    }
    Ok(encode_bcd(day as u8))
}

/// Decode the days register
#[must_use]
pub const fn decode_day(byte: u8) -> u8 {
    decode_bcd6b(byte)
}

/// Encode the day of the week; stored raw, not BCD
///
/// # Errors
/// Returns a [`RangeError`] if `weekday` is outside `[0, 6]`
pub const fn encode_weekday(weekday: i32) -> Result<u8, RangeError> {
    if let Err(e) = RangeError::check(Field::Weekday, weekday, 0, 6) {
        return Err(e);
    }
    Ok(weekday as u8)
}

/// Decode the weekdays register (0 = Sunday)
#[must_use]
pub const fn decode_weekday(byte: u8) -> u8 {
    byte & 0b0000_0111
}

/// Encode the month as BCD
///
/// # Errors
/// Returns a [`RangeError`] if `month` is outside `[1, 12]`
pub const fn encode_month(month: i32) -> Result<u8, RangeError> {
    if let Err(e) = RangeError::check(Field::Month, month, 1, 12) {
        return Err(e);
    }
    Ok(encode_bcd(month as u8))
}

/// Decode the months register (1 = January)
#[must_use]
pub const fn decode_month(byte: u8) -> u8 {
    decode_bcd5b(byte)
}

/// Encode the year as a BCD offset from [`YEAR_BASE`]
///
/// # Errors
/// Returns a [`RangeError`] if `year` is outside `[1970, 2119]`
pub const fn encode_year(year: i32) -> Result<u8, RangeError> {
    if let Err(e) = RangeError::check(Field::Year, year, YEAR_BASE, YEAR_MAX) {
        return Err(e);
    }
    Ok(encode_bcd((year - YEAR_BASE) as u8))
}

/// Decode the years register; ranges over 1970-2129
#[must_use]
pub const fn decode_year(byte: u8) -> u16 {
    decode_bcd8b(byte) as u16 + YEAR_BASE as u16
}

// Names

/// Weekday number for a three-letter name, if it is one of [`WEEKDAY_NAMES`]
#[must_use]
pub fn weekday_from_name(name: &str) -> Option<u8> {
    WEEKDAY_NAMES
        .iter()
        .position(|&n| n == name)
        .map(|i| i as u8)
}

/// Name of a weekday number, or `None` outside of 0-6
///
/// The weekdays register keeps three bits, so a corrupted chip can still hand back a 7
#[must_use]
pub fn weekday_name(weekday: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(weekday as usize).copied()
}

/// Month number (1-12) for a three-letter name, if it is one of [`MONTH_NAMES`]
#[must_use]
pub fn month_from_name(name: &str) -> Option<u8> {
    MONTH_NAMES
        .iter()
        .position(|&n| n == name)
        .map(|i| i as u8 + 1)
}

/// Name of a month number, or `None` outside of 1-12
///
/// The months register can decode to values beyond 12 if the chip holds garbage
#[must_use]
pub fn month_name(month: u8) -> Option<&'static str> {
    MONTH_NAMES.get((month as usize).wrapping_sub(1)).copied()
}

/// Resolve a weekday given as a number or name to the value to validate
///
/// Returns `None` for an unknown name
#[must_use]
pub fn resolve_weekday(weekday: NumberOrName<'_>) -> Option<i32> {
    match weekday {
        NumberOrName::Number(n) => Some(n as i32),
        NumberOrName::Name(name) => weekday_from_name(name).map(i32::from),
    }
}

/// Resolve a month given as a number or name to the value to validate
///
/// Returns `None` for an unknown name
#[must_use]
pub fn resolve_month(month: NumberOrName<'_>) -> Option<i32> {
    match month {
        NumberOrName::Number(n) => Some(n as i32),
        NumberOrName::Name(name) => month_from_name(name).map(i32::from),
    }
}

// Control bits

/// Hour mode selected by a control 1 value
#[must_use]
pub const fn hour_mode(ctrl1: u8) -> HourMode {
    if ctrl1 & CTRL1_12_24 == 0 {
        HourMode::TwentyFourHour
    } else {
        HourMode::TwelveHour
    }
}

/// Control 1 with the hour mode bit set for `mode`, other bits untouched
#[must_use]
pub const fn with_hour_mode(ctrl1: u8, mode: HourMode) -> u8 {
    match mode {
        HourMode::TwentyFourHour => ctrl1 & !CTRL1_12_24,
        HourMode::TwelveHour => ctrl1 | CTRL1_12_24,
    }
}

/// Control 3 with switch-over enabled or disabled
///
/// The switch-over flag (bit 3) is cleared either way. Enabling clears the power management bits
/// (standard switch-over, battery low detection on); disabling sets all three.
#[must_use]
pub const fn with_battery_switch_over(ctrl3: u8, enabled: bool) -> u8 {
    let ctrl3 = ctrl3 & !CTRL3_BSF;
    if enabled {
        ctrl3 & !CTRL3_PM
    } else {
        ctrl3 | CTRL3_PM
    }
}

/// Control 3 with the battery low interrupt enabled or disabled
#[must_use]
pub const fn with_low_battery_interrupt(ctrl3: u8, enabled: bool) -> u8 {
    if enabled {
        ctrl3 | CTRL3_BLIE
    } else {
        ctrl3 & !CTRL3_BLIE
    }
}

/// Whether a control 3 value reports a low battery
#[must_use]
pub const fn battery_low(ctrl3: u8) -> bool {
    ctrl3 & CTRL3_BLF != 0
}

/// Snapshot of the three control registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlState {
    /// Raw control 1
    pub control1: u8,
    /// Raw control 2
    pub control2: u8,
    /// Raw control 3
    pub control3: u8,
}

impl ControlState {
    /// Hour register layout in use
    #[must_use]
    pub const fn hour_mode(&self) -> HourMode {
        hour_mode(self.control1)
    }

    /// Whether battery switch-over is on (power management bits all clear)
    #[must_use]
    pub const fn battery_switch_over(&self) -> bool {
        self.control3 & CTRL3_PM == 0
    }

    /// Whether a switch-over to battery has been flagged since last cleared
    #[must_use]
    pub const fn switched_over(&self) -> bool {
        self.control3 & CTRL3_BSF != 0
    }

    /// Whether the battery low interrupt is enabled
    #[must_use]
    pub const fn low_battery_interrupt(&self) -> bool {
        self.control3 & CTRL3_BLIE != 0
    }

    /// Whether the battery is reported low
    #[must_use]
    pub const fn battery_low(&self) -> bool {
        battery_low(self.control3)
    }
}

const fn encode_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

const fn decode_bcd8b(byte: u8) -> u8 {
    let ones = byte & 0b0000_1111;
    let tens = (byte & 0b1111_0000) >> 4;
    ones + tens * 10
}

const fn decode_bcd7b(byte: u8) -> u8 {
    let ones = byte & 0b0000_1111;
    let tens = (byte & 0b0111_0000) >> 4;
    ones + tens * 10
}

const fn decode_bcd6b(byte: u8) -> u8 {
    let ones = byte & 0b0000_1111;
    let tens = (byte & 0b0011_0000) >> 4;
    ones + tens * 10
}

const fn decode_bcd5b(byte: u8) -> u8 {
    let ones = byte & 0b0000_1111;
    let tens = (byte & 0b0001_0000) >> 4;
    ones + tens * 10
}
