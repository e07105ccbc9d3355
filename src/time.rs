//! Calendar date and time as exchanged with the driver

use core::fmt;

use crate::{
    codec::{self, HourMode},
    error::RangeError,
};

/// Date and time of day
///
/// Follows the common `(year, month, day, hour, minute, second, subsecond, offset)` layout so it
/// can be built from and turned back into such tuples. `subsecond` and `utc_offset` are carried
/// along for compatibility only; the PCF8523 has no register for them, so they are never written
/// and always read back as 0.
///
/// Values are not validated on construction. Out-of-range fields are rejected when written to
/// the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarTime {
    /// Full year, 1970-2119 when writing
    pub year: u16,
    /// Month, 1 = January
    pub month: u8,
    /// Day of the month
    pub day: u8,
    /// Hour, 0-23
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
    /// Second, 0-59
    pub second: u8,
    /// Ignored
    pub subsecond: u32,
    /// Ignored
    pub utc_offset: i32,
}

impl CalendarTime {
    /// Date at midnight
    #[must_use]
    pub const fn from_date(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Date and time of day
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            subsecond: 0,
            utc_offset: 0,
        }
    }

    /// Check every encoded field against the range the chip accepts
    ///
    /// # Errors
    /// Returns a [`RangeError`] for the first field out of range, checked from year down to second
    pub fn validate(&self) -> Result<(), RangeError> {
        codec::encode_year(self.year.into())?;
        codec::encode_month(self.month.into())?;
        codec::encode_day(self.day.into())?;
        codec::encode_hour(self.hour.into(), HourMode::TwentyFourHour)?;
        codec::encode_minute(self.minute.into())?;
        codec::encode_second(self.second.into())?;
        Ok(())
    }

    /// Returns the full 8-element tuple
    #[must_use]
    pub const fn as_tuple(&self) -> (u16, u8, u8, u8, u8, u8, u32, i32) {
        (
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.subsecond,
            self.utc_offset,
        )
    }
}

impl From<(u16, u8, u8)> for CalendarTime {
    fn from((year, month, day): (u16, u8, u8)) -> Self {
        Self::from_date(year, month, day)
    }
}

impl From<(u16, u8, u8, u8)> for CalendarTime {
    fn from((year, month, day, hour): (u16, u8, u8, u8)) -> Self {
        Self::new(year, month, day, hour, 0, 0)
    }
}

impl From<(u16, u8, u8, u8, u8)> for CalendarTime {
    fn from((year, month, day, hour, minute): (u16, u8, u8, u8, u8)) -> Self {
        Self::new(year, month, day, hour, minute, 0)
    }
}

impl From<(u16, u8, u8, u8, u8, u8)> for CalendarTime {
    fn from((year, month, day, hour, minute, second): (u16, u8, u8, u8, u8, u8)) -> Self {
        Self::new(year, month, day, hour, minute, second)
    }
}

impl From<(u16, u8, u8, u8, u8, u8, u32, i32)> for CalendarTime {
    fn from(
        (year, month, day, hour, minute, second, subsecond, utc_offset): (
            u16,
            u8,
            u8,
            u8,
            u8,
            u8,
            u32,
            i32,
        ),
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            subsecond,
            utc_offset,
        }
    }
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl ufmt::uDisplay for CalendarTime {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        // ufmt has no width specifiers
        if self.year >= 10_000 {
            ufmt::uDisplay::fmt(&(self.year / 10_000), f)?;
        }
        print_digits(f, self.year / 100)?;
        print_digits(f, self.year % 100)?;
        f.write_char('-')?;
        print_digits(f, self.month as u16)?;
        f.write_char('-')?;
        print_digits(f, self.day as u16)?;
        f.write_char(' ')?;
        print_digits(f, self.hour as u16)?;
        f.write_char(':')?;
        print_digits(f, self.minute as u16)?;
        f.write_char(':')?;
        print_digits(f, self.second as u16)
    }
}

/// Print the last two decimal digits of `value`, zero-padded
fn print_digits<W>(f: &mut ufmt::Formatter<'_, W>, value: u16) -> Result<(), W::Error>
where
    W: ufmt::uWrite + ?Sized,
{
    f.write_char(digit(value / 10 % 10))?;
    f.write_char(digit(value % 10))
}

const fn digit(value: u16) -> char {
    (b'0' + value as u8) as char
}
