//! Error types shared by the codec and the driver

use core::fmt;

/// Calendar field handled by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[expect(missing_docs, reason = "self-explanatory variants")]
pub enum Field {
    Second,
    Minute,
    Hour,
    Day,
    Weekday,
    Month,
    Year,
}

impl Field {
    /// Lower-case name of the field
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Weekday => "weekday",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// A field value fell outside of what the register accepts
///
/// `min` and `max` are both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangeError {
    /// Field being encoded
    pub field: Field,
    /// Rejected value
    pub value: i32,
    /// Smallest accepted value
    pub min: i32,
    /// Largest accepted value
    pub max: i32,
}

impl RangeError {
    /// Check `value` against the inclusive bounds `[min, max]`
    ///
    /// # Errors
    /// Returns a [`RangeError`] describing the violation if `value` is out of bounds
    pub const fn check(field: Field, value: i32, min: i32, max: i32) -> Result<(), Self> {
        if value >= min && value <= max {
            Ok(())
        } else {
            Err(Self {
                field,
                value,
                min,
                max,
            })
        }
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} value must be in range [{}..{}] but is {}",
            self.field.name(),
            self.min,
            self.max,
            self.value
        )
    }
}

impl ufmt::uDisplay for RangeError {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        ufmt::uwrite!(
            f,
            "{} value must be in range [{}..{}] but is {}",
            self.field.name(),
            self.min,
            self.max,
            self.value
        )
    }
}

impl core::error::Error for RangeError {}

/// Errors returned by the [`PCF8523`](crate::PCF8523) driver
///
/// `E` is the error type of the underlying I2C bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Nothing answered at the PCF8523 address during the presence check
    DeviceNotFound,
    /// A field value was rejected before touching the bus
    Range(RangeError),
    /// A weekday or month name outside of the fixed vocabulary
    InvalidArgument(Field),
    /// The bus reported a failure; passed through untouched
    Transport(E),
}

impl<E> From<RangeError> for Error<E> {
    fn from(e: RangeError) -> Self {
        Self::Range(e)
    }
}

impl<E> fmt::Display for Error<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotFound => f.write_str("PCF8523 module is not detected on the I2C bus"),
            Self::Range(e) => fmt::Display::fmt(e, f),
            Self::InvalidArgument(field) => write!(f, "unrecognized {} name", field.name()),
            Self::Transport(e) => write!(f, "I2C transport error: {e:?}"),
        }
    }
}

impl<E> ufmt::uDisplay for Error<E> {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        match self {
            Self::DeviceNotFound => f.write_str("PCF8523 module is not detected on the I2C bus"),
            Self::Range(e) => ufmt::uDisplay::fmt(e, f),
            Self::InvalidArgument(field) => ufmt::uwrite!(f, "unrecognized {} name", field.name()),
            Self::Transport(_) => f.write_str("I2C transport error"),
        }
    }
}

impl<E> core::error::Error for Error<E> where E: fmt::Debug {}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::string::{String, ToString};

    struct Buf(String);

    impl ufmt::uWrite for Buf {
        type Error = core::convert::Infallible;

        fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
            self.0.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn range_check_bounds_are_inclusive() {
        assert_eq!(RangeError::check(Field::Minute, 0, 0, 59), Ok(()), "lower bound");
        assert_eq!(RangeError::check(Field::Minute, 59, 0, 59), Ok(()), "upper bound");
        assert_eq!(
            RangeError::check(Field::Minute, 60, 0, 59),
            Err(RangeError {
                field: Field::Minute,
                value: 60,
                min: 0,
                max: 59
            }),
            "one past the upper bound"
        );
    }

    #[test]
    fn messages_name_field_value_and_bounds() {
        let e = RangeError {
            field: Field::Year,
            value: 1969,
            min: 1970,
            max: 2119,
        };
        let expected = "year value must be in range [1970..2119] but is 1969";
        assert_eq!(e.to_string(), expected, "core::fmt rendering");

        let mut buf = Buf(String::new());
        ufmt::uwrite!(buf, "{}", Error::<()>::Range(e)).unwrap();
        assert_eq!(buf.0, expected, "ufmt rendering");
    }

    #[test]
    fn transport_error_keeps_bus_error() {
        let e: Error<u8> = Error::Transport(7);
        assert_eq!(e.to_string(), "I2C transport error: 7", "bus error is shown via Debug");
        assert_eq!(
            Error::<u8>::InvalidArgument(Field::Month).to_string(),
            "unrecognized month name",
            "name errors mention the field"
        );
    }
}
