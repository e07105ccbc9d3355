//! Driver for the NXP PCF8523 real-time clock
//!
//! Translates between calendar values and the chip's BCD registers over any
//! [`embedded_hal::i2c::I2c`] bus, and manages the hour mode and battery control bits.
//!
//! ```no_run
//! # fn demo<I2C: embedded_hal::i2c::I2c>(i2c: I2C) -> Result<(), pcf8523::Error<I2C::Error>> {
//! use pcf8523::{Config, PCF8523};
//!
//! let mut rtc = PCF8523::new(i2c);
//! rtc.init(&Config::default(), Some((2015, 10, 21, 16, 29, 0).into()))?;
//! rtc.set_weekday("WED")?;
//!
//! let now = rtc.get_time()?;
//! let weekday = rtc.get_weekday_name()?;
//! # let _ = (now, weekday);
//! # Ok(())
//! # }
//! ```
#![no_std]

// macros must be declared before the modules using them
mod fmt;

pub mod bus;
pub mod codec;
pub mod error;
pub mod registers;
pub mod rtc;
pub mod time;

pub use crate::{
    codec::{ControlState, HourMode, NumberOrName},
    error::{Error, Field, RangeError},
    rtc::{Config, PCF8523},
    time::CalendarTime,
};
