//! PCF8523 RTC abstractions and API

use embedded_hal::i2c::{ErrorType, I2c};

use crate::{
    bus,
    codec::{self, ControlState, HourMode, NumberOrName},
    error::{Error, Field, RangeError},
    fmt::{debug, trace, warning},
    registers::{Register, ADDRESS},
    time::CalendarTime,
};

type I2cResult<I2C, T = ()> = Result<T, Error<<I2C as ErrorType>::Error>>;

/// Settings applied by [`PCF8523::init`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Scan the bus and fail with [`Error::DeviceNotFound`] if the chip does not answer
    pub presence_check: bool,
    /// Switch to the backup battery when main power drops
    pub battery_switch_over: bool,
    /// Raise an interrupt when the backup battery runs low
    pub low_battery_interrupt: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            presence_check: true,
            battery_switch_over: true,
            low_battery_interrupt: false,
        }
    }
}

/// PCF8523 real-time clock module; interfaced via I2C
///
/// No chip state is cached: every getter reads the bus and every setter writes it. Control bits
/// are changed with a read-modify-write of their register, which is not atomic; if the write fails
/// the register holds whatever the bus left there.
#[must_use]
pub struct PCF8523<I2C> {
    i2c: I2C,
}

// Specialized methods
impl<I2C> PCF8523<I2C>
where
    I2C: I2c,
{
    /// Connect to the PCF8523 by taking ownership of the I2C bus
    ///
    /// No bus traffic happens until the first call
    pub const fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Disconnect to release the I2C bus
    #[must_use]
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Bring the chip into a known configuration
    ///
    /// Forces 24-hour mode, applies the battery settings of `config`, then writes `datetime` if
    /// one is given. `datetime` is validated before the bus is touched.
    ///
    /// # Errors
    /// - [`Error::Range`] if `datetime` holds an out-of-range field
    /// - [`Error::DeviceNotFound`] if the presence check is enabled and the chip does not answer;
    ///   no further bus traffic happens in that case
    /// - [`Error::Transport`] if something goes wrong on the I2C bus
    pub fn init(&mut self, config: &Config, datetime: Option<CalendarTime>) -> I2cResult<I2C> {
        if let Some(datetime) = &datetime {
            datetime.validate()?;
        }

        if config.presence_check && !self.is_present() {
            warning!("PCF8523 not detected at {:#x}", ADDRESS);
            return Err(Error::DeviceNotFound);
        }

        self.set_hour_mode(HourMode::TwentyFourHour)?;
        self.set_battery_switch_over(config.battery_switch_over)?;
        self.set_low_battery_interrupt(config.low_battery_interrupt)?;
        debug!(
            "PCF8523 configured: switch-over {}, battery low interrupt {}",
            config.battery_switch_over,
            config.low_battery_interrupt
        );

        if let Some(datetime) = datetime {
            self.set_time(datetime)?;
        }

        Ok(())
    }

    /// Whether the chip acknowledges its address
    ///
    /// Scans the whole bus, so every other device sees a probe as well
    pub fn is_present(&mut self) -> bool {
        bus::scan(&mut self.i2c).contains(ADDRESS)
    }

    fn read_register(&mut self, register: Register) -> I2cResult<I2C, u8> {
        let mut buf = [0u8];
        self.i2c
            .write_read(ADDRESS, &[register.addr()], &mut buf)
            .map_err(Error::Transport)?;
        trace!("PCF8523 read {:?}: {:#x}", register, buf[0]);
        Ok(buf[0])
    }

    fn write_register(&mut self, register: Register, value: u8) -> I2cResult<I2C> {
        trace!("PCF8523 write {:?}: {:#x}", register, value);
        self.i2c
            .write(ADDRESS, &[register.addr(), value])
            .map_err(Error::Transport)
    }

    fn update_register<F>(&mut self, register: Register, f: F) -> I2cResult<I2C>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read_register(register)?;
        self.write_register(register, f(value))
    }
}

// Control bits
impl<I2C> PCF8523<I2C>
where
    I2C: I2c,
{
    /// Enable or disable switching to the backup battery
    ///
    /// Also clears the switch-over flag. Only bits 3 and 5-7 of control 3 change.
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn set_battery_switch_over(&mut self, enabled: bool) -> I2cResult<I2C> {
        self.update_register(Register::Control3, |ctrl3| {
            codec::with_battery_switch_over(ctrl3, enabled)
        })
    }

    /// Enable or disable the battery low interrupt
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn set_low_battery_interrupt(&mut self, enabled: bool) -> I2cResult<I2C> {
        self.update_register(Register::Control3, |ctrl3| {
            codec::with_low_battery_interrupt(ctrl3, enabled)
        })
    }

    /// Whether the chip reports its backup battery as low
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn battery_is_low(&mut self) -> I2cResult<I2C, bool> {
        self.read_register(Register::Control3).map(codec::battery_low)
    }

    /// Layout currently used by the hours register
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn hour_mode(&mut self) -> I2cResult<I2C, HourMode> {
        self.read_register(Register::Control1).map(codec::hour_mode)
    }

    /// Switch the hours register layout
    ///
    /// The stored hour is not converted; rewrite it afterwards. [`PCF8523::init`] always selects
    /// 24-hour mode.
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn set_hour_mode(&mut self, mode: HourMode) -> I2cResult<I2C> {
        debug!("PCF8523 hour mode: {:?}", mode);
        self.update_register(Register::Control1, |ctrl1| codec::with_hour_mode(ctrl1, mode))
    }

    /// Read all three control registers
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn control_state(&mut self) -> I2cResult<I2C, ControlState> {
        Ok(ControlState {
            control1: self.read_register(Register::Control1)?,
            control2: self.read_register(Register::Control2)?,
            control3: self.read_register(Register::Control3)?,
        })
    }
}

// Time getters
impl<I2C> PCF8523<I2C>
where
    I2C: I2c,
{
    /// Get complete date and time reading
    ///
    /// Fields are read one register at a time, from year down to second. The trailing subsecond
    /// and offset fields are always 0.
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    #[doc(alias = "now")]
    pub fn get_time(&mut self) -> I2cResult<I2C, CalendarTime> {
        Ok(CalendarTime::new(
            self.get_year()?,
            self.get_month()?,
            self.get_day()?,
            self.get_hour()?,
            self.get_minute()?,
            self.get_second()?,
        ))
    }

    /// Get seconds
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_second(&mut self) -> I2cResult<I2C, u8> {
        self.read_register(Register::Second).map(codec::decode_second)
    }

    /// Get minutes
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_minute(&mut self) -> I2cResult<I2C, u8> {
        self.read_register(Register::Minute).map(codec::decode_minute)
    }

    /// Get hours as 0-23, decoded according to the current hour mode
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_hour(&mut self) -> I2cResult<I2C, u8> {
        let hour = self.read_register(Register::Hour)?;
        let mode = self.hour_mode()?;
        Ok(codec::decode_hour(hour, mode))
    }

    /// Get day of the month
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_day(&mut self) -> I2cResult<I2C, u8> {
        self.read_register(Register::Day).map(codec::decode_day)
    }

    /// Get day of the week, 0 = Sunday
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_weekday(&mut self) -> I2cResult<I2C, u8> {
        self.read_register(Register::Weekday).map(codec::decode_weekday)
    }

    /// Get day of the week as a three-letter name such as `"WED"`
    ///
    /// # Errors
    /// - [`Error::Range`] if the register holds 7
    /// - [`Error::Transport`] if something goes wrong on the I2C bus
    pub fn get_weekday_name(&mut self) -> I2cResult<I2C, &'static str> {
        let weekday = self.get_weekday()?;
        codec::weekday_name(weekday)
            .ok_or_else(|| stored_out_of_range(Field::Weekday, weekday, 0, 6))
    }

    /// Get month, 1 = January
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_month(&mut self) -> I2cResult<I2C, u8> {
        self.read_register(Register::Month).map(codec::decode_month)
    }

    /// Get month as a three-letter name such as `"OCT"`
    ///
    /// # Errors
    /// - [`Error::Range`] if the register does not hold a month
    /// - [`Error::Transport`] if something goes wrong on the I2C bus
    pub fn get_month_name(&mut self) -> I2cResult<I2C, &'static str> {
        let month = self.get_month()?;
        codec::month_name(month).ok_or_else(|| stored_out_of_range(Field::Month, month, 1, 12))
    }

    /// Get year, 1970-2129
    ///
    /// # Errors
    /// Returns an error if something goes wrong on the I2C bus
    pub fn get_year(&mut self) -> I2cResult<I2C, u16> {
        self.read_register(Register::Year).map(codec::decode_year)
    }
}

// Time setters
impl<I2C> PCF8523<I2C>
where
    I2C: I2c,
{
    /// Set complete date and time
    ///
    /// Accepts a [`CalendarTime`] or a tuple of at least year, month and day; a missing hour,
    /// minute or second is written as 0. Every field is validated before the first write, then
    /// year, month, day, hour, minute and second are written in that order.
    ///
    /// # Errors
    /// - [`Error::Range`] if any field is out of range
    /// - [`Error::Transport`] if something goes wrong on the I2C bus
    pub fn set_time<T>(&mut self, time: T) -> I2cResult<I2C>
    where
        T: Into<CalendarTime>,
    {
        let time = time.into();
        time.validate()?;

        self.set_year(time.year)?;
        self.set_month(time.month)?;
        self.set_day(time.day)?;
        self.set_hour(time.hour)?;
        self.set_minute(time.minute)?;
        self.set_second(time.second)?;
        debug!("PCF8523 time set");
        Ok(())
    }

    /// Set seconds
    ///
    /// # Errors
    /// - [`Error::Range`] if `second` is over 59
    /// - [`Error::Transport`] if something goes wrong on the I2C bus
    pub fn set_second(&mut self, second: u8) -> I2cResult<I2C> {
        let byte = codec::encode_second(second.into())?;
        self.write_register(Register::Second, byte)
    }

    /// Set minutes
    ///
    /// # Errors
    /// - [`Error::Range`] if `minute` is over 59
    /// - [`Error::Transport`] if something goes wrong on the I2C bus
    pub fn set_minute(&mut self, minute: u8) -> I2cResult<I2C> {
        let byte = codec::encode_minute(minute.into())?;
        self.write_register(Register::Minute, byte)
    }

    /// Set hours from a 0-23 value, encoded for the current hour mode
    ///
    /// # Errors
    /// - [`Error::Range`] if `hour` is over 23
    /// - [`Error::Transport`] if something goes wrong on the I2C bus
    pub fn set_hour(&mut self, hour: u8) -> I2cResult<I2C> {
        // validated before the mode read
        codec::encode_hour(hour.into(), HourMode::TwentyFourHour)?;
        let mode = self.hour_mode()?;
        let byte = codec::encode_hour(hour.into(), mode)?;
        self.write_register(Register::Hour, byte)
    }

    /// Set day of the month
    ///
    /// # Errors
    /// - [`Error::Range`] if `day` is outside 1-30
    /// - [`Error::Transport`] if something goes wrong on the I2C bus
    pub fn set_day(&mut self, day: u8) -> I2cResult<I2C> {
        let byte = codec::encode_day(day.into())?;
        self.write_register(Register::Day, byte)
    }

    /// Set day of the week from 0-6 (0 = Sunday) or a name such as `"WED"`
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] if the name is not one of [`codec::WEEKDAY_NAMES`]
    /// - [`Error::Range`] if the number is over 6
    /// - [`Error::Transport`] if something goes wrong on the I2C bus
    pub fn set_weekday<'a, W>(&mut self, weekday: W) -> I2cResult<I2C>
    where
        W: Into<NumberOrName<'a>>,
    {
        let weekday = codec::resolve_weekday(weekday.into())
            .ok_or(Error::InvalidArgument(Field::Weekday))?;
        let byte = codec::encode_weekday(weekday)?;
        self.write_register(Register::Weekday, byte)
    }

    /// Set month from 1-12 or a name such as `"OCT"`
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] if the name is not one of [`codec::MONTH_NAMES`]
    /// - [`Error::Range`] if the number is outside 1-12
    /// - [`Error::Transport`] if something goes wrong on the I2C bus
    pub fn set_month<'a, M>(&mut self, month: M) -> I2cResult<I2C>
    where
        M: Into<NumberOrName<'a>>,
    {
        let month =
            codec::resolve_month(month.into()).ok_or(Error::InvalidArgument(Field::Month))?;
        let byte = codec::encode_month(month)?;
        self.write_register(Register::Month, byte)
    }

    /// Set year
    ///
    /// # Errors
    /// - [`Error::Range`] if `year` is outside 1970-2119
    /// - [`Error::Transport`] if something goes wrong on the I2C bus
    pub fn set_year(&mut self, year: u16) -> I2cResult<I2C> {
        let byte = codec::encode_year(year.into())?;
        self.write_register(Register::Year, byte)
    }
}

/// A register decoded to a value with no name, e.g. weekday 7 from a corrupted chip
fn stored_out_of_range<E>(field: Field, value: u8, min: i32, max: i32) -> Error<E> {
    Error::Range(RangeError {
        field,
        value: value.into(),
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::{vec, vec::Vec};

    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    use crate::bus::tests::scan_expectations;

    fn read(register: Register, value: u8) -> I2cTrans {
        I2cTrans::write_read(ADDRESS, vec![register.addr()], vec![value])
    }

    fn write(register: Register, value: u8) -> I2cTrans {
        I2cTrans::write(ADDRESS, vec![register.addr(), value])
    }

    fn setup_mock(expectations: &[I2cTrans]) -> PCF8523<I2cMock> {
        PCF8523::new(I2cMock::new(expectations))
    }

    fn finish(dev: PCF8523<I2cMock>) {
        dev.release().done();
    }

    #[test]
    fn new_device_is_silent() {
        finish(setup_mock(&[]));
    }

    #[test]
    fn init_forces_24_hour_mode() {
        let mut expectations = scan_expectations(&[ADDRESS]);
        expectations.extend([
            read(Register::Control1, 0b0000_1010),
            write(Register::Control1, 0b0000_0010),
            read(Register::Control3, 0b1110_1000),
            write(Register::Control3, 0b0000_0000),
            read(Register::Control3, 0b0000_0001),
            write(Register::Control3, 0b0000_0000),
        ]);
        let mut dev = setup_mock(&expectations);

        dev.init(&Config::default(), None).unwrap();
        finish(dev);
    }

    #[test]
    fn init_without_device_stops_after_scan() {
        let expectations = scan_expectations(&[0x3c]);
        assert_eq!(expectations.len(), 0x70, "one empty write per address, 0x08..=0x77");
        let mut dev = setup_mock(&expectations);

        assert_eq!(
            dev.init(&Config::default(), None),
            Err(Error::DeviceNotFound),
            "missing chip"
        );
        finish(dev);
    }

    #[test]
    fn init_can_skip_presence_check_and_write_time() {
        let config = Config {
            presence_check: false,
            battery_switch_over: false,
            low_battery_interrupt: true,
        };
        let mut dev = setup_mock(&[
            read(Register::Control1, 0b0000_1000),
            write(Register::Control1, 0b0000_0000),
            read(Register::Control3, 0b0000_0100),
            write(Register::Control3, 0b1110_0100),
            read(Register::Control3, 0b1110_0100),
            write(Register::Control3, 0b1110_0101),
            write(Register::Year, 0x45),
            write(Register::Month, 0x10),
            write(Register::Day, 0x21),
            read(Register::Control1, 0b0000_0000),
            write(Register::Hour, 0x16),
            write(Register::Minute, 0x29),
            write(Register::Second, 0x00),
        ]);

        dev.init(&config, Some((2015, 10, 21, 16, 29, 0).into())).unwrap();
        finish(dev);
    }

    #[test]
    fn init_rejects_bad_datetime_before_bus_access() {
        let mut dev = setup_mock(&[]);

        let result = dev.init(&Config::default(), Some((2015, 13, 21).into()));
        assert!(
            matches!(result, Err(Error::Range(RangeError { field: Field::Month, value: 13, .. }))),
            "month 13 rejected: {result:?}"
        );
        finish(dev);
    }

    #[test]
    fn switch_over_keeps_low_bits() {
        let mut dev = setup_mock(&[
            read(Register::Control3, 0b1111_1111),
            write(Register::Control3, 0b0001_0111),
            read(Register::Control3, 0b0000_0101),
            write(Register::Control3, 0b1110_0101),
        ]);

        dev.set_battery_switch_over(true).unwrap();
        dev.set_battery_switch_over(false).unwrap();
        finish(dev);
    }

    #[test]
    fn battery_low_is_bit_2() {
        let mut dev = setup_mock(&[
            read(Register::Control3, 0b1111_1011),
            read(Register::Control3, 0b0000_0100),
        ]);

        assert!(!dev.battery_is_low().unwrap(), "bit 2 clear");
        assert!(dev.battery_is_low().unwrap(), "bit 2 set");
        finish(dev);
    }

    #[test]
    fn control_state_reads_all_three() {
        let mut dev = setup_mock(&[
            read(Register::Control1, 0x08),
            read(Register::Control2, 0x00),
            read(Register::Control3, 0x05),
        ]);

        let state = dev.control_state().unwrap();
        assert_eq!(state.hour_mode(), HourMode::TwelveHour, "12h bit");
        assert!(state.low_battery_interrupt(), "interrupt enabled");
        assert!(state.battery_low(), "battery low");
        finish(dev);
    }

    #[test]
    fn year_is_written_as_offset_bcd() {
        let mut dev = setup_mock(&[write(Register::Year, 0b0100_1001)]);

        dev.set_year(2019).unwrap();
        finish(dev);
    }

    #[test]
    fn hour_follows_current_mode() {
        let mut dev = setup_mock(&[
            read(Register::Control1, 0b0000_1000),
            write(Register::Hour, 0b0010_0001),
            read(Register::Hour, 0b0011_0001),
            read(Register::Control1, 0b0000_1000),
            read(Register::Control1, 0b0000_0000),
            write(Register::Hour, 0x13),
        ]);

        dev.set_hour(13).unwrap();
        assert_eq!(dev.get_hour().unwrap(), 23, "11 PM");
        dev.set_hour(13).unwrap();
        finish(dev);
    }

    #[test]
    fn rejected_values_never_reach_the_bus() {
        let mut dev = setup_mock(&[]);

        assert!(matches!(dev.set_hour(24), Err(Error::Range(_))), "hour 24");
        assert!(matches!(dev.set_second(60), Err(Error::Range(_))), "second 60");
        assert!(matches!(dev.set_minute(60), Err(Error::Range(_))), "minute 60");
        assert!(matches!(dev.set_day(31), Err(Error::Range(_))), "day 31");
        assert!(matches!(dev.set_year(2120), Err(Error::Range(_))), "year 2120");
        assert!(matches!(dev.set_month(0), Err(Error::Range(_))), "month 0");
        assert!(matches!(dev.set_weekday(7), Err(Error::Range(_))), "weekday 7");
        assert_eq!(
            dev.set_weekday("WEDNESDAY"),
            Err(Error::InvalidArgument(Field::Weekday)),
            "unknown weekday name"
        );
        assert_eq!(
            dev.set_month("Oct"),
            Err(Error::InvalidArgument(Field::Month)),
            "month names are upper-case"
        );
        assert!(
            matches!(dev.set_time((2015, 10, 21, 16, 29, 60)), Err(Error::Range(_))),
            "second 60 in a full time"
        );
        finish(dev);
    }

    #[test]
    fn weekday_and_month_by_name() {
        let mut dev = setup_mock(&[
            write(Register::Weekday, 3),
            read(Register::Weekday, 3),
            write(Register::Month, 0x10),
            read(Register::Month, 0x10),
            read(Register::Weekday, 0b1111_1111),
        ]);

        dev.set_weekday("WED").unwrap();
        assert_eq!(dev.get_weekday_name().unwrap(), "WED", "weekday name");
        dev.set_month("OCT").unwrap();
        assert_eq!(dev.get_month_name().unwrap(), "OCT", "month name");
        assert!(
            matches!(dev.get_weekday_name(), Err(Error::Range(RangeError { value: 7, .. }))),
            "no name for weekday 7"
        );
        finish(dev);
    }

    #[test]
    fn get_time_reads_year_first() {
        let mut dev = setup_mock(&[
            read(Register::Year, 0x45),
            read(Register::Month, 0x10),
            read(Register::Day, 0x21),
            read(Register::Hour, 0x16),
            read(Register::Control1, 0x00),
            read(Register::Minute, 0x29),
            read(Register::Second, 0x80),
        ]);

        assert_eq!(
            dev.get_time().unwrap().as_tuple(),
            (2015, 10, 21, 16, 29, 0, 0, 0),
            "assembled time"
        );
        finish(dev);
    }

    #[test]
    fn partial_time_zeroes_time_of_day() {
        let mut dev = setup_mock(&[
            write(Register::Year, 0x45),
            write(Register::Month, 0x10),
            write(Register::Day, 0x21),
            read(Register::Control1, 0x00),
            write(Register::Hour, 0x00),
            write(Register::Minute, 0x00),
            write(Register::Second, 0x00),
        ]);

        dev.set_time((2015, 10, 21)).unwrap();
        finish(dev);
    }

    #[test]
    fn transport_errors_propagate_without_retry() {
        let mut dev = setup_mock(&[
            read(Register::Control3, 0).with_error(ErrorKind::Other),
            write(Register::Second, 0x42).with_error(ErrorKind::ArbitrationLoss),
        ]);

        assert_eq!(
            dev.set_low_battery_interrupt(true),
            Err(Error::Transport(ErrorKind::Other)),
            "read failure stops the update"
        );
        assert_eq!(
            dev.set_second(42),
            Err(Error::Transport(ErrorKind::ArbitrationLoss)),
            "write failure surfaces"
        );
        finish(dev);
    }
}
