//! # DS3231 Real-Time Clock Driver
//!
//! A platform-agnostic `no_std` driver for the DS3231 real-time clock, built
//! on the `embedded-hal` I2C traits.
//!
//! ## Features
//!
//! - Time get/set with the device's 2-digit year and century flag
//!   (1900-2099)
//! - Alarm 1 / Alarm 2 configuration through a closed set of match modes
//! - Alarm interrupt enable and read-and-clear of the alarm fired flags
//! - Square wave output selection
//! - Oscillator stop flag
//! - 56 bytes of battery-backed scratch memory
//! - Temperature in 0.25°C steps
//! - Optional async support (feature `async`)
//! - Optional logging through `log` or `defmt` (features `log` / `defmt`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ds3231_rtc::{AlarmType, Alarm, DS3231, SquareWaveFrequency, Timestamp};
//!
//! let mut rtc = DS3231::new(i2c);
//!
//! rtc.set_time(&Timestamp {
//!     year: 2024,
//!     month: 3,
//!     day: 14,
//!     hour: 15,
//!     minute: 30,
//!     second: 0,
//!     day_of_week: 4,
//! })?;
//! let now = rtc.time()?;
//!
//! // Daily alarm at 06:30:00
//! rtc.set_alarm(AlarmType::Alarm1MatchHours, 30, 6, 0)?;
//! rtc.set_square_wave(SquareWaveFrequency::Off)?;
//! rtc.set_alarm_interrupt(Alarm::Alarm1, true)?;
//!
//! if rtc.alarm_fired(Alarm::Alarm1)? {
//!     // handle alarm
//! }
//! let celsius = rtc.temperature()?;
//! ```
//!
//! ## Bus access
//!
//! The driver takes the I2C bus by value. Pass `&mut i2c` to keep ownership
//! of the bus, or call [`DS3231::release`] to get it back. Every
//! read-modify-write operation needs `&mut self`, which is what keeps other
//! users of the same device from interleaving with it.

#![no_std]

// Logging shim: `defmt` wins over `log`; with neither enabled the arguments
// are still type checked but nothing is emitted.
cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        macro_rules! debug {
            ($($arg:tt)+) => { defmt::debug!($($arg)+) };
        }
        macro_rules! error {
            ($($arg:tt)+) => { defmt::error!($($arg)+) };
        }
    } else if #[cfg(feature = "log")] {
        macro_rules! debug {
            ($($arg:tt)+) => { log::debug!($($arg)+) };
        }
        macro_rules! error {
            ($($arg:tt)+) => { log::error!($($arg)+) };
        }
    } else {
        macro_rules! debug {
            ($($arg:tt)+) => {{ let _ = format_args!($($arg)+); }};
        }
        macro_rules! error {
            ($($arg:tt)+) => {{ let _ = format_args!($($arg)+); }};
        }
    }
}

pub mod alarm;
#[cfg(feature = "async")]
pub mod asynch;
pub mod bcd;
pub mod control;
pub mod datetime;
pub mod registers;
pub mod temperature;

use chrono::NaiveDateTime;
use embedded_hal::i2c::I2c;
use paste::paste;

pub use crate::alarm::{Alarm, AlarmType, DS3231Alarm};
pub use crate::control::SquareWaveFrequency;
pub use crate::datetime::{DS3231DateTimeError, Timestamp};
pub use crate::registers::{
    AlarmDayDate, AlarmHours, AlarmMinutes, AlarmSeconds, Control, DayDateSelect,
    InterruptControl, Month, RegAddr, Status, Temperature, TemperatureFraction, BUS_FREQUENCY_HZ,
    DEVICE_ADDRESS, SRAM_ADDRESS, SRAM_SIZE,
};

/// Errors reported by the driver.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DS3231Error<I2CE> {
    /// The bus transaction failed
    I2c(I2CE),
    /// A caller supplied argument was rejected before any bus traffic
    InvalidArgument(&'static str),
    /// The device time is not a valid calendar date/time
    DateTime(DS3231DateTimeError),
}

impl<I2CE> From<I2CE> for DS3231Error<I2CE> {
    fn from(e: I2CE) -> Self {
        DS3231Error::I2c(e)
    }
}

/// Checks a scratch memory payload and builds the write buffer
/// (start address followed by the data).
pub(crate) fn sram_write_buffer(data: &[u8]) -> Result<[u8; SRAM_SIZE + 1], &'static str> {
    if data.len() != SRAM_SIZE {
        error!("scratch memory write of {} bytes rejected", data.len());
        return Err("scratch memory data must be exactly 56 bytes");
    }
    let mut buffer = [0; SRAM_SIZE + 1];
    buffer[0] = SRAM_ADDRESS;
    buffer[1..].copy_from_slice(data);
    Ok(buffer)
}

/// DS3231 Real-Time Clock driver.
///
/// Holds only the bus and the device address; every operation reads or
/// writes the device registers directly.
pub struct DS3231<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> DS3231<I2C> {
    /// Creates a driver for the device at [`DEVICE_ADDRESS`].
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEVICE_ADDRESS,
        }
    }

    /// Releases the I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_region<const N: usize>(
        &mut self,
        address: u8,
    ) -> Result<[u8; N], DS3231Error<I2C::Error>> {
        let mut data = [0; N];
        self.i2c.write_read(self.address, &[address], &mut data)?;
        Ok(data)
    }

    /// Reads the current time.
    pub fn time(&mut self) -> Result<Timestamp, DS3231Error<I2C::Error>> {
        let data = self.read_region::<7>(RegAddr::Seconds as u8)?;
        Ok(Timestamp::from_registers(data))
    }

    /// Sets the current time in one 7-register write.
    pub fn set_time(&mut self, timestamp: &Timestamp) -> Result<(), DS3231Error<I2C::Error>> {
        let data = timestamp.to_registers();
        let mut buffer = [0; 8];
        buffer[0] = RegAddr::Seconds as u8;
        buffer[1..].copy_from_slice(&data);
        self.i2c.write(self.address, &buffer)?;
        Ok(())
    }

    /// Reads the current time as a chrono date/time.
    ///
    /// # Errors
    /// [`DS3231Error::DateTime`] when the registers do not hold a valid date.
    pub fn datetime(&mut self) -> Result<NaiveDateTime, DS3231Error<I2C::Error>> {
        self.time()?.to_datetime().map_err(DS3231Error::DateTime)
    }

    /// Sets the current time from a chrono date/time.
    pub fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let timestamp = Timestamp::try_from(datetime).map_err(DS3231Error::DateTime)?;
        self.set_time(&timestamp)
    }

    /// Selects the INT/SQW pin square wave output.
    pub fn set_square_wave(
        &mut self,
        frequency: SquareWaveFrequency,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let current = self.control()?;
        let updated = control::with_square_wave(current, frequency);
        debug!("square wave {:?}: control {:?} -> {:?}", frequency, current, updated);
        self.set_control(updated)
    }

    /// Sets an alarm with seconds fixed at 0.
    ///
    /// Only writes the alarm registers; use
    /// [`set_alarm_interrupt`](Self::set_alarm_interrupt) to have the alarm
    /// assert the INT pin.
    pub fn set_alarm(
        &mut self,
        alarm_type: AlarmType,
        minutes: u8,
        hours: u8,
        day_date: u8,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        self.set_alarm_with_seconds(alarm_type, 0, minutes, hours, day_date)
    }

    /// Sets an alarm. `seconds` is ignored for alarm 2 modes.
    ///
    /// The registers are written one at a time in ascending address order.
    /// A bus failure stops the sequence and leaves the earlier registers
    /// written.
    pub fn set_alarm_with_seconds(
        &mut self,
        alarm_type: AlarmType,
        seconds: u8,
        minutes: u8,
        hours: u8,
        day_date: u8,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let alarm = DS3231Alarm::new(alarm_type, seconds, minutes, hours, day_date);
        debug!("{:?}: {:?}", alarm_type, alarm);
        for write in alarm.register_writes() {
            if let Err(e) = self.i2c.write(self.address, &write) {
                error!("alarm register {} write failed", write[0]);
                return Err(DS3231Error::I2c(e));
            }
        }
        Ok(())
    }

    /// Enables or disables the INT pin assertion for `alarm`.
    pub fn set_alarm_interrupt(
        &mut self,
        alarm: Alarm,
        enabled: bool,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let current = self.control()?;
        self.set_control(control::with_alarm_interrupt(current, alarm, enabled))
    }

    /// Returns whether `alarm` has fired and clears its flag if so.
    ///
    /// The status register is read and written back as two transactions; a
    /// flag the device sets in between is lost.
    pub fn alarm_fired(&mut self, alarm: Alarm) -> Result<bool, DS3231Error<I2C::Error>> {
        let status = self.status()?;
        match control::acknowledge_alarm(status, alarm) {
            Some(cleared) => {
                debug!("{:?} fired, status {:?}", alarm, status);
                self.set_status(cleared)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns whether the oscillator is or was stopped. The flag is left
    /// as is.
    pub fn oscillator_stopped(&mut self) -> Result<bool, DS3231Error<I2C::Error>> {
        Ok(self.status()?.oscillator_stop_flag())
    }

    /// Reads the whole scratch memory.
    pub fn ram(&mut self) -> Result<[u8; SRAM_SIZE], DS3231Error<I2C::Error>> {
        self.read_region::<SRAM_SIZE>(SRAM_ADDRESS)
    }

    /// Writes the whole scratch memory.
    ///
    /// # Errors
    /// [`DS3231Error::InvalidArgument`] unless `data` is exactly
    /// [`SRAM_SIZE`] bytes long.
    pub fn set_ram(&mut self, data: &[u8]) -> Result<(), DS3231Error<I2C::Error>> {
        let buffer = sram_write_buffer(data).map_err(DS3231Error::InvalidArgument)?;
        self.i2c.write(self.address, &buffer)?;
        Ok(())
    }

    /// Reads the temperature in degrees Celsius.
    pub fn temperature(&mut self) -> Result<f32, DS3231Error<I2C::Error>> {
        let data = self.read_region::<2>(RegAddr::MSBTemp as u8)?;
        let celsius = temperature::decode(data);
        debug!("temperature registers {:?} -> {}", data, celsius);
        Ok(celsius)
    }
}

// Single register accessors
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ident)),+) => {
        impl<I2C: I2c> DS3231<I2C> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    pub fn $name(&mut self) -> Result<$typ, DS3231Error<I2C::Error>> {
                        let mut data = [0];
                        self.i2c
                            .write_read(self.address, &[$regaddr as u8], &mut data)?;
                        Ok($typ::from(data[0]))
                    }

                    #[doc = concat!("Writes the ", stringify!($name), " register.")]
                    pub fn [<set_ $name>](&mut self, value: $typ) -> Result<(), DS3231Error<I2C::Error>> {
                        self.i2c.write(self.address, &[$regaddr as u8, u8::from(value)])?;
                        Ok(())
                    }
                }
            )+
        }
    }
}

impl_register_access!(
    (control, RegAddr::Control, Control),
    (status, RegAddr::ControlStatus, Status)
);

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use chrono::{Datelike, NaiveDate, Timelike};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const DEVICE_ADDRESS: u8 = 0x68;

    fn setup_mock(expectations: &[I2cTrans]) -> I2cMock {
        I2cMock::new(expectations)
    }

    #[test]
    fn test_read_time() {
        // 2024-03-14 15:30:00, Thursday
        let mut dev = DS3231::new(setup_mock(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x00, 0x30, 0x15, 0x04, 0x14, 0x83, 0x24],
        )]));

        let ts = dev.time().unwrap();
        assert_eq!(
            ts,
            Timestamp {
                year: 2024,
                month: 3,
                day: 14,
                hour: 15,
                minute: 30,
                second: 0,
                day_of_week: 4,
            }
        );
        dev.i2c.done();
    }

    #[test]
    fn test_set_time() {
        let mut dev = DS3231::new(setup_mock(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![
                RegAddr::Seconds as u8,
                0x59, // seconds
                0x59, // minutes
                0x23, // hours
                0x05, // day of week
                0x31, // date
                0x12, // month, century clear
                0x99, // year
            ],
        )]));

        dev.set_time(&Timestamp {
            year: 1999,
            month: 12,
            day: 31,
            hour: 23,
            minute: 59,
            second: 59,
            day_of_week: 5,
        })
        .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_read_datetime() {
        let mut dev = DS3231::new(setup_mock(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x45, 0x30, 0x15, 0x04, 0x14, 0x83, 0x24],
        )]));

        let dt = dev.datetime().unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 3);
        assert_eq!(dt.day(), 14);
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.second(), 45);
        dev.i2c.done();
    }

    #[test]
    fn test_read_invalid_datetime() {
        // month register 0x00
        let mut dev = DS3231::new(setup_mock(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x00, 0x00, 0x00, 0x01, 0x01, 0x80, 0x24],
        )]));

        assert!(matches!(
            dev.datetime(),
            Err(DS3231Error::DateTime(DS3231DateTimeError::InvalidDateTime))
        ));
        dev.i2c.done();
    }

    #[test]
    fn test_set_datetime() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        let mut dev = DS3231::new(setup_mock(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![
                RegAddr::Seconds as u8,
                0x00,
                0x30,
                0x15,
                0x04,
                0x14,
                0x83,
                0x24,
            ],
        )]));

        dev.set_datetime(&dt).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_read_time_failure_is_propagated() {
        let mut dev = DS3231::new(setup_mock(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0; 7],
        )
        .with_error(ErrorKind::Other)]));

        assert!(matches!(dev.time(), Err(DS3231Error::I2c(ErrorKind::Other))));
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm1_match_hours() {
        let mut dev = DS3231::new(setup_mock(&[
            I2cTrans::write(DEVICE_ADDRESS, vec![0x07, 0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x08, 0x30]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x09, 0x14]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x0A, 0x80]),
        ]));

        dev.set_alarm(AlarmType::Alarm1MatchHours, 30, 14, 0).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm1_with_seconds() {
        let mut dev = DS3231::new(setup_mock(&[
            I2cTrans::write(DEVICE_ADDRESS, vec![0x07, 0x45]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x08, 0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x09, 0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x0A, 0x80]),
        ]));

        dev.set_alarm_with_seconds(AlarmType::Alarm1MatchSeconds, 45, 0, 0, 0)
            .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm2_match_day() {
        let mut dev = DS3231::new(setup_mock(&[
            I2cTrans::write(DEVICE_ADDRESS, vec![0x0B, 0x15]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x0C, 0x07]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x0D, 0x42]),
        ]));

        dev.set_alarm_with_seconds(AlarmType::Alarm2MatchDay, 30, 15, 7, 2)
            .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_stops_on_failure() {
        let mut dev = DS3231::new(setup_mock(&[
            I2cTrans::write(DEVICE_ADDRESS, vec![0x0B, 0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x0C, 0x88]).with_error(ErrorKind::Other),
        ]));

        let result = dev.set_alarm(AlarmType::Alarm2MatchMinutes, 0, 8, 0);
        assert!(matches!(result, Err(DS3231Error::I2c(ErrorKind::Other))));
        dev.i2c.done();
    }

    #[test]
    fn test_alarm_fired_reads_and_clears() {
        let mut dev = DS3231::new(setup_mock(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0b1000_1001],
            ),
            I2cTrans::write(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8, 0b1000_1000],
            ),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0b1000_1000],
            ),
        ]));

        assert!(dev.alarm_fired(Alarm::Alarm1).unwrap());
        assert!(!dev.alarm_fired(Alarm::Alarm1).unwrap());
        dev.i2c.done();
    }

    #[test]
    fn test_alarm2_fired() {
        let mut dev = DS3231::new(setup_mock(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0b0000_0001],
            ),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0b0000_0011],
            ),
            I2cTrans::write(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8, 0b0000_0001],
            ),
        ]));

        assert!(!dev.alarm_fired(Alarm::Alarm2).unwrap());
        assert!(dev.alarm_fired(Alarm::Alarm2).unwrap());
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_interrupt() {
        let mut dev = DS3231::new(setup_mock(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x1C]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x1E]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x1F]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x1E]),
        ]));

        dev.set_alarm_interrupt(Alarm::Alarm2, true).unwrap();
        dev.set_alarm_interrupt(Alarm::Alarm1, false).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_square_wave() {
        let mut dev = DS3231::new(setup_mock(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x1C]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x00]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x03]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x07]),
        ]));

        dev.set_square_wave(SquareWaveFrequency::Hz1).unwrap();
        dev.set_square_wave(SquareWaveFrequency::Off).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_oscillator_stopped() {
        let mut dev = DS3231::new(setup_mock(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x80],
            ),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x03],
            ),
        ]));

        assert!(dev.oscillator_stopped().unwrap());
        assert!(!dev.oscillator_stopped().unwrap());
        dev.i2c.done();
    }

    #[test]
    fn test_ram_round_trip() {
        let data: Vec<u8> = (0..SRAM_SIZE as u8).collect();
        let mut written = vec![SRAM_ADDRESS];
        written.extend_from_slice(&data);

        let mut dev = DS3231::new(setup_mock(&[
            I2cTrans::write(DEVICE_ADDRESS, written),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![SRAM_ADDRESS], data.clone()),
        ]));

        dev.set_ram(&data).unwrap();
        assert_eq!(dev.ram().unwrap().as_slice(), data.as_slice());
        dev.i2c.done();
    }

    #[test]
    fn test_set_ram_rejects_wrong_length() {
        let mut dev = DS3231::new(setup_mock(&[]));

        for len in [0, SRAM_SIZE - 1, SRAM_SIZE + 1] {
            let data = vec![0xA5; len];
            assert!(matches!(
                dev.set_ram(&data),
                Err(DS3231Error::InvalidArgument(_))
            ));
        }
        dev.i2c.done();
    }

    #[test]
    fn test_read_temperature() {
        let mut dev = DS3231::new(setup_mock(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::MSBTemp as u8],
                vec![25, 0b0100_0000],
            ),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::MSBTemp as u8], vec![0xFF, 0]),
        ]));

        assert_eq!(dev.temperature().unwrap(), 25.25);
        assert_eq!(dev.temperature().unwrap(), -1.0);
        dev.i2c.done();
    }

    #[test]
    fn test_temperature_failure_is_propagated() {
        let mut dev = DS3231::new(setup_mock(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::MSBTemp as u8],
            vec![0, 0],
        )
        .with_error(ErrorKind::Other)]));

        assert!(matches!(
            dev.temperature(),
            Err(DS3231Error::I2c(ErrorKind::Other))
        ));
        dev.i2c.done();
    }

    #[test]
    fn test_borrowed_bus_and_release() {
        let mut mock = setup_mock(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Control as u8],
            vec![0x1C],
        )]);

        let mut dev = DS3231::new(&mut mock);
        assert_eq!(u8::from(dev.control().unwrap()), 0x1C);
        let _ = dev.release();
        mock.done();
    }
}
