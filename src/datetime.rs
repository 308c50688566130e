//! Calendar timestamp and the DS3231 time register block.
//!
//! The DS3231 keeps the current time in 7 consecutive BCD registers starting
//! at [`RegAddr::Seconds`](crate::RegAddr::Seconds):
//! seconds, minutes, hours, day of week, date, month (+ century bit), year.
//!
//! Only two year digits and a century flag are stored, so the representable
//! range is 1900-2099. Years outside it are encoded anyway and read back as a
//! different year; callers must keep timestamps inside the range.
//!
//! The hours register is always treated as 24-hour format. A device left in
//! 12-hour mode by other software reads back with the mode bits folded into
//! the hour value.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::{bcd, Month};

/// Errors converting between [`Timestamp`] and chrono types.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DS3231DateTimeError {
    /// The decoded fields do not form a valid calendar date/time
    InvalidDateTime,
    /// The year cannot be stored in a [`Timestamp`]
    YearOutOfRange,
}

/// A calendar timestamp as stored by the device.
///
/// `day_of_week` is 0-6 and its meaning is up to the caller; conversions from
/// chrono use 0 = Sunday.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    /// Full year, 1900-2099
    pub year: u16,
    /// Month, 1-12
    pub month: u8,
    /// Day of month, 1-31
    pub day: u8,
    /// Hour, 0-23
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
    /// Second, 0-59
    pub second: u8,
    /// Day of week, 0-6
    pub day_of_week: u8,
}

impl Timestamp {
    /// Decodes the 7-byte time register block.
    pub fn from_registers(data: [u8; 7]) -> Self {
        let month = Month::from(data[5]);
        let base = if month.century() { 2000 } else { 1900 };
        let timestamp = Timestamp {
            year: base + u16::from(bcd::decode(data[6])),
            month: bcd::decode(month.month()),
            day: bcd::decode(data[4]),
            hour: bcd::decode(data[2]),
            minute: bcd::decode(data[1]),
            second: bcd::decode(data[0]),
            day_of_week: bcd::decode(data[3]) % 7,
        };
        debug!("time registers {:?} -> {:?}", data, timestamp);
        timestamp
    }

    /// Encodes the timestamp into the 7-byte time register block.
    ///
    /// The century flag is set for years from 2000 on. Years outside
    /// 1900-2099 produce an aliased year byte.
    pub fn to_registers(&self) -> [u8; 7] {
        let mut month = Month::from(bcd::encode(self.month));
        let year = if self.year >= 2000 {
            month.set_century(true);
            self.year - 2000
        } else {
            self.year.wrapping_sub(1900)
        };
        let data = [
            bcd::encode(self.second),
            bcd::encode(self.minute),
            bcd::encode(self.hour),
            bcd::encode(self.day_of_week % 7),
            bcd::encode(self.day),
            month.into(),
            bcd::encode(year as u8),
        ];
        debug!("{:?} -> time registers {:?}", self, data);
        data
    }

    /// Converts into a chrono date/time, checking that the fields form a
    /// real calendar date. The day of week is not checked.
    pub fn to_datetime(&self) -> Result<NaiveDateTime, DS3231DateTimeError> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
        .and_then(|d| {
            d.and_hms_opt(
                u32::from(self.hour),
                u32::from(self.minute),
                u32::from(self.second),
            )
        })
        .ok_or(DS3231DateTimeError::InvalidDateTime)
    }
}

impl TryFrom<&NaiveDateTime> for Timestamp {
    type Error = DS3231DateTimeError;

    fn try_from(datetime: &NaiveDateTime) -> Result<Self, Self::Error> {
        let year =
            u16::try_from(datetime.year()).map_err(|_| DS3231DateTimeError::YearOutOfRange)?;
        // chrono guarantees these fit in a byte
        Ok(Timestamp {
            year,
            month: datetime.month() as u8,
            day: datetime.day() as u8,
            hour: datetime.hour() as u8,
            minute: datetime.minute() as u8,
            second: datetime.second() as u8,
            day_of_week: datetime.weekday().num_days_from_sunday() as u8,
        })
    }
}
