//! Alarm register encoding for the DS3231 RTC.
//!
//! Each alarm is a small block of BCD registers whose bit 7 is a
//! "don't care" mask: when set, that field is ignored while the device
//! compares the alarm against the current time. The combination of mask bits
//! selects how often the alarm fires.
//!
//! | Alarm | Registers | Fields |
//! |-------|-----------|--------|
//! | 1 | 0x07-0x0A | seconds, minutes, hours, day/date |
//! | 2 | 0x0B-0x0D | minutes, hours, day/date |
//!
//! Alarm 2 has no seconds register and fires at 00 seconds of the matching
//! minute.

use crate::{
    bcd, AlarmDayDate, AlarmHours, AlarmMinutes, AlarmSeconds, DayDateSelect, RegAddr,
};

const MASK_SECONDS: u8 = 0x01;
const MASK_MINUTES: u8 = 0x02;
const MASK_HOURS: u8 = 0x04;
const MASK_DAY_DATE: u8 = 0x08;
const SELECT_DAY: u8 = 0x10;
const SELECT_ALARM2: u8 = 0x80;

/// One of the two alarms of the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm {
    /// Alarm 1
    Alarm1,
    /// Alarm 2
    Alarm2,
}

impl Alarm {
    /// Bit position of this alarm's flag in the status register and of its
    /// interrupt enable in the control register.
    pub const fn bit(self) -> u8 {
        match self {
            Alarm::Alarm1 => 0,
            Alarm::Alarm2 => 1,
        }
    }

    /// First register of this alarm's block.
    pub const fn base_address(self) -> RegAddr {
        match self {
            Alarm::Alarm1 => RegAddr::Alarm1Seconds,
            Alarm::Alarm2 => RegAddr::Alarm2Minutes,
        }
    }
}

/// Alarm match mode, one variant per valid (alarm, granularity) pairing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmType {
    /// Fires every second
    Alarm1EverySecond,
    /// Fires when the seconds match
    Alarm1MatchSeconds,
    /// Fires when minutes and seconds match
    Alarm1MatchMinutes,
    /// Fires when hours, minutes and seconds match
    Alarm1MatchHours,
    /// Fires when date of month, hours, minutes and seconds match
    Alarm1MatchDate,
    /// Fires when day of week, hours, minutes and seconds match
    Alarm1MatchDay,
    /// Fires every minute at 00 seconds
    Alarm2EveryMinute,
    /// Fires when the minutes match
    Alarm2MatchMinutes,
    /// Fires when hours and minutes match
    Alarm2MatchHours,
    /// Fires when date of month, hours and minutes match
    Alarm2MatchDate,
    /// Fires when day of week, hours and minutes match
    Alarm2MatchDay,
}

impl AlarmType {
    /// Mask byte for this mode.
    ///
    /// Bits 0-3 mark the seconds, minutes, hours and day/date fields as
    /// don't care, bit 4 selects day-of-week matching and bit 7 selects
    /// alarm 2.
    pub const fn mask(self) -> u8 {
        match self {
            AlarmType::Alarm1EverySecond => 0x0F,
            AlarmType::Alarm1MatchSeconds => 0x0E,
            AlarmType::Alarm1MatchMinutes => 0x0C,
            AlarmType::Alarm1MatchHours => 0x08,
            AlarmType::Alarm1MatchDate => 0x00,
            AlarmType::Alarm1MatchDay => 0x10,
            AlarmType::Alarm2EveryMinute => 0x8E,
            AlarmType::Alarm2MatchMinutes => 0x8C,
            AlarmType::Alarm2MatchHours => 0x88,
            AlarmType::Alarm2MatchDate => 0x80,
            AlarmType::Alarm2MatchDay => 0x90,
        }
    }

    /// The alarm this mode configures.
    pub const fn alarm(self) -> Alarm {
        if self.mask() & SELECT_ALARM2 == 0 {
            Alarm::Alarm1
        } else {
            Alarm::Alarm2
        }
    }
}

/// Encoded contents of one alarm register block.
///
/// Field values are BCD encoded without range checks: seconds and minutes
/// must be 0-59, hours 0-23 and the day/date 1-7 or 1-31. Larger values
/// produce aliased bytes and may spill into the mask bits.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DS3231Alarm {
    alarm: Alarm,
    seconds: Option<AlarmSeconds>,
    minutes: AlarmMinutes,
    hours: AlarmHours,
    day_date: AlarmDayDate,
}

impl DS3231Alarm {
    /// Encodes an alarm. `seconds` is ignored for alarm 2 modes.
    pub fn new(alarm_type: AlarmType, seconds: u8, minutes: u8, hours: u8, day_date: u8) -> Self {
        let mask = alarm_type.mask();
        let alarm = alarm_type.alarm();

        let seconds = match alarm {
            Alarm::Alarm1 => {
                let mut value = AlarmSeconds::from(bcd::encode(seconds));
                if mask & MASK_SECONDS != 0 {
                    value.set_alarm_mask(true);
                }
                Some(value)
            }
            Alarm::Alarm2 => None,
        };

        let mut minutes = AlarmMinutes::from(bcd::encode(minutes));
        if mask & MASK_MINUTES != 0 {
            minutes.set_alarm_mask(true);
        }

        let mut hours = AlarmHours::from(bcd::encode(hours));
        if mask & MASK_HOURS != 0 {
            hours.set_alarm_mask(true);
        }

        let mut day_date = AlarmDayDate::from(bcd::encode(day_date));
        if mask & MASK_DAY_DATE != 0 {
            day_date.set_alarm_mask(true);
        }
        if mask & SELECT_DAY != 0 {
            day_date.set_day_date_select(DayDateSelect::Day);
        }

        DS3231Alarm {
            alarm,
            seconds,
            minutes,
            hours,
            day_date,
        }
    }

    /// The alarm this block belongs to.
    pub fn alarm(&self) -> Alarm {
        self.alarm
    }

    /// Seconds register, `None` for alarm 2.
    pub fn seconds(&self) -> Option<AlarmSeconds> {
        self.seconds
    }

    /// Minutes register.
    pub fn minutes(&self) -> AlarmMinutes {
        self.minutes
    }

    /// Hours register.
    pub fn hours(&self) -> AlarmHours {
        self.hours
    }

    /// Day/date register.
    pub fn day_date(&self) -> AlarmDayDate {
        self.day_date
    }

    /// Single-register writes (`[address, value]`) for this block, in
    /// ascending address order.
    pub fn register_writes(&self) -> impl Iterator<Item = [u8; 2]> {
        let values = self.seconds.map(u8::from).into_iter().chain([
            u8::from(self.minutes),
            u8::from(self.hours),
            u8::from(self.day_date),
        ]);
        (self.alarm.base_address() as u8..)
            .zip(values)
            .map(|(address, value)| [address, value])
    }
}
