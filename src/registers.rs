//! Register map and bitfield views for the DS3231 RTC.
//!
//! This module holds the fixed protocol constants (device address, bus speed,
//! register addresses, scratch memory window) and typed views of the registers
//! whose individual bits the driver manipulates.

use bitfield::bitfield;

/// 7-bit I2C address of the DS3231.
pub const DEVICE_ADDRESS: u8 = 0x68;

/// Preferred bus clock (I2C fast mode).
pub const BUS_FREQUENCY_HZ: u32 = 400_000;

/// First address of the battery-backed scratch memory window.
pub const SRAM_ADDRESS: u8 = 0x08;

/// Size of the scratch memory window in bytes.
pub const SRAM_SIZE: usize = 56;

/// Register addresses for the DS3231 RTC.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Seconds register, start of the 7-byte time block
    Seconds = 0x00,
    /// Minutes register
    Minutes = 0x01,
    /// Hours register
    Hours = 0x02,
    /// Day-of-week register
    Day = 0x03,
    /// Date (day of month) register
    Date = 0x04,
    /// Month register, bit 7 is the century flag
    Month = 0x05,
    /// Two digit year register
    Year = 0x06,
    /// Alarm 1 seconds register, start of the alarm 1 block
    Alarm1Seconds = 0x07,
    /// Alarm 1 minutes register
    Alarm1Minutes = 0x08,
    /// Alarm 1 hours register
    Alarm1Hours = 0x09,
    /// Alarm 1 day/date register
    Alarm1DayDate = 0x0A,
    /// Alarm 2 minutes register, start of the alarm 2 block
    Alarm2Minutes = 0x0B,
    /// Alarm 2 hours register
    Alarm2Hours = 0x0C,
    /// Alarm 2 day/date register
    Alarm2DayDate = 0x0D,
    /// Control register
    Control = 0x0E,
    /// Control/Status register
    ControlStatus = 0x0F,
    /// Aging offset register
    AgingOffset = 0x10,
    /// Temperature MSB register (signed whole degrees)
    MSBTemp = 0x11,
    /// Temperature LSB register (quarter degrees in bits 7:6)
    LSBTemp = 0x12,
}

/// Function of the INT/SQW pin, selected by the INTCN control bit.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptControl {
    /// Square wave output enabled
    SquareWave = 0,
    /// Square wave disabled, pin asserted on alarm match
    Interrupt = 1,
}
impl From<u8> for InterruptControl {
    /// Creates an `InterruptControl` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => InterruptControl::SquareWave,
            1 => InterruptControl::Interrupt,
            _ => panic!("Invalid value for InterruptControl: {}", v),
        }
    }
}
impl From<InterruptControl> for u8 {
    fn from(v: InterruptControl) -> Self {
        v as u8
    }
}

/// Day/Date select for the alarm day/date register (DY/DT bit).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DayDateSelect {
    /// Match against the date of the month
    Date = 0,
    /// Match against the day of the week
    Day = 1,
}
impl From<u8> for DayDateSelect {
    /// Creates a `DayDateSelect` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => DayDateSelect::Date,
            1 => DayDateSelect::Day,
            _ => panic!("Invalid value for DayDateSelect: {}", v),
        }
    }
}
impl From<DayDateSelect> for u8 {
    fn from(v: DayDateSelect) -> Self {
        v as u8
    }
}

// Generates the u8 conversions and the defmt representation for a register
// view. The defmt output is the raw register byte.
macro_rules! register_u8 {
    ($typ:ident) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                $typ(v)
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
        #[cfg(feature = "defmt")]
        impl defmt::Format for $typ {
            fn format(&self, f: defmt::Formatter) {
                defmt::write!(f, "{}({=u8:#x})", stringify!($typ), self.0);
            }
        }
    };
}

bitfield! {
    /// Month register, carrying the century flag in bit 7.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Month(u8);
    impl Debug;
    /// Century flag, set for years 2000 and later
    pub century, set_century: 7;
    /// BCD month (tens in bit 4, ones in bits 3:0)
    pub month, set_month: 4, 0;
}
register_u8!(Month);

bitfield! {
    /// Control register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control(u8);
    impl Debug;
    /// Oscillator disabled on battery power (EOSC, active high)
    pub disable_oscillator, set_disable_oscillator: 7;
    /// Enable square wave output on battery power
    pub battery_backed_square_wave, set_battery_backed_square_wave: 6;
    /// Force temperature conversion
    pub convert_temperature, set_convert_temperature: 5;
    /// Square wave rate select (RS2:RS1)
    pub rate_select, set_rate_select: 4, 3;
    /// INT/SQW pin function control
    pub from into InterruptControl, interrupt_control, set_interrupt_control: 2, 2;
    /// Enable alarm 2 interrupt
    pub alarm2_interrupt_enable, set_alarm2_interrupt_enable: 1;
    /// Enable alarm 1 interrupt
    pub alarm1_interrupt_enable, set_alarm1_interrupt_enable: 0;
}
register_u8!(Control);

bitfield! {
    /// Status register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Status(u8);
    impl Debug;
    /// Oscillator is or was stopped
    pub oscillator_stop_flag, set_oscillator_stop_flag: 7;
    /// Enable 32kHz output
    pub enable_32khz_output, set_enable_32khz_output: 3;
    /// Device busy flag
    pub busy, set_busy: 2;
    /// Alarm 2 triggered flag
    pub alarm2_flag, set_alarm2_flag: 1;
    /// Alarm 1 triggered flag
    pub alarm1_flag, set_alarm1_flag: 0;
}
register_u8!(Status);

bitfield! {
    /// Temperature MSB register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Temperature(u8);
    impl Debug;
    /// Whole degrees Celsius (-128 to +127)
    pub i8, temperature, set_temperature: 7, 0;
}
register_u8!(Temperature);

bitfield! {
    /// Temperature LSB register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct TemperatureFraction(u8);
    impl Debug;
    /// Quarter degrees (0-3)
    pub quarters, set_quarters: 7, 6;
}
register_u8!(TemperatureFraction);

// Alarm registers. Bit 7 of every alarm register is its don't-care (mask)
// bit, the remaining bits hold the BCD field.

bitfield! {
    /// Alarm seconds register (alarm 1 only).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmSeconds(u8);
    impl Debug;
    /// Alarm mask bit (A1M1)
    pub alarm_mask, set_alarm_mask: 7;
    /// BCD seconds
    pub seconds, set_seconds: 6, 0;
}
register_u8!(AlarmSeconds);

bitfield! {
    /// Alarm minutes register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmMinutes(u8);
    impl Debug;
    /// Alarm mask bit (A1M2/A2M2)
    pub alarm_mask, set_alarm_mask: 7;
    /// BCD minutes
    pub minutes, set_minutes: 6, 0;
}
register_u8!(AlarmMinutes);

bitfield! {
    /// Alarm hours register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmHours(u8);
    impl Debug;
    /// Alarm mask bit (A1M3/A2M3)
    pub alarm_mask, set_alarm_mask: 7;
    /// BCD hours, 24-hour format
    pub hours, set_hours: 6, 0;
}
register_u8!(AlarmHours);

bitfield! {
    /// Alarm day/date register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmDayDate(u8);
    impl Debug;
    /// Alarm mask bit (A1M4/A2M4)
    pub alarm_mask, set_alarm_mask: 7;
    /// Day/Date select
    pub from into DayDateSelect, day_date_select, set_day_date_select: 6, 6;
    /// BCD day of week or date of month
    pub day_or_date, set_day_or_date: 5, 0;
}
register_u8!(AlarmDayDate);
