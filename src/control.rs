//! Square wave and alarm bits of the control and status registers.
//!
//! These are the pure halves of the driver's read-modify-write operations:
//! each takes the register value just read and returns the value to write
//! back, leaving every unrelated bit untouched.

use crate::{Alarm, Control, InterruptControl, Status};

/// Output selection for the INT/SQW pin.
///
/// The four frequencies map to the rate select bits RS2:RS1 (0b00-0b11).
/// On a DS3231 these codes produce 1Hz, 1.024kHz, 4.096kHz and 8.192kHz.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SquareWaveFrequency {
    /// Rate select 0b00
    Hz1,
    /// Rate select 0b01
    KHz4,
    /// Rate select 0b10
    KHz8,
    /// Rate select 0b11
    KHz32,
    /// Square wave disabled (INTCN set)
    Off,
}

impl SquareWaveFrequency {
    /// Rate select code, `None` for [`SquareWaveFrequency::Off`].
    pub const fn rate_select(self) -> Option<u8> {
        match self {
            SquareWaveFrequency::Hz1 => Some(0b00),
            SquareWaveFrequency::KHz4 => Some(0b01),
            SquareWaveFrequency::KHz8 => Some(0b10),
            SquareWaveFrequency::KHz32 => Some(0b11),
            SquareWaveFrequency::Off => None,
        }
    }
}

/// Applies a square wave selection to a control register value.
///
/// `Off` only sets INTCN and keeps the previous rate select bits.
pub fn with_square_wave(mut control: Control, frequency: SquareWaveFrequency) -> Control {
    match frequency.rate_select() {
        Some(rate) => {
            control.set_interrupt_control(InterruptControl::SquareWave);
            control.set_rate_select(rate);
        }
        None => control.set_interrupt_control(InterruptControl::Interrupt),
    }
    control
}

/// Sets or clears the interrupt enable bit of `alarm`.
pub fn with_alarm_interrupt(control: Control, alarm: Alarm, enabled: bool) -> Control {
    let mask = 1 << alarm.bit();
    let value = u8::from(control);
    Control::from(if enabled { value | mask } else { value & !mask })
}

/// Checks the fired flag of `alarm`.
///
/// Returns the status value with that flag cleared when it was set, `None`
/// when the alarm has not fired.
pub fn acknowledge_alarm(status: Status, alarm: Alarm) -> Option<Status> {
    let mask = 1 << alarm.bit();
    let value = u8::from(status);
    if value & mask != 0 {
        Some(Status::from(value & !mask))
    } else {
        None
    }
}
