//! Async implementation of the DS3231 driver.
//!
//! This module mirrors the blocking [`crate::DS3231`] on top of the
//! `embedded-hal-async` I2C trait. It is only available when the `async`
//! feature is enabled. Register encodings and bus transactions are identical
//! to the blocking driver.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_rtc::asynch::DS3231;
//!
//! let mut rtc = DS3231::new(i2c);
//! let now = rtc.time().await?;
//! let celsius = rtc.temperature().await?;
//! ```

use chrono::NaiveDateTime;
use embedded_hal_async::i2c::I2c;
use paste::paste;

use crate::{
    control, sram_write_buffer, temperature, Alarm, AlarmType, Control, DS3231Alarm, DS3231Error,
    RegAddr, SquareWaveFrequency, Status, Timestamp, DEVICE_ADDRESS, SRAM_ADDRESS, SRAM_SIZE,
};

/// DS3231 Real-Time Clock async driver.
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

    async fn read_region<const N: usize>(
        &mut self,
        address: u8,
    ) -> Result<[u8; N], DS3231Error<I2C::Error>> {
        let mut data = [0; N];
        self.i2c
            .write_read(self.address, &[address], &mut data)
            .await?;
        Ok(data)
    }

    /// Reads the current time.
    pub async fn time(&mut self) -> Result<Timestamp, DS3231Error<I2C::Error>> {
        let data = self.read_region::<7>(RegAddr::Seconds as u8).await?;
        Ok(Timestamp::from_registers(data))
    }

    /// Sets the current time in one 7-register write.
    pub async fn set_time(
        &mut self,
        timestamp: &Timestamp,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let data = timestamp.to_registers();
        let mut buffer = [0; 8];
        buffer[0] = RegAddr::Seconds as u8;
        buffer[1..].copy_from_slice(&data);
        self.i2c.write(self.address, &buffer).await?;
        Ok(())
    }

    /// Reads the current time as a chrono date/time.
    pub async fn datetime(&mut self) -> Result<NaiveDateTime, DS3231Error<I2C::Error>> {
        self.time()
            .await?
            .to_datetime()
            .map_err(DS3231Error::DateTime)
    }

    /// Sets the current time from a chrono date/time.
    pub async fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let timestamp = Timestamp::try_from(datetime).map_err(DS3231Error::DateTime)?;
        self.set_time(&timestamp).await
    }

    /// Selects the INT/SQW pin square wave output.
    pub async fn set_square_wave(
        &mut self,
        frequency: SquareWaveFrequency,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let current = self.control().await?;
        let updated = control::with_square_wave(current, frequency);
        debug!("square wave {:?}: control {:?} -> {:?}", frequency, current, updated);
        self.set_control(updated).await
    }

    /// Sets an alarm with seconds fixed at 0.
    pub async fn set_alarm(
        &mut self,
        alarm_type: AlarmType,
        minutes: u8,
        hours: u8,
        day_date: u8,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        self.set_alarm_with_seconds(alarm_type, 0, minutes, hours, day_date)
            .await
    }

    /// Sets an alarm, one register write at a time in ascending address
    /// order. `seconds` is ignored for alarm 2 modes.
    pub async fn set_alarm_with_seconds(
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
            if let Err(e) = self.i2c.write(self.address, &write).await {
                error!("alarm register {} write failed", write[0]);
                return Err(DS3231Error::I2c(e));
            }
        }
        Ok(())
    }

    /// Enables or disables the INT pin assertion for `alarm`.
    pub async fn set_alarm_interrupt(
        &mut self,
        alarm: Alarm,
        enabled: bool,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let current = self.control().await?;
        self.set_control(control::with_alarm_interrupt(current, alarm, enabled))
            .await
    }

    /// Returns whether `alarm` has fired and clears its flag if so.
    pub async fn alarm_fired(&mut self, alarm: Alarm) -> Result<bool, DS3231Error<I2C::Error>> {
        let status = self.status().await?;
        match control::acknowledge_alarm(status, alarm) {
            Some(cleared) => {
                debug!("{:?} fired, status {:?}", alarm, status);
                self.set_status(cleared).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns whether the oscillator is or was stopped.
    pub async fn oscillator_stopped(&mut self) -> Result<bool, DS3231Error<I2C::Error>> {
        Ok(self.status().await?.oscillator_stop_flag())
    }

    /// Reads the whole scratch memory.
    pub async fn ram(&mut self) -> Result<[u8; SRAM_SIZE], DS3231Error<I2C::Error>> {
        self.read_region::<SRAM_SIZE>(SRAM_ADDRESS).await
    }

    /// Writes the whole scratch memory; `data` must be [`SRAM_SIZE`] bytes.
    pub async fn set_ram(&mut self, data: &[u8]) -> Result<(), DS3231Error<I2C::Error>> {
        let buffer = sram_write_buffer(data).map_err(DS3231Error::InvalidArgument)?;
        self.i2c.write(self.address, &buffer).await?;
        Ok(())
    }

    /// Reads the temperature in degrees Celsius.
    pub async fn temperature(&mut self) -> Result<f32, DS3231Error<I2C::Error>> {
        let data = self.read_region::<2>(RegAddr::MSBTemp as u8).await?;
        Ok(temperature::decode(data))
    }
}

// Register access implementations
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ident)),+) => {
        impl<I2C: I2c> DS3231<I2C> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    pub async fn $name(&mut self) -> Result<$typ, DS3231Error<I2C::Error>> {
                        let mut data = [0];
                        self.i2c
                            .write_read(self.address, &[$regaddr as u8], &mut data)
                            .await?;
                        Ok($typ::from(data[0]))
                    }

                    #[doc = concat!("Writes the ", stringify!($name), " register.")]
                    pub async fn [<set_ $name>](&mut self, value: $typ) -> Result<(), DS3231Error<I2C::Error>> {
                        self.i2c
                            .write(self.address, &[$regaddr as u8, u8::from(value)])
                            .await?;
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
