//! Temperature register decoding.
//!
//! The DS3231 reports temperature as a signed whole-degree byte (0x11)
//! followed by a byte whose top two bits count quarter degrees (0x12).

use crate::{Temperature, TemperatureFraction};

/// Degrees Celsius for the MSB/LSB temperature register pair.
///
/// The fraction is always added, so `[0xFF, 0x40]` reads -0.75.
pub fn decode(data: [u8; 2]) -> f32 {
    let whole = Temperature::from(data[0]).temperature();
    let quarters = TemperatureFraction::from(data[1]).quarters();
    f32::from(whole) + f32::from(quarters) * 0.25
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_whole_degrees() {
        assert_eq!(decode([25, 0]), 25.0);
        assert_eq!(decode([0, 0]), 0.0);
        assert_eq!(decode([0xFF, 0]), -1.0);
        assert_eq!(decode([0x80, 0]), -128.0);
    }

    #[test]
    fn test_decode_quarter_degrees() {
        assert_eq!(decode([25, 0b0100_0000]), 25.25);
        assert_eq!(decode([25, 0b1000_0000]), 25.5);
        assert_eq!(decode([25, 0b1100_0000]), 25.75);
        assert_eq!(decode([0xFF, 0b0100_0000]), -0.75);
    }

    #[test]
    fn test_decode_ignores_low_bits() {
        assert_eq!(decode([21, 0b0011_1111]), 21.0);
    }
}
