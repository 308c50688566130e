//! Packed binary-coded-decimal conversion used by every time and alarm field.
//!
//! Neither direction validates its input. The device only ever returns BCD
//! with both nibbles in 0-9, so [`decode`] trusts it; [`encode`] expects a
//! value in 0-99 and silently produces an aliased byte for anything larger.

/// Converts a packed BCD byte into its decimal value.
///
/// Bytes with a nibble above 9 decode to a value that is not meaningful
/// (e.g. `0x1F` gives 25).
pub const fn decode(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// Converts a decimal value (0-99) into a packed BCD byte.
///
/// Values above 99 wrap instead of failing: `encode(100)` is `0xA0`.
pub const fn encode(value: u8) -> u8 {
    (value / 10).wrapping_mul(16).wrapping_add(value % 10)
}
