//! GPIO numbering for the BCM283x family

/// Number of GPIO lines in the BCM283x GPIO bank (GPIO0-GPIO53)
pub const GPIO_COUNT: u8 = 54;

/// Error when validating a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-53 valid)
    InvalidPin,
    /// Pin reserved for special function
    Reserved,
}

/// Check that `pin` is a GPIO the speaker may drive
///
/// GPIO0/GPIO1 carry the HAT ID EEPROM bus and are left alone.
pub fn validate_pin(pin: u8) -> Result<u8, PinError> {
    match pin {
        0 | 1 => Err(PinError::Reserved),
        p if p < GPIO_COUNT => Ok(p),
        _ => Err(PinError::InvalidPin),
    }
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "23" -> GPIO23
/// - "GPIO23" -> GPIO23
pub fn parse_pin(s: &str) -> Result<u8, PinError> {
    let s = s.trim();
    let digits = s.strip_prefix("GPIO").unwrap_or(s);
    let pin: u8 = digits.parse().map_err(|_| PinError::InvalidPin)?;
    validate_pin(pin)
}
