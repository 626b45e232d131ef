use alloy::primitives::U256;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum UnitsError {
    #[error("amount must be a finite number greater than zero, got {0}")]
    InvalidAmount(f64),
    #[error("amount {amount} is below the smallest unit at {decimals} decimals")]
    BelowPrecision { amount: f64, decimals: u8 },
    #[error("amount {amount} does not fit in 256 bits at {decimals} decimals")]
    Overflow { amount: f64, decimals: u8 },
    #[error("invalid base-unit integer '{0}'")]
    InvalidInteger(String),
}

/// Display amount → base units, truncating toward zero (`floor` for positive input).
///
/// Works on the float's shortest round-trip decimal text rather than on
/// `amount * 10^decimals`, so `1.5` at 9 decimals is exactly `1500000000`
/// and large amounts keep every digit.
pub fn to_base_units(amount: f64, decimals: u8) -> Result<U256, UnitsError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(UnitsError::InvalidAmount(amount));
    }

    // f64 Display never switches to exponent notation.
    let repr = amount.to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let scale = decimals as usize;
    let mut digits = String::with_capacity(int_part.len() + scale);
    digits.push_str(int_part);
    if frac_part.len() >= scale {
        digits.push_str(&frac_part[..scale]);
    } else {
        digits.push_str(frac_part);
        digits.extend(std::iter::repeat_n('0', scale - frac_part.len()));
    }

    let units = U256::from_str_radix(&digits, 10)
        .map_err(|_| UnitsError::Overflow { amount, decimals })?;
    if units.is_zero() {
        return Err(UnitsError::BelowPrecision { amount, decimals });
    }
    Ok(units)
}

/// Base units → display amount.
pub fn from_base_units(units: U256, decimals: u8) -> f64 {
    let digits = units.to_string();
    let scale = decimals as usize;
    let text = if scale == 0 {
        digits
    } else if digits.len() > scale {
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        format!("{int_part}.{frac_part}")
    } else {
        format!("0.{}{digits}", "0".repeat(scale - digits.len()))
    };
    // A string of ASCII digits with at most one dot always parses.
    text.parse().unwrap_or(0.0)
}

/// Parse a raw on-chain balance (decimal string, as Sui JSON-RPC returns u64/u128).
pub fn parse_base_units(raw: &str) -> Result<U256, UnitsError> {
    U256::from_str_radix(raw.trim(), 10).map_err(|_| UnitsError::InvalidInteger(raw.to_string()))
}
