use alloy::primitives::{
    utils::{format_units, parse_units},
    U256,
};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Converts a human readable amount (`0.1` BNB) into raw token units.
pub fn from_readable_amount(amount: Decimal, decimals: u8) -> Result<U256> {
    let units = parse_units(&amount.normalize().to_string(), decimals)
        .with_context(|| format!("cannot scale {amount} by 10^{decimals}"))?;
    Ok(units.get_absolute())
}

/// Converts raw token units back into a human readable amount.
pub fn to_readable_amount(amount: U256, decimals: u8) -> Result<Decimal> {
    let formatted = format_units(amount, decimals)?;
    Decimal::from_str(&formatted).with_context(|| format!("{formatted} does not fit a decimal"))
}
