use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Money is represented as an exact decimal so sums never drift.
/// It is persisted as a plain JSON number.
pub type Amount = Decimal;

/// Amounts are stored with at most this many decimal places.
pub const AMOUNT_DECIMALS: u32 = 2;

/// Exclusive upper bound for a single amount, in whole units.
/// Keeps every stored value exact through its JSON (f64) form and keeps
/// sums far from `Decimal::MAX`.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

pub fn max_amount() -> Amount {
    Amount::from(MAX_AMOUNT_UNITS)
}

/// Round to cents, halves away from zero.
/// Example: 0.125 -> 0.13, 0.12345678901234567891 -> 0.12
pub fn round_amount(amount: Amount) -> Amount {
    amount.round_dp_with_strategy(AMOUNT_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount as a human-readable currency string with two decimals
/// and thousands separators.
/// Example: 1234.5 -> "1,234.50", -7 -> "-7.00"
pub fn format_amount(amount: Amount) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2).abs());
    let (units, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// Parse a decimal string into an amount.
/// Example: "50.00" -> 50.00, " 12.5 " -> 12.5, "abc" -> error
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }
    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .map_err(|_| ParseAmountError::InvalidFormat)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
