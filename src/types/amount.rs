use crate::types::errors::AmountError;
use rust_decimal::Decimal;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DECIMAL_PLACES: usize = 2;

// Decimal holds at most 28 significant digits.
const MAX_DIGITS: usize = 28;

/// A user-entered money amount with at most two fractional digits.
///
/// Parsing is deliberately stricter than `Decimal::from_str`: exponent
/// notation, digit grouping and trailing garbage are all rejected before
/// anything reaches the server.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Amount(Decimal);

impl Amount {
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Display for Amount {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.2}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(AmountError::Empty);
        }

        let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
        let (integer, fraction) = match unsigned.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (unsigned, "")
        };

        if integer.is_empty() {
            return Err(AmountError::InvalidFormat(format!("'{value}' has no integer part")));
        }

        if let Some(bad) = integer.chars().chain(fraction.chars()).find(|c| !c.is_ascii_digit()) {
            return Err(AmountError::InvalidFormat(format!("'{value}' contains unexpected character '{bad}'")));
        }

        if fraction.len() > DECIMAL_PLACES {
            return Err(AmountError::TooManyDecimals { max: DECIMAL_PLACES });
        }

        if integer.trim_start_matches('0').len() + fraction.len() > MAX_DIGITS {
            return Err(AmountError::Overflow);
        }

        //NOTE: "1." is accepted as "1" and a leading '+' is dropped before handing off to Decimal
        let sign = if value.starts_with('-') { "-" } else { "" };
        let normalized = if fraction.is_empty() {
            format!("{sign}{integer}")
        } else {
            format!("{sign}{integer}.{fraction}")
        };

        Decimal::from_str(&normalized)
            .map(Amount)
            .map_err(|_| AmountError::Overflow)
    }
}
