//! Fixed-point decimal amounts with two fraction digits.
//!
//! Amounts are held as integer cents. At most 10 significant digits are
//! allowed (8 before the decimal point, 2 after), matching a
//! `DECIMAL(10, 2)` column.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Maximum number of digits, fraction included.
pub const MAX_DIGITS: u32 = 10;
/// Number of digits after the decimal point.
pub const FRACTION_DIGITS: u32 = 2;

const CENTS_PER_UNIT: i64 = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a decimal number")]
    Malformed(String),
    #[error("at most {FRACTION_DIGITS} decimal places are allowed")]
    TooManyFractionDigits,
    #[error("at most {MAX_DIGITS} digits are allowed")]
    TooManyDigits,
}

/// A signed amount of money in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Build from integer cents, rejecting values wider than `MAX_DIGITS`.
    pub fn from_cents(cents: i64) -> Result<Self, MoneyError> {
        if cents.unsigned_abs() >= 10u64.pow(MAX_DIGITS) {
            return Err(MoneyError::TooManyDigits);
        }
        Ok(Money(cents))
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::Empty);
        }

        let (negative, unsigned) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(MoneyError::Malformed(s.to_string()));
        }
        if fraction.len() > FRACTION_DIGITS as usize {
            return Err(MoneyError::TooManyFractionDigits);
        }

        let whole = whole.trim_start_matches('0');
        if whole.len() > (MAX_DIGITS - FRACTION_DIGITS) as usize {
            return Err(MoneyError::TooManyDigits);
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| MoneyError::Malformed(s.to_string()))?
        };
        let mut cents: i64 = if fraction.is_empty() {
            0
        } else {
            fraction
                .parse()
                .map_err(|_| MoneyError::Malformed(s.to_string()))?
        };
        if fraction.len() == 1 {
            cents *= 10;
        }

        let total = units * CENTS_PER_UNIT + cents;
        Money::from_cents(if negative { -total } else { total })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{}{}.{:02}",
            sign,
            abs / CENTS_PER_UNIT as u64,
            abs % CENTS_PER_UNIT as u64
        )
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl<'de> Visitor<'de> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a decimal amount such as \"1250.00\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                v.checked_mul(CENTS_PER_UNIT)
                    .ok_or(MoneyError::TooManyDigits)
                    .and_then(Money::from_cents)
                    .map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                let v = i64::try_from(v).map_err(|_| E::custom(MoneyError::TooManyDigits))?;
                self.visit_i64(v)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                self.visit_str(&v.to_string())
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_signed_amounts() {
        assert_eq!("1250.00".parse::<Money>().unwrap().cents(), 125_000);
        assert_eq!("-3.5".parse::<Money>().unwrap().cents(), -350);
        assert_eq!("+17".parse::<Money>().unwrap().cents(), 1_700);
        assert_eq!(".75".parse::<Money>().unwrap().cents(), 75);
    }

    #[test]
    fn rejects_excess_precision() {
        assert_eq!(
            "1.005".parse::<Money>(),
            Err(MoneyError::TooManyFractionDigits)
        );
        assert_eq!(
            "123456789.00".parse::<Money>(),
            Err(MoneyError::TooManyDigits)
        );
        assert!("99999999.99".parse::<Money>().is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!("".parse::<Money>(), Err(MoneyError::Empty));
        assert!(matches!(
            "12,50".parse::<Money>(),
            Err(MoneyError::Malformed(_))
        ));
        assert!(matches!("-".parse::<Money>(), Err(MoneyError::Malformed(_))));
        assert!(matches!("1e3".parse::<Money>(), Err(MoneyError::Malformed(_))));
    }

    #[test]
    fn displays_with_two_decimals() {
        assert_eq!(Money::from_cents(125_050).unwrap().to_string(), "1250.50");
        assert_eq!(Money::from_cents(-5).unwrap().to_string(), "-0.05");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn json_accepts_strings_and_numbers() {
        let from_str: Money = serde_json::from_str("\"42.10\"").unwrap();
        let from_int: Money = serde_json::from_str("42").unwrap();
        let from_float: Money = serde_json::from_str("42.1").unwrap();
        assert_eq!(from_str.cents(), 4_210);
        assert_eq!(from_int.cents(), 4_200);
        assert_eq!(from_float.cents(), 4_210);
        assert_eq!(serde_json::to_string(&from_str).unwrap(), "\"42.10\"");
    }
}
