use std::{fmt, str::FromStr};

use crate::{Currency, EngineError};

/// Wallet amount in integer minor units (paise, cents).
///
/// Balances, request amounts and fees all travel as `MoneyCents`; arithmetic
/// is checked so an overflowing credit surfaces as an error instead of a
/// wrapped balance.
///
/// ```rust
/// use engine::{Currency, MoneyCents};
///
/// let balance = MoneyCents::new(290_00);
/// assert_eq!(balance.to_string(), "290.00");
/// assert_eq!(balance.display_in(Currency::Inr), "290.00 INR");
/// assert_eq!("150,5".parse::<MoneyCents>().unwrap().cents(), 150_50);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }

    /// `12.34 INR`.
    #[must_use]
    pub fn display_in(self, currency: Currency) -> String {
        format!("{self} {}", currency.code())
    }

    /// Parses an amount typed by a user; zero and negative amounts are
    /// refused.
    pub fn parse_positive(s: &str) -> Result<MoneyCents, EngineError> {
        let amount: MoneyCents = s.parse()?;
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        Ok(amount)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

fn digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Accepts `.` or `,` as decimal separator, at most two decimals and an
    /// optional sign.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| EngineError::InvalidAmount(format!("{why}: {:?}", s.trim()));

        let trimmed = s.trim();
        let (negative, body) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            Some(_) => (false, trimmed),
            None => return Err(invalid("empty amount")),
        };

        let body = body.trim().replace(',', ".");
        let (units, fraction) = body.split_once('.').unwrap_or((body.as_str(), ""));
        let units = digits(units).ok_or_else(|| invalid("invalid amount"))?;
        let fraction = match fraction.len() {
            0 => 0,
            1 => digits(fraction).ok_or_else(|| invalid("invalid amount"))? * 10,
            2 => digits(fraction).ok_or_else(|| invalid("invalid amount"))?,
            _ => return Err(invalid("too many decimals")),
        };

        let cents = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(fraction))
            .ok_or_else(|| invalid("amount too large"))?;
        Ok(MoneyCents(if negative { -cents } else { cents }))
    }
}
