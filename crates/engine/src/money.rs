use std::{fmt, ops::Sub, str::FromStr};

use crate::EngineError;

/// An amount in integer cents.
///
/// Budgets, expenses and totals never touch floating point inside the engine.
/// The JSON layer talks major units (`12.5`) and converts at the boundary
/// with [`MoneyCents::try_from_major`] or [`str::parse`].
///
/// ```rust
/// use engine::MoneyCents;
///
/// let rent: MoneyCents = "640,5".parse().unwrap();
/// assert_eq!(rent, MoneyCents::new(64_050));
/// assert_eq!(rent.to_string(), "640.50");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoneyCents(i64);

fn invalid(msg: &str) -> EngineError {
    EngineError::InvalidAmount(msg.to_string())
}

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
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(Self)
    }

    #[must_use]
    pub fn as_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Cents of a major-unit number. Fails on NaN, infinities and anything
    /// finer than a cent.
    pub fn try_from_major(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(invalid("Invalid amount format"));
        }

        let cents = value * 100.0;
        if (cents - cents.round()).abs() > 1e-6 {
            return Err(invalid("at most two decimals are allowed"));
        }
        if cents.abs() >= i64::MAX as f64 {
            return Err(invalid("amount too large"));
        }

        Ok(Self(cents.round() as i64))
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            f.write_str("-")?;
        }
        let abs = self.0.unsigned_abs();
        write!(f, "{}.{:02}", abs / 100, abs % 100)
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Parses `"12"`, `"12.5"` or `"12,50"`, optionally signed.
impl FromStr for MoneyCents {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = || invalid("Invalid amount format");
        let too_large = || invalid("amount too large");

        let s = s.trim();
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (whole, fraction) = match digits.split_once(['.', ',']) {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(format());
        }

        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => i64::from(fraction.as_bytes()[0] - b'0') * 10,
            2 => fraction.parse::<i64>().map_err(|_| format())?,
            _ => return Err(invalid("at most two decimals are allowed")),
        };

        let cents = whole
            .parse::<i64>()
            .ok()
            .and_then(|units| units.checked_mul(100))
            .and_then(|cents| cents.checked_add(fraction_cents))
            .ok_or_else(too_large)?;

        Ok(Self(if negative { -cents } else { cents }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_cents() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(7).to_string(), "0.07");
        assert_eq!(MoneyCents::new(4000).to_string(), "40.00");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parses_both_separators() {
        let parse = |s: &str| s.parse::<MoneyCents>().unwrap().cents();
        assert_eq!(parse("100"), 10_000);
        assert_eq!(parse("60.1"), 6_010);
        assert_eq!(parse("60,10"), 6_010);
        assert_eq!(parse(" 0.29 "), 29);
        assert_eq!(parse("-5"), -500);
        assert_eq!(parse("+5."), 500);
    }

    #[test]
    fn rejects_malformed_strings() {
        for input in ["", "-", "abc", "1.2.3", ".5", "12.345", "1e3", "99999999999999999999"] {
            assert!(input.parse::<MoneyCents>().is_err(), "{input:?}");
        }
    }

    #[test]
    fn major_units_round_to_the_cent() {
        assert_eq!(MoneyCents::try_from_major(60.1).unwrap().cents(), 6_010);
        assert_eq!(MoneyCents::try_from_major(0.29).unwrap().cents(), 29);
        assert_eq!(MoneyCents::new(4_050).as_major(), 40.5);

        assert!(MoneyCents::try_from_major(12.345).is_err());
        assert!(MoneyCents::try_from_major(f64::NAN).is_err());
        assert!(MoneyCents::try_from_major(f64::INFINITY).is_err());
    }
}
