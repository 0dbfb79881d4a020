//! Token amounts.
//!
//! Amounts are unsigned 256-bit integers. Arithmetic on ledger state is
//! always checked; callers use `checked_add` / `checked_sub` and surface
//! overflow as a domain error.

use crate::error::TypeError;

/// Unsigned 256-bit token amount.
pub type Amount = primitive_types::U256;

/// Parse an amount from a decimal string or a `0x`-prefixed hex string.
///
/// Underscores are accepted as digit separators (`1_000_000`).
pub fn parse_amount(input: &str) -> Result<Amount, TypeError> {
    let trimmed: String = input.trim().chars().filter(|c| *c != '_').collect();
    if trimmed.is_empty() {
        return Err(TypeError::InvalidAmount {
            input: input.to_string(),
            reason: "empty".into(),
        });
    }

    let parsed = match trimmed.strip_prefix("0x") {
        Some(hex_digits) => Amount::from_str_radix(hex_digits, 16).map_err(|e| e.to_string()),
        None => Amount::from_dec_str(&trimmed).map_err(|e| format!("{e:?}")),
    };

    parsed.map_err(|reason| TypeError::InvalidAmount {
        input: input.to_string(),
        reason,
    })
}

/// `floor(amount * percent / 100)` without intermediate overflow.
pub fn percent_of(amount: Amount, percent: u8) -> Amount {
    let hundred = Amount::from(100u64);
    let pct = Amount::from(percent);
    (amount / hundred) * pct + (amount % hundred) * pct / hundred
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_amount("100").unwrap(), Amount::from(100u64));
        assert_eq!(parse_amount("0x64").unwrap(), Amount::from(100u64));
        assert_eq!(parse_amount("1_000").unwrap(), Amount::from(1000u64));
    }

    #[test]
    fn parses_full_width_values() {
        let max = Amount::MAX.to_string();
        assert_eq!(parse_amount(&max).unwrap(), Amount::MAX);
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert!(matches!(
            parse_amount(""),
            Err(TypeError::InvalidAmount { .. })
        ));
        assert!(matches!(
            parse_amount("-5"),
            Err(TypeError::InvalidAmount { .. })
        ));
        assert!(matches!(
            parse_amount("12ab"),
            Err(TypeError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn percent_of_small_values() {
        assert_eq!(percent_of(Amount::from(100u64), 20), Amount::from(20u64));
        assert_eq!(percent_of(Amount::from(10_000u64), 20), Amount::from(2_000u64));
        assert_eq!(percent_of(Amount::from(9u64), 20), Amount::from(1u64));
        assert_eq!(percent_of(Amount::from(4u64), 20), Amount::zero());
    }

    #[test]
    fn percent_of_does_not_overflow_at_max() {
        let full = percent_of(Amount::MAX, 100);
        assert_eq!(full, Amount::MAX);
        assert!(percent_of(Amount::MAX, 20) < Amount::MAX);
    }

    proptest! {
        #[test]
        fn percent_of_matches_naive_formula(value in any::<u64>(), pct in 0u8..=100) {
            let expected = (value as u128) * (pct as u128) / 100;
            prop_assert_eq!(percent_of(Amount::from(value), pct), Amount::from(expected));
        }
    }
}
