use std::cmp::Ordering;
use std::fmt;

use ethers::types::{I256, U256};
use ethers::types::Sign;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("amount scales do not match: {left} vs {right}")]
    ScaleMismatch { left: u32, right: u32 },
    #[error("amount arithmetic overflowed")]
    Overflow,
    #[error("division by zero amount")]
    DivisionByZero,
    #[error("literal {literal:?} has more than {scale} fractional digits")]
    PrecisionLoss { literal: String, scale: u32 },
    #[error("invalid decimal literal: {0:?}")]
    InvalidLiteral(String),
    #[error("negative amount cannot be converted to unsigned units")]
    NegativeUnsigned,
}

/// A token quantity in its smallest unit: a signed 256-bit integer paired
/// with an explicit decimal scale. All arithmetic is exact; operations that
/// would silently mix scales or drop fractional units return `MathError`
/// instead. Down-rescaling and division truncate toward zero, never round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount {
    raw: I256,
    scale: u32,
}

/// 10^scale as I256, checked. 10^77 overflows 256 bits signed.
fn pow10(scale: u32) -> Result<I256, MathError> {
    let ten = I256::from(10);
    let mut value = I256::one();
    for _ in 0..scale {
        value = value.checked_mul(ten).ok_or(MathError::Overflow)?;
    }
    Ok(value)
}

impl Amount {
    pub fn new(raw: I256, scale: u32) -> Self {
        Self { raw, scale }
    }

    pub fn zero(scale: u32) -> Self {
        Self { raw: I256::zero(), scale }
    }

    /// Whole token units scaled up to smallest units, e.g. `from_whole(100, 6)` is 100e6.
    pub fn from_whole(units: i64, scale: u32) -> Result<Self, MathError> {
        let raw = I256::from(units)
            .checked_mul(pow10(scale)?)
            .ok_or(MathError::Overflow)?;
        Ok(Self { raw, scale })
    }

    pub fn from_u256(value: U256, scale: u32) -> Result<Self, MathError> {
        let raw = I256::checked_from_sign_and_abs(Sign::Positive, value)
            .ok_or(MathError::Overflow)?;
        Ok(Self { raw, scale })
    }

    /// Parses a decimal literal at the given scale, e.g. `parse("0.05", 4)` is
    /// raw 500. Fails if the literal carries more fractional digits than the
    /// scale can represent.
    pub fn parse(literal: &str, scale: u32) -> Result<Self, MathError> {
        let trimmed = literal.trim();
        let invalid = || MathError::InvalidLiteral(literal.to_string());

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (unsigned, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let significant_frac = frac_part.trim_end_matches('0');
        if significant_frac.len() as u32 > scale {
            return Err(MathError::PrecisionLoss {
                literal: literal.to_string(),
                scale,
            });
        }

        let int_part = if int_part.is_empty() { "0" } else { int_part };
        let combined = format!("{int_part}{significant_frac:0<width$}", width = scale as usize);
        let mut raw = I256::from_dec_str(&combined).map_err(|_| MathError::Overflow)?;
        if negative {
            raw = raw.checked_neg().ok_or(MathError::Overflow)?;
        }
        Ok(Self { raw, scale })
    }

    pub fn raw(&self) -> I256 {
        self.raw
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.raw.is_negative()
    }

    /// Strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.raw.is_positive()
    }

    pub fn to_u256(&self) -> Result<U256, MathError> {
        if self.raw.is_negative() {
            return Err(MathError::NegativeUnsigned);
        }
        Ok(self.raw.into_raw())
    }

    fn require_same_scale(&self, other: &Self) -> Result<(), MathError> {
        if self.scale != other.scale {
            return Err(MathError::ScaleMismatch {
                left: self.scale,
                right: other.scale,
            });
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self, MathError> {
        self.require_same_scale(other)?;
        let raw = self.raw.checked_add(other.raw).ok_or(MathError::Overflow)?;
        Ok(Self { raw, scale: self.scale })
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self, MathError> {
        self.require_same_scale(other)?;
        let raw = self.raw.checked_sub(other.raw).ok_or(MathError::Overflow)?;
        Ok(Self { raw, scale: self.scale })
    }

    /// Multiplication of two amounts yields the sum of their scales; callers
    /// rescale explicitly when they want a narrower precision.
    pub fn checked_mul(&self, other: &Self) -> Result<Self, MathError> {
        let raw = self.raw.checked_mul(other.raw).ok_or(MathError::Overflow)?;
        Ok(Self {
            raw,
            scale: self.scale + other.scale,
        })
    }

    /// Truncates toward zero. The divisor's scale is subtracted from the
    /// dividend's, so dividing two same-scale amounts yields a scale-0 ratio.
    pub fn checked_div(&self, other: &Self) -> Result<Self, MathError> {
        if other.raw.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        if other.scale > self.scale {
            return Err(MathError::ScaleMismatch {
                left: self.scale,
                right: other.scale,
            });
        }
        let raw = self.raw.checked_div(other.raw).ok_or(MathError::Overflow)?;
        Ok(Self {
            raw,
            scale: self.scale - other.scale,
        })
    }

    /// Rescaling up is exact; rescaling down truncates toward zero.
    pub fn rescale(&self, to: u32) -> Result<Self, MathError> {
        let raw = match to.cmp(&self.scale) {
            Ordering::Equal => self.raw,
            Ordering::Greater => self
                .raw
                .checked_mul(pow10(to - self.scale)?)
                .ok_or(MathError::Overflow)?,
            Ordering::Less => self
                .raw
                .checked_div(pow10(self.scale - to)?)
                .ok_or(MathError::Overflow)?,
        };
        Ok(Self { raw, scale: to })
    }
}

impl PartialOrd for Amount {
    /// Amounts at different scales are not comparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.scale != other.scale {
            return None;
        }
        Some(self.raw.cmp(&other.raw))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.raw);
        }
        let sign = if self.raw.is_negative() { "-" } else { "" };
        let digits = self.raw.unsigned_abs().to_string();
        let width = self.scale as usize + 1;
        let padded = format!("{digits:0>width$}");
        let (int_part, frac_part) = padded.split_at(padded.len() - self.scale as usize);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fractional_literal_at_scale() {
        let slippage = Amount::parse("0.05", 4).unwrap();
        assert_eq!(slippage.raw(), I256::from(500));
        assert_eq!(slippage.scale(), 4);
    }

    #[test]
    fn parses_whole_and_negative_literals() {
        assert_eq!(Amount::parse("100", 6).unwrap().raw(), I256::from(100_000_000));
        assert_eq!(Amount::parse("-2.5", 8).unwrap().raw(), I256::from(-250_000_000));
    }

    #[test]
    fn parse_rejects_excess_fractional_digits() {
        assert!(matches!(
            Amount::parse("0.055", 2),
            Err(MathError::PrecisionLoss { .. })
        ));
        // Trailing zeros beyond the scale carry no value and are accepted.
        assert_eq!(Amount::parse("0.0500", 2).unwrap().raw(), I256::from(5));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(Amount::parse("", 2), Err(MathError::InvalidLiteral(_))));
        assert!(matches!(Amount::parse(".", 2), Err(MathError::InvalidLiteral(_))));
        assert!(matches!(Amount::parse("1,5", 2), Err(MathError::InvalidLiteral(_))));
    }

    #[test]
    fn add_and_sub_require_matching_scales() {
        let a = Amount::from_whole(5, 6).unwrap();
        let b = Amount::from_whole(3, 6).unwrap();
        assert_eq!(a.checked_sub(&b).unwrap().raw(), I256::from(2_000_000));

        let mismatched = Amount::from_whole(3, 18).unwrap();
        assert!(matches!(
            a.checked_add(&mismatched),
            Err(MathError::ScaleMismatch { left: 6, right: 18 })
        ));
    }

    #[test]
    fn mul_sums_scales() {
        let amount = Amount::from_whole(100, 18).unwrap();
        let price = Amount::parse("2.50", 8).unwrap();
        let product = amount.checked_mul(&price).unwrap();
        assert_eq!(product.scale(), 26);
        assert_eq!(product, Amount::from_whole(250, 26).unwrap());
    }

    #[test]
    fn div_truncates_toward_zero() {
        let seven = Amount::new(I256::from(7), 0);
        let minus_seven = Amount::new(I256::from(-7), 0);
        let two = Amount::new(I256::from(2), 0);
        assert_eq!(seven.checked_div(&two).unwrap().raw(), I256::from(3));
        assert_eq!(minus_seven.checked_div(&two).unwrap().raw(), I256::from(-3));
        assert!(matches!(
            seven.checked_div(&Amount::zero(0)),
            Err(MathError::DivisionByZero)
        ));
    }

    #[test]
    fn rescale_up_then_down_is_lossless() {
        let original = Amount::parse("123.456789", 6).unwrap();
        let widened = original.rescale(18).unwrap();
        assert_eq!(widened.rescale(6).unwrap(), original);
    }

    #[test]
    fn rescale_down_truncates_toward_zero() {
        let value = Amount::new(I256::from(1_999_999), 6);
        assert_eq!(value.rescale(0).unwrap().raw(), I256::from(1));
        let negative = Amount::new(I256::from(-1_999_999), 6);
        assert_eq!(negative.rescale(0).unwrap().raw(), I256::from(-1));
    }

    #[test]
    fn amounts_at_different_scales_do_not_compare() {
        let a = Amount::from_whole(1, 6).unwrap();
        let b = Amount::from_whole(1, 18).unwrap();
        assert_eq!(a.partial_cmp(&b), None);
        assert!(a < Amount::from_whole(2, 6).unwrap());
    }

    #[test]
    fn displays_with_decimal_point() {
        assert_eq!(Amount::new(I256::from(4_750_000), 6).to_string(), "4.750000");
        assert_eq!(Amount::new(I256::from(-500), 4).to_string(), "-0.0500");
        assert_eq!(Amount::new(I256::from(42), 0).to_string(), "42");
    }

    #[test]
    fn to_u256_rejects_negative() {
        let negative = Amount::from_whole(-1, 6).unwrap();
        assert!(matches!(negative.to_u256(), Err(MathError::NegativeUnsigned)));
        let positive = Amount::from_whole(7, 6).unwrap();
        assert_eq!(positive.to_u256().unwrap(), U256::from(7_000_000u64));
    }
}
