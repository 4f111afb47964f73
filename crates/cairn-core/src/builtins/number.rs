use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::error::CoreError;

/// Arbitrary-precision rational. Kept normalized: the denominator is
/// positive and coprime with the numerator, except that a zero denominator
/// encodes the non-finite values — numerator 1 is +Inf, -1 is -Inf and 0 is
/// NaN.
#[derive(Clone, Debug)]
pub struct Number {
    num: BigInt,
    den: BigInt,
}

impl Default for Number {
    fn default() -> Self {
        Number::from_int(0)
    }
}

impl Number {
    pub fn from_int(n: impl Into<BigInt>) -> Self {
        Number {
            num: n.into(),
            den: BigInt::from(1),
        }
    }

    pub fn ratio(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Self {
        Number {
            num: num.into(),
            den: den.into(),
        }
        .normalized()
    }

    pub fn nan() -> Self {
        Number {
            num: BigInt::zero(),
            den: BigInt::zero(),
        }
    }

    pub fn infinity(negative: bool) -> Self {
        Number {
            num: BigInt::from(if negative { -1 } else { 1 }),
            den: BigInt::zero(),
        }
    }

    fn normalized(mut self) -> Self {
        if self.den.is_zero() {
            self.num = self.num.signum();
            return self;
        }
        if self.den.is_negative() {
            self.num = -self.num;
            self.den = -self.den;
        }
        let g = gcd(self.num.abs(), self.den.clone());
        if !g.is_zero() {
            self.num /= &g;
            self.den /= &g;
        }
        self
    }

    pub fn is_nan(&self) -> bool {
        self.den.is_zero() && self.num.is_zero()
    }

    pub fn is_infinite(&self) -> bool {
        self.den.is_zero() && !self.num.is_zero()
    }

    pub fn is_finite(&self) -> bool {
        !self.den.is_zero()
    }

    pub fn is_integer(&self) -> bool {
        self.den == BigInt::from(1)
    }

    pub fn is_zero(&self) -> bool {
        self.is_finite() && self.num.is_zero()
    }

    /// The numerator, when this is a whole number.
    pub fn as_integer(&self) -> Option<&BigInt> {
        if self.is_integer() {
            Some(&self.num)
        } else {
            None
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        if self.den.is_zero() && other.den.is_zero() {
            // Same-signed infinities keep their sign; everything else is
            // indeterminate.
            if self.num == other.num && !self.num.is_zero() {
                return self.clone();
            }
            return Number::nan();
        }
        Number {
            num: &self.num * &other.den + &other.num * &self.den,
            den: &self.den * &other.den,
        }
        .normalized()
    }

    pub fn neg(&self) -> Number {
        Number {
            num: -self.num.clone(),
            den: self.den.clone(),
        }
    }

    pub fn sub(&self, other: &Number) -> Number {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Number) -> Number {
        Number {
            num: &self.num * &other.num,
            den: &self.den * &other.den,
        }
        .normalized()
    }

    /// Division never fails: a zero divisor yields an infinity or NaN.
    pub fn div(&self, other: &Number) -> Number {
        Number {
            num: &self.num * &other.den,
            den: &self.den * &other.num,
        }
        .normalized()
    }

    /// Floored modulo over whole numbers; the result takes the divisor's
    /// sign. Non-integers and a zero divisor are dynamic errors.
    pub fn modulo(&self, other: &Number) -> Result<Number, CoreError> {
        let (a, b) = self.integer_pair(other, "mod")?;
        Ok(Number::from_int(((a % b) + b) % b))
    }

    /// Truncating remainder over whole numbers; the result takes the
    /// dividend's sign.
    pub fn remainder(&self, other: &Number) -> Result<Number, CoreError> {
        let (a, b) = self.integer_pair(other, "rem")?;
        Ok(Number::from_int(a % b))
    }

    fn integer_pair<'a>(
        &'a self,
        other: &'a Number,
        op: &str,
    ) -> Result<(&'a BigInt, &'a BigInt), CoreError> {
        let a = self
            .as_integer()
            .ok_or_else(|| CoreError::message(format!("{} expects integers, got {}", op, self)))?;
        let b = other
            .as_integer()
            .ok_or_else(|| CoreError::message(format!("{} expects integers, got {}", op, other)))?;
        if b.is_zero() {
            return Err(CoreError::message(format!("{} by zero", op)));
        }
        Ok((a, b))
    }
}

fn gcd(mut a: BigInt, mut b: BigInt) -> BigInt {
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::from_int(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::from_int(n)
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::from_int(n)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        if self.is_nan() || other.is_nan() {
            return false;
        }
        self.num == other.num && self.den == other.den
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        // Cross-multiplication degenerates to 0 vs 0 when both denominators
        // are zero, so two infinities compare by numerator sign.
        if self.is_infinite() && other.is_infinite() {
            return Some(self.num.cmp(&other.num));
        }
        // Denominators are non-negative, so cross-multiplying keeps order;
        // one-sided infinities fall out of the zero denominator.
        Some((&self.num * &other.den).cmp(&(&other.num * &self.den)))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_zero() {
            return match self.num.sign() {
                num_bigint::Sign::Plus => write!(f, "Inf"),
                num_bigint::Sign::Minus => write!(f, "-Inf"),
                num_bigint::Sign::NoSign => write!(f, "NaN"),
            };
        }
        if self.is_integer() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
