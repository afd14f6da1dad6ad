use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// This module exists purely so we don't have to silence lints for the code `construct_uint!`
/// generates.
#[allow(clippy::all)]
mod uints {
    uint::construct_uint! {
        pub struct U256(4);
    }
    uint::construct_uint! {
        pub struct U512(8);
    }
}

use uints::{U256, U512};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount overflow")]
    Overflow,
    #[error("amount underflow")]
    Underflow,
    #[error("invalid decimal amount: {0}")]
    InvalidDecimal(String),
}

/// A non-negative integer of at least 256 bits. Carried as a decimal string on the wire and as a
/// big integer in memory; all arithmetic here is truncating-integer. No floating point is ever
/// admitted into state.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    pub const fn zero() -> Self {
        Amount(U256::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn from_dec_str(s: &str) -> Result<Self, AmountError> {
        U256::from_dec_str(s).map(Amount).map_err(|_| AmountError::InvalidDecimal(s.to_string()))
    }

    pub fn checked_add(self, other: Self) -> Result<Self, AmountError> {
        self.0.checked_add(other.0).map(Amount).ok_or(AmountError::Overflow)
    }

    pub fn checked_sub(self, other: Self) -> Result<Self, AmountError> {
        self.0.checked_sub(other.0).map(Amount).ok_or(AmountError::Underflow)
    }

    /// Saturating subtraction: used where "profit" is defined as `max(withdrawn - initial, 0)`
    /// rather than an error when `withdrawn <= initial`.
    pub fn saturating_sub(self, other: Self) -> Self {
        if self.0 >= other.0 {
            Amount(self.0 - other.0)
        } else {
            Amount::zero()
        }
    }

    pub fn checked_mul(self, other: Self) -> Result<Self, AmountError> {
        self.0.checked_mul(other.0).map(Amount).ok_or(AmountError::Overflow)
    }

    /// `floor(self * numerator / denominator)`, computed with a widened intermediate so the
    /// multiply cannot overflow within the range of amounts this engine deals with: widen before
    /// multiplying, narrow after dividing. Returns `None` if `denominator` is zero; callers must
    /// guard explicitly (e.g. an empty total weight).
    pub fn mul_div_floor(self, numerator: Self, denominator: Self) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let wide = U512::from(self.0) * U512::from(numerator.0) / U512::from(denominator.0);
        Some(Amount(U256::try_from(wide).ok()?))
    }

    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }
}

impl From<u128> for Amount {
    fn from(v: u128) -> Self {
        Amount(U256::from(v))
    }
}

impl std::ops::Add for Amount {
    type Output = Amount;
    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Amount;
    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal string representing a non-negative integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_dec_str(v).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(AmountVisitor)
    }
}

impl schemars::JsonSchema for Amount {
    fn schema_name() -> String {
        "Amount".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}
