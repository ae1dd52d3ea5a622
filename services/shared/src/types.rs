/// Type-safe wrappers for domain primitives
///
/// These types prevent common errors by enforcing validation at construction time
/// and providing checked arithmetic operations.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

use crate::constants::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Bet amount {amount} is not a selectable stake (allowed: 0.1, 0.5, 1)")]
    InvalidBetAmount { amount: Amount },

    #[error("Amount must not be negative: {0}")]
    NegativeAmount(f64),

    #[error("Amount must be a finite number")]
    NonFiniteAmount,

    #[error("Invalid amount format: {0:?}")]
    InvalidAmountFormat(String),

    #[error("Amount overflow in operation")]
    AmountOverflow,

    #[error("Unknown coin face: {0:?}")]
    UnknownFace(String),
}

/// Point amount stored as whole cents
///
/// Every value is already rounded to 2 decimal places, so repeated
/// arithmetic never drifts the way binary floating point does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Balance of a fresh or reset session
    pub const STARTING_BALANCE: Amount = Amount(STARTING_BALANCE_CENTS);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Create from a point value, rounding to 2 decimal places
    pub fn from_points(points: f64) -> Result<Self, ValidationError> {
        if !points.is_finite() {
            return Err(ValidationError::NonFiniteAmount);
        }
        let cents = (points * CENTS_PER_POINT as f64).round();
        if cents < 0.0 {
            return Err(ValidationError::NegativeAmount(points));
        }
        if cents >= u64::MAX as f64 {
            return Err(ValidationError::AmountOverflow);
        }
        Ok(Self(cents as u64))
    }

    /// Convert to points (as f64)
    pub fn to_points(&self) -> f64 {
        self.0 as f64 / CENTS_PER_POINT as f64
    }

    /// Checked addition
    pub fn checked_add(&self, other: Amount) -> Result<Self, ValidationError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(ValidationError::AmountOverflow)
    }

    /// Checked subtraction
    pub fn checked_sub(&self, other: Amount) -> Result<Self, ValidationError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(ValidationError::AmountOverflow)
    }

    /// Checked multiplication
    pub fn checked_mul(&self, multiplier: u64) -> Result<Self, ValidationError> {
        self.0
            .checked_mul(multiplier)
            .map(Self)
            .ok_or(ValidationError::AmountOverflow)
    }
}

/// Renders with at most 2 decimals and no forced trailing zero:
/// `0.10` is "0.1", `1.00` is "1", `0.25` stays "0.25".
impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.0 / CENTS_PER_POINT;
        let frac = self.0 % CENTS_PER_POINT;
        if frac == 0 {
            write!(f, "{}", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}", whole, frac)
        }
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let points = trimmed
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidAmountFormat(s.to_string()))?;
        Self::from_points(points)
    }
}

// Stored and exchanged as a plain JSON number of points
impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.to_points())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let points = f64::deserialize(deserializer)?;
        Amount::from_points(points)
            .map_err(|e| serde::de::Error::custom(format!("Invalid amount: {}", e)))
    }
}

/// One of the fixed selectable stakes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BetOption {
    /// 0.1 point
    #[default]
    Tenth,
    /// 0.5 point
    Half,
    /// 1 point
    Whole,
}

impl BetOption {
    pub const ALL: [BetOption; 3] = [BetOption::Tenth, BetOption::Half, BetOption::Whole];

    /// Stake deducted when a flip is placed with this option
    pub fn amount(self) -> Amount {
        let cents = match self {
            BetOption::Tenth => BET_OPTIONS_CENTS[0],
            BetOption::Half => BET_OPTIONS_CENTS[1],
            BetOption::Whole => BET_OPTIONS_CENTS[2],
        };
        Amount::from_cents(cents)
    }
}

impl TryFrom<Amount> for BetOption {
    type Error = ValidationError;

    fn try_from(amount: Amount) -> Result<Self, Self::Error> {
        BetOption::ALL
            .into_iter()
            .find(|option| option.amount() == amount)
            .ok_or(ValidationError::InvalidBetAmount { amount })
    }
}

impl FromStr for BetOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BetOption::try_from(s.parse::<Amount>()?)
    }
}

impl std::fmt::Display for BetOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.amount())
    }
}

/// Side of the coin, used both for the prediction and the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinFace {
    #[default]
    Heads,
    Tails,
}

impl CoinFace {
    /// Map a fair boolean draw to a face (true = heads)
    pub fn from_draw(draw: bool) -> Self {
        if draw {
            CoinFace::Heads
        } else {
            CoinFace::Tails
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CoinFace::Heads => "heads",
            CoinFace::Tails => "tails",
        }
    }
}

impl FromStr for CoinFace {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heads" | "h" => Ok(CoinFace::Heads),
            "tails" | "t" => Ok(CoinFace::Tails),
            _ => Err(ValidationError::UnknownFace(s.to_string())),
        }
    }
}

impl std::fmt::Display for CoinFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
