use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::Display;
use strum_macros::EnumIter;

use crate::error::CommonError;

/// Precision/scale of the money columns in the output table.
pub const DECIMAL_PRECISION: u8 = 19;
pub const DECIMAL_SCALE: i8 = 2;

/// Rounds a monetary value to 2 decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum Region {
    North,
    South,
    East,
    West,
    Central,
}

impl Region {
    pub fn economic_strength(&self) -> f64 {
        match self {
            Region::North => 1.2,
            Region::South => 0.9,
            Region::East => 1.1,
            Region::West => 1.3,
            Region::Central => 1.0,
        }
    }

    pub fn tech_adoption(&self) -> f64 {
        match self {
            Region::North => 1.3,
            Region::South => 0.8,
            Region::East => 1.1,
            Region::West => 1.4,
            Region::Central => 1.0,
        }
    }
}

impl FromStr for Region {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::iter()
            .find(|r| r.to_string() == s)
            .ok_or_else(|| CommonError::UnknownRegion(s.to_string()))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum Segment {
    Enterprise,
    #[strum(serialize = "SMB")]
    Smb,
    Consumer,
    Education,
}

impl Segment {
    pub fn weight(&self) -> f64 {
        match self {
            Segment::Enterprise => 0.15,
            Segment::Smb => 0.35,
            Segment::Consumer => 0.40,
            Segment::Education => 0.10,
        }
    }

    /// Average-order-value multiplier applied to unit prices.
    pub fn avg_order_value(&self) -> f64 {
        match self {
            Segment::Enterprise => 2.5,
            Segment::Smb => 1.5,
            Segment::Consumer => 1.0,
            Segment::Education => 1.2,
        }
    }

    pub fn bulk_probability(&self) -> f64 {
        match self {
            Segment::Enterprise => 0.8,
            Segment::Smb => 0.4,
            Segment::Consumer => 0.1,
            Segment::Education => 0.6,
        }
    }

    /// Probability that a purchase of a bundle-capable product spawns a
    /// linked bundle transaction.
    pub fn bundle_probability(&self) -> f64 {
        match self {
            Segment::Enterprise => 0.4,
            Segment::Smb => 0.3,
            Segment::Consumer => 0.15,
            Segment::Education => 0.35,
        }
    }
}

impl FromStr for Segment {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Segment::iter()
            .find(|v| v.to_string() == s)
            .ok_or_else(|| CommonError::UnknownSegment(s.to_string()))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum Tier {
    #[strum(serialize = "top_performer")]
    Top,
    #[strum(serialize = "high_performer")]
    High,
    #[strum(serialize = "average_performer")]
    Average,
    #[strum(serialize = "low_performer")]
    Low,
}

impl Tier {
    pub fn weight(&self) -> f64 {
        match self {
            Tier::Top => 0.10,
            Tier::High => 0.20,
            Tier::Average => 0.50,
            Tier::Low => 0.20,
        }
    }

    /// Performance multiplier. Above 1 the salesperson closes with
    /// smaller discounts, below 1 with larger ones.
    pub fn performance_mult(&self) -> f64 {
        match self {
            Tier::Top => 1.8,
            Tier::High => 1.4,
            Tier::Average => 1.0,
            Tier::Low => 0.6,
        }
    }

    /// Suffix appended to the salesperson display name.
    pub fn name_suffix(&self) -> &'static str {
        match self {
            Tier::Top => " (Top)",
            Tier::High => " (High)",
            Tier::Average => "",
            Tier::Low => " (Low)",
        }
    }
}

impl FromStr for Tier {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::iter()
            .find(|v| v.to_string() == s)
            .ok_or_else(|| CommonError::UnknownTier(s.to_string()))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum Channel {
    Online,
    Retail,
    Partner,
    Direct,
}

impl Channel {
    pub fn weight(&self) -> f64 {
        match self {
            Channel::Online => 0.45,
            Channel::Retail => 0.30,
            Channel::Partner => 0.15,
            Channel::Direct => 0.10,
        }
    }

    /// Range of the channel-based base discount, percent.
    pub fn discount_range(&self) -> (f64, f64) {
        match self {
            Channel::Online => (0.0, 10.0),
            Channel::Retail => (0.0, 8.0),
            Channel::Partner => (5.0, 15.0),
            Channel::Direct => (8.0, 20.0),
        }
    }
}

impl FromStr for Channel {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::iter()
            .find(|v| v.to_string() == s)
            .ok_or_else(|| CommonError::UnknownChannel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn weights_sum_to_one() {
        let seg: f64 = Segment::iter().map(|s| s.weight()).sum();
        assert!((seg - 1.0).abs() < 1e-9);
        let tier: f64 = Tier::iter().map(|t| t.weight()).sum();
        assert!((tier - 1.0).abs() < 1e-9);
        let chan: f64 = Channel::iter().map(|c| c.weight()).sum();
        assert!((chan - 1.0).abs() < 1e-9);
    }

    #[test]
    fn enum_string_roundtrip() {
        assert_eq!(Segment::from_str("SMB").unwrap(), Segment::Smb);
        assert_eq!(Tier::from_str("top_performer").unwrap(), Tier::Top);
        assert_eq!(Region::from_str("Central").unwrap(), Region::Central);
        assert!(Channel::from_str("Fax").is_err());
    }

    #[test]
    fn round2_two_decimals() {
        assert_eq!(round2(10.256), 10.26);
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(1.25), 1.25);
    }
}
