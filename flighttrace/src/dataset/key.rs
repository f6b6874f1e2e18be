//! Validated cache keys.
//!
//! Tier and year usually arrive from untrusted UI or query input and end up in
//! resource names, so both are validated before anything else happens.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::error::DatasetError;
use super::tier::DetailTier;

/// Sentinel selecting every available year.
pub const ALL_YEARS: &str = "all";

/// Four-digit years from 2000 through 2099.
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^20[0-9]{2}$").expect("static year pattern"));

/// Year selection for a dataset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum YearSelector {
    /// A single concrete year in `[2000, 2099]`.
    Year(u16),
    /// Every year listed in the dataset metadata.
    All,
}

impl YearSelector {
    /// Parse and validate a year string (`"all"` or `2000`..=`2099`).
    pub fn parse(input: &str) -> Result<Self, DatasetError> {
        if input == ALL_YEARS {
            return Ok(YearSelector::All);
        }
        if !YEAR_PATTERN.is_match(input) {
            return Err(DatasetError::InvalidYear(input.to_string()));
        }
        input
            .parse::<u16>()
            .map(YearSelector::Year)
            .map_err(|_| DatasetError::InvalidYear(input.to_string()))
    }

    /// True for the "all years" sentinel.
    pub fn is_all(&self) -> bool {
        matches!(self, YearSelector::All)
    }
}

impl Default for YearSelector {
    fn default() -> Self {
        YearSelector::All
    }
}

impl fmt::Display for YearSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearSelector::Year(year) => write!(f, "{}", year),
            YearSelector::All => f.write_str(ALL_YEARS),
        }
    }
}

impl FromStr for YearSelector {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        YearSelector::parse(s)
    }
}

/// Cache key: one dataset per (tier, year) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetKey {
    /// Detail tier.
    pub tier: DetailTier,
    /// Year selection.
    pub year: YearSelector,
}

impl DatasetKey {
    /// Create a key from already validated parts.
    pub fn new(tier: DetailTier, year: YearSelector) -> Self {
        Self { tier, year }
    }

    /// Validate raw tier and year strings into a key.
    pub fn parse(tier: &str, year: &str) -> Result<Self, DatasetError> {
        Ok(Self {
            tier: tier.parse()?,
            year: YearSelector::parse(year)?,
        })
    }

    /// Resource name of the dataset payload, e.g. `z5_7_2025.json`.
    pub fn resource_name(&self) -> String {
        format!("{}_{}.json", self.tier.as_str(), self.year)
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tier, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_sentinel() {
        assert_eq!(YearSelector::parse("all").unwrap(), YearSelector::All);
    }

    #[test]
    fn test_parse_year_range() {
        assert_eq!(YearSelector::parse("2000").unwrap(), YearSelector::Year(2000));
        assert_eq!(YearSelector::parse("2025").unwrap(), YearSelector::Year(2025));
        assert_eq!(YearSelector::parse("2099").unwrap(), YearSelector::Year(2099));
    }

    #[test]
    fn test_parse_rejects_out_of_range_and_malformed() {
        for bad in [
            "1999", "2100", "25", "02025", "2025 ", " 2025", "ALL", "All", "", "20a5",
            "../2025", "2025/../../secrets", "2025.json",
        ] {
            let err = YearSelector::parse(bad).unwrap_err();
            assert!(matches!(err, DatasetError::InvalidYear(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_key_parse_validates_both_parts() {
        assert!(DatasetKey::parse("z5_7", "2025").is_ok());
        assert!(matches!(
            DatasetKey::parse("z99", "2025"),
            Err(DatasetError::InvalidTier(_))
        ));
        assert!(matches!(
            DatasetKey::parse("z5_7", "1850"),
            Err(DatasetError::InvalidYear(_))
        ));
    }

    #[test]
    fn test_resource_name() {
        let key = DatasetKey::new(DetailTier::Z8To10, YearSelector::Year(2024));
        assert_eq!(key.resource_name(), "z8_10_2024.json");

        let all = DatasetKey::new(DetailTier::Z0To4, YearSelector::All);
        assert_eq!(all.resource_name(), "z0_4_all.json");
        assert_eq!(all.to_string(), "z0_4/all");
    }
}
