//! Enums stored as integer columns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Soft-disable flag carried by every row. Stored as `1` / `0`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Row is in use.
    #[default]
    #[sea_orm(num_value = 1)]
    Active,
    /// Row is disabled but still exists.
    #[sea_orm(num_value = 0)]
    Inactive,
}

impl RecordStatus {
    /// The opposite status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = String;

    /// Accepts `active`/`inactive` as well as the stored `1`/`0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" | "1" => Ok(Self::Active),
            "inactive" | "0" => Ok(Self::Inactive),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("active", RecordStatus::Active)]
    #[case("1", RecordStatus::Active)]
    #[case("inactive", RecordStatus::Inactive)]
    #[case("0", RecordStatus::Inactive)]
    fn test_parse_status(#[case] input: &str, #[case] expected: RecordStatus) {
        assert_eq!(input.parse::<RecordStatus>(), Ok(expected));
    }

    #[test]
    fn test_parse_unknown_status() {
        assert!("enabled".parse::<RecordStatus>().is_err());
    }

    #[test]
    fn test_toggle_is_an_involution() {
        assert_eq!(RecordStatus::Active.toggled(), RecordStatus::Inactive);
        assert_eq!(RecordStatus::Active.toggled().toggled(), RecordStatus::Active);
    }

    #[test]
    fn test_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&RecordStatus::Inactive).unwrap(),
            "\"inactive\""
        );
    }
}
