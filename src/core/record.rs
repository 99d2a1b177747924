use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::{
    api::ned::{ItemId, RawItem},
    prelude::*,
    quantity::intensity::{GramsPerKilowattHour, KilogramsPerKilowattHour},
};

/// Normalised item, built fresh every poll cycle.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    pub id: Option<ItemId>,

    #[serde(rename = "validfrom")]
    pub valid_from: Option<String>,

    #[serde(rename = "validto")]
    pub valid_to: Option<String>,

    #[serde(rename = "emissionfactor_kg_per_kwh")]
    pub kilograms: KilogramsPerKilowattHour,

    #[serde(rename = "emissionfactor_g_per_kwh")]
    pub grams: GramsPerKilowattHour,

    #[serde(rename = "lastupdate")]
    pub last_update: Option<String>,
}

impl From<RawItem> for Record {
    fn from(item: RawItem) -> Self {
        let kilograms = item.emission_factor.unwrap_or_else(|| {
            warn!(
                id = ?item.id,
                valid_from = ?item.valid_from,
                "missing emission factor, assuming zero"
            );
            KilogramsPerKilowattHour::ZERO
        });
        Self {
            id: item.id,
            valid_from: item.valid_from,
            valid_to: item.valid_to,
            kilograms,
            grams: kilograms.into(),
            last_update: item.last_update,
        }
    }
}

impl Record {
    /// Sorting key: the raw timestamp, absent one sorts first.
    #[must_use]
    pub fn sort_key(&self) -> &str {
        self.valid_from.as_deref().unwrap_or_default()
    }

    /// Parsed start of the validity period, `None` when absent or unparsable.
    #[must_use]
    pub fn valid_from_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.valid_from.as_deref()?).ok()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_from_raw_item() {
        let record = Record::from(RawItem {
            id: Some(ItemId::Number(1)),
            valid_from: Some("2025-10-01T12:00:00+00:00".to_owned()),
            emission_factor: Some(KilogramsPerKilowattHour(0.0452)),
            ..RawItem::default()
        });
        assert_abs_diff_eq!(record.kilograms.0, 0.0452);
        assert_abs_diff_eq!(record.grams.0, 45.2, epsilon = 1e-9);
        assert!(record.valid_to.is_none());
        assert!(record.last_update.is_none());
        assert!(record.valid_from_time().is_some());
    }

    #[test]
    fn test_missing_emission_factor_is_zero() {
        let record = Record::from(RawItem::default());
        assert_abs_diff_eq!(record.kilograms.0, 0.0);
        assert_abs_diff_eq!(record.grams.0, 0.0);
        assert!(record.id.is_none());
        assert_eq!(record.sort_key(), "");
    }

    #[test]
    fn test_unparsable_valid_from() {
        let record = Record::from(RawItem {
            valid_from: Some("tomorrow".to_owned()),
            ..RawItem::default()
        });
        assert!(record.valid_from_time().is_none());
    }
}
