use chrono::{DateTime, Utc};

use crate::{api::ned::RawItem, core::record::Record};

/// Records ordered by the raw validity start.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, derive_more::Deref, derive_more::IntoIterator)]
pub struct Series(#[into_iterator(owned, ref)] Vec<Record>);

impl FromIterator<RawItem> for Series {
    fn from_iter<T: IntoIterator<Item = RawItem>>(items: T) -> Self {
        let mut records: Vec<Record> = items.into_iter().map(Record::from).collect();
        records.sort_by(|lhs, rhs| lhs.sort_key().cmp(rhs.sort_key()));
        Self(records)
    }
}

impl Series {
    /// First record starting at or after `now`, falls back to the last one.
    ///
    /// Records with an unparsable validity start are skipped.
    #[must_use]
    pub fn current(&self, now: DateTime<Utc>) -> Option<&Record> {
        self.0
            .iter()
            .find(|record| record.valid_from_time().is_some_and(|valid_from| valid_from >= now))
            .or_else(|| self.0.last())
    }

    /// Record with the lowest emission factor.
    ///
    /// Among equal minima the earliest one wins, callers should not rely on that.
    #[must_use]
    pub fn minimum(&self) -> Option<&Record> {
        self.0.iter().min_by_key(|record| record.grams)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{SecondsFormat, TimeDelta, TimeZone};

    use super::*;
    use crate::{api::ned::ItemId, quantity::intensity::KilogramsPerKilowattHour};

    fn item(id: i64, valid_from: Option<String>, kilograms: f64) -> RawItem {
        RawItem {
            id: Some(ItemId::Number(id)),
            valid_from,
            emission_factor: Some(KilogramsPerKilowattHour(kilograms)),
            ..RawItem::default()
        }
    }

    fn at(now: DateTime<Utc>, hours: i64) -> Option<String> {
        Some((now + TimeDelta::hours(hours)).to_rfc3339_opts(SecondsFormat::Secs, false))
    }

    fn ids<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<Option<ItemId>> {
        records.into_iter().map(|record| record.id.clone()).collect()
    }

    fn id_of(record: Option<&Record>) -> Option<ItemId> {
        record.and_then(|record| record.id.clone())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_sorted_by_valid_from() {
        let now = now();
        let series: Series = vec![
            item(1, at(now, 5), 0.3),
            item(2, None, 0.2),
            item(3, at(now, -1), 0.1),
            item(4, at(now, 2), 0.4),
        ]
        .into_iter()
        .collect();
        assert!(series.is_sorted_by_key(|record| record.sort_key().to_owned()));
        assert_eq!(
            ids(&series),
            vec![
                Some(ItemId::Number(2)),
                Some(ItemId::Number(3)),
                Some(ItemId::Number(4)),
                Some(ItemId::Number(1)),
            ],
        );
    }

    #[test]
    fn test_current_is_first_upcoming() {
        let now = now();
        let series: Series = vec![
            item(1, at(now, 5), 0.3),
            item(2, at(now, -1), 0.2),
            item(3, at(now, 2), 0.1),
        ]
        .into_iter()
        .collect();
        assert_eq!(id_of(series.current(now)), Some(ItemId::Number(3)));
    }

    #[test]
    fn test_current_includes_now() {
        let now = now();
        let series: Series = vec![item(1, at(now, 0), 0.3)].into_iter().collect();
        assert_eq!(id_of(series.current(now)), Some(ItemId::Number(1)));
    }

    #[test]
    fn test_current_skips_unparsable() {
        let now = now();
        let series: Series = vec![
            item(1, Some("9999-garbage".to_owned()), 0.3),
            item(2, at(now, 1), 0.2),
        ]
        .into_iter()
        .collect();
        assert_eq!(id_of(series.current(now)), Some(ItemId::Number(2)));
    }

    #[test]
    fn test_current_falls_back_to_last() {
        let now = now();
        let series: Series =
            vec![item(1, at(now, -3), 0.3), item(2, at(now, -2), 0.2)].into_iter().collect();
        assert_eq!(id_of(series.current(now)), Some(ItemId::Number(2)));
    }

    #[test]
    fn test_minimum() {
        let now = now();
        let series: Series = vec![
            item(1, at(now, 1), 0.3),
            item(2, at(now, 2), 0.05),
            item(3, at(now, 3), 0.2),
        ]
        .into_iter()
        .collect();
        assert_eq!(id_of(series.minimum()), Some(ItemId::Number(2)));
    }

    #[test]
    fn test_missing_emission_factor_counts_as_zero() {
        let now = now();
        let series: Series =
            vec![item(1, at(now, 1), 0.3), RawItem::default()].into_iter().collect();
        assert_eq!(series.minimum().map(|record| record.grams.0), Some(0.0));
    }

    #[test]
    fn test_empty() {
        let series: Series = Vec::<RawItem>::new().into_iter().collect();
        assert!(series.is_empty());
        assert!(series.current(now()).is_none());
        assert!(series.minimum().is_none());
    }
}
