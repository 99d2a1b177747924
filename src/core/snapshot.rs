use chrono::{DateTime, Utc};

use crate::{
    api::ned::Query,
    core::{interval::format_utc, record::Record, series::Series},
};

/// Fully computed result of a successful poll cycle.
#[must_use]
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub series: Series,
    pub current: Option<Record>,
    pub minimum: Option<Record>,
    pub metadata: Metadata,
}

#[must_use]
#[derive(Clone, Debug)]
pub struct Metadata {
    /// Request parameters the series was fetched with.
    pub query: Query,

    pub count: usize,

    pub fetched_at: DateTime<Utc>,
}

impl Metadata {
    /// Fetch timestamp as UTC ISO-8601 with the `Z` suffix.
    #[must_use]
    pub fn fetched_at_iso(&self) -> String {
        format_utc(self.fetched_at)
    }
}

impl Snapshot {
    pub fn new(series: Series, query: Query, now: DateTime<Utc>) -> Self {
        Self {
            current: series.current(now).cloned(),
            minimum: series.minimum().cloned(),
            metadata: Metadata { query, count: series.len(), fetched_at: now },
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::{
        api::ned::{ItemId, RawItem},
        core::configuration::Configuration,
        quantity::intensity::KilogramsPerKilowattHour,
    };

    fn query(now: DateTime<Utc>) -> Query {
        let configuration = Configuration::builder().api_key("secret").build();
        Query::new(&configuration, configuration.window(now))
    }

    #[test]
    fn test_new() {
        let now = Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap();
        let items = vec![
            RawItem {
                id: Some(ItemId::Number(1)),
                valid_from: Some("2025-10-01T13:00:00+00:00".to_owned()),
                emission_factor: Some(KilogramsPerKilowattHour(0.3)),
                ..RawItem::default()
            },
            RawItem {
                id: Some(ItemId::Number(2)),
                valid_from: Some("2025-10-01T14:00:00+00:00".to_owned()),
                emission_factor: Some(KilogramsPerKilowattHour(0.1)),
                ..RawItem::default()
            },
        ];
        let snapshot = Snapshot::new(items.into_iter().collect(), query(now), now);
        assert_eq!(snapshot.current.and_then(|record| record.id), Some(ItemId::Number(1)));
        assert_eq!(snapshot.minimum.and_then(|record| record.id), Some(ItemId::Number(2)));
        assert_eq!(snapshot.metadata.count, 2);
        assert_eq!(snapshot.metadata.fetched_at_iso(), "2025-10-01T12:00:00Z");
        assert_eq!(snapshot.metadata.query.after, now);
    }

    #[test]
    fn test_empty() {
        let now = Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap();
        let snapshot = Snapshot::new(Series::default(), query(now), now);
        assert!(snapshot.series.is_empty());
        assert!(snapshot.current.is_none());
        assert!(snapshot.minimum.is_none());
        assert_eq!(snapshot.metadata.count, 0);
    }
}
