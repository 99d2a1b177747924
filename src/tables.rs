use chrono::Local;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::{Itertools, MinMaxResult};

use crate::{core::snapshot::Snapshot, quantity::intensity::GramsPerKilowattHour};

pub fn build_series_table(snapshot: &Snapshot) -> Table {
    let midpoint = match snapshot.series.iter().map(|record| record.grams).minmax() {
        MinMaxResult::NoElements => GramsPerKilowattHour::ZERO,
        MinMaxResult::OneElement(grams) => grams,
        MinMaxResult::MinMax(min, max) => GramsPerKilowattHour(0.5 * (min.0 + max.0)),
    };

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Date", "Start", "ID", "Intensity", "kg/kWh", "Updated", ""]);
    for record in &snapshot.series {
        let is_current = snapshot.current.as_ref() == Some(record);
        let is_minimum = snapshot.minimum.as_ref() == Some(record);
        let (date, start) = match record.valid_from_time() {
            Some(valid_from) => {
                let valid_from = valid_from.with_timezone(&Local);
                (valid_from.format("%b %d").to_string(), valid_from.format("%H:%M").to_string())
            }
            None => (String::new(), record.valid_from.clone().unwrap_or_default()),
        };
        let mut start = Cell::new(start);
        if is_current {
            start = start.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            Cell::new(date).add_attribute(Attribute::Dim),
            start,
            Cell::new(record.id.as_ref().map(ToString::to_string).unwrap_or_default())
                .add_attribute(Attribute::Dim),
            Cell::new(record.grams)
                .set_alignment(CellAlignment::Right)
                .fg(if record.grams <= midpoint { Color::Green } else { Color::Red }),
            Cell::new(record.kilograms.0)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(record.last_update.as_deref().unwrap_or_default())
                .add_attribute(Attribute::Dim),
            Cell::new(marker(is_current, is_minimum)).fg(Color::Cyan),
        ]);
    }
    table
}

const fn marker(is_current: bool, is_minimum: bool) -> &'static str {
    match (is_current, is_minimum) {
        (true, true) => "now, min",
        (true, false) => "now",
        (false, true) => "min",
        (false, false) => "",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        api::ned::{Query, RawItem},
        core::configuration::Configuration,
        quantity::intensity::KilogramsPerKilowattHour,
    };

    #[test]
    fn test_build_series_table() {
        let now = Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap();
        let configuration = Configuration::builder().api_key("secret").build();
        let query = Query::new(&configuration, configuration.window(now));
        let items = [("2025-10-01T13:00:00+00:00", 0.3), ("2025-10-01T14:00:00+00:00", 0.1)]
            .into_iter()
            .map(|(valid_from, factor)| RawItem {
                valid_from: Some(valid_from.to_owned()),
                emission_factor: Some(KilogramsPerKilowattHour(factor)),
                ..RawItem::default()
            });
        let snapshot = Snapshot::new(items.collect(), query, now);

        let table = build_series_table(&snapshot);
        assert_eq!(table.row_count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("300 g/kWh"), "{rendered}");
        assert!(rendered.contains("now"), "{rendered}");
        assert!(rendered.contains("min"), "{rendered}");
    }

    #[test]
    fn test_marker() {
        assert_eq!(marker(true, true), "now, min");
        assert_eq!(marker(false, false), "");
    }
}
