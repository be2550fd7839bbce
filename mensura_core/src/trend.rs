//! Calendar-aligned aggregation of the measurement log.
//!
//! All functions take the records in the order [`crate::MeasurementLog::list_all`]
//! returns them: ascending by date.

use crate::{MeasureSeries, MeasurementRecord, WeeklyMean};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// Default trailing window for [`rolling_mean`]
pub const DEFAULT_ROLLING_WINDOW_DAYS: u32 = 7;

/// Largest window the CLI and config accept
pub const MAX_ROLLING_WINDOW_DAYS: u32 = 3650;

/// Project the records into one dated series per measure
pub fn raw_series(records: &[MeasurementRecord]) -> MeasureSeries {
    let mut series = MeasureSeries::with_capacity(records.len());
    for r in records {
        series.push(r.date, r.weight, r.waist, r.chest);
    }
    series
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[derive(Default)]
struct Sums {
    count: usize,
    weight: f64,
    waist: f64,
    chest: f64,
}

impl Sums {
    fn add(&mut self, r: &MeasurementRecord) {
        self.count += 1;
        self.weight += r.weight;
        self.waist += r.waist;
        self.chest += r.chest;
    }

    fn means(&self) -> (f64, f64, f64) {
        let n = self.count as f64;
        (self.weight / n, self.waist / n, self.chest / n)
    }
}

/// Per-measure mean for every ISO week (Monday start) holding at least one record
///
/// Rows are ordered by week start. Weeks without records are absent.
pub fn weekly_mean(records: &[MeasurementRecord]) -> Vec<WeeklyMean> {
    let mut weeks: BTreeMap<NaiveDate, Sums> = BTreeMap::new();
    for r in records {
        weeks.entry(week_start(r.date)).or_default().add(r);
    }

    weeks
        .into_iter()
        .map(|(week_start, sums)| {
            let (weight, waist, chest) = sums.means();
            WeeklyMean {
                week_start,
                count: sums.count,
                weight,
                waist,
                chest,
            }
        })
        .collect()
}

/// Time-windowed trailing mean, one row per record
///
/// The window for a record dated `d` covers `(d - window_days, d]`: a record
/// exactly `window_days` earlier is excluded, every record dated `d` is
/// included. A window of 0 days is treated as 1.
pub fn rolling_mean(records: &[MeasurementRecord], window_days: u32) -> MeasureSeries {
    debug_assert!(
        records.windows(2).all(|w| w[0].date <= w[1].date),
        "records must be sorted by date"
    );

    let window = Duration::days(i64::from(window_days.max(1)));
    let mut series = MeasureSeries::with_capacity(records.len());
    let mut left = 0;
    let mut right = 0;

    for current in records {
        while right < records.len() && records[right].date <= current.date {
            right += 1;
        }
        // No left edge when the window reaches past the calendar's range
        if let Some(edge) = current.date.checked_sub_signed(window) {
            while records[left].date <= edge {
                left += 1;
            }
        }

        let mut sums = Sums::default();
        for r in &records[left..right] {
            sums.add(r);
        }
        let (weight, waist, chest) = sums.means();
        series.push(current.date, weight, waist, chest);
    }

    series
}
