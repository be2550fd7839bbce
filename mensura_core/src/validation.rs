//! Range bounds enforced at the input boundary.

use crate::{Error, Measure, NewMeasurement, Result};
use chrono::NaiveDate;
use std::ops::RangeInclusive;

pub const WEIGHT_RANGE: RangeInclusive<f64> = 30.0..=100.0;
pub const WAIST_RANGE: RangeInclusive<f64> = 50.0..=120.0;
pub const CHEST_RANGE: RangeInclusive<f64> = 50.0..=120.0;

/// Accepted range for a measure
pub fn range_for(measure: Measure) -> RangeInclusive<f64> {
    match measure {
        Measure::Weight => WEIGHT_RANGE,
        Measure::Waist => WAIST_RANGE,
        Measure::Chest => CHEST_RANGE,
    }
}

fn check(measure: Measure, value: f64) -> Result<f64> {
    let range = range_for(measure);
    // NaN fails `contains`, infinities are outside every range
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(Error::Validation(format!(
            "{} must be between {} and {} {}, got {}",
            measure.label(),
            range.start(),
            range.end(),
            measure.unit(),
            value
        )))
    }
}

impl NewMeasurement {
    /// Validate and build a measurement ready to be appended
    pub fn new(date: NaiveDate, weight: f64, waist: f64, chest: f64) -> Result<Self> {
        Ok(Self {
            date,
            weight: check(Measure::Weight, weight)?,
            waist: check(Measure::Waist, waist)?,
            chest: check(Measure::Chest, chest)?,
        })
    }
}
