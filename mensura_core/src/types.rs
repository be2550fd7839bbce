//! Core domain types for Mensura.
//!
//! This module defines the fundamental types used throughout the system:
//! - Measurement records, stored and pending
//! - The measured quantities
//! - Chart-ready series and aggregate rows

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Records
// ============================================================================

/// A stored measurement, one row of the `mesures` log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MeasurementRecord {
    /// Assigned by the store on insert
    pub id: u64,
    pub date: NaiveDate,
    /// Kilograms
    pub weight: f64,
    /// Centimetres
    pub waist: f64,
    /// Centimetres
    pub chest: f64,
}

/// A validated measurement that has not been stored yet
///
/// Only constructible through [`NewMeasurement::new`], which enforces the
/// range bounds in [`crate::validation`].
#[derive(Clone, Debug, PartialEq)]
pub struct NewMeasurement {
    pub(crate) date: NaiveDate,
    pub(crate) weight: f64,
    pub(crate) waist: f64,
    pub(crate) chest: f64,
}

impl NewMeasurement {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn waist(&self) -> f64 {
        self.waist
    }

    pub fn chest(&self) -> f64 {
        self.chest
    }

    /// Attach a store-assigned id
    pub fn into_record(self, id: u64) -> MeasurementRecord {
        MeasurementRecord {
            id,
            date: self.date,
            weight: self.weight,
            waist: self.waist,
            chest: self.chest,
        }
    }
}

// ============================================================================
// Measures
// ============================================================================

/// One of the measured quantities
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Weight,
    Waist,
    Chest,
}

impl Measure {
    pub const ALL: [Measure; 3] = [Measure::Weight, Measure::Waist, Measure::Chest];

    pub fn label(self) -> &'static str {
        match self {
            Measure::Weight => "Weight",
            Measure::Waist => "Waist",
            Measure::Chest => "Chest",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Measure::Weight => "kg",
            Measure::Waist | Measure::Chest => "cm",
        }
    }

    /// Read this measure off a record
    pub fn of(self, record: &MeasurementRecord) -> f64 {
        match self {
            Measure::Weight => record.weight,
            Measure::Waist => record.waist,
            Measure::Chest => record.chest,
        }
    }
}

// ============================================================================
// Series and aggregates
// ============================================================================

/// A single dated value in a chart series
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One dated series per measure, all of the same length
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MeasureSeries {
    pub weight: Vec<SeriesPoint>,
    pub waist: Vec<SeriesPoint>,
    pub chest: Vec<SeriesPoint>,
}

impl MeasureSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            weight: Vec::with_capacity(capacity),
            waist: Vec::with_capacity(capacity),
            chest: Vec::with_capacity(capacity),
        }
    }

    pub fn get(&self, measure: Measure) -> &[SeriesPoint] {
        match measure {
            Measure::Weight => &self.weight,
            Measure::Waist => &self.waist,
            Measure::Chest => &self.chest,
        }
    }

    pub(crate) fn push(&mut self, date: NaiveDate, weight: f64, waist: f64, chest: f64) {
        self.weight.push(SeriesPoint { date, value: weight });
        self.waist.push(SeriesPoint { date, value: waist });
        self.chest.push(SeriesPoint { date, value: chest });
    }

    pub fn len(&self) -> usize {
        self.weight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weight.is_empty()
    }
}

/// Per-measure means for one ISO week
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklyMean {
    /// Monday of the week
    pub week_start: NaiveDate,
    /// Number of records that fell in the week
    pub count: usize,
    pub weight: f64,
    pub waist: f64,
    pub chest: f64,
}

impl WeeklyMean {
    pub fn get(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Weight => self.weight,
            Measure::Waist => self.waist,
            Measure::Chest => self.chest,
        }
    }
}
