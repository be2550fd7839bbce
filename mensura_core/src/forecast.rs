//! Linear weight forecast.
//!
//! Dates are mapped to day ordinals (0001-01-01 is day 1) and weight is fitted
//! against them by ordinary least squares. The predicted run starts on the
//! last observed date, so that date appears twice in the combined series:
//! once observed, once predicted.

use crate::{Error, MeasurementRecord, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default number of forecast days
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// Longest horizon the forecast will extrapolate
pub const MAX_HORIZON_DAYS: u32 = 3650;

/// Distinct dates needed before a line can be fitted
pub const MIN_DISTINCT_DATES: usize = 2;

/// Day ordinal used as the regression abscissa
pub fn ordinal(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Fitted line `y = slope * x + intercept`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; 1.0 when `y` has no variance
    pub r_squared: f64,
}

impl LinearFit {
    /// Ordinary least squares over `(x, y)` pairs
    ///
    /// Sums are taken on mean-centred values so large ordinals do not cost
    /// precision. Fails with [`Error::DegenerateFit`] when every `x` is equal
    /// (including the empty and single-point cases).
    pub fn fit(points: &[(f64, f64)]) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::DegenerateFit);
        }

        let n = points.len() as f64;
        let x_mean = points.iter().map(|p| p.0).sum::<f64>() / n;
        let y_mean = points.iter().map(|p| p.1).sum::<f64>() / n;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        let mut syy = 0.0;
        for &(x, y) in points {
            let dx = x - x_mean;
            let dy = y - y_mean;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }

        if sxx == 0.0 {
            return Err(Error::DegenerateFit);
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        let r_squared = if syy == 0.0 {
            1.0
        } else {
            (sxy * sxy) / (sxx * syy)
        };

        Ok(Self {
            slope,
            intercept,
            r_squared,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Predicted value for a calendar date
    pub fn predict_date(&self, date: NaiveDate) -> f64 {
        self.predict(ordinal(date))
    }

    /// Slope expressed per week
    pub fn weekly_rate(&self) -> f64 {
        self.slope * 7.0
    }
}

/// Whether a forecast point was measured or extrapolated
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Observed,
    Predicted,
}

/// One point of the combined weight series
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub weight: f64,
    pub kind: PointKind,
}

/// Observed weights followed by the extrapolated run
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Forecast {
    pub fit: LinearFit,
    pub horizon_days: u32,
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    pub fn observed(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter().filter(|p| p.kind == PointKind::Observed)
    }

    pub fn predicted(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter().filter(|p| p.kind == PointKind::Predicted)
    }
}

/// Fit weight against date and extrapolate `horizon_days` days
///
/// The first predicted date is the last observed date. Fails with
/// [`Error::InsufficientData`] when fewer than two distinct dates exist, and
/// with [`Error::HorizonOutOfRange`] when the horizon exceeds
/// [`MAX_HORIZON_DAYS`] or runs past the last representable date.
pub fn forecast_weight(records: &[MeasurementRecord], horizon_days: u32) -> Result<Forecast> {
    let mut dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    dates.sort_unstable();
    dates.dedup();
    if dates.len() < MIN_DISTINCT_DATES {
        return Err(Error::InsufficientData {
            distinct_dates: dates.len(),
            required: MIN_DISTINCT_DATES,
        });
    }

    let samples: Vec<(f64, f64)> = records
        .iter()
        .map(|r| (ordinal(r.date), r.weight))
        .collect();
    let fit = LinearFit::fit(&samples)?;

    // `dates` is sorted and non-empty here
    let last = dates[dates.len() - 1];

    let out_of_range = || Error::HorizonOutOfRange {
        horizon_days,
        max: MAX_HORIZON_DAYS,
    };
    if horizon_days > MAX_HORIZON_DAYS {
        return Err(out_of_range());
    }

    let mut points = Vec::with_capacity(records.len() + horizon_days as usize);
    points.extend(records.iter().map(|r| ForecastPoint {
        date: r.date,
        weight: r.weight,
        kind: PointKind::Observed,
    }));
    for offset in 0..horizon_days {
        let date = last
            .checked_add_signed(Duration::days(i64::from(offset)))
            .ok_or_else(out_of_range)?;
        points.push(ForecastPoint {
            date,
            weight: fit.predict_date(date),
            kind: PointKind::Predicted,
        });
    }

    tracing::debug!(
        "Fitted weight trend: slope {:.4} kg/day, r² {:.3}",
        fit.slope,
        fit.r_squared
    );

    Ok(Forecast {
        fit,
        horizon_days,
        points,
    })
}
