//! Year-by-year correlation trend.

use super::SeriesError;
use serde::{Deserialize, Serialize};

/// Parallel sequences of years and correlation coefficients.
///
/// Coefficients may be NaN when a year has too few usable observations;
/// [`CorrelationTrend::ensure_defined`] turns that into an error on request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrend")]
pub struct CorrelationTrend {
    years: Vec<i32>,
    coefficients: Vec<f64>,
    observations: Vec<usize>,
}

impl CorrelationTrend {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            years: Vec::with_capacity(n),
            coefficients: Vec::with_capacity(n),
            observations: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, year: i32, coefficient: f64, observations: usize) {
        self.years.push(year);
        self.coefficients.push(coefficient);
        self.observations.push(observations);
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Number of months that fed each year's coefficient.
    pub fn observations(&self) -> &[usize] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years.iter().copied().zip(self.coefficients.iter().copied())
    }

    /// Coefficient for a given year, if the trend covers it.
    pub fn coefficient_for(&self, year: i32) -> Option<f64> {
        self.iter().find(|(y, _)| *y == year).map(|(_, c)| c)
    }

    /// Fail on the first year whose coefficient is undefined.
    pub fn ensure_defined(&self) -> Result<(), SeriesError> {
        match self
            .years
            .iter()
            .zip(&self.coefficients)
            .zip(&self.observations)
            .find(|((_, c), _)| c.is_nan())
        {
            Some(((year, _), observations)) => Err(SeriesError::InsufficientData {
                year: *year,
                observations: *observations,
            }),
            None => Ok(()),
        }
    }
}

/// Undefined coefficients are written as `null` in JSON.
#[derive(Deserialize)]
struct RawTrend {
    years: Vec<i32>,
    coefficients: Vec<Option<f64>>,
    observations: Vec<usize>,
}

impl TryFrom<RawTrend> for CorrelationTrend {
    type Error = SeriesError;

    fn try_from(raw: RawTrend) -> Result<Self, Self::Error> {
        for len in [raw.coefficients.len(), raw.observations.len()] {
            if len != raw.years.len() {
                return Err(SeriesError::LengthMismatch {
                    dates: raw.years.len(),
                    values: len,
                });
            }
        }
        Ok(Self {
            years: raw.years,
            coefficients: raw
                .coefficients
                .into_iter()
                .map(|c| c.unwrap_or(f64::NAN))
                .collect(),
            observations: raw.observations,
        })
    }
}
