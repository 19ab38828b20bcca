use crate::error::{Error, Result};
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};

pub type FittedLinearRegression = linfa_linear::FittedLinearRegression<f64>;

/// A straight-line fit of a series against its period index (0, 1, 2, ...).
pub struct TrendModel {
    model: FittedLinearRegression,
    observed: usize,
}

impl TrendModel {
    pub fn fit(observed: &[f64]) -> Result<Self> {
        if observed.len() < 2 {
            return Err(Error::Trend(format!(
                "need at least 2 observations, got {}",
                observed.len()
            )));
        }
        if observed.iter().any(|v| !v.is_finite()) {
            return Err(Error::Trend("observations must be finite".into()));
        }

        let x = periods(0, observed.len())?;
        let y = Array1::from_vec(observed.to_vec());
        let model = LinearRegression::new()
            .fit(&Dataset::new(x, y))
            .map_err(|e| Error::Trend(e.to_string()))?;
        Ok(Self { model, observed: observed.len() })
    }

    pub fn slope(&self) -> f64 {
        self.model.params()[0]
    }

    pub fn intercept(&self) -> f64 {
        self.model.intercept()
    }

    pub fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let x = periods(self.observed, horizon)?;
        Ok(self.model.predict(&x).to_vec())
    }
}

fn periods(start: usize, count: usize) -> Result<Array2<f64>> {
    let idx: Vec<f64> = (start..start + count).map(|i| i as f64).collect();
    Array2::from_shape_vec((count, 1), idx).map_err(|e| Error::Trend(e.to_string()))
}

// shortcut for fit + forecast
pub fn project(observed: &[f64], horizon: usize) -> Result<Vec<f64>> {
    TrendModel::fit(observed)?.forecast(horizon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extends_a_straight_line() {
        let projected = project(&[480.0, 510.0, 540.0], 3).unwrap();
        let expected = [570.0, 600.0, 630.0];
        for (p, e) in projected.iter().zip(expected) {
            assert!((p - e).abs() < 1e-6, "got {p}, expected {e}");
        }
    }

    #[test]
    fn exposes_slope_and_intercept() {
        let model = TrendModel::fit(&[10.0, 12.0, 14.0, 16.0]).unwrap();
        assert!((model.slope() - 2.0).abs() < 1e-6);
        assert!((model.intercept() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn zero_horizon_is_empty() {
        assert!(project(&[1.0, 2.0], 0).unwrap().is_empty());
    }

    #[test]
    fn too_few_points_is_an_error() {
        assert!(matches!(project(&[480.0], 3), Err(Error::Trend(_))));
        assert!(matches!(project(&[], 3), Err(Error::Trend(_))));
        assert!(matches!(project(&[1.0, f64::NAN], 1), Err(Error::Trend(_))));
    }
}
