//! Harmonic seasonal-cycle model.
//!
//! Represents the seasonal cycle at every grid cell as a truncated Fourier
//! series in the calendar month, with a constant and a predictor-scaled
//! amplitude per harmonic. Fitting selects the number of harmonics per cell
//! with the Bayesian information criterion; prediction expands fitted
//! coefficients back into monthly series for arbitrary yearly predictor
//! values.
//!
//! Coefficients are stored four to an order band,
//! `[const·cos, const·sin, scale·cos, scale·sin]`, so a cell of order `k`
//! carries `4 * k` values. Cells of different order live together in a
//! rectangular [`HarmonicCoefficients`] matrix, padded with NaN; a NaN
//! coefficient means the cell's series terminates below that band.

use std::f64::consts::PI;

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::time::{expand_yearly_values, TimeAxis, MONTHS_PER_YEAR};
use crate::timeseries::GridTimeseries;
use crate::validation::{
    check_expanded_length, check_matching_cell_dims, check_monthly_target, CellIndexed,
};

/// Conventional name of the coefficient axis.
pub const COEFF_DIM: &str = "coeff";

/// Number of regression coefficients per harmonic order.
pub const COEFFS_PER_ORDER: usize = 4;

/// Singular values below this threshold are treated as zero in the
/// least-squares solve.
const LSTSQ_EPS: f64 = 1e-10;

/// Settings for [`fit_harmonic_model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonicFitSettings {
    /// Largest harmonic order considered during order selection.
    pub max_order: usize,
}

impl Default for HarmonicFitSettings {
    fn default() -> Self {
        Self { max_order: 6 }
    }
}

impl HarmonicFitSettings {
    /// Parse settings from a TOML snippet; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::InvalidSettings(e.to_string()))
    }
}

/// Evaluate the seasonal-cycle series for one cell.
///
/// `yearly_predictor` holds the cell's yearly predictor repeated to monthly
/// resolution, `months` the calendar-month index (0-11) of every sample, and
/// `coeffs` the cell's coefficient vector, four entries per harmonic order.
/// Each band `k` (1-based) contributes
///
/// ```text
/// const_cos * cos(k a) + const_sin * sin(k a)
///     + scale_cos * y * cos(k a) + scale_sin * y * sin(k a)
/// ```
///
/// with `a = 2 pi month / 12`. An empty coefficient vector yields an
/// all-zero series; a NaN coefficient contributes nothing.
///
/// # Panics
///
/// Panics if `yearly_predictor` and `months` differ in length, or if the
/// coefficient count is not a multiple of four.
///
/// # Examples
///
/// ```
/// use scem_core::harmonic::generate_fourier_series;
/// use scem_core::time::repeating_months;
///
/// let months = repeating_months(1);
/// let series = generate_fourier_series(&[0.0; 12], &months, &[]);
/// assert_eq!(series, vec![0.0; 12]);
/// ```
pub fn generate_fourier_series(
    yearly_predictor: &[f64],
    months: &[u32],
    coeffs: &[f64],
) -> Vec<f64> {
    assert_eq!(
        yearly_predictor.len(),
        months.len(),
        "predictor and month arrays must have the same length"
    );
    assert_eq!(
        coeffs.len() % COEFFS_PER_ORDER,
        0,
        "coefficient vectors hold four entries per order"
    );

    let mut series = vec![0.0; yearly_predictor.len()];
    for (band, chunk) in coeffs.chunks_exact(COEFFS_PER_ORDER).enumerate() {
        let k = (band + 1) as f64;
        for (t, value) in series.iter_mut().enumerate() {
            let alpha = 2.0 * PI * k * months[t] as f64 / MONTHS_PER_YEAR as f64;
            let (sin, cos) = alpha.sin_cos();
            let y = yearly_predictor[t];
            for (&coeff, term) in chunk.iter().zip([cos, sin, y * cos, y * sin]) {
                if !coeff.is_nan() {
                    *value += coeff * term;
                }
            }
        }
    }
    series
}

/// Solve the ordinary-least-squares problem for a fixed order.
fn fit_coefficients(
    order: usize,
    yearly_predictor: &[f64],
    months: &[u32],
    target: &[f64],
) -> Result<Vec<f64>> {
    let n = target.len();
    let design = DMatrix::from_fn(n, COEFFS_PER_ORDER * order, |i, j| {
        let band = (j / COEFFS_PER_ORDER + 1) as f64;
        let alpha = 2.0 * PI * band * months[i] as f64 / MONTHS_PER_YEAR as f64;
        match j % COEFFS_PER_ORDER {
            0 => alpha.cos(),
            1 => alpha.sin(),
            2 => yearly_predictor[i] * alpha.cos(),
            _ => yearly_predictor[i] * alpha.sin(),
        }
    });

    let rhs = DVector::from_column_slice(target);
    let solution = design
        .svd(true, true)
        .solve(&rhs, LSTSQ_EPS)
        .map_err(|details| Error::LeastSquaresFailure {
            order,
            details: details.to_string(),
        })?;

    Ok(solution.iter().copied().collect())
}

/// Score a candidate order.
///
/// The mean squared error is clamped at machine epsilon: near-perfect fits
/// of different orders tie on the fit term and the parameter penalty decides.
fn bayesian_information_criterion(n_samples: usize, order: usize, rss: f64) -> f64 {
    let n = n_samples as f64;
    let mse = (rss / n).max(f64::EPSILON);
    let n_params = (COEFFS_PER_ORDER * order) as f64;
    n * mse.ln() + n_params * n.ln()
}

/// Result of fitting a single cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellFit {
    /// Selected harmonic order.
    pub order: usize,
    /// Fitted coefficients at the selected order, `4 * order` values.
    pub coeffs: Vec<f64>,
    /// Predicted monthly series at the selected order.
    pub predictions: Vec<f64>,
}

/// Fit a single cell, selecting the harmonic order.
///
/// Every order in `0..=max_order` is fit by ordinary least squares and
/// scored with the Bayesian information criterion; the lowest-scoring order
/// wins, with ties kept at the lower order.
///
/// `yearly_predictor` must already be repeated to monthly resolution; its
/// length, the target length and the month count must agree.
pub fn fit_fourier_order(
    yearly_predictor: &[f64],
    monthly_target: &[f64],
    months: &[u32],
    max_order: usize,
) -> Result<CellFit> {
    if yearly_predictor.len() != monthly_target.len() {
        return Err(Error::LengthMismatch {
            left_name: "yearly_predictor".to_string(),
            right_name: "monthly_target".to_string(),
            left_len: yearly_predictor.len(),
            right_len: monthly_target.len(),
        });
    }
    assert_eq!(
        months.len(),
        monthly_target.len(),
        "month indices must cover every monthly sample"
    );

    let n = monthly_target.len();
    let mut best: Option<(f64, CellFit)> = None;

    for order in 0..=max_order {
        let coeffs = if order == 0 {
            Vec::new()
        } else {
            fit_coefficients(order, yearly_predictor, months, monthly_target)?
        };
        let predictions = generate_fourier_series(yearly_predictor, months, &coeffs);
        let rss: f64 = monthly_target
            .iter()
            .zip(&predictions)
            .map(|(t, p)| (t - p) * (t - p))
            .sum();
        let score = bayesian_information_criterion(n, order, rss);

        if best.as_ref().map_or(true, |(s, _)| score < *s) {
            best = Some((
                score,
                CellFit {
                    order,
                    coeffs,
                    predictions,
                },
            ));
        }
    }

    Ok(best.expect("order zero is always scored").1)
}

/// Per-cell Fourier coefficients, padded with NaN to a common width.
///
/// One row per cell, `4 * max_order` columns along the [`COEFF_DIM`] axis.
/// Trailing NaN entries mark absent higher-order bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicCoefficients {
    values: Array2<f64>,
    cell_dim: String,
}

impl HarmonicCoefficients {
    /// Create a coefficient matrix; the width must be a multiple of four.
    pub fn new(values: Array2<f64>, cell_dim: &str) -> Result<Self> {
        if values.ncols() % COEFFS_PER_ORDER != 0 {
            return Err(Error::InvalidForm {
                name: "coeffs".to_string(),
                details: format!(
                    "the '{COEFF_DIM}' axis must hold four entries per order: found width {}",
                    values.ncols()
                ),
            });
        }
        Ok(Self {
            values,
            cell_dim: cell_dim.to_string(),
        })
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn cell_dim(&self) -> &str {
        &self.cell_dim
    }

    pub fn n_cells(&self) -> usize {
        self.values.nrows()
    }

    /// Largest order the matrix can hold.
    pub fn max_order(&self) -> usize {
        self.values.ncols() / COEFFS_PER_ORDER
    }

    /// Coefficient row of a single cell, including NaN padding.
    pub fn cell(&self, cell: usize) -> ArrayView1<'_, f64> {
        self.values.row(cell)
    }

    /// Order of a single cell: its coefficient row truncated at the first NaN.
    pub fn effective_order(&self, cell: usize) -> usize {
        let row = self.values.row(cell);
        let leading = row.iter().position(|v| v.is_nan()).unwrap_or(row.len());
        leading / COEFFS_PER_ORDER
    }
}

impl CellIndexed for HarmonicCoefficients {
    fn cell_dim(&self) -> &str {
        HarmonicCoefficients::cell_dim(self)
    }

    fn n_cells(&self) -> usize {
        HarmonicCoefficients::n_cells(self)
    }
}

/// Fitted harmonic model over all cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicFit {
    /// Selected harmonic order per cell.
    pub selected_order: Vec<usize>,
    /// Fitted coefficients, NaN-padded to the largest selected order.
    pub coeffs: HarmonicCoefficients,
    /// Predicted monthly series, aligned with the target.
    pub predictions: GridTimeseries,
    /// `target - predictions`, exactly.
    pub residuals: GridTimeseries,
}

/// Fit the harmonic seasonal-cycle model at every cell.
///
/// The predictor holds one value per cell per year; the target holds twelve
/// monthly samples per year, starting in January, over the same cells.
/// Cells are fit independently (in parallel); the coefficient vectors are
/// collected into a single NaN-padded matrix whose width is set by the
/// largest selected order.
///
/// # Examples
///
/// ```
/// use ndarray::Array2;
/// use scem_core::harmonic::{fit_harmonic_model, HarmonicFitSettings};
/// use scem_core::time::{monthly_date_range, yearly_date_range, TimeAxis};
/// use scem_core::timeseries::GridTimeseries;
///
/// let yearly = GridTimeseries::new(
///     Array2::from_elem((3, 2), 1.0),
///     TimeAxis::new(yearly_date_range(2000, 3)),
///     "cells",
/// )?;
/// let monthly = GridTimeseries::new(
///     Array2::zeros((36, 2)),
///     TimeAxis::new(monthly_date_range(2000, 36)),
///     "cells",
/// )?;
///
/// let fit = fit_harmonic_model(&yearly, &monthly, &HarmonicFitSettings::default())?;
/// assert_eq!(fit.selected_order, vec![0, 0]);
/// # Ok::<(), scem_core::errors::Error>(())
/// ```
pub fn fit_harmonic_model(
    yearly_predictor: &GridTimeseries,
    monthly_target: &GridTimeseries,
    settings: &HarmonicFitSettings,
) -> Result<HarmonicFit> {
    check_matching_cell_dims(
        yearly_predictor,
        "yearly_predictor",
        monthly_target,
        "monthly_target",
    )?;
    check_monthly_target(monthly_target, "monthly_target", yearly_predictor.n_samples())?;

    let n_cells = yearly_predictor.n_cells();
    let n_samples = monthly_target.n_samples();
    debug!("fitting harmonic model for {n_cells} cells over {n_samples} monthly samples");

    let months = monthly_target.time().months();
    let expanded = expand_yearly_values(yearly_predictor.values());

    let fits: Vec<CellFit> = (0..n_cells)
        .into_par_iter()
        .map(|cell| {
            let predictor = expanded.column(cell).to_vec();
            let target = monthly_target.cell(cell).to_vec();
            fit_fourier_order(&predictor, &target, &months, settings.max_order)
        })
        .collect::<Result<_>>()?;

    let saturated = fits.iter().filter(|f| f.order == settings.max_order).count();
    if settings.max_order > 0 && saturated > 0 {
        warn!(
            "selected order reached the search bound ({}) for {saturated} of {n_cells} cells",
            settings.max_order
        );
    }

    let max_selected = fits.iter().map(|f| f.order).max().unwrap_or(0);
    let mut coeff_values =
        Array2::from_elem((n_cells, COEFFS_PER_ORDER * max_selected), f64::NAN);
    let mut pred_values = Array2::zeros((n_samples, n_cells));
    for (cell, fit) in fits.iter().enumerate() {
        for (j, &c) in fit.coeffs.iter().enumerate() {
            coeff_values[[cell, j]] = c;
        }
        for (t, &p) in fit.predictions.iter().enumerate() {
            pred_values[[t, cell]] = p;
        }
    }

    let residual_values = monthly_target.values() - &pred_values;
    let selected_order = fits.iter().map(|f| f.order).collect();

    Ok(HarmonicFit {
        selected_order,
        coeffs: HarmonicCoefficients::new(coeff_values, yearly_predictor.cell_dim())?,
        predictions: GridTimeseries::new(
            pred_values,
            monthly_target.time().clone(),
            monthly_target.cell_dim(),
        )?,
        residuals: GridTimeseries::new(
            residual_values,
            monthly_target.time().clone(),
            monthly_target.cell_dim(),
        )?,
    })
}

/// Predict monthly seasonal cycles from fitted coefficients.
///
/// The predictor holds one value per cell per year in either sample layout;
/// `monthly_time` supplies twelve timestamps per yearly value and becomes
/// the output's time axis. Each cell's coefficient row is truncated at its
/// first NaN before evaluation.
pub fn predict_harmonic_model(
    yearly_predictor: &GridTimeseries,
    coeffs: &HarmonicCoefficients,
    monthly_time: &TimeAxis,
) -> Result<GridTimeseries> {
    check_matching_cell_dims(yearly_predictor, "yearly_predictor", coeffs, "coeffs")?;
    check_expanded_length("time", monthly_time.len(), yearly_predictor.n_samples())?;

    let n_cells = yearly_predictor.n_cells();
    debug!(
        "predicting seasonal cycle for {n_cells} cells over {} monthly samples",
        monthly_time.len()
    );

    let months = monthly_time.months();
    let expanded = expand_yearly_values(yearly_predictor.values());

    let mut values = Array2::zeros((monthly_time.len(), n_cells));
    for cell in 0..n_cells {
        let width = COEFFS_PER_ORDER * coeffs.effective_order(cell);
        let truncated: Vec<f64> = coeffs.cell(cell).iter().take(width).copied().collect();
        let predictor = expanded.column(cell).to_vec();
        let series = generate_fourier_series(&predictor, &months, &truncated);
        for (t, v) in series.into_iter().enumerate() {
            values[[t, cell]] = v;
        }
    }

    GridTimeseries::new(values, monthly_time.clone(), yearly_predictor.cell_dim())
}
