//! A statistical climate emulator.
//!
//! `scem` fits compact parametric models to climate-model output and uses
//! the fitted parameters to generate synthetic realizations without
//! re-running the physical model. The crate currently centres on the
//! harmonic seasonal-cycle model: a per-cell truncated Fourier series in
//! the calendar month whose amplitude is modulated by a yearly predictor,
//! with the number of harmonics selected per cell by an information
//! criterion.
//!
//! The statistical routines live in `scem-core`, whose modules are
//! re-exported here; [`stats`] collects the fitting and prediction entry
//! points.
//!
//! # Examples
//!
//! ```
//! use ndarray::Array2;
//! use scem::stats::{fit_harmonic_model, predict_harmonic_model, HarmonicFitSettings};
//! use scem::time::{monthly_date_range, yearly_date_range, TimeAxis};
//! use scem::timeseries::GridTimeseries;
//!
//! let n_years = 10;
//! let yearly = GridTimeseries::new(
//!     Array2::from_shape_fn((n_years, 2), |(t, _)| t as f64 / n_years as f64),
//!     TimeAxis::new(yearly_date_range(2000, n_years)),
//!     "cells",
//! )?;
//! let monthly_time = TimeAxis::new(monthly_date_range(2000, n_years * 12));
//! let monthly = GridTimeseries::new(
//!     Array2::zeros((n_years * 12, 2)),
//!     monthly_time.clone(),
//!     "cells",
//! )?;
//!
//! let fit = fit_harmonic_model(&yearly, &monthly, &HarmonicFitSettings::default())?;
//! let predictions = predict_harmonic_model(&yearly, &fit.coeffs, &monthly_time)?;
//! assert_eq!(predictions.n_cells(), 2);
//! # Ok::<(), scem::errors::Error>(())
//! ```

pub use scem_core::{errors, harmonic, testing, time, timeseries, validation};
pub use scem_core::{Error, Result};

/// Statistical fitting and prediction routines.
pub mod stats {
    pub use scem_core::harmonic::{
        fit_fourier_order, fit_harmonic_model, generate_fourier_series, predict_harmonic_model,
        CellFit, HarmonicCoefficients, HarmonicFit, HarmonicFitSettings, COEFFS_PER_ORDER,
        COEFF_DIM,
    };
}
