//! Form checks for labeled inputs.
//!
//! Fitting and prediction validate their inputs through this module before
//! any numeric work: cross-input cell-dimension agreement, calendar start,
//! yearly/monthly sample alignment, and expected-form checks on a single
//! timeseries. Every failure names the offending input and the exact
//! discrepancy.

use crate::errors::{Error, Result};
use crate::time::MONTHS_PER_YEAR;
use crate::timeseries::GridTimeseries;

/// Containers indexed by a named cell dimension.
pub trait CellIndexed {
    /// Name of the cell dimension.
    fn cell_dim(&self) -> &str;

    /// Number of cells.
    fn n_cells(&self) -> usize;
}

impl CellIndexed for GridTimeseries {
    fn cell_dim(&self) -> &str {
        GridTimeseries::cell_dim(self)
    }

    fn n_cells(&self) -> usize {
        GridTimeseries::n_cells(self)
    }
}

/// Check that two inputs agree on the name and size of their cell dimension.
pub fn check_matching_cell_dims<L, R>(
    left: &L,
    left_name: &str,
    right: &R,
    right_name: &str,
) -> Result<()>
where
    L: CellIndexed,
    R: CellIndexed,
{
    if left.cell_dim() != right.cell_dim() {
        return Err(Error::DimensionMismatch {
            left_name: left_name.to_string(),
            right_name: right_name.to_string(),
            left_dim: left.cell_dim().to_string(),
            right_dim: right.cell_dim().to_string(),
        });
    }
    if left.n_cells() != right.n_cells() {
        return Err(Error::CoordSizeMismatch {
            dim: left.cell_dim().to_string(),
            left_name: left_name.to_string(),
            right_name: right_name.to_string(),
            left_size: left.n_cells(),
            right_size: right.n_cells(),
        });
    }
    Ok(())
}

/// Check that a monthly target lines up with a yearly predictor: it must
/// start in January and hold twelve samples per yearly value.
pub fn check_monthly_target(monthly: &GridTimeseries, name: &str, n_yearly: usize) -> Result<()> {
    if !monthly.time().starts_in_january() {
        return Err(Error::MonthlyStartNotJanuary);
    }
    check_expanded_length(name, monthly.n_samples(), n_yearly)
}

/// Check that a monthly sample count is 12 times a yearly sample count.
pub fn check_expanded_length(name: &str, n_monthly: usize, n_yearly: usize) -> Result<()> {
    if n_monthly != MONTHS_PER_YEAR * n_yearly {
        return Err(Error::SampleLengthMismatch {
            name: name.to_string(),
            n_monthly,
            n_yearly,
        });
    }
    Ok(())
}

/// Expected form of a [`GridTimeseries`], for [`check_timeseries_form`].
///
/// Unset fields are not checked.
#[derive(Debug, Clone, Default)]
pub struct TimeseriesForm {
    cell_dim: Option<String>,
    sample_dim: Option<String>,
    time_coord: Option<String>,
    n_cells: Option<usize>,
    n_samples: Option<usize>,
}

impl TimeseriesForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell_dim(mut self, name: &str) -> Self {
        self.cell_dim = Some(name.to_string());
        self
    }

    pub fn sample_dim(mut self, name: &str) -> Self {
        self.sample_dim = Some(name.to_string());
        self
    }

    pub fn time_coord(mut self, name: &str) -> Self {
        self.time_coord = Some(name.to_string());
        self
    }

    pub fn n_cells(mut self, n: usize) -> Self {
        self.n_cells = Some(n);
        self
    }

    pub fn n_samples(mut self, n: usize) -> Self {
        self.n_samples = Some(n);
        self
    }
}

/// Check a timeseries against an expected form, reporting the first
/// mismatch with the input's name.
pub fn check_timeseries_form(
    ts: &GridTimeseries,
    name: &str,
    form: &TimeseriesForm,
) -> Result<()> {
    let mismatch = |details: String| Error::InvalidForm {
        name: name.to_string(),
        details,
    };

    if let Some(expected) = &form.cell_dim {
        if ts.cell_dim() != expected {
            return Err(mismatch(format!(
                "expected cell dimension '{expected}', found '{}'",
                ts.cell_dim()
            )));
        }
    }
    if let Some(expected) = &form.sample_dim {
        if ts.time().sample_dim() != expected {
            return Err(mismatch(format!(
                "expected sample dimension '{expected}', found '{}'",
                ts.time().sample_dim()
            )));
        }
    }
    if let Some(expected) = &form.time_coord {
        if ts.time().time_coord() != expected {
            return Err(mismatch(format!(
                "expected time coordinate '{expected}', found '{}'",
                ts.time().time_coord()
            )));
        }
    }
    if let Some(expected) = form.n_cells {
        if ts.n_cells() != expected {
            return Err(mismatch(format!(
                "expected {expected} cells, found {}",
                ts.n_cells()
            )));
        }
    }
    if let Some(expected) = form.n_samples {
        if ts.n_samples() != expected {
            return Err(mismatch(format!(
                "expected {expected} samples, found {}",
                ts.n_samples()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{monthly_date_range, yearly_date_range, TimeAxis};
    use ndarray::Array2;

    fn series(n_samples: usize, n_cells: usize, cell_dim: &str) -> GridTimeseries {
        let times = if n_samples % MONTHS_PER_YEAR == 0 {
            monthly_date_range(2000, n_samples)
        } else {
            yearly_date_range(2000, n_samples)
        };
        GridTimeseries::new(Array2::zeros((n_samples, n_cells)), TimeAxis::new(times), cell_dim)
            .unwrap()
    }

    #[test]
    fn matching_cells_pass() {
        let a = series(10, 6, "cells");
        let b = series(120, 6, "cells");
        check_matching_cell_dims(&a, "a", &b, "b").unwrap();
    }

    #[test]
    fn differently_named_cell_dims_are_rejected() {
        let a = series(10, 6, "cells");
        let b = series(10, 6, "gp");
        let msg = check_matching_cell_dims(&a, "a", &b, "b")
            .unwrap_err()
            .to_string();
        assert!(msg.contains("different dimensions"), "{msg}");
        assert!(msg.contains("'cells' vs. 'gp'"), "{msg}");
    }

    #[test]
    fn differently_sized_cell_dims_are_rejected() {
        let a = series(10, 6, "cells");
        let b = series(10, 4, "cells");
        let msg = check_matching_cell_dims(&a, "a", &b, "b")
            .unwrap_err()
            .to_string();
        assert!(msg.contains("different dimensions"), "{msg}");
        assert!(msg.contains("6 vs. 4"), "{msg}");
    }

    #[test]
    fn monthly_target_must_start_in_january() {
        let times = monthly_date_range(2000, 24)[1..13].to_vec();
        let ts =
            GridTimeseries::new(Array2::zeros((12, 2)), TimeAxis::new(times), "cells").unwrap();
        let msg = check_monthly_target(&ts, "monthly_target", 1)
            .unwrap_err()
            .to_string();
        assert!(msg.contains("must start with January"), "{msg}");
    }

    #[test]
    fn monthly_target_must_be_twelve_per_year() {
        let ts = series(24, 2, "cells");
        check_monthly_target(&ts, "monthly_target", 2).unwrap();

        let err = check_monthly_target(&ts, "monthly_target", 3).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("24 monthly samples for 3 yearly values"), "{msg}");
    }

    #[test]
    fn form_checks_name_the_input() {
        let ts = series(12, 4, "cells");

        check_timeseries_form(
            &ts,
            "result",
            &TimeseriesForm::new()
                .cell_dim("cells")
                .sample_dim("time")
                .time_coord("time")
                .n_cells(4)
                .n_samples(12),
        )
        .unwrap();

        let msg = check_timeseries_form(&ts, "result", &TimeseriesForm::new().cell_dim("gp"))
            .unwrap_err()
            .to_string();
        assert!(msg.contains("`result`"), "{msg}");
        assert!(msg.contains("expected cell dimension 'gp'"), "{msg}");

        let msg = check_timeseries_form(&ts, "result", &TimeseriesForm::new().n_samples(10))
            .unwrap_err()
            .to_string();
        assert!(msg.contains("expected 10 samples, found 12"), "{msg}");
    }
}
