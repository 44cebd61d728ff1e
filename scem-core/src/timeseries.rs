//! Labeled gridded timeseries.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::time::TimeAxis;

/// A real-valued timeseries over a set of grid cells.
///
/// Values are stored as a (samples x cells) array. The leading axis is
/// described by a [`TimeAxis`]; the trailing axis is the cell dimension,
/// whose name is arbitrary but must be consistent across the inputs and
/// outputs of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridTimeseries {
    values: Array2<f64>,
    time: TimeAxis,
    cell_dim: String,
}

impl GridTimeseries {
    /// Create a timeseries from values, a time axis and a cell-dimension name.
    ///
    /// The number of rows of `values` must match the axis length.
    pub fn new(values: Array2<f64>, time: TimeAxis, cell_dim: &str) -> Result<Self> {
        if values.nrows() != time.len() {
            return Err(Error::InvalidForm {
                name: "GridTimeseries".to_string(),
                details: format!(
                    "expected {} samples along '{}', found {} rows",
                    time.len(),
                    time.sample_dim(),
                    values.nrows()
                ),
            });
        }
        Ok(Self {
            values,
            time,
            cell_dim: cell_dim.to_string(),
        })
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn time(&self) -> &TimeAxis {
        &self.time
    }

    /// Name of the cell dimension.
    pub fn cell_dim(&self) -> &str {
        &self.cell_dim
    }

    pub fn n_samples(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cells(&self) -> usize {
        self.values.ncols()
    }

    /// Values of a single cell, over all samples.
    pub fn cell(&self, cell: usize) -> ArrayView1<'_, f64> {
        self.values.column(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{monthly_date_range, TimeAxis};
    use ndarray::Array2;

    #[test]
    fn construction_and_accessors() {
        let time = TimeAxis::new(monthly_date_range(2000, 12));
        let values = Array2::from_shape_fn((12, 3), |(t, c)| (t * 10 + c) as f64);
        let ts = GridTimeseries::new(values, time, "cells").unwrap();

        assert_eq!(ts.n_samples(), 12);
        assert_eq!(ts.n_cells(), 3);
        assert_eq!(ts.cell_dim(), "cells");
        assert_eq!(ts.time().sample_dim(), "time");
        assert_eq!(ts.cell(1)[0], 1.0);
        assert_eq!(ts.cell(1)[11], 111.0);
    }

    #[test]
    fn row_count_must_match_axis() {
        let time = TimeAxis::new(monthly_date_range(2000, 12));
        let values = Array2::zeros((10, 3));
        let err = GridTimeseries::new(values, time, "cells").unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("expected 12 samples"), "{msg}");
        assert!(msg.contains("10 rows"), "{msg}");
    }
}
