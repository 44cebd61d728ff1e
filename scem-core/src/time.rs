//! Time axes and yearly/monthly alignment.
//!
//! Climate-model output reaches the emulator in one of two sample layouts:
//!
//! - a plain temporal dimension, one sample per timestamp;
//! - a flattened "sample" dimension whose timestamps live in a separate,
//!   possibly non-unique coordinate (several realizations sharing one time
//!   axis).
//!
//! [`TimeAxis`] resolves both layouts into plain ordered sequences
//! (timestamps, calendar-month indices, sampling-dimension name) before any
//! numeric work happens. It also provides the 12x yearly-to-monthly
//! expansion used to align annual predictors with monthly targets.

use chrono::{Datelike, NaiveDate};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Conventional name of the temporal dimension.
pub const DEFAULT_TIME_DIM: &str = "time";

/// Number of calendar months per year.
pub const MONTHS_PER_YEAR: usize = 12;

/// How samples are laid out along the leading axis of a timeseries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleLayout {
    /// Samples lie along a plain temporal dimension.
    Dimension,
    /// Samples lie along a flattened dimension (conventionally `"sample"`)
    /// carrying the timestamps as a non-dimension coordinate.
    Stacked { sample_dim: String },
}

/// Ordered timestamps of a timeseries, together with the name of the
/// temporal coordinate and the sample layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    times: Vec<NaiveDate>,
    time_coord: String,
    layout: SampleLayout,
}

impl TimeAxis {
    /// Create an axis with a plain temporal dimension named [`DEFAULT_TIME_DIM`].
    pub fn new(times: Vec<NaiveDate>) -> Self {
        Self::with_time_coord(times, DEFAULT_TIME_DIM)
    }

    /// Create an axis with a plain temporal dimension of the given name.
    pub fn with_time_coord(times: Vec<NaiveDate>, time_coord: &str) -> Self {
        Self {
            times,
            time_coord: time_coord.to_string(),
            layout: SampleLayout::Dimension,
        }
    }

    /// Create an axis whose samples lie along a flattened `sample_dim`,
    /// with timestamps carried as the `time_coord` coordinate.
    pub fn stacked(times: Vec<NaiveDate>, sample_dim: &str, time_coord: &str) -> Self {
        Self {
            times,
            time_coord: time_coord.to_string(),
            layout: SampleLayout::Stacked {
                sample_dim: sample_dim.to_string(),
            },
        }
    }

    /// Number of samples along the axis.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Timestamp of every sample, in order.
    pub fn times(&self) -> &[NaiveDate] {
        &self.times
    }

    /// Name of the temporal coordinate.
    pub fn time_coord(&self) -> &str {
        &self.time_coord
    }

    /// Name of the dimension the samples lie along.
    ///
    /// For a plain layout this is the temporal coordinate itself; for a
    /// stacked layout it is the flattened sample dimension.
    pub fn sample_dim(&self) -> &str {
        match &self.layout {
            SampleLayout::Dimension => &self.time_coord,
            SampleLayout::Stacked { sample_dim } => sample_dim,
        }
    }

    pub fn layout(&self) -> &SampleLayout {
        &self.layout
    }

    /// Calendar-month index (0-11) of every sample.
    pub fn months(&self) -> Vec<u32> {
        self.times.iter().map(|t| t.month0()).collect()
    }

    /// Whether the first sample falls in January.
    ///
    /// An empty axis does not start in January.
    pub fn starts_in_january(&self) -> bool {
        self.times.first().is_some_and(|t| t.month() == 1)
    }
}

/// Month-start timestamps covering `n_months`, beginning in January of
/// `start_year`.
pub fn monthly_date_range(start_year: i32, n_months: usize) -> Vec<NaiveDate> {
    (0..n_months)
        .map(|i| {
            let year = start_year + (i / MONTHS_PER_YEAR) as i32;
            let month = (i % MONTHS_PER_YEAR) as u32 + 1;
            NaiveDate::from_ymd_opt(year, month, 1).expect("month-start dates are valid")
        })
        .collect()
}

/// Year-start timestamps covering `n_years`, beginning in `start_year`.
pub fn yearly_date_range(start_year: i32, n_years: usize) -> Vec<NaiveDate> {
    (0..n_years)
        .map(|i| {
            NaiveDate::from_ymd_opt(start_year + i as i32, 1, 1)
                .expect("year-start dates are valid")
        })
        .collect()
}

/// The repeating 0-11 month cycle for `n_years` years.
pub fn repeating_months(n_years: usize) -> Vec<u32> {
    (0..n_years * MONTHS_PER_YEAR)
        .map(|i| (i % MONTHS_PER_YEAR) as u32)
        .collect()
}

/// Repeat each yearly row of `yearly` twelve times, aligning annual values
/// with a monthly sampling.
///
/// The input has one row per year and one column per cell; the output has
/// `12 * n_years` rows in the same column order.
pub fn expand_yearly_values(yearly: &Array2<f64>) -> Array2<f64> {
    let (n_years, n_cells) = yearly.dim();
    Array2::from_shape_fn((n_years * MONTHS_PER_YEAR, n_cells), |(i, j)| {
        yearly[[i / MONTHS_PER_YEAR, j]]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn monthly_range_wraps_years() {
        let times = monthly_date_range(2000, 14);
        assert_eq!(times.len(), 14);
        assert_eq!(times[0], NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(times[11], NaiveDate::from_ymd_opt(2000, 12, 1).unwrap());
        assert_eq!(times[12], NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
        assert_eq!(times[13], NaiveDate::from_ymd_opt(2001, 2, 1).unwrap());
    }

    #[test]
    fn yearly_range_is_year_starts() {
        let times = yearly_date_range(2000, 3);
        assert_eq!(
            times,
            vec![
                NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2002, 1, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn months_are_zero_based() {
        let axis = TimeAxis::new(monthly_date_range(2000, 24));
        let months = axis.months();
        assert_eq!(months[0], 0);
        assert_eq!(months[11], 11);
        assert_eq!(months[12], 0);
        assert_eq!(months, repeating_months(2));
    }

    #[test]
    fn january_start_detection() {
        let axis = TimeAxis::new(monthly_date_range(2000, 12));
        assert!(axis.starts_in_january());

        let axis = TimeAxis::new(monthly_date_range(2000, 12)[1..].to_vec());
        assert!(!axis.starts_in_january());

        let axis = TimeAxis::new(Vec::new());
        assert!(!axis.starts_in_january());
    }

    #[test]
    fn sample_dim_resolution() {
        let times = monthly_date_range(2000, 12);

        let plain = TimeAxis::new(times.clone());
        assert_eq!(plain.sample_dim(), "time");
        assert_eq!(plain.time_coord(), "time");

        let renamed = TimeAxis::with_time_coord(times.clone(), "dates");
        assert_eq!(renamed.sample_dim(), "dates");
        assert_eq!(renamed.time_coord(), "dates");

        let stacked = TimeAxis::stacked(times, "sample", "time");
        assert_eq!(stacked.sample_dim(), "sample");
        assert_eq!(stacked.time_coord(), "time");
    }

    #[test]
    fn expansion_repeats_each_year_twelve_times() {
        let yearly = array![[1.0, 10.0], [2.0, 20.0]];
        let monthly = expand_yearly_values(&yearly);

        assert_eq!(monthly.dim(), (24, 2));
        for t in 0..12 {
            assert_eq!(monthly[[t, 0]], 1.0);
            assert_eq!(monthly[[t, 1]], 10.0);
        }
        for t in 12..24 {
            assert_eq!(monthly[[t, 0]], 2.0);
            assert_eq!(monthly[[t, 1]], 20.0);
        }
    }
}
