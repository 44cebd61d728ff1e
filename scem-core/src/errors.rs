use thiserror::Error;

/// Error type for invalid inputs and failed fits.
#[derive(Error, Debug)]
pub enum Error {
    /// Cell dimensions of two inputs are named differently.
    #[error("`{left_name}` and `{right_name}` have different dimensions: '{left_dim}' vs. '{right_dim}'")]
    DimensionMismatch {
        left_name: String,
        right_name: String,
        left_dim: String,
        right_dim: String,
    },

    /// A shared dimension has a different size on the two inputs.
    #[error(
        "`{left_name}` and `{right_name}` have different dimensions: \
         the '{dim}' coords have a different size: {left_size} vs. {right_size}"
    )]
    CoordSizeMismatch {
        dim: String,
        left_name: String,
        right_name: String,
        left_size: usize,
        right_size: usize,
    },

    /// Monthly data whose first timestamp is not in January.
    #[error("Monthly target data must start with January")]
    MonthlyStartNotJanuary,

    /// Monthly sample count is not 12 times the yearly sample count.
    #[error(
        "`{name}` must hold 12 monthly samples per yearly value: \
         got {n_monthly} monthly samples for {n_yearly} yearly values"
    )]
    SampleLengthMismatch {
        name: String,
        n_monthly: usize,
        n_yearly: usize,
    },

    /// Two series that must be sampled identically are not.
    #[error("`{left_name}` and `{right_name}` must have the same sample count: {left_len} vs. {right_len}")]
    LengthMismatch {
        left_name: String,
        right_name: String,
        left_len: usize,
        right_len: usize,
    },

    /// An input does not have the expected labeled form.
    #[error("`{name}` has an invalid form: {details}")]
    InvalidForm { name: String, details: String },

    /// The least-squares solve did not produce a solution.
    #[error("least-squares solve failed at order {order}: {details}")]
    LeastSquaresFailure { order: usize, details: String },

    /// Settings could not be parsed.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Convenience type for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
