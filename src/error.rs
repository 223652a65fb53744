use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("resolution must be > 0, got {0}")]
    InvalidResolution(usize),

    #[error("{name} must be {expected}, got {value}")]
    InvalidParameter {
        name: &'static str,
        expected: &'static str,
        value: f32,
    },

    #[error("cell ({i}, {j}) is outside the interior [1, {n}]")]
    OutsideInterior { i: usize, j: usize, n: usize },

    #[error("could not parse {key}={value:?}")]
    InvalidEnv { key: &'static str, value: String },
}
