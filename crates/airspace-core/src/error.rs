//! Error types for the detection pipeline.
//!
//! None of these reach an HTTP caller: fetch and index failures are absorbed
//! into "stale" or "no alerts" results by the components that see them.

use thiserror::Error;

/// Why a raw record was excluded by the normalizer. Never surfaced to callers.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum MalformedRecord {
    #[error("record is not an array")]
    NotArray,
    #[error("record has {found} fields")]
    Arity { found: usize },
    #[error("{0} is missing or not a number")]
    NonNumeric(&'static str),
    #[error("{0} is not finite")]
    NonFinite(&'static str),
    #[error("{0} is out of range")]
    OutOfRange(&'static str),
}

/// Upstream feed could not deliver a usable payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("upstream unreachable: {0}")]
    Unreachable(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("upstream did not answer in time")]
    Timeout,
    #[error("failed to decode upstream payload: {0}")]
    Decode(String),
}

/// Spatial index could not be built over the given points.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IndexBuildError {
    #[error("point {index} has non-finite coordinates ({lat}, {lon})")]
    NonFiniteCoordinate { index: usize, lat: f64, lon: f64 },
}

/// A per-source field mapping is unusable.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MappingError {
    #[error("field mapping has no {0} role")]
    MissingRole(&'static str),
    #[error("field mapping assigns the {0} role more than once")]
    DuplicateRole(&'static str),
    #[error("unit scale {0} is not a finite positive number")]
    InvalidUnitScale(f64),
}
