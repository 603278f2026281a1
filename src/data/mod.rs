//! Input model: the perifusion table, range specifications and integration helpers
//!
//! - [`series`]: the time axis plus one secretion column per donor
//! - [`range`]: the `a-b|p` range mini-language
//! - [`auc`]: trapezoid and zero-crossing primitives
//! - [`parser`]: CSV loading

pub mod auc;
pub mod parser;
pub mod range;
pub mod series;

pub use range::{Interval, RangeError, RangeSpec, RangeToken};
pub use series::{
    DonorSeries, PerifusionData, PerifusionDataBuilder, SchemaError, TimeSeries,
    TIME_COLUMN_PATTERN,
};
