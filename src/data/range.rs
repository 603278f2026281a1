//! Time-range mini-language used by the phase-parameter table
//!
//! A range specification is a `|`-separated union of tokens, where each token is
//! either a single integer time point (`"30"`) or an inclusive integer interval
//! (`"3-9"`). Specifications are parsed once into a [`RangeSpec`] and then matched
//! against a time axis **by value**, never by index.
//!
//! Time points that are not present on the axis are silently skipped: resolving
//! `"3-9|30"` against an axis without `30` simply returns the points in `[3, 9]`.
//!
//! # Example
//!
//! ```rust
//! use perifusion::data::range::RangeSpec;
//!
//! let spec: RangeSpec = "3-9|30".parse().unwrap();
//! let axis = [1.0, 3.0, 6.0, 9.0, 12.0, 30.0];
//!
//! assert_eq!(spec.resolve(&axis), vec![3.0, 6.0, 9.0, 30.0]);
//! assert!(spec.as_interval().is_none()); // a union is not a single interval
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between the tokens of a union
const UNION_SEPARATOR: char = '|';
/// Separator between the bounds of an interval token
const INTERVAL_SEPARATOR: char = '-';

/// Errors raised while parsing a range specification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The specification is empty or whitespace only
    #[error("Empty range specification")]
    Empty,

    /// A `|`-separated token is empty (e.g. `"3-9|"`)
    #[error("Empty token in range specification '{spec}'")]
    EmptyToken {
        /// The full specification
        spec: String,
    },

    /// A token (or an interval bound) is not an integer
    #[error("Invalid token '{token}' in range specification '{spec}': expected an integer")]
    NonInteger {
        /// The offending token
        token: String,
        /// The full specification
        spec: String,
    },

    /// An interval token does not have exactly two bounds
    #[error("Malformed interval '{token}' in range specification '{spec}': expected 'start-end'")]
    MalformedInterval {
        /// The offending token
        token: String,
        /// The full specification
        spec: String,
    },
}

/// An inclusive integer interval `[start, end]`
///
/// An interval with `start > end` is valid but contains no time point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound (inclusive)
    pub start: i64,
    /// Upper bound (inclusive)
    pub end: i64,
}

impl Interval {
    /// Create a new inclusive interval
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Whether time `t` falls within the interval bounds
    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start as f64 && t <= self.end as f64
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.start, INTERVAL_SEPARATOR, self.end)
    }
}

/// One token of a range specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeToken {
    /// A single time point, matched by equality
    Point(i64),
    /// An inclusive interval
    Interval(Interval),
}

impl RangeToken {
    #[inline]
    fn contains(&self, t: f64) -> bool {
        match self {
            RangeToken::Point(p) => t == *p as f64,
            RangeToken::Interval(interval) => interval.contains(t),
        }
    }

    fn parse(token: &str, spec: &str) -> Result<Self, RangeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(RangeError::EmptyToken {
                spec: spec.to_string(),
            });
        }

        if token.contains(INTERVAL_SEPARATOR) {
            let bounds: Vec<&str> = token.split(INTERVAL_SEPARATOR).collect();
            if bounds.len() != 2 {
                return Err(RangeError::MalformedInterval {
                    token: token.to_string(),
                    spec: spec.to_string(),
                });
            }
            let start = parse_integer(bounds[0], spec)?;
            let end = parse_integer(bounds[1], spec)?;
            Ok(RangeToken::Interval(Interval::new(start, end)))
        } else {
            Ok(RangeToken::Point(parse_integer(token, spec)?))
        }
    }
}

impl fmt::Display for RangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeToken::Point(p) => write!(f, "{}", p),
            RangeToken::Interval(interval) => write!(f, "{}", interval),
        }
    }
}

fn parse_integer(raw: &str, spec: &str) -> Result<i64, RangeError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| RangeError::NonInteger {
            token: raw.trim().to_string(),
            spec: spec.to_string(),
        })
}

/// A parsed range specification: the union of its tokens
///
/// Serializes to and from its textual form (`"3-9|30"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RangeSpec {
    tokens: Vec<RangeToken>,
}

impl RangeSpec {
    /// Parse a textual range specification
    ///
    /// # Errors
    ///
    /// Returns a [`RangeError`] if the specification is empty or any token is not
    /// an integer point or an integer `start-end` interval.
    pub fn parse(spec: &str) -> Result<Self, RangeError> {
        if spec.trim().is_empty() {
            return Err(RangeError::Empty);
        }
        let tokens = spec
            .split(UNION_SEPARATOR)
            .map(|token| RangeToken::parse(token, spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tokens })
    }

    /// Build a specification covering a single interval
    pub fn interval(start: i64, end: i64) -> Self {
        Self {
            tokens: vec![RangeToken::Interval(Interval::new(start, end))],
        }
    }

    /// The tokens of the union, in specification order
    pub fn tokens(&self) -> &[RangeToken] {
        &self.tokens
    }

    /// Whether time `t` is denoted by any token of the union
    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        self.tokens.iter().any(|token| token.contains(t))
    }

    /// The single interval this specification denotes, if it is exactly one `a-b` token
    pub fn as_interval(&self) -> Option<Interval> {
        match self.tokens.as_slice() {
            [RangeToken::Interval(interval)] => Some(*interval),
            _ => None,
        }
    }

    /// Resolve the specification against a time axis
    ///
    /// Returns the distinct time values of `axis` denoted by the specification, in
    /// axis order. Tokens matching nothing contribute nothing.
    pub fn resolve(&self, axis: &[f64]) -> Vec<f64> {
        let mut points: Vec<f64> = axis.iter().copied().filter(|&t| self.contains(t)).collect();
        points.dedup();
        points
    }
}

impl FromStr for RangeSpec {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangeSpec::parse(s)
    }
}

impl TryFrom<String> for RangeSpec {
    type Error = RangeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RangeSpec::parse(&value)
    }
}

impl From<RangeSpec> for String {
    fn from(spec: RangeSpec) -> Self {
        spec.to_string()
    }
}

impl From<Interval> for RangeSpec {
    fn from(interval: Interval) -> Self {
        Self {
            tokens: vec![RangeToken::Interval(interval)],
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", UNION_SEPARATOR)?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}
