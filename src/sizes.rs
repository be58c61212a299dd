//! Requested ring sizes.
//!
//! The command line names either a single ring size or an inclusive
//! `start end [step]` range. With no positionals the configured default
//! range is used.

use crate::topology::{RingError, RingSize};
use serde::{Deserialize, Serialize};

/// Default range used when no sizes are given on the command line
pub const DEFAULT_START: i64 = 3;
pub const DEFAULT_END: i64 = 9;
pub const DEFAULT_STEP: i64 = 3;

/// Errors raised while turning CLI positionals into ring sizes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizeError {
    #[error("Invalid ring size: {0}")]
    InvalidSize(#[from] RingError),

    #[error("Range step must be a positive integer, got {0}")]
    InvalidStep(i64),

    #[error("Range {start}..={end} contains no ring sizes")]
    EmptyRange { start: i64, end: i64 },

    #[error("Expected at most 3 size arguments (start, end, step), got {0}")]
    TooManyArguments(usize),
}

/// Range applied when the command line names no sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeDefaults {
    pub start: i64,
    pub end: i64,
    pub step: i64,
}

impl Default for RangeDefaults {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            end: DEFAULT_END,
            step: DEFAULT_STEP,
        }
    }
}

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRequest {
    Single(i64),
    /// Inclusive of both `start` and `end`
    Range { start: i64, end: i64, step: i64 },
}

impl SizeRequest {
    /// Interpret the CLI positionals
    ///
    /// * `[]` - the default range
    /// * `[n]` - a single size
    /// * `[start, end]` - range with the default step
    /// * `[start, end, step]` - explicit range
    pub fn from_args(args: &[i64], defaults: &RangeDefaults) -> Result<Self, SizeError> {
        match *args {
            [] => Ok(Self::Range {
                start: defaults.start,
                end: defaults.end,
                step: defaults.step,
            }),
            [n] => Ok(Self::Single(n)),
            [start, end] => Ok(Self::Range {
                start,
                end,
                step: defaults.step,
            }),
            [start, end, step] => Ok(Self::Range { start, end, step }),
            _ => Err(SizeError::TooManyArguments(args.len())),
        }
    }

    /// Validate the request and expand it into ring sizes, in order.
    ///
    /// Every size is checked before any is returned so that no work starts
    /// on a partially valid request.
    pub fn sizes(&self) -> Result<Vec<RingSize>, SizeError> {
        match *self {
            Self::Single(n) => Ok(vec![RingSize::new(n)?]),
            Self::Range { start, end, step } => {
                if step < 1 {
                    return Err(SizeError::InvalidStep(step));
                }
                if start > end {
                    return Err(SizeError::EmptyRange { start, end });
                }
                let step = usize::try_from(step).map_err(|_| SizeError::InvalidStep(step))?;
                (start..=end)
                    .step_by(step)
                    .map(|n| RingSize::new(n).map_err(SizeError::from))
                    .collect()
            }
        }
    }
}
