//! Error reporting.
//!
//! Every fallible engine operation returns a [`CaError`]. Each variant maps
//! to a stable negative integer code; callers that predate the enum compare
//! against those codes, so the numbering must never change.

use thiserror::Error;

/// Convenience result type for engine operations.
pub type CaResult<T> = Result<T, CaError>;

/// Error produced by an engine operation.
///
/// The engine is left in its prior state whenever one of these is returned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum CaError {
    /// The cell buffers were already allocated.
    #[error("cell buffers are already initialized")]
    AlreadyInitialized,
    /// The operation requires cell buffers that have not been allocated yet.
    #[error("cell buffers are not initialized")]
    CellsNull,
    /// Allocating the cell buffers failed.
    #[error("failed to allocate cell buffers")]
    AllocationFailed,
    /// A cell state is outside `[0, num_states)`.
    #[error("cell state is out of range for the configured number of states")]
    InvalidState,
    /// The seeding state passed to `init_condition` is out of range.
    #[error("initial condition state must be less than the number of states")]
    InvalidStateCondition,
    /// The boundary radius is zero.
    #[error("boundary radius must be at least 1")]
    InvalidRadius,
    /// Fewer than two cell states were requested.
    #[error("number of states must be at least 2")]
    InvalidNumStates,
    /// Allocating a neighborhood scratch buffer failed.
    #[error("failed to allocate a neighborhood buffer")]
    NeighborhoodAllocationFailed,
    /// The rule type is `Custom` but no custom rule was supplied to `step`.
    #[error("rule type is Custom but no custom rule was given")]
    CustomRuleMissing,
    /// The boundary radius exceeds half of some grid dimension.
    #[error("boundary radius is larger than half of a grid dimension")]
    RadiusTooLarge,
}

impl CaError {
    /// Returns the stable integer code for this error.
    pub fn code(self) -> i32 {
        match self {
            Self::AlreadyInitialized => -1,
            Self::CellsNull => -2,
            Self::AllocationFailed => -3,
            Self::InvalidState => -4,
            Self::InvalidStateCondition => -5,
            Self::InvalidRadius => -6,
            Self::InvalidNumStates => -7,
            Self::NeighborhoodAllocationFailed => -8,
            Self::CustomRuleMissing => -9,
            Self::RadiusTooLarge => -10,
        }
    }

    /// Looks up the error for a stable integer code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::AlreadyInitialized),
            -2 => Some(Self::CellsNull),
            -3 => Some(Self::AllocationFailed),
            -4 => Some(Self::InvalidState),
            -5 => Some(Self::InvalidStateCondition),
            -6 => Some(Self::InvalidRadius),
            -7 => Some(Self::InvalidNumStates),
            -8 => Some(Self::NeighborhoodAllocationFailed),
            -9 => Some(Self::CustomRuleMissing),
            -10 => Some(Self::RadiusTooLarge),
            _ => None,
        }
    }
}

/// Formats a human-readable description for a stable integer error code.
pub fn error_message(code: i32) -> String {
    match CaError::from_code(code) {
        Some(err) => err.to_string(),
        None => format!("unknown error code {}", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message() {
        assert_eq!(CaError::CellsNull.to_string(), error_message(-2));
        assert_eq!("unknown error code 3", error_message(3));
    }

    #[test]
    fn test_error_codes_round_trip() {
        for code in -10..=-1 {
            let err = CaError::from_code(code).unwrap();
            assert_eq!(code, err.code());
            assert!(!err.to_string().is_empty());
        }
        assert_eq!(None, CaError::from_code(0));
        assert_eq!(None, CaError::from_code(-11));
    }
}
