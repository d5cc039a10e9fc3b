use thiserror::Error;

use crate::types::Rect;

pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A sheet or piece spec has a zero width, height or quantity.
    #[error("invalid dimension in {subject}: {reason}")]
    InvalidDimension { subject: String, reason: &'static str },

    /// An instance fits on an empty sheet in neither orientation.
    #[error("piece #{id} ({piece}) does not fit on a {sheet} sheet in either orientation")]
    InstanceTooLarge { id: u32, piece: Rect, sheet: Rect },

    #[error("{requested} pieces requested, at most {limit} are allowed per plan")]
    TooManyInstances { requested: u64, limit: usize },

    /// The engine produced output that breaks its own invariants.
    #[error("internal planner error: {0}")]
    Internal(String),
}
