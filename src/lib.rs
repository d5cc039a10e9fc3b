//! Two-dimensional cutting-stock planning: expand piece demand into
//! instances, pack them onto as few sheets as the best-fit heuristic finds,
//! collapse identical sheet layouts and report material utilization.

pub mod api;
pub mod engine;
pub mod error;
pub mod expand;
pub mod grouper;
pub mod guillotine;
pub mod plan;
pub mod render;
pub mod stats;
pub mod types;

pub use error::{PlanError, Result};
pub use plan::{Planner, compute_plan};
pub use types::{PieceSpec, PlanGroup, PlanResult, Rect};
