//! Request/response shapes for presenting a plan, with a per-request color legend.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::PlanError;
use crate::plan::Planner;
use crate::types::{PieceCount, PieceSpec, Placement, PlanResult, Rect, Utilization};

const PALETTE: [&str; 15] = [
    "#FF6347", "#4682B4", "#32CD32", "#FFD700", "#6A5ACD", "#40E0D0", "#FF69B4", "#DAA520",
    "#8A2BE2", "#00BFFF", "#7FFF00", "#DC143C", "#FF8C00", "#ADFF2F", "#BA55D3",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlanRequest {
    pub sheet: Rect,
    pub pieces: Vec<PieceSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub piece: Rect,
    pub color: String,
}

/// One color per distinct piece type, in order of first appearance in `specs`.
pub fn legend(specs: &[PieceSpec]) -> Vec<LegendEntry> {
    let mut entries: Vec<LegendEntry> = Vec::new();
    for spec in specs {
        let piece = spec.rect();
        if entries.iter().any(|e| e.piece == piece) {
            continue;
        }
        let color = color_for(entries.len());
        entries.push(LegendEntry { piece, color });
    }
    entries
}

fn color_for(index: usize) -> String {
    match PALETTE.get(index) {
        Some(c) => c.to_string(),
        None => {
            // Scatter indices past the palette over the RGB cube.
            let mixed = (index as u32).wrapping_mul(0x9E37_79B1) >> 8;
            format!("#{:06X}", mixed & 0xFF_FFFF)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColoredPlacement {
    #[serde(flatten)]
    pub placement: Placement,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub placements: Vec<ColoredPlacement>,
    pub repetitions: u32,
    pub leftover_area: u64,
    pub piece_counts: Vec<PieceCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub sheet: Rect,
    pub pieces: Vec<PieceSpec>,
    pub plan_groups: Vec<GroupView>,
    pub total_sheets: usize,
    pub overall_utilization: Utilization,
    pub legend: Vec<LegendEntry>,
}

impl PlanResponse {
    /// Annotates every representative placement with its type's legend color.
    pub fn new(sheet: Rect, pieces: Vec<PieceSpec>, result: PlanResult) -> Self {
        let legend = legend(&pieces);
        let color_of = |piece: Rect| {
            legend
                .iter()
                .find(|e| e.piece == piece)
                .map(|e| e.color.clone())
        };

        let plan_groups = result
            .plan_groups
            .into_iter()
            .map(|g| GroupView {
                placements: g
                    .placements
                    .into_iter()
                    .map(|placement| ColoredPlacement {
                        color: color_of(placement.piece),
                        placement,
                    })
                    .collect(),
                repetitions: g.repetitions,
                leftover_area: g.leftover_area,
                piece_counts: g.piece_counts,
            })
            .collect();

        Self {
            sheet,
            pieces,
            plan_groups,
            total_sheets: result.total_sheets,
            overall_utilization: result.overall_utilization,
            legend,
        }
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("no pieces were supplied")]
    NoPieces,
    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Validates a request and plans it.
pub fn handle(req: PlanRequest, max_instances: usize) -> Result<PlanResponse, RequestError> {
    if req.pieces.is_empty() {
        return Err(RequestError::NoPieces);
    }
    let result = Planner::new(req.sheet)
        .with_max_instances(max_instances)
        .plan(&req.pieces)?;
    Ok(PlanResponse::new(req.sheet, req.pieces, result))
}
