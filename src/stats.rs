use crate::grouper::LayoutGroup;
use crate::types::{PlanGroup, PlanResult, Placement, Rect, Sheet, Utilization};

pub fn leftover_area(sheet: Rect, placements: &[Placement]) -> u64 {
    let used: u64 = placements.iter().map(|p| p.area()).sum();
    sheet.area().saturating_sub(used)
}

/// Placed area over all sheets, repeated ones included, against the stock consumed.
pub fn overall_utilization(sheet: Rect, sheets: &[Sheet]) -> Utilization {
    let used: u128 = sheets.iter().map(|s| s.used_area() as u128).sum();
    let total = sheet.area() as u128 * sheets.len() as u128;
    Utilization::from_areas(used, total)
}

/// Attaches leftover areas to each layout group and computes the totals.
pub fn aggregate(sheet: Rect, sheets: &[Sheet], groups: Vec<LayoutGroup>) -> PlanResult {
    let plan_groups = groups
        .into_iter()
        .map(|g| PlanGroup {
            leftover_area: leftover_area(sheet, &g.placements),
            signature: g.signature,
            placements: g.placements,
            repetitions: g.repetitions,
            piece_counts: g.piece_counts,
        })
        .collect();

    PlanResult {
        plan_groups,
        total_sheets: sheets.len(),
        overall_utilization: overall_utilization(sheet, sheets),
    }
}
