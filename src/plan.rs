use crate::engine::PlacementEngine;
use crate::error::{PlanError, Result};
use crate::expand::expand;
use crate::grouper::group_sheets;
use crate::stats::aggregate;
use crate::types::{PieceSpec, PlanResult, Rect};

/// Upper bound on expanded instances per plan, keeps the best-fit scan bounded.
pub const DEFAULT_MAX_INSTANCES: usize = 10_000;

/// Computes cutting plans for one sheet size. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct Planner {
    sheet: Rect,
    max_instances: usize,
}

impl Planner {
    pub fn new(sheet: Rect) -> Self {
        Self {
            sheet,
            max_instances: DEFAULT_MAX_INSTANCES,
        }
    }

    pub fn with_max_instances(mut self, max_instances: usize) -> Self {
        self.max_instances = max_instances;
        self
    }

    #[tracing::instrument(skip_all, fields(sheet = %self.sheet, specs = specs.len()))]
    pub fn plan(&self, specs: &[PieceSpec]) -> Result<PlanResult> {
        if self.sheet.width == 0 || self.sheet.height == 0 {
            return Err(PlanError::InvalidDimension {
                subject: format!("sheet {}", self.sheet),
                reason: "width and height must be positive",
            });
        }

        let instances = expand(specs, self.max_instances)?;
        if instances.is_empty() {
            tracing::info!("no pieces requested, empty plan");
            return Ok(PlanResult::empty());
        }

        let sheets = PlacementEngine::new(self.sheet).pack(&instances)?;
        let groups = group_sheets(&sheets);
        let result = aggregate(self.sheet, &sheets, groups);

        let repeated: usize = result
            .plan_groups
            .iter()
            .map(|g| g.repetitions as usize)
            .sum();
        if repeated != result.total_sheets {
            return Err(PlanError::Internal(format!(
                "{} sheets grouped into {} repetitions",
                result.total_sheets, repeated
            )));
        }

        tracing::info!(
            instances = instances.len(),
            sheets = result.total_sheets,
            layouts = result.plan_groups.len(),
            utilization = %result.overall_utilization,
            "plan computed"
        );

        Ok(result)
    }
}

/// Plans `specs` on `sheet` with default limits.
pub fn compute_plan(sheet: Rect, specs: &[PieceSpec]) -> Result<PlanResult> {
    Planner::new(sheet).plan(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sheet_rejected() {
        let err = compute_plan(Rect::new(0, 10), &[PieceSpec::new(1, 1, 1)]).unwrap_err();
        assert!(matches!(err, PlanError::InvalidDimension { subject, .. } if subject == "sheet 0x10"));
    }

    #[test]
    fn test_invalid_spec_aborts_before_packing() {
        let err = compute_plan(
            Rect::new(10, 10),
            &[PieceSpec::new(11, 11, 1), PieceSpec::new(1, 0, 1)],
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::InvalidDimension { .. }));
    }

    #[test]
    fn test_instance_limit() {
        let planner = Planner::new(Rect::new(10, 10)).with_max_instances(3);
        assert!(planner.plan(&[PieceSpec::new(1, 1, 3)]).is_ok());
        assert!(matches!(
            planner.plan(&[PieceSpec::new(1, 1, 4)]),
            Err(PlanError::TooManyInstances { requested: 4, limit: 3 })
        ));
    }

    #[test]
    fn test_huge_sheets_do_not_overflow() {
        let result = compute_plan(
            Rect::new(u32::MAX, u32::MAX),
            &[PieceSpec::new(3_000_000_000, 3_000_000_000, 2)],
        )
        .unwrap();
        assert_eq!(result.total_sheets, 2);
        assert_eq!(result.plan_groups.len(), 1);
        assert_eq!(result.plan_groups[0].repetitions, 2);
        assert_eq!(result.overall_utilization.to_string(), "48.78%");
    }

    #[test]
    fn test_repeated_layouts_grouped() {
        let result = compute_plan(Rect::new(100, 100), &[PieceSpec::new(60, 60, 3)]).unwrap();
        assert_eq!(result.total_sheets, 3);
        assert_eq!(result.plan_groups.len(), 1);
        assert_eq!(result.plan_groups[0].repetitions, 3);
        assert_eq!(result.plan_groups[0].leftover_area, 100 * 100 - 60 * 60);
        assert_eq!(result.overall_utilization.to_string(), "36.00%");
    }
}
