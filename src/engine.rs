//! Best-area-fit placement over guillotine-split free rectangles.
//!
//! Complexity: every instance scans every free rectangle of every open
//! sheet, so a run costs O(instances x open_sheets x free_rects_per_sheet).
//! Callers bound the instance count (see [`crate::plan::Planner`]).

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::error::{PlanError, Result};
use crate::guillotine::{Candidate, GuillotineBin};
use crate::types::{PieceInstance, Rect, Sheet};

/// Leftover area, sheet index, y, x, rotated.
type Rank = (u64, usize, u32, u32, bool);

pub struct PlacementEngine {
    sheet: Rect,
}

impl PlacementEngine {
    pub fn new(sheet: Rect) -> Self {
        Self { sheet }
    }

    /// Places every instance, opening sheets only when no open one has room.
    ///
    /// Instances are processed largest area first, ties by id. Among all
    /// feasible spots on all open sheets the one leaving the least unused
    /// area in its free rectangle wins; ties go to the lowest sheet index,
    /// then lowest y, then lowest x.
    pub fn pack(&self, instances: &[PieceInstance]) -> Result<Vec<Sheet>> {
        for instance in instances {
            if !self.admits(instance.rect) {
                return Err(self.too_large(instance));
            }
        }

        let mut order: Vec<&PieceInstance> = instances.iter().collect();
        order.sort_by_key(|i| (Reverse(i.rect.area()), i.id));

        let mut bins: Vec<GuillotineBin> = Vec::new();

        for instance in order {
            let mut best: Option<(Rank, usize, Candidate)> = None;
            for (bi, bin) in bins.iter().enumerate() {
                if let Some(candidate) = bin.find_best(instance.rect) {
                    let (leftover, y, x, rotated) = candidate.rank();
                    let rank = (leftover, bi, y, x, rotated);
                    if best.is_none_or(|(r, _, _)| rank < r) {
                        best = Some((rank, bi, candidate));
                    }
                }
            }

            if let Some((_, bi, candidate)) = best {
                bins[bi].place(candidate, instance);
            } else {
                let mut bin = GuillotineBin::new(self.sheet);
                let candidate = bin
                    .find_best(instance.rect)
                    .ok_or_else(|| self.too_large(instance))?;
                bin.place(candidate, instance);
                tracing::debug!(
                    sheet = bins.len(),
                    instance = instance.id,
                    piece = %instance.rect,
                    "opened sheet"
                );
                bins.push(bin);
            }
        }

        let sheets: Vec<Sheet> = bins
            .into_iter()
            .enumerate()
            .map(|(index, bin)| Sheet {
                index,
                placements: bin.placements,
            })
            .collect();

        audit(self.sheet, instances, &sheets)?;
        Ok(sheets)
    }

    fn admits(&self, piece: Rect) -> bool {
        piece.fits_in(&self.sheet) || piece.rotated().fits_in(&self.sheet)
    }

    fn too_large(&self, instance: &PieceInstance) -> PlanError {
        PlanError::InstanceTooLarge {
            id: instance.id,
            piece: instance.rect,
            sheet: self.sheet,
        }
    }
}

/// Checks the packing invariants: every instance placed exactly once in an
/// orientation of its own size, inside the sheet, with no overlaps.
/// Instances are matched by id, not by position.
pub fn audit(sheet: Rect, instances: &[PieceInstance], sheets: &[Sheet]) -> Result<()> {
    let by_id: HashMap<u32, usize> = instances
        .iter()
        .enumerate()
        .map(|(idx, instance)| (instance.id, idx))
        .collect();
    let mut seen = vec![false; instances.len()];

    for s in sheets {
        for (i, p) in s.placements.iter().enumerate() {
            let idx = *by_id.get(&p.instance_id).ok_or_else(|| {
                PlanError::Internal(format!(
                    "sheet {} holds unknown instance #{}",
                    s.index, p.instance_id
                ))
            })?;
            if seen[idx] {
                return Err(PlanError::Internal(format!(
                    "instance #{} placed more than once",
                    p.instance_id
                )));
            }
            seen[idx] = true;

            let original = instances[idx].rect;
            let expected = if p.rotated {
                original.rotated()
            } else {
                original
            };
            if p.footprint() != expected || p.piece != original {
                return Err(PlanError::Internal(format!(
                    "instance #{} ({}) placed as {}",
                    p.instance_id,
                    original,
                    p.footprint()
                )));
            }

            if p.right() > sheet.width || p.bottom() > sheet.height {
                return Err(PlanError::Internal(format!(
                    "sheet {}: instance #{} at ({}, {}) exceeds {}",
                    s.index, p.instance_id, p.x, p.y, sheet
                )));
            }

            if let Some(other) = s.placements[i + 1..].iter().find(|o| p.overlaps(o)) {
                return Err(PlanError::Internal(format!(
                    "sheet {}: instance #{} overlaps instance #{}",
                    s.index, p.instance_id, other.instance_id
                )));
            }
        }
    }

    if let Some(idx) = seen.iter().position(|placed| !placed) {
        return Err(PlanError::Internal(format!(
            "instance #{} was never placed",
            instances[idx].id
        )));
    }

    Ok(())
}
