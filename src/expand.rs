use crate::error::{PlanError, Result};
use crate::types::{PieceInstance, PieceSpec};

/// Turns piece specs into one instance per unit of quantity.
///
/// Ids are assigned from 1 in spec order, then copy order within a spec.
/// Every spec is validated before anything is produced, and the total
/// instance count is checked against `limit` before allocating.
pub fn expand(specs: &[PieceSpec], limit: usize) -> Result<Vec<PieceInstance>> {
    for (idx, spec) in specs.iter().enumerate() {
        let reason = if spec.width == 0 {
            Some("width must be positive")
        } else if spec.height == 0 {
            Some("height must be positive")
        } else if spec.quantity == 0 {
            Some("quantity must be positive")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(PlanError::InvalidDimension {
                subject: format!(
                    "piece {} ({}x{}, qty {})",
                    idx + 1,
                    spec.width,
                    spec.height,
                    spec.quantity
                ),
                reason,
            });
        }
    }

    let requested: u64 = specs.iter().map(|s| s.quantity as u64).sum();
    if requested > limit as u64 || requested > u32::MAX as u64 {
        return Err(PlanError::TooManyInstances { requested, limit });
    }

    let mut instances = Vec::with_capacity(requested as usize);
    let mut next_id = 1u32;
    for spec in specs {
        for _ in 0..spec.quantity {
            instances.push(PieceInstance {
                id: next_id,
                rect: spec.rect(),
            });
            next_id += 1;
        }
    }
    Ok(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    #[test]
    fn test_ids_follow_spec_then_copy_order() {
        let specs = [PieceSpec::new(5, 10, 2), PieceSpec::new(3, 3, 1)];
        let instances = expand(&specs, 100).unwrap();
        let ids: Vec<u32> = instances.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(instances[0].rect, Rect::new(5, 10));
        assert_eq!(instances[1].rect, Rect::new(5, 10));
        assert_eq!(instances[2].rect, Rect::new(3, 3));
    }

    #[test]
    fn test_empty_input() {
        assert!(expand(&[], 100).unwrap().is_empty());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let specs = [PieceSpec::new(5, 10, 2), PieceSpec::new(0, 3, 1)];
        match expand(&specs, 100) {
            Err(PlanError::InvalidDimension { subject, reason }) => {
                assert!(subject.contains("piece 2"));
                assert_eq!(reason, "width must be positive");
            }
            other => panic!("expected InvalidDimension, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = expand(&[PieceSpec::new(5, 5, 0)], 100).unwrap_err();
        assert!(matches!(err, PlanError::InvalidDimension { reason: "quantity must be positive", .. }));
    }

    #[test]
    fn test_limit_enforced() {
        let err = expand(&[PieceSpec::new(1, 1, 6), PieceSpec::new(2, 2, 5)], 10).unwrap_err();
        assert_eq!(
            err,
            PlanError::TooManyInstances {
                requested: 11,
                limit: 10
            }
        );
    }
}
