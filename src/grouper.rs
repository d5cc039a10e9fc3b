use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::types::{PieceCount, Placement, Sheet, Signature};

/// Sheets sharing one layout, before area statistics are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutGroup {
    pub signature: Signature,
    pub placements: Vec<Placement>,
    pub repetitions: u32,
    pub piece_counts: Vec<PieceCount>,
}

/// Partitions sheets by signature. Groups come out in order of first
/// appearance; the first sheet of each group is its representative.
pub fn group_sheets(sheets: &[Sheet]) -> Vec<LayoutGroup> {
    let mut groups: Vec<LayoutGroup> = Vec::new();
    let mut by_signature: HashMap<Signature, usize> = HashMap::new();

    for sheet in sheets {
        match by_signature.entry(sheet.signature()) {
            Entry::Occupied(e) => groups[*e.get()].repetitions += 1,
            Entry::Vacant(e) => {
                let signature = e.key().clone();
                e.insert(groups.len());
                groups.push(LayoutGroup {
                    signature,
                    placements: sheet.placements.clone(),
                    repetitions: 1,
                    piece_counts: count_pieces(&sheet.placements),
                });
            }
        }
    }

    groups
}

/// Counts placements per piece type, keyed on pre-rotation size.
fn count_pieces(placements: &[Placement]) -> Vec<PieceCount> {
    let mut counts: Vec<PieceCount> = Vec::new();
    for p in placements {
        match counts.iter_mut().find(|c| c.piece == p.piece) {
            Some(c) => c.count += 1,
            None => counts.push(PieceCount {
                piece: p.piece,
                count: 1,
            }),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn placement(id: u32, x: u32, y: u32, piece: Rect, rotated: bool) -> Placement {
        let placed = if rotated { piece.rotated() } else { piece };
        Placement {
            instance_id: id,
            x,
            y,
            placed_width: placed.width,
            placed_height: placed.height,
            rotated,
            piece,
        }
    }

    #[test]
    fn test_identical_layouts_collapse() {
        let half = Rect::new(5, 10);
        let sheets = vec![
            Sheet {
                index: 0,
                placements: vec![placement(1, 0, 0, half, false), placement(2, 5, 0, half, false)],
            },
            Sheet {
                index: 1,
                placements: vec![placement(4, 5, 0, half, false), placement(3, 0, 0, half, false)],
            },
        ];
        let groups = group_sheets(&sheets);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].repetitions, 2);
        assert_eq!(groups[0].placements, sheets[0].placements);
        assert_eq!(
            groups[0].piece_counts,
            vec![PieceCount {
                piece: half,
                count: 2
            }]
        );
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let a = Rect::new(10, 10);
        let b = Rect::new(4, 4);
        let sheets = vec![
            Sheet {
                index: 0,
                placements: vec![placement(1, 0, 0, a, false)],
            },
            Sheet {
                index: 1,
                placements: vec![placement(2, 0, 0, b, false)],
            },
            Sheet {
                index: 2,
                placements: vec![placement(3, 0, 0, a, false)],
            },
        ];
        let groups = group_sheets(&sheets);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].placements[0].piece, a);
        assert_eq!(groups[0].repetitions, 2);
        assert_eq!(groups[1].placements[0].piece, b);
        assert_eq!(groups[1].repetitions, 1);
    }

    #[test]
    fn test_counts_use_unrotated_type() {
        // A 2x6 and a rotated 6x2 occupy the same footprint but are different types.
        let sheets = vec![Sheet {
            index: 0,
            placements: vec![
                placement(1, 0, 0, Rect::new(2, 6), false),
                placement(2, 2, 0, Rect::new(6, 2), true),
                placement(3, 4, 0, Rect::new(2, 6), false),
            ],
        }];
        let groups = group_sheets(&sheets);
        assert_eq!(
            groups[0].piece_counts,
            vec![
                PieceCount {
                    piece: Rect::new(2, 6),
                    count: 2
                },
                PieceCount {
                    piece: Rect::new(6, 2),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_no_sheets() {
        assert!(group_sheets(&[]).is_empty());
    }
}
