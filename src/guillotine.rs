use crate::types::{PieceInstance, Placement, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeRect {
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
}

/// One open sheet: the pieces placed so far and the free space left over,
/// kept as a list of disjoint rectangles.
#[derive(Debug, Clone)]
pub struct GuillotineBin {
    free_area: u64,
    pub free_rects: Vec<FreeRect>,
    pub placements: Vec<Placement>,
}

/// A feasible spot for a piece inside one bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub free_idx: usize,
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
    /// Area of the chosen free rectangle not covered by the piece.
    pub leftover: u64,
}

impl Candidate {
    /// Best-fit ordering: least leftover, then topmost, then leftmost,
    /// unrotated before rotated.
    pub fn rank(&self) -> (u64, u32, u32, bool) {
        (self.leftover, self.y, self.x, self.rotated)
    }
}

impl GuillotineBin {
    pub fn new(size: Rect) -> Self {
        Self {
            free_area: size.area(),
            free_rects: vec![FreeRect {
                x: 0,
                y: 0,
                rect: size,
            }],
            placements: Vec::new(),
        }
    }

    pub fn find_best(&self, piece: Rect) -> Option<Candidate> {
        if piece.area() > self.free_area {
            return None;
        }

        let orientations: &[bool] = if piece.is_square() {
            &[false]
        } else {
            &[false, true]
        };

        let mut best: Option<Candidate> = None;
        for (idx, free) in self.free_rects.iter().enumerate() {
            for &rotated in orientations {
                let oriented = if rotated { piece.rotated() } else { piece };
                if !oriented.fits_in(&free.rect) {
                    continue;
                }
                let candidate = Candidate {
                    free_idx: idx,
                    x: free.x,
                    y: free.y,
                    rotated,
                    leftover: free.rect.area() - oriented.area(),
                };
                if best.is_none_or(|b| candidate.rank() < b.rank()) {
                    best = Some(candidate);
                }
            }
        }

        best
    }

    pub fn place(&mut self, candidate: Candidate, instance: &PieceInstance) -> Placement {
        let free = self.free_rects[candidate.free_idx];
        let placed = if candidate.rotated {
            instance.rect.rotated()
        } else {
            instance.rect
        };

        let placement = Placement {
            instance_id: instance.id,
            x: free.x,
            y: free.y,
            placed_width: placed.width,
            placed_height: placed.height,
            rotated: candidate.rotated,
            piece: instance.rect,
        };

        // Remove the used free rect and split
        self.free_rects.swap_remove(candidate.free_idx);
        self.split(free, placed);
        self.free_area -= placed.area();
        self.placements.push(placement);
        self.merge_free_rects();

        placement
    }

    fn split(&mut self, free: FreeRect, placed: Rect) {
        let right_w = free.rect.width - placed.width;
        let bottom_h = free.rect.height - placed.height;

        if right_w > 0 && bottom_h > 0 {
            // The shorter leftover axis gets the narrow strip, the other
            // remainder spans the full free rect.
            if right_w < bottom_h {
                self.free_rects.push(FreeRect {
                    x: free.x + placed.width,
                    y: free.y,
                    rect: Rect::new(right_w, placed.height),
                });
                self.free_rects.push(FreeRect {
                    x: free.x,
                    y: free.y + placed.height,
                    rect: Rect::new(free.rect.width, bottom_h),
                });
            } else {
                self.free_rects.push(FreeRect {
                    x: free.x + placed.width,
                    y: free.y,
                    rect: Rect::new(right_w, free.rect.height),
                });
                self.free_rects.push(FreeRect {
                    x: free.x,
                    y: free.y + placed.height,
                    rect: Rect::new(placed.width, bottom_h),
                });
            }
        } else if right_w > 0 {
            self.free_rects.push(FreeRect {
                x: free.x + placed.width,
                y: free.y,
                rect: Rect::new(right_w, free.rect.height),
            });
        } else if bottom_h > 0 {
            self.free_rects.push(FreeRect {
                x: free.x,
                y: free.y + placed.height,
                rect: Rect::new(free.rect.width, bottom_h),
            });
        }
    }

    /// Joins free rects sharing a full edge until no pair is left to join.
    fn merge_free_rects(&mut self) {
        let mut merged = true;
        while merged {
            merged = false;
            'outer: for i in 0..self.free_rects.len() {
                for j in (i + 1)..self.free_rects.len() {
                    if let Some(m) = Self::try_merge(self.free_rects[i], self.free_rects[j]) {
                        self.free_rects[i] = m;
                        self.free_rects.swap_remove(j);
                        merged = true;
                        break 'outer;
                    }
                }
            }
        }
    }

    fn try_merge(a: FreeRect, b: FreeRect) -> Option<FreeRect> {
        // Horizontal neighbours: same row band, touching edges
        if a.y == b.y && a.rect.height == b.rect.height {
            let x = if a.x + a.rect.width == b.x {
                Some(a.x)
            } else if b.x + b.rect.width == a.x {
                Some(b.x)
            } else {
                None
            };
            if let Some(x) = x {
                return Some(FreeRect {
                    x,
                    y: a.y,
                    rect: Rect::new(a.rect.width + b.rect.width, a.rect.height),
                });
            }
        }
        // Vertical neighbours: same column band, touching edges
        if a.x == b.x && a.rect.width == b.rect.width {
            let y = if a.y + a.rect.height == b.y {
                Some(a.y)
            } else if b.y + b.rect.height == a.y {
                Some(b.y)
            } else {
                None
            };
            if let Some(y) = y {
                return Some(FreeRect {
                    x: a.x,
                    y,
                    rect: Rect::new(a.rect.width, a.rect.height + b.rect.height),
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(id: u32, width: u32, height: u32) -> PieceInstance {
        PieceInstance {
            id,
            rect: Rect::new(width, height),
        }
    }

    #[test]
    fn test_place_single_piece() {
        let mut bin = GuillotineBin::new(Rect::new(100, 100));
        let piece = instance(1, 50, 30);
        let candidate = bin.find_best(piece.rect).unwrap();
        let p = bin.place(candidate, &piece);
        assert_eq!(p.x, 0);
        assert_eq!(p.y, 0);
        assert_eq!(p.placed_width, 50);
        assert_eq!(p.placed_height, 30);
        assert!(!p.rotated);
        assert_eq!(p.instance_id, 1);
        assert_eq!(bin.free_area, 100 * 100 - 50 * 30);
        assert!(!bin.free_rects.is_empty());
    }

    #[test]
    fn test_piece_too_large() {
        let bin = GuillotineBin::new(Rect::new(100, 100));
        assert!(bin.find_best(Rect::new(200, 50)).is_none());
    }

    #[test]
    fn test_rotation_fit() {
        let bin = GuillotineBin::new(Rect::new(100, 50));
        let candidate = bin.find_best(Rect::new(50, 100)).unwrap();
        assert!(candidate.rotated);
        assert_eq!(candidate.leftover, 0);
    }

    #[test]
    fn test_unrotated_preferred_on_tie() {
        let bin = GuillotineBin::new(Rect::new(100, 100));
        let candidate = bin.find_best(Rect::new(30, 20)).unwrap();
        assert!(!candidate.rotated);
    }

    #[test]
    fn test_best_fit_picks_tightest_free_rect() {
        let mut bin = GuillotineBin::new(Rect::new(100, 100));
        let first = instance(1, 60, 100);
        let c = bin.find_best(first.rect).unwrap();
        bin.place(c, &first);
        // Only the 40x100 strip remains; a 40x10 piece lands at its top.
        let c = bin.find_best(Rect::new(40, 10)).unwrap();
        assert_eq!((c.x, c.y), (60, 0));
        assert_eq!(c.leftover, 40 * 100 - 40 * 10);
    }

    #[test]
    fn test_split_leaves_right_and_below() {
        let mut bin = GuillotineBin::new(Rect::new(10, 10));
        let piece = instance(1, 4, 3);
        let c = bin.find_best(piece.rect).unwrap();
        bin.place(c, &piece);
        let total: u64 = bin.free_rects.iter().map(|f| f.rect.area()).sum();
        assert_eq!(total, 100 - 12);
        assert!(bin.free_rects.iter().any(|f| f.x == 4 && f.y == 0));
        assert!(bin.free_rects.iter().any(|f| f.x == 0 && f.y == 3));
    }

    #[test]
    fn test_fill_exact() {
        let mut bin = GuillotineBin::new(Rect::new(100, 100));
        let piece = instance(1, 100, 100);
        let c = bin.find_best(piece.rect).unwrap();
        bin.place(c, &piece);
        assert!(bin.free_rects.is_empty());
        assert_eq!(bin.free_area, 0);
        assert!(bin.find_best(Rect::new(1, 1)).is_none());
    }

    #[test]
    fn test_adjacent_free_rects_merge() {
        let merged = GuillotineBin::try_merge(
            FreeRect {
                x: 0,
                y: 5,
                rect: Rect::new(4, 5),
            },
            FreeRect {
                x: 4,
                y: 5,
                rect: Rect::new(6, 5),
            },
        );
        assert_eq!(
            merged,
            Some(FreeRect {
                x: 0,
                y: 5,
                rect: Rect::new(10, 5),
            })
        );
    }
}
