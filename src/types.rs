use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Width/height pair. Used for the sheet size, for placed footprints and as
/// the typed key of a piece type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Rect {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub width: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub height: u32,
}

impl Rect {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One demanded size and how many copies of it are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSpec {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub width: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub height: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
}

impl PieceSpec {
    pub fn new(width: u32, height: u32, quantity: u32) -> Self {
        Self {
            width,
            height,
            quantity,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.width, self.height)
    }
}

/// A single physical unit of a piece spec. Ids start at 1 and follow input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceInstance {
    pub id: u32,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub instance_id: u32,
    pub x: u32,
    pub y: u32,
    pub placed_width: u32,
    pub placed_height: u32,
    pub rotated: bool,
    /// Pre-rotation dimensions of the instance, i.e. its piece type.
    pub piece: Rect,
}

impl Placement {
    pub fn footprint(&self) -> Rect {
        Rect::new(self.placed_width, self.placed_height)
    }

    pub fn area(&self) -> u64 {
        self.footprint().area()
    }

    pub fn right(&self) -> u32 {
        self.x + self.placed_width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.placed_height
    }

    pub fn overlaps(&self, other: &Placement) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Geometry-only fingerprint of a sheet: sorted `(x, y, width, height)` tuples.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(Vec<(u32, u32, u32, u32)>);

impl Signature {
    pub fn of(placements: &[Placement]) -> Self {
        let mut tuples: Vec<_> = placements
            .iter()
            .map(|p| (p.x, p.y, p.placed_width, p.placed_height))
            .collect();
        tuples.sort_unstable();
        Self(tuples)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    /// Opening order, starting at 0.
    pub index: usize,
    pub placements: Vec<Placement>,
}

impl Sheet {
    pub fn used_area(&self) -> u64 {
        self.placements.iter().map(|p| p.area()).sum()
    }

    pub fn signature(&self) -> Signature {
        Signature::of(&self.placements)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceCount {
    pub piece: Rect,
    pub count: u32,
}

/// A distinct cutting layout and how many sheets are cut with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanGroup {
    #[serde(skip)]
    pub signature: Signature,
    /// Placements of the first sheet that produced this layout.
    pub placements: Vec<Placement>,
    pub repetitions: u32,
    pub leftover_area: u64,
    /// Per piece type counts, in order of first appearance on the sheet.
    pub piece_counts: Vec<PieceCount>,
}

/// Utilization in hundredths of a percent, truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Utilization(u32);

impl Utilization {
    pub const ZERO: Utilization = Utilization(0);
    pub const FULL: Utilization = Utilization(10_000);

    /// Areas are `u128` since many sheets of near-`u32::MAX` sides
    /// overflow `u64`.
    pub fn from_areas(used: u128, total: u128) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let hundredths = used * 10_000 / total;
        Self(hundredths.min(Self::FULL.0 as u128) as u32)
    }

    pub fn hundredths(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Utilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Utilization {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanResult {
    pub plan_groups: Vec<PlanGroup>,
    pub total_sheets: usize,
    pub overall_utilization: Utilization,
}

impl PlanResult {
    pub fn empty() -> Self {
        Self {
            plan_groups: Vec::new(),
            total_sheets: 0,
            overall_utilization: Utilization::ZERO,
        }
    }
}

/// Accepts JSON integers, integral floats (`5.0`) and numeric strings (`"5"`).
/// Form-driven clients tend to send any of the three.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct U32Visitor;

    impl Visitor<'_> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative integer")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::custom(format!("{v} is out of range")))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::custom(format!("{v} is out of range")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<u32, E> {
            if v.fract() != 0.0 || v < 0.0 || v > u32::MAX as f64 {
                return Err(E::custom(format!("{v} is not a non-negative integer")));
            }
            Ok(v as u32)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u32, E> {
            v.trim()
                .parse::<u32>()
                .map_err(|_| E::custom(format!("'{v}' is not a non-negative integer")))
        }
    }

    deserializer.deserialize_any(U32Visitor)
}
