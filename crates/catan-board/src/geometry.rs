//! Row-based board geometry.
//!
//! Boards are described by their row lengths, e.g. `[3, 4, 5, 4, 3]` for the
//! classic island. Every row is centred against the widest row and every
//! tile contributes six corner coordinates:
//! - `Point`: a pixel-style position of a tile centre or a corner
//! - `PointKey`: the rounded, hashable form used to merge shared corners
//! - `TileLayout`: one tile centre together with its six corners
//!
//! Adjacent tiles produce bit-identical rounded corners, which is what lets
//! the board builder fold them into a single building slot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Horizontal distance between two tile centres in the same row
pub const STEP_X: f64 = 10.0;

/// One third of the vertical distance between two rows
///
/// Equals `STEP_X / (2 * sqrt(3))`, the height step of the equilateral
/// triangles a hexagon is made of.
pub const STEP_Y: f64 = 2.886751345948129;

/// Corner coordinates are kept to four decimal places
const PRECISION: f64 = 10_000.0;

/// The six hexagon sides, as index pairs into a tile's corners sorted by (y, x).
///
/// Sorted corners are: 0 top, 1 upper left, 2 upper right, 3 lower left,
/// 4 lower right, 5 bottom. The remaining nine pairs are diagonals.
pub const HEXAGON_SIDES: [(usize, usize); 6] = [(0, 1), (0, 2), (1, 3), (2, 4), (5, 3), (5, 4)];

/// A position on the board plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point with both coordinates rounded to the board precision
    pub fn rounded(x: f64, y: f64) -> Self {
        Self {
            x: round_coordinate(x),
            y: round_coordinate(y),
        }
    }

    /// Hashable key, ordered by y first and x second
    pub fn key(&self) -> PointKey {
        PointKey {
            y: (self.y * PRECISION).round() as i64,
            x: (self.x * PRECISION).round() as i64,
        }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    /// Point halfway between this one and another
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Rounded integer form of a `Point`.
///
/// Field order matters: the derived `Ord` sorts by y, then x, which is the
/// order building slots are numbered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey {
    y: i64,
    x: i64,
}

/// Placement of a single tile
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayout {
    /// Centre of the hexagon
    pub center: Point,
    /// Corners clockwise from the top
    pub corners: [Point; 6],
}

impl TileLayout {
    /// Lay out a tile around its centre
    pub fn around(center: Point) -> Self {
        let Point { x, y } = center;
        let half = STEP_X * 0.5;
        Self {
            center,
            corners: [
                Point::rounded(x, y - 2.0 * STEP_Y),
                Point::rounded(x + half, y - STEP_Y),
                Point::rounded(x + half, y + STEP_Y),
                Point::rounded(x, y + 2.0 * STEP_Y),
                Point::rounded(x - half, y + STEP_Y),
                Point::rounded(x - half, y - STEP_Y),
            ],
        }
    }

    /// Corners sorted by (y, x), the order `HEXAGON_SIDES` indexes into
    pub fn sorted_corners(&self) -> [Point; 6] {
        let mut corners = self.corners;
        corners.sort_by_key(|c| c.key());
        corners
    }

    /// The six sides of this tile as corner pairs
    pub fn sides(&self) -> [(Point, Point); 6] {
        let corners = self.sorted_corners();
        HEXAGON_SIDES.map(|(a, b)| (corners[a], corners[b]))
    }
}

/// Lay out every tile of a board, row by row and left to right.
pub fn layout_rows(rows: &[usize]) -> Vec<TileLayout> {
    let widest = rows.iter().copied().max().unwrap_or(0);
    let mut layouts = Vec::with_capacity(rows.iter().sum());

    for (row, &length) in rows.iter().enumerate() {
        let shift = (widest - length) as f64 * (STEP_X * 0.5);
        let y = STEP_Y + 3.0 * STEP_Y * row as f64;

        for column in 0..length {
            let x = column as f64 * STEP_X + shift;
            layouts.push(TileLayout::around(Point::new(x, y)));
        }
    }

    layouts
}

/// All distinct corners of a layout, sorted by (y, x)
pub fn unique_corners(layouts: &[TileLayout]) -> Vec<Point> {
    let mut corners: BTreeMap<PointKey, Point> = BTreeMap::new();
    for layout in layouts {
        for corner in layout.corners {
            corners.entry(corner.key()).or_insert(corner);
        }
    }
    corners.into_values().collect()
}

fn round_coordinate(value: f64) -> f64 {
    // `+ 0.0` folds a negative zero into positive zero
    (value * PRECISION).round() / PRECISION + 0.0
}
