#![warn(missing_docs)]

//! Waypoint paths.

use crate::error::PathError;

/// An ordered, immutable sequence of 2D waypoints to follow.
///
/// Coordinates are kept as two parallel sequences. A path always holds at least
/// one point; consecutive points may coincide.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PathRepr"))]
pub struct Path {
    /// X coordinates of the waypoints (m)
    xs: Vec<f64>,
    /// Y coordinates of the waypoints (m)
    ys: Vec<f64>,
}

/// Unchecked wire form of [`Path`]; deserialization goes through [`Path::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PathRepr {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<PathRepr> for Path {
    type Error = PathError;

    fn try_from(repr: PathRepr) -> Result<Self, Self::Error> {
        Path::new(repr.xs, repr.ys)
    }
}

impl Path {
    /// Creates a path from parallel coordinate sequences.
    ///
    /// # Arguments
    /// * `xs` - X coordinates in path order
    /// * `ys` - Y coordinates in path order
    ///
    /// # Returns
    /// * `Result<Self, PathError>` - The path, or an error if it would be empty or the
    ///   sequences differ in length
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, PathError> {
        if xs.len() != ys.len() {
            return Err(PathError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        if xs.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Path { xs, ys })
    }

    /// Creates a path from `(x, y)` pairs.
    pub fn from_points<I>(points: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (xs, ys) = points.into_iter().unzip();
        Self::new(xs, ys)
    }

    /// Number of waypoints. Never zero.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always `false`; kept alongside `len` for API symmetry.
    pub fn is_empty(&self) -> bool {
        debug_assert!(!self.xs.is_empty(), "path holds no points");
        self.xs.is_empty()
    }

    /// X coordinates in path order.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Y coordinates in path order.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// The waypoint at `index`, or `None` past the end.
    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.xs.get(index)?, *self.ys.get(index)?))
    }

    /// Index of the final waypoint.
    pub fn last_index(&self) -> usize {
        self.xs.len() - 1
    }

    /// The final waypoint.
    pub fn last_point(&self) -> (f64, f64) {
        let last = self.last_index();
        (self.xs[last], self.ys[last])
    }

    /// Iterator over the waypoints as `(x, y)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Euclidean length of the segment from waypoint `index` to `index + 1`.
    ///
    /// # Panics
    /// Panics if `index + 1` is past the end of the path.
    pub fn segment_length(&self, index: usize) -> f64 {
        let dx = self.xs[index + 1] - self.xs[index];
        let dy = self.ys[index + 1] - self.ys[index];
        (dx * dx + dy * dy).sqrt()
    }

    /// Cumulative arc length from waypoint `from` to waypoint `to`.
    ///
    /// Returns `0.0` when `to <= from`. `to` is clamped to the last index.
    pub fn length_between(&self, from: usize, to: usize) -> f64 {
        let to = to.min(self.last_index());
        (from..to).map(|i| self.segment_length(i)).sum()
    }

    /// Total arc length of the path.
    pub fn total_length(&self) -> f64 {
        self.length_between(0, self.last_index())
    }
}
