//! Planar radius index over (lat, lon) points.
//!
//! Coordinates are treated as plain Cartesian values in degrees. The index is
//! only a coarse pre-filter: callers compute the great-circle distance for the
//! candidates it returns.

use crate::error::IndexBuildError;

/// Pre-filter radius in degree units (~100 km at mid-latitudes).
pub const PREFILTER_RADIUS_DEG: f64 = 1.0;

/// Static 2-d tree, built once per detection batch.
///
/// The tree is implicit: `order` is a permutation of point indices where each
/// subslice's middle element splits its left and right halves on the axis
/// chosen by depth (latitude first).
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    coords: Vec<[f64; 2]>,
    order: Vec<usize>,
}

impl SpatialIndex {
    /// Build an index over `points` given as `(lat, lon)`.
    ///
    /// An empty slice yields an empty index that never returns candidates.
    pub fn build(points: &[(f64, f64)]) -> Result<Self, IndexBuildError> {
        if let Some((index, &(lat, lon))) = points
            .iter()
            .enumerate()
            .find(|(_, (lat, lon))| !lat.is_finite() || !lon.is_finite())
        {
            return Err(IndexBuildError::NonFiniteCoordinate { index, lat, lon });
        }

        let coords: Vec<[f64; 2]> = points.iter().map(|&(lat, lon)| [lat, lon]).collect();
        let mut order: Vec<usize> = (0..coords.len()).collect();
        split(&coords, &mut order, 0);

        Ok(Self { coords, order })
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Indices of all points within `radius` (inclusive) of `point`, ascending.
    pub fn query_radius(&self, point: (f64, f64), radius: f64) -> Vec<usize> {
        let (lat, lon) = point;
        if self.is_empty()
            || !lat.is_finite()
            || !lon.is_finite()
            || !radius.is_finite()
            || radius < 0.0
        {
            return Vec::new();
        }

        let mut hits = Vec::new();
        self.search(&self.order, 0, [lat, lon], radius, &mut hits);
        hits.sort_unstable();
        hits
    }

    fn search(
        &self,
        order: &[usize],
        depth: usize,
        target: [f64; 2],
        radius: f64,
        hits: &mut Vec<usize>,
    ) {
        if order.is_empty() {
            return;
        }

        let axis = depth % 2;
        let mid = order.len() / 2;
        let idx = order[mid];
        let pivot = self.coords[idx];

        let d_lat = pivot[0] - target[0];
        let d_lon = pivot[1] - target[1];
        if d_lat * d_lat + d_lon * d_lon <= radius * radius {
            hits.push(idx);
        }

        // Left half holds values <= pivot on this axis, right half >= pivot.
        if target[axis] - radius <= pivot[axis] {
            self.search(&order[..mid], depth + 1, target, radius, hits);
        }
        if target[axis] + radius >= pivot[axis] {
            self.search(&order[mid + 1..], depth + 1, target, radius, hits);
        }
    }
}

fn split(coords: &[[f64; 2]], order: &mut [usize], depth: usize) {
    if order.len() <= 1 {
        return;
    }

    let axis = depth % 2;
    let mid = order.len() / 2;
    // Tie-break on index so identical inputs always produce the same tree.
    order.select_nth_unstable_by(mid, |&a, &b| {
        coords[a][axis]
            .total_cmp(&coords[b][axis])
            .then(a.cmp(&b))
    });

    let (left, right) = order.split_at_mut(mid);
    split(coords, left, depth + 1);
    split(coords, &mut right[1..], depth + 1);
}
