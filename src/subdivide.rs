//! Diamond-square subdivision passes.
//!
//! One pass at step `k` fills every lattice point that sits `k` away from the
//! points already known at spacing `2k`: first the square centers (diagonal
//! neighbors), then the diamond points (axial neighbors). The working region is
//! always `[0, run] x [0, run]` of the grid, `run` a power of two.

use serde::{Deserialize, Serialize};

use crate::grid::{HeightMap, wrap};
use crate::rng::RandomSource;

/// How the fractal run is seeded and how its edges are treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Four random corners, seams wrap (cylindrical world).
    CylindricalCorners,
    /// Four independent random corners, no wrap.
    BoundedCorners,
    /// Zero edges, center raised by a random value in the upper half of the slope.
    CenterSeeded,
    /// Zero edges, center raised by the full slope.
    CenterPeak,
}

/// What a diamond point on or next to the region boundary does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Missing neighbors are read from the opposite edge; the opposite edge is
    /// then overwritten with the new value.
    Wrap,
    /// Missing neighbors contribute nothing; the point averages what is there.
    Drop,
    /// Points on the region boundary are never written.
    Pin,
}

impl BoundaryMode {
    pub fn edge_policy(self) -> EdgePolicy {
        match self {
            BoundaryMode::CylindricalCorners => EdgePolicy::Wrap,
            BoundaryMode::BoundedCorners => EdgePolicy::Drop,
            BoundaryMode::CenterSeeded | BoundaryMode::CenterPeak => EdgePolicy::Pin,
        }
    }

    /// First step size: corner-seeded runs start at `run / 2`, center-seeded at
    /// `run / 4` since the center and the zero edges already form a lattice at `run / 2`.
    pub fn initial_step(self, run: usize) -> usize {
        match self {
            BoundaryMode::CylindricalCorners | BoundaryMode::BoundedCorners => run / 2,
            BoundaryMode::CenterSeeded | BoundaryMode::CenterPeak => run / 4,
        }
    }
}

/// Mean and mean absolute deviation.
#[inline]
fn average_deviation(samples: &[f32]) -> (f32, f32) {
    let n = samples.len() as f32;
    let avg = samples.iter().sum::<f32>() / n;
    let dev = samples.iter().map(|s| (s - avg).abs()).sum::<f32>() / n;
    (avg, dev)
}

/// Square step: every center at `(k + 2k*i, k + 2k*j)` takes the average of its
/// four diagonal neighbors, perturbed by up to twice their mean deviation.
pub fn square_step(map: &mut HeightMap, k: usize, roughness: f32, run: usize, rng: &mut RandomSource) {
    for i in (0..run).step_by(2 * k) {
        for j in (0..run).step_by(2 * k) {
            let (x, y) = (k + i, k + j);
            let corners = [
                map.get(x + k, y + k),
                map.get(x - k, y + k),
                map.get(x + k, y - k),
                map.get(x - k, y - k),
            ];
            let (average, dev) = average_deviation(&corners);
            let dev2 = 2.0 * dev;
            map.set(x, y, average + roughness * rng.uniform(-dev2, dev2));
        }
    }
}

/// Diamond step: every point `k` away from a known point along one axis.
///
/// Points `(k + 2k*i, 2k*j)` are visited first, then `(2k*i, k + 2k*j)`.
pub fn diamond_step(
    map: &mut HeightMap,
    k: usize,
    roughness: f32,
    run: usize,
    policy: EdgePolicy,
    rng: &mut RandomSource,
) {
    for i in (0..run).step_by(2 * k) {
        for j in (0..=run).step_by(2 * k) {
            let (x, y) = (k + i, j);
            // The far seam is a copy of the near one.
            if policy == EdgePolicy::Wrap && y == run {
                continue;
            }
            diamond_point(map, x, y, k, run, policy, roughness, rng);
            if policy == EdgePolicy::Wrap && y == 0 {
                let v = map.get(x, 0);
                map.set(x, run, v);
            }
        }
    }

    for i in (0..=run).step_by(2 * k) {
        for j in (0..run).step_by(2 * k) {
            let (x, y) = (i, k + j);
            if policy == EdgePolicy::Wrap && x == run {
                continue;
            }
            diamond_point(map, x, y, k, run, policy, roughness, rng);
            if policy == EdgePolicy::Wrap && x == 0 {
                let v = map.get(0, y);
                map.set(run, y, v);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn diamond_point(
    map: &mut HeightMap,
    x: usize,
    y: usize,
    d: usize,
    run: usize,
    policy: EdgePolicy,
    roughness: f32,
    rng: &mut RandomSource,
) {
    let on_edge = x == 0 || y == 0 || x == run || y == run;
    if policy == EdgePolicy::Pin && on_edge {
        return;
    }

    let (x, y, d) = (x as isize, y as isize, d as isize);
    let offsets = [(d, 0), (-d, 0), (0, d), (0, -d)];
    let mut samples = [0.0f32; 4];
    let mut n = 0;
    for (dx, dy) in offsets {
        let (nx, ny) = (x + dx, y + dy);
        let inside = (0..=run as isize).contains(&nx) && (0..=run as isize).contains(&ny);
        let pos = match (inside, policy) {
            (true, _) => Some((nx as usize, ny as usize)),
            (false, EdgePolicy::Wrap) => Some((wrap(nx, run), wrap(ny, run))),
            (false, _) => None,
        };
        if let Some((px, py)) = pos {
            samples[n] = map.get(px, py);
            n += 1;
        }
    }

    let (average, dev) = average_deviation(&samples[..n]);
    let dev2 = 2.0 * dev;
    // Flat neighborhoods take the plain average without a draw.
    let value = if dev2 > 0.0 {
        average + roughness * rng.uniform(-dev2, dev2)
    } else {
        average
    };
    map.set(x as usize, y as usize, value);
}

/// One full subdivision level: square step then diamond step at `k`.
pub fn subdivide(
    map: &mut HeightMap,
    k: usize,
    roughness: f32,
    run: usize,
    policy: EdgePolicy,
    rng: &mut RandomSource,
) {
    square_step(map, k, roughness, run, rng);
    diamond_step(map, k, roughness, run, policy, rng);
}
