use tracing::debug;

use crate::grid::HeightMap;

/// Bisection steps inside a unit bracket. 2^-48 is below the spacing
/// of any two distinct f32 elevations in the range the solver sees.
const REFINE_STEPS: usize = 48;

/// Unit steps tried before the bracket falls back to the elevation range.
const MAX_UNIT_STEPS: usize = 256;

/// Fraction of cells strictly below `level`.
pub fn sea_coverage(map: &HeightMap, level: f64) -> f64 {
    if map.data.is_empty() {
        return 0.0;
    }
    let under = map.data.iter().filter(|&&v| (v as f64) < level).count();
    under as f64 / map.data.len() as f64
}

/// Add `displacement` to every cell.
pub fn adjust_height(map: &mut HeightMap, displacement: f32) {
    map.data.iter_mut().for_each(|v| *v += displacement);
}

/// Recenter `map` to zero mean, then shift it so that `fraction` of the cells
/// lie below elevation 0. Returns the solved threshold on the recentered map.
pub fn set_sea_level(map: &mut HeightMap, fraction: f32) -> f32 {
    if map.data.is_empty() {
        return 0.0;
    }
    let target = fraction.clamp(0.0, 1.0) as f64;

    let mean = map.mean();
    adjust_height(map, -mean);

    let max = map.max_value() as f64;
    let min = map.min_value() as f64;

    // First estimate from the elevation range, then unit steps until the
    // coverage crosses the target. A step that no longer moves the level, or
    // a range too wide to walk, brackets with the elevation extremes instead.
    let mut level = target * (max - min) + min - mean as f64;
    let coverage = sea_coverage(map, level);
    let (lo, hi) = if coverage > target {
        let mut steps = 0;
        loop {
            let next = level - 1.0;
            if next == level || steps == MAX_UNIT_STEPS {
                break (min, level);
            }
            let prev = level;
            level = next;
            steps += 1;
            if sea_coverage(map, level) <= target {
                break (level, prev);
            }
        }
    } else if coverage < target {
        let mut steps = 0;
        loop {
            let next = level + 1.0;
            if next == level || steps == MAX_UNIT_STEPS {
                // Everything lies below a level strictly above `max`.
                break (level, max + max.abs().max(1.0));
            }
            let prev = level;
            level = next;
            steps += 1;
            if sea_coverage(map, level) >= target {
                break (prev, level);
            }
        }
    } else {
        (level, level)
    };

    let level = refine(map, target, lo, hi);
    let threshold = snap_threshold(map, level);
    debug!(
        mean,
        threshold,
        coverage = sea_coverage(map, threshold as f64),
        target,
        "sea level solved"
    );

    adjust_height(map, -threshold);
    threshold
}

/// Narrow `[lo, hi]` by bisection and return whichever end lands closest to the target.
/// Brackets wider than one unit get one extra step per doubling.
fn refine(map: &HeightMap, target: f64, mut lo: f64, mut hi: f64) -> f64 {
    if lo == hi {
        return lo;
    }
    let span = hi - lo;
    let extra = if span > 1.0 { (span.log2().ceil() as usize).min(1024) } else { 0 };
    for _ in 0..REFINE_STEPS + extra {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if sea_coverage(map, mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let err_lo = (sea_coverage(map, lo) - target).abs();
    let err_hi = (sea_coverage(map, hi) - target).abs();
    if err_lo <= err_hi { lo } else { hi }
}

/// Turn an f64 level into an f32 threshold with the same coverage, so the
/// f32 shift puts exactly the counted cells below zero.
fn snap_threshold(map: &HeightMap, level: f64) -> f32 {
    // Smallest cell at or above the level: nothing lies between it and the level.
    let above = map
        .data
        .iter()
        .copied()
        .filter(|&v| (v as f64) >= level)
        .fold(f32::INFINITY, f32::min);
    if above.is_finite() {
        return above;
    }

    // Every cell is under water.
    let max = map.max_value();
    let t = level as f32;
    if t > max { t } else { max + max.abs().max(1.0) * f32::EPSILON }
}
