//! Continent packing and additive compositing of height maps.

use rayon::prelude::*;
use tracing::debug;

use crate::grid::{HeightMap, wrap};
use crate::heightmap::generate_height_map;
use crate::rng::RandomSource;
use crate::smooth::smooth_height_map;
use crate::subdivide::BoundaryMode;

/// Where `count` continents go on a `width` x `height` map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContinentLayout {
    pub columns: usize,
    pub rows: usize,
    /// Side of one continent grid, `2^n + 1`.
    pub continent_size: usize,
    pub x_spacing: usize,
    pub y_spacing: usize,
    /// Top-left offset of every continent, in placement order.
    pub placements: Vec<(isize, isize)>,
}

impl ContinentLayout {
    /// `ceil(sqrt(count))`, plus one more column when `count` is a perfect square.
    /// Both cases come out as `isqrt(count) + 1`.
    pub fn columns_for(count: usize) -> usize {
        count.isqrt() + 1
    }

    pub fn solve(width: usize, height: usize, count: usize) -> Self {
        let columns = Self::columns_for(count);
        let rows = count.div_ceil(columns).max(1);

        let limit = width.max(height) / columns;
        let mut n = 1;
        while (1usize << (n + 1)) < limit {
            n += 1;
        }
        let continent_size = (1usize << n) + 1;

        let x_spacing = (width.saturating_sub(1) / columns).max(1);
        let mut y_spacing = (height.saturating_sub(1) / rows).max(1);
        let mut y_displacement: isize = 0;

        let mut placements = Vec::with_capacity(count);
        for i in 0..columns {
            let remaining = count - placements.len();
            if remaining == 0 {
                break;
            }
            // Spread an underfull last column over the full height.
            if i == columns - 1 && remaining != rows {
                y_spacing = (height / remaining).max(1);
                let free = height as isize - 1 - (remaining * continent_size) as isize;
                y_displacement = (free / 2).max(0);
            }
            for j in 0..rows {
                if placements.len() == count {
                    break;
                }
                // The per-index pixel pulls neighbors into a one-cell overlap.
                let x = (x_spacing * i) as isize - i as isize;
                let y = y_displacement + (y_spacing * j) as isize - j as isize;
                placements.push((x, y));
            }
        }

        Self {
            columns,
            rows,
            continent_size,
            x_spacing,
            y_spacing,
            placements,
        }
    }
}

/// Additively paste `source * scale` onto `dest` at `(x_offset, y_offset)`.
///
/// Rows falling outside `dest` are dropped. In cylindrical mode columns wrap
/// with period `width - 1` (first and last column are the same meridian) and a
/// value landing on that seam is written to both edge columns; otherwise
/// out-of-range columns are dropped too.
pub fn add_height_map(
    source: &HeightMap,
    dest: &mut HeightMap,
    x_offset: isize,
    y_offset: isize,
    scale: f32,
    cylindrical: bool,
) {
    let (dw, dh) = (dest.w as isize, dest.h as isize);
    let period = dest.w.saturating_sub(1);
    for j in 0..source.h {
        let y = y_offset + j as isize;
        if y < 0 || y >= dh {
            continue;
        }
        let y = y as usize;
        for i in 0..source.w {
            let x = x_offset + i as isize;
            let v = source.get(i, j) * scale;
            if cylindrical && period > 0 {
                let x = wrap(x, period);
                if x == 0 {
                    dest.add(0, y, v);
                    dest.add(period, y, v);
                } else {
                    dest.add(x, y, v);
                }
            } else if x >= 0 && x < dw {
                dest.add(x as usize, y, v);
            }
        }
    }
}

/// Generate `count` center-seeded continents, merge them into `map` and blend
/// the seams with one smoothing pass.
///
/// Each continent gets its own generator forked from `rng` in placement order,
/// so the result does not depend on how the parallel synthesis is scheduled.
pub fn generate_continents(
    map: &mut HeightMap,
    slope: f32,
    roughness: f32,
    count: usize,
    rng: &mut RandomSource,
) -> ContinentLayout {
    let layout = ContinentLayout::solve(map.w, map.h, count);
    debug!(
        columns = layout.columns,
        rows = layout.rows,
        size = layout.continent_size,
        placed = layout.placements.len(),
        "continent layout"
    );

    let size = layout.continent_size;
    let forks: Vec<RandomSource> = layout.placements.iter().map(|_| rng.fork()).collect();
    let continents: Vec<HeightMap> = forks
        .into_par_iter()
        .map(|mut local| {
            let mut continent = HeightMap::new(size, size);
            generate_height_map(
                &mut continent,
                slope,
                roughness,
                BoundaryMode::CenterSeeded,
                size - 1,
                &mut local,
            );
            continent
        })
        .collect();

    for (continent, &(x, y)) in continents.iter().zip(&layout.placements) {
        add_height_map(continent, map, x, y, 1.0, false);
    }
    smooth_height_map(map, 1);
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_square_gets_extra_column() {
        assert_eq!(ContinentLayout::columns_for(4), 3);
        assert_eq!(ContinentLayout::columns_for(9), 4);
        assert_eq!(ContinentLayout::columns_for(5), 3);
        assert_eq!(ContinentLayout::columns_for(2), 2);
        let layout = ContinentLayout::solve(513, 513, 4);
        assert_eq!(layout.columns, 3);
        assert_eq!(layout.rows, 2);
    }

    #[test]
    fn layout_places_every_continent_in_bounds() {
        for count in 1..=12 {
            let layout = ContinentLayout::solve(257, 129, count);
            assert_eq!(layout.placements.len(), count);
            for &(x, y) in &layout.placements {
                assert!(x >= 0 && y >= 0, "count {} placed at ({}, {})", count, x, y);
                assert!(x < 257 && y < 129);
            }
            assert!((layout.continent_size - 1).is_power_of_two());
        }
    }

    #[test]
    fn continent_size_fits_column() {
        let layout = ContinentLayout::solve(513, 257, 4);
        // 513 / 3 = 171 -> run 128
        assert_eq!(layout.continent_size, 129);
        assert_eq!(layout.x_spacing, 170);
        assert_eq!(layout.placements[0], (0, 0));
        assert_eq!(layout.placements[1], (0, 127));
        assert_eq!(layout.placements[2], (169, 0));
    }

    #[test]
    fn tiny_map_does_not_degenerate() {
        let layout = ContinentLayout::solve(3, 3, 10);
        assert_eq!(layout.placements.len(), 10);
        assert!(layout.x_spacing >= 1 && layout.y_spacing >= 1);
    }

    #[test]
    fn add_plain_is_cellwise_sum() {
        let mut src = HeightMap::new(3, 3);
        for (i, v) in src.data.iter_mut().enumerate() {
            *v = i as f32;
        }
        let mut dest = HeightMap::new(5, 4);
        dest.fill(1.5);
        let original = dest.clone();
        add_height_map(&src, &mut dest, 0, 0, 1.0, false);
        for y in 0..4 {
            for x in 0..5 {
                let add = if x < 3 && y < 3 { src.get(x, y) } else { 0.0 };
                assert_eq!(dest.get(x, y), original.get(x, y) + add);
            }
        }
    }

    #[test]
    fn add_drops_out_of_range() {
        let mut src = HeightMap::new(2, 2);
        src.fill(1.0);
        let mut dest = HeightMap::new(3, 3);
        add_height_map(&src, &mut dest, -1, 2, 2.0, false);
        assert_eq!(dest.get(0, 2), 2.0);
        assert_eq!(dest.data.iter().sum::<f32>(), 2.0);
    }

    #[test]
    fn add_cylindrical_wraps_and_duplicates_seam() {
        let mut src = HeightMap::new(3, 1);
        src.data = vec![1.0, 2.0, 4.0];
        let mut dest = HeightMap::new(5, 2);
        // Columns land on x = 3, 4 (seam), 5 -> 1.
        add_height_map(&src, &mut dest, 3, 1, 1.0, true);
        assert_eq!(dest.get(3, 1), 1.0);
        assert_eq!(dest.get(0, 1), 2.0);
        assert_eq!(dest.get(4, 1), 2.0);
        assert_eq!(dest.get(1, 1), 4.0);
        // y is never wrapped
        assert!((0..5).all(|x| dest.get(x, 0) == 0.0));
    }

    #[test]
    fn continents_are_reproducible() {
        let mut a = HeightMap::new(129, 65);
        let mut b = HeightMap::new(129, 65);
        let la = generate_continents(&mut a, 40.0, 0.5, 5, &mut RandomSource::from_key("land"));
        let lb = generate_continents(&mut b, 40.0, 0.5, 5, &mut RandomSource::from_key("land"));
        assert_eq!(la, lb);
        assert_eq!(a, b);
        assert!(a.max_value() > 0.0);
    }
}
