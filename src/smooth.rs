use rayon::prelude::*;

use crate::grid::{HeightMap, neighbors8_torus};

/// 3x3 box filter, `passes` times. Both axes wrap at the grid boundary.
///
/// Each pass reads only the pre-pass values: the result is built in a fresh
/// grid and then replaces `map`.
pub fn smooth_height_map(map: &mut HeightMap, passes: usize) {
    let (w, h) = (map.w, map.h);
    if w == 0 || h == 0 {
        return;
    }

    for _ in 0..passes {
        let src: &HeightMap = map;
        let mut out = HeightMap::new(w, h);
        out.data.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                let mut sum = src.get(x, y);
                for (nx, ny) in neighbors8_torus(x, y, w, h) {
                    sum += src.get(nx, ny);
                }
                *cell = sum / 9.0;
            }
        });
        *map = out;
    }
}
