use crate::grid::HeightMap;
use crate::rng::RandomSource;
use crate::subdivide::{BoundaryMode, EdgePolicy, subdivide};

/// Seed the run according to `mode`, then subdivide at `k = initial, initial/2, ..., 1`.
///
/// The region `[0, run] x [0, run]` must fit inside `map`, `run` a power of two.
/// Center-seeded modes add to whatever the center already holds and expect the
/// caller to have zeroed the region.
pub fn generate_height_map(
    map: &mut HeightMap,
    slope: f32,
    roughness: f32,
    mode: BoundaryMode,
    run: usize,
    rng: &mut RandomSource,
) {
    match mode {
        BoundaryMode::CylindricalCorners => {
            // East and west corners share a value so the x seam is closed from the start.
            let north = rng.uniform(0.0, slope);
            map.set(run, 0, north);
            map.set(0, 0, north);
            let south = rng.uniform(0.0, slope);
            map.set(run, run, south);
            map.set(0, run, south);
        }
        BoundaryMode::BoundedCorners => {
            map.set(run, 0, rng.uniform(0.0, slope));
            map.set(0, 0, rng.uniform(0.0, slope));
            map.set(run, run, rng.uniform(0.0, slope));
            map.set(0, run, rng.uniform(0.0, slope));
        }
        BoundaryMode::CenterSeeded => {
            let c = run / 2;
            map.add(c, c, rng.uniform(slope / 2.0, slope));
        }
        BoundaryMode::CenterPeak => {
            let c = run / 2;
            map.add(c, c, slope);
        }
    }

    let policy = mode.edge_policy();
    let mut k = mode.initial_step(run);
    while k > 0 {
        subdivide(map, k, roughness, run, policy, rng);
        k /= 2;
    }
}

/// Continue subdivision over a grid that already holds the lattice at spacing `2k`.
///
/// The region boundary is left as the caller set it. The last pass (`k == 1`)
/// interpolates only.
pub fn fill_height_map(map: &mut HeightMap, roughness: f32, k: usize, run: usize, rng: &mut RandomSource) {
    let mut k = k;
    let mut roughness = roughness;
    while k > 0 {
        if k == 1 {
            roughness = 0.0;
        }
        subdivide(map, k, roughness, run, EdgePolicy::Pin, rng);
        k /= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_run_four_interpolates_corners() {
        let mut map = HeightMap::new(5, 5);
        let mut rng = RandomSource::from_key("test");
        let mut probe = rng.clone();
        generate_height_map(&mut map, 10.0, 0.0, BoundaryMode::BoundedCorners, 4, &mut rng);

        // Corners are drawn in the order (run,0), (0,0), (run,run), (0,run).
        let ne = probe.uniform(0.0, 10.0);
        let nw = probe.uniform(0.0, 10.0);
        let se = probe.uniform(0.0, 10.0);
        let sw = probe.uniform(0.0, 10.0);
        assert_eq!(map.get(4, 0), ne);
        assert_eq!(map.get(0, 0), nw);
        assert_eq!(map.get(4, 4), se);
        assert_eq!(map.get(0, 4), sw);
        for v in [ne, nw, se, sw] {
            assert!((0.0..=10.0).contains(&v));
        }

        let center = (se + nw + ne + sw) / 4.0;
        assert!((map.get(2, 2) - center).abs() < 1e-5);

        // Edge midpoints: both adjacent corners plus the center.
        assert!((map.get(2, 0) - (ne + nw + map.get(2, 2)) / 3.0).abs() < 1e-5);
        assert!((map.get(0, 2) - (map.get(2, 2) + sw + nw) / 3.0).abs() < 1e-5);
    }

    #[test]
    fn constant_corners_give_flat_surface() {
        let mut map = HeightMap::new(9, 9);
        let mut rng = RandomSource::from_seed(1);
        generate_height_map(&mut map, 0.0, 0.5, BoundaryMode::BoundedCorners, 8, &mut rng);
        assert!(map.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn cylindrical_seam_identity() {
        let mut map = HeightMap::new(33, 33);
        let mut rng = RandomSource::from_key("seam");
        generate_height_map(&mut map, 50.0, 0.8, BoundaryMode::CylindricalCorners, 32, &mut rng);
        for y in 0..33 {
            assert_eq!(map.get(0, y), map.get(32, y), "seam broken at y={}", y);
        }
    }

    #[test]
    fn center_peak_is_highest_and_edges_stay_zero() {
        let mut map = HeightMap::new(17, 17);
        let mut rng = RandomSource::from_seed(42);
        generate_height_map(&mut map, 100.0, 0.0, BoundaryMode::CenterPeak, 16, &mut rng);
        assert_eq!(map.get(8, 8), 100.0);
        assert_eq!(map.max_value(), 100.0);
        for t in 0..17 {
            assert_eq!(map.get(t, 0), 0.0);
            assert_eq!(map.get(0, t), 0.0);
            assert_eq!(map.get(t, 16), 0.0);
            assert_eq!(map.get(16, t), 0.0);
        }
    }

    #[test]
    fn center_seeded_lands_in_upper_half() {
        let mut map = HeightMap::new(9, 9);
        let mut rng = RandomSource::from_seed(8);
        generate_height_map(&mut map, 20.0, 0.3, BoundaryMode::CenterSeeded, 8, &mut rng);
        let c = map.get(4, 4);
        assert!((10.0..=20.0).contains(&c), "center {} not in upper half", c);
    }

    #[test]
    fn same_seed_same_terrain() {
        let run = 64;
        let mut a = HeightMap::new(run + 1, run + 1);
        let mut b = HeightMap::new(run + 1, run + 1);
        let mut ra = RandomSource::from_key("repeat");
        let mut rb = RandomSource::from_key("repeat");
        generate_height_map(&mut a, 30.0, 0.6, BoundaryMode::BoundedCorners, run, &mut ra);
        generate_height_map(&mut b, 30.0, 0.6, BoundaryMode::BoundedCorners, run, &mut rb);
        assert_eq!(a, b);
    }

    #[test]
    fn fill_last_pass_ignores_roughness() {
        let mut base = HeightMap::new(9, 9);
        for y in (0..9).step_by(2) {
            for x in (0..9).step_by(2) {
                base.set(x, y, (x * 3 + y) as f32);
            }
        }
        let mut a = base.clone();
        let mut b = base.clone();
        fill_height_map(&mut a, 100.0, 1, 8, &mut RandomSource::from_seed(1));
        fill_height_map(&mut b, 100.0, 1, 8, &mut RandomSource::from_seed(2));
        assert_eq!(a, b);
        // Lattice points untouched, boundary untouched.
        assert_eq!(a.get(4, 4), base.get(4, 4));
        assert_eq!(a.get(3, 0), 0.0);
    }

    #[test]
    fn fill_flat_lattice_stays_flat() {
        let mut map = HeightMap::new(17, 17);
        map.fill(4.0);
        fill_height_map(&mut map, 0.9, 4, 16, &mut RandomSource::from_seed(3));
        assert!(map.data.iter().all(|&v| v == 4.0));
    }
}
