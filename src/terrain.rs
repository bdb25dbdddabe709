use rayon::prelude::*;
use tracing::debug;

use crate::continents::{self, ContinentLayout};
use crate::error::{Result, TerrainError, check_fraction, check_run};
use crate::grid::HeightMap;
use crate::heightmap;
use crate::noise::GradientNoise;
use crate::rng::RandomSource;
use crate::sea_level;
use crate::smooth;
use crate::subdivide::BoundaryMode;

/// Frequency multipliers summed into the ocean floor.
const OCEAN_OCTAVES: [f32; 6] = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0];

/// Terrain generator: owns the random state every fractal operation draws from.
///
/// Output is reproducible for a given seed key as long as operations are
/// called in the same order.
#[derive(Clone, Debug)]
pub struct TerrainGen {
    rng: RandomSource,
    noise: GradientNoise,
}

impl TerrainGen {
    pub fn new(key: &str) -> Self {
        let rng = RandomSource::from_key(key);
        let noise = GradientNoise::new(rng.noise_seed());
        Self { rng, noise }
    }

    /// Reseed both the PRNG and the noise function from `key`.
    pub fn seed(&mut self, key: &str) {
        self.rng.reseed(key);
        self.noise.reseed(self.rng.noise_seed());
    }

    pub fn zero_terrain(map: &mut HeightMap) {
        map.fill(0.0);
    }

    /// Add six octaves of gradient noise, `slope` high at the first octave.
    /// Every further octave is weighted by another factor of `roughness`;
    /// `roughness = 1` weights all octaves equally.
    pub fn generate_ocean_floor(&self, map: &mut HeightMap, slope: f32, roughness: f32) {
        let (w, h) = (map.w, map.h);
        if w == 0 {
            return;
        }
        let noise = self.noise;
        map.data.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                let mut amp = slope;
                for n in OCEAN_OCTAVES {
                    let u = x as f32 * n / w as f32;
                    let v = y as f32 * n / h as f32;
                    *cell += noise.noise2(u, v) * amp;
                    amp *= roughness;
                }
            }
        });
    }

    /// Full diamond-square run over `[0, run]^2` of `map`.
    pub fn generate_height_map(
        &mut self,
        map: &mut HeightMap,
        slope: f32,
        roughness: f32,
        mode: BoundaryMode,
        run: usize,
    ) -> Result<()> {
        check_run(run, map.w, map.h)?;
        debug!(?mode, run, slope, roughness, "generate height map");
        heightmap::generate_height_map(map, slope, roughness, mode, run, &mut self.rng);
        Ok(())
    }

    /// Continue subdivision from step `k` over an already seeded lattice.
    /// Callers compositing a coarse ocean-floor base use this to finish it at full resolution.
    pub fn fill_height_map(&mut self, map: &mut HeightMap, roughness: f32, k: usize, run: usize) -> Result<()> {
        check_run(run, map.w, map.h)?;
        if k != 0 && (!k.is_power_of_two() || k > run / 2) {
            return Err(TerrainError::InvalidStep { step: k, run });
        }
        heightmap::fill_height_map(map, roughness, k, run, &mut self.rng);
        Ok(())
    }

    /// Pack `count` continents onto `map`, then blend with one smoothing pass.
    pub fn generate_continents(
        &mut self,
        map: &mut HeightMap,
        slope: f32,
        roughness: f32,
        count: usize,
    ) -> Result<ContinentLayout> {
        if count == 0 {
            return Err(TerrainError::NoContinents);
        }
        Ok(continents::generate_continents(map, slope, roughness, count, &mut self.rng))
    }

    /// Zero `[0, size)^2` of `map` and raise a single peak of exactly `slope` at its center.
    pub fn make_peak(&mut self, map: &mut HeightMap, size: usize, slope: f32, roughness: f32) -> Result<()> {
        let run = size.saturating_sub(1);
        check_run(run, map.w, map.h)?;
        for y in 0..size {
            for x in 0..size {
                map.set(x, y, 0.0);
            }
        }
        heightmap::generate_height_map(map, slope, roughness, BoundaryMode::CenterPeak, run, &mut self.rng);
        Ok(())
    }

    pub fn add_height_map(
        source: &HeightMap,
        dest: &mut HeightMap,
        x_offset: isize,
        y_offset: isize,
        scale: f32,
        cylindrical: bool,
    ) {
        continents::add_height_map(source, dest, x_offset, y_offset, scale, cylindrical);
    }

    pub fn smooth_height_map(map: &mut HeightMap, passes: usize) {
        smooth::smooth_height_map(map, passes);
    }

    /// Shift `map` so `fraction` of its cells lie below 0. Returns the solved threshold.
    pub fn set_sea_level(map: &mut HeightMap, fraction: f32) -> Result<f32> {
        check_fraction(fraction)?;
        Ok(sea_level::set_sea_level(map, fraction))
    }

    pub fn min_value(map: &HeightMap) -> f32 {
        map.min_value()
    }

    pub fn max_value(map: &HeightMap) -> f32 {
        map.max_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reseeding_reproduces_output() {
        let mut tg = TerrainGen::new("first");
        let mut a = HeightMap::new(17, 17);
        tg.generate_height_map(&mut a, 10.0, 0.5, BoundaryMode::BoundedCorners, 16).unwrap();

        tg.seed("first");
        let mut b = HeightMap::new(17, 17);
        tg.generate_height_map(&mut b, 10.0, 0.5, BoundaryMode::BoundedCorners, 16).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ocean_floor_depends_on_seed() {
        let mut a = HeightMap::new(32, 16);
        let mut b = HeightMap::new(32, 16);
        TerrainGen::new("a").generate_ocean_floor(&mut a, 10.0, 1.0);
        TerrainGen::new("b").generate_ocean_floor(&mut b, 10.0, 1.0);
        assert_ne!(a, b);
        // Every octave samples the lattice at the origin.
        assert_eq!(a.get(0, 0), 0.0);
    }

    #[test]
    fn ocean_floor_zero_roughness_keeps_first_octave() {
        let tg = TerrainGen::new("oct");
        let mut map = HeightMap::new(16, 8);
        tg.generate_ocean_floor(&mut map, 3.0, 0.0);
        let n = GradientNoise::new(RandomSource::from_key("oct").noise_seed());
        let expected = n.noise2(5.0 / 16.0, 3.0 / 8.0) * 3.0;
        assert!((map.get(5, 3) - expected).abs() < 1e-6);
    }

    #[test]
    fn ocean_floor_unit_roughness_sums_octaves() {
        let tg = TerrainGen::new("flat-gain");
        let mut map = HeightMap::new(16, 8);
        tg.generate_ocean_floor(&mut map, 2.0, 1.0);
        let n = GradientNoise::new(RandomSource::from_key("flat-gain").noise_seed());
        let expected: f32 = OCEAN_OCTAVES
            .iter()
            .map(|&o| n.noise2(5.0 * o / 16.0, 3.0 * o / 8.0) * 2.0)
            .sum();
        assert!((map.get(5, 3) - expected).abs() < 1e-4);
    }

    #[test]
    fn preconditions_are_reported() {
        let mut tg = TerrainGen::new("x");
        let mut map = HeightMap::new(9, 9);
        assert!(matches!(
            tg.generate_height_map(&mut map, 1.0, 0.5, BoundaryMode::BoundedCorners, 6),
            Err(TerrainError::InvalidRun(6))
        ));
        assert!(matches!(
            tg.make_peak(&mut map, 17, 1.0, 0.5),
            Err(TerrainError::GridTooSmall { .. })
        ));
        assert!(matches!(
            tg.generate_continents(&mut map, 1.0, 0.5, 0),
            Err(TerrainError::NoContinents)
        ));
        assert!(matches!(
            tg.fill_height_map(&mut map, 0.5, 3, 8),
            Err(TerrainError::InvalidStep { step: 3, run: 8 })
        ));
        assert!(TerrainGen::set_sea_level(&mut map, -0.1).is_err());
    }

    #[test]
    fn make_peak_zeroes_region_first() {
        let mut tg = TerrainGen::new("peak");
        let mut map = HeightMap::new(9, 9);
        map.fill(50.0);
        tg.make_peak(&mut map, 9, 20.0, 0.4).unwrap();
        assert_eq!(map.get(4, 4), 20.0);
        assert_eq!(map.get(0, 3), 0.0);
        assert_eq!(map.get(8, 8), 0.0);
    }
}
