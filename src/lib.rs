pub mod config;
pub mod continents;
pub mod error;
pub mod grid;
pub mod heightmap;
pub mod noise;
pub mod rng;
pub mod sea_level;
pub mod smooth;
pub mod subdivide;
pub mod terrain;

use std::time::Instant;

use tracing::info;

pub use config::Params;
pub use continents::ContinentLayout;
pub use error::{Result, TerrainError};
pub use grid::{Grid, HeightMap};
pub use rng::RandomSource;
pub use subdivide::BoundaryMode;
pub use terrain::TerrainGen;

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Full world pipeline: ocean floor, continents, optional extra smoothing, sea level.
///
/// The returned map has `params.sea_fraction` of its cells below elevation 0.
pub fn generate(params: &Params) -> Result<(HeightMap, Vec<Timing>)> {
    params.validate()?;

    let mut timings = Vec::new();
    let total_start = Instant::now();
    let (w, h) = (params.width, params.height);

    info!(seed = %params.seed, w, h, continents = params.num_continents, "generating world");

    let mut terrain = TerrainGen::new(&params.seed);
    let mut map = HeightMap::new(w, h);

    // 1. Ocean floor
    let t = Instant::now();
    terrain.generate_ocean_floor(&mut map, params.ocean_slope, params.ocean_roughness);
    timings.push(Timing {
        name: "ocean_floor",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 2. Continents (includes one blending pass)
    let t = Instant::now();
    let layout = terrain.generate_continents(
        &mut map,
        params.continent_slope,
        params.continent_roughness,
        params.num_continents,
    )?;
    timings.push(Timing {
        name: "continents",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });
    info!(
        columns = layout.columns,
        rows = layout.rows,
        size = layout.continent_size,
        "continents placed"
    );

    // 3. Extra smoothing
    if params.smoothing_passes > 0 {
        let t = Instant::now();
        TerrainGen::smooth_height_map(&mut map, params.smoothing_passes);
        timings.push(Timing {
            name: "smooth",
            ms: t.elapsed().as_secs_f64() * 1000.0,
        });
    }

    // 4. Sea level
    let t = Instant::now();
    let threshold = TerrainGen::set_sea_level(&mut map, params.sea_fraction)?;
    timings.push(Timing {
        name: "sea_level",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });
    info!(
        threshold,
        min = map.min_value(),
        max = map.max_value(),
        "sea level set"
    );

    let total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
    timings.push(Timing {
        name: "TOTAL",
        ms: total_ms,
    });

    Ok((map, timings))
}
