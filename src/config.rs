use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError, check_fraction};

/// All tunable parameters of the world pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Arbitrary key; the same key reproduces the same world.
    pub seed: String,
    pub width: usize,
    pub height: usize,

    // Ocean floor
    pub ocean_slope: f32,
    pub ocean_roughness: f32,

    // Continents
    pub num_continents: usize,
    pub continent_slope: f32,
    pub continent_roughness: f32,

    // Post-processing
    pub smoothing_passes: usize,
    /// Fraction of cells that end up below elevation 0.
    pub sea_fraction: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            seed: "terragen".to_string(),
            width: 1025,
            height: 513,
            ocean_slope: 40.0,
            ocean_roughness: 1.0,
            num_continents: 5,
            continent_slope: 1500.0,
            continent_roughness: 0.6,
            smoothing_passes: 0,
            sea_fraction: 0.65,
        }
    }
}

impl Params {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Params = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width < 3 || self.height < 3 {
            return Err(TerrainError::InvalidParams(format!(
                "map must be at least 3x3, got {}x{}",
                self.width, self.height
            )));
        }
        if self.num_continents == 0 {
            return Err(TerrainError::NoContinents);
        }
        for (name, v) in [
            ("ocean_slope", self.ocean_slope),
            ("ocean_roughness", self.ocean_roughness),
            ("continent_slope", self.continent_slope),
            ("continent_roughness", self.continent_roughness),
        ] {
            if !v.is_finite() {
                return Err(TerrainError::InvalidParams(format!("{name} must be finite")));
            }
        }
        check_fraction(self.sea_fraction)
    }
}
