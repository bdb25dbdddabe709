use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("run {0} is not a power of two >= 2")]
    InvalidRun(usize),

    #[error("grid {width}x{height} cannot hold a run of {run} ({need}x{need} points)", need = .run + 1)]
    GridTooSmall { width: usize, height: usize, run: usize },

    #[error("step {step} is not a power of two below run {run}")]
    InvalidStep { step: usize, run: usize },

    #[error("at least one continent is required")]
    NoContinents,

    #[error("sea fraction {0} is outside [0, 1]")]
    InvalidFraction(f32),

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TerrainError>;

/// `run` must be a power of two and `[0, run]^2` must fit in a `width` x `height` grid.
pub fn check_run(run: usize, width: usize, height: usize) -> Result<()> {
    if run < 2 || !run.is_power_of_two() {
        return Err(TerrainError::InvalidRun(run));
    }
    if width < run + 1 || height < run + 1 {
        return Err(TerrainError::GridTooSmall { width, height, run });
    }
    Ok(())
}

pub fn check_fraction(fraction: f32) -> Result<()> {
    if (0.0..=1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(TerrainError::InvalidFraction(fraction))
    }
}
