#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded scenario presets that populate a fresh grid with agents, safe
//! zones and barricades.

use outbreak_core::{Cell, CellCoord, Grid, MAX_PLACEMENT};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Named scenario presets offered by drivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// A few of each agent with light scattered cover.
    Random,
    /// One human against a full horde.
    Hard,
}

impl Preset {
    /// Generation parameters backing the preset.
    #[must_use]
    pub fn params(self) -> ScenarioParams {
        match self {
            Self::Random => ScenarioParams::new(3, 3, 1, 0.06),
            Self::Hard => ScenarioParams::new(1, 5, 1, 0.02),
        }
    }
}

/// Describes how many cells of each kind a generated scenario holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenarioParams {
    humans: u32,
    zombies: u32,
    safes: u32,
    barricade_density: f64,
}

impl ScenarioParams {
    /// Creates parameters, clamping counts to [`MAX_PLACEMENT`] and the
    /// density to `0.0..=1.0`.
    #[must_use]
    pub fn new(humans: u32, zombies: u32, safes: u32, barricade_density: f64) -> Self {
        Self {
            humans: clamp_count(humans),
            zombies: clamp_count(zombies),
            safes: clamp_count(safes),
            barricade_density: clamp_density(barricade_density),
        }
    }

    /// Number of humans placed.
    #[must_use]
    pub const fn humans(&self) -> u32 {
        self.humans
    }

    /// Number of zombies placed.
    #[must_use]
    pub const fn zombies(&self) -> u32 {
        self.zombies
    }

    /// Number of safe zones placed.
    #[must_use]
    pub const fn safes(&self) -> u32 {
        self.safes
    }

    /// Probability that a remaining empty cell becomes a barricade.
    #[must_use]
    pub fn barricade_density(&self) -> f64 {
        self.barricade_density
    }
}

fn clamp_count(count: u32) -> u32 {
    count.min(MAX_PLACEMENT)
}

fn clamp_density(density: f64) -> f64 {
    if density.is_nan() {
        0.0
    } else {
        density.clamp(0.0, 1.0)
    }
}

/// Generates a `size`×`size` scenario from `seed`.
///
/// The same seed and parameters always produce the same grid.
#[must_use]
pub fn generate_seeded(size: u32, params: ScenarioParams, seed: u64) -> Grid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(size, params, &mut rng)
}

/// Generates a `size`×`size` scenario drawing randomness from `rng`.
///
/// Humans, zombies and safe zones land on distinct cells; generation stops
/// early when the grid runs out of room. Every cell still empty afterwards
/// becomes a barricade with probability [`ScenarioParams::barricade_density`].
///
/// # Panics
///
/// Panics when `size` is zero.
#[must_use]
pub fn generate<R: Rng + ?Sized>(size: u32, params: ScenarioParams, rng: &mut R) -> Grid {
    let mut grid = Grid::new(size);
    let mut open: Vec<CellCoord> = grid.positions_of(Cell::Empty);
    open.shuffle(rng);
    let mut open = open.into_iter();

    let agents = [
        (Cell::Human, params.humans),
        (Cell::Zombie, params.zombies),
        (Cell::Safe, params.safes),
    ];
    for (cell, count) in agents {
        for coord in open.by_ref().take(count as usize) {
            grid.set(coord, cell);
        }
    }

    if params.barricade_density > 0.0 {
        for coord in grid.positions_of(Cell::Empty) {
            if rng.gen_bool(params.barricade_density) {
                grid.set(coord, Cell::Barricade);
            }
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_their_parameters() {
        assert_eq!(Preset::Random.params(), ScenarioParams::new(3, 3, 1, 0.06));
        assert_eq!(Preset::Hard.params().zombies(), 5);
        assert_eq!(Preset::Hard.params().humans(), 1);
    }

    #[test]
    fn params_are_clamped() {
        let params = ScenarioParams::new(9, 0, 12, 3.0);
        assert_eq!(params.humans(), MAX_PLACEMENT);
        assert_eq!(params.zombies(), 0);
        assert_eq!(params.safes(), MAX_PLACEMENT);
        assert_eq!(params.barricade_density(), 1.0);
        assert_eq!(ScenarioParams::new(1, 1, 1, -0.5).barricade_density(), 0.0);
    }
}
