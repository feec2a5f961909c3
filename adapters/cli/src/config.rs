//! Session settings merged from defaults, an optional TOML file and CLI flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use outbreak_core::{DEFAULT_GRID_SIZE, MAX_GRID_SIZE, MIN_GRID_SIZE};
use outbreak_system_scenario::Preset;
use serde::Deserialize;

/// Turns simulated when nothing else is configured.
pub(crate) const DEFAULT_TURNS: u64 = 100;
/// Delay between frames when nothing else is configured.
pub(crate) const DEFAULT_TICK_MS: u64 = 400;
const MIN_TICK_MS: u64 = 50;
const MAX_TICK_MS: u64 = 1000;

/// Seed used by presets when none is configured.
const DEFAULT_SEED: u64 = 0x0B7B_2EA4_5EED;

/// Values read from a session file; every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) size: Option<u32>,
    pub(crate) turns: Option<u64>,
    pub(crate) tick_ms: Option<u64>,
    pub(crate) preset: Option<PresetChoice>,
    pub(crate) seed: Option<u64>,
}

impl FileConfig {
    pub(crate) fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read session file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid session file {}", path.display()))
    }

    pub(crate) fn parse(content: &str) -> Result<Self> {
        let config: FileConfig = toml::from_str(content)?;
        Ok(config)
    }
}

/// Scenario requested for the initial grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PresetChoice {
    /// Start from an empty grid.
    None,
    /// Generate the random preset.
    Random,
    /// Generate the hard preset.
    Hard,
}

impl PresetChoice {
    pub(crate) fn preset(self) -> Option<Preset> {
        match self {
            Self::None => None,
            Self::Random => Some(Preset::Random),
            Self::Hard => Some(Preset::Hard),
        }
    }
}

/// Effective settings after merging every source and clamping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SessionConfig {
    pub(crate) size: u32,
    pub(crate) turns: u64,
    pub(crate) tick: Duration,
    pub(crate) preset: Option<Preset>,
    pub(crate) seed: u64,
}

impl SessionConfig {
    /// Merges `overrides` over `file` over the built-in defaults.
    pub(crate) fn resolve(overrides: &FileConfig, file: &FileConfig) -> Self {
        let size = overrides
            .size
            .or(file.size)
            .unwrap_or(DEFAULT_GRID_SIZE)
            .clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        let turns = overrides.turns.or(file.turns).unwrap_or(DEFAULT_TURNS);
        let tick_ms = overrides
            .tick_ms
            .or(file.tick_ms)
            .unwrap_or(DEFAULT_TICK_MS)
            .clamp(MIN_TICK_MS, MAX_TICK_MS);
        let preset = overrides
            .preset
            .or(file.preset)
            .and_then(PresetChoice::preset);
        let seed = overrides.seed.or(file.seed).unwrap_or(DEFAULT_SEED);

        Self {
            size,
            turns,
            tick: Duration::from_millis(tick_ms),
            preset,
            seed,
        }
    }
}
