//! Run-time configuration for the `run` subcommand: every knob the
//! original fitting script hard-coded at the bottom of its `__main__`
//! block, now overridable from the command line or an optional TOML file.

use std::path::PathBuf;

use clap::Args;
use serde::Deserialize;

/// Defaults lifted straight from the original script's constants.
pub const DEFAULT_NUM_THEMES: usize = 50;
pub const DEFAULT_NUM_ROLES: usize = 50;
pub const DEFAULT_NUM_WORDS: usize = 50_000;
pub const DEFAULT_ALPHA_MEAN: f64 = 0.001;
pub const DEFAULT_BETA: f64 = 0.1;
pub const DEFAULT_NUM_PROCESSES: usize = 16;
pub const DEFAULT_NUM_ITERATIONS: usize = 160;

#[derive(Args, Debug, Clone)]
pub struct RunConfig {
    /// Path to the character-record input file.
    #[arg(long)]
    pub input: PathBuf,

    /// Path to a `selectedvocab.txt` produced by the `vocab` subcommand.
    #[arg(long)]
    pub vocab: PathBuf,

    /// Optional TOML file overriding any of the flags below.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_NUM_THEMES)]
    pub numthemes: usize,

    #[arg(long, default_value_t = DEFAULT_NUM_ROLES)]
    pub numroles: usize,

    #[arg(long, default_value_t = DEFAULT_ALPHA_MEAN)]
    pub alphamean: f64,

    #[arg(long, default_value_t = DEFAULT_BETA)]
    pub beta: f64,

    #[arg(long, default_value_t = DEFAULT_NUM_PROCESSES)]
    pub numprocesses: usize,

    #[arg(long, default_value_t = DEFAULT_NUM_ITERATIONS)]
    pub numiterations: usize,

    /// Cap on input lines read, for small-scale test runs.
    #[arg(long)]
    pub maxlines: Option<usize>,

    /// Seed for the initial random topic assignment.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

/// The subset of `RunConfig` a TOML file may override. Any field left out
/// of the file keeps whatever the CLI flags (or their defaults) supplied.
#[derive(Deserialize, Debug, Default)]
struct FileOverrides {
    numthemes: Option<usize>,
    numroles: Option<usize>,
    alphamean: Option<f64>,
    beta: Option<f64>,
    numprocesses: Option<usize>,
    numiterations: Option<usize>,
    maxlines: Option<usize>,
    seed: Option<u64>,
}

impl RunConfig {
    /// Apply `--config <path>`'s overrides on top of the parsed flags, if
    /// a file was given. CLI flags set their own defaults, so a file that
    /// only sets `numiterations` leaves everything else as already parsed.
    pub fn with_file_overrides(mut self) -> anyhow::Result<Self> {
        let Some(path) = self.config.clone() else {
            return Ok(self);
        };
        let text = std::fs::read_to_string(&path)?;
        let overrides: FileOverrides = toml::from_str(&text)?;

        if let Some(v) = overrides.numthemes {
            self.numthemes = v;
        }
        if let Some(v) = overrides.numroles {
            self.numroles = v;
        }
        if let Some(v) = overrides.alphamean {
            self.alphamean = v;
        }
        if let Some(v) = overrides.beta {
            self.beta = v;
        }
        if let Some(v) = overrides.numprocesses {
            self.numprocesses = v;
        }
        if let Some(v) = overrides.numiterations {
            self.numiterations = v;
        }
        if let Some(v) = overrides.maxlines {
            self.maxlines = Some(v);
        }
        if let Some(v) = overrides.seed {
            self.seed = v;
        }

        Ok(self)
    }

    pub fn num_topics(&self) -> usize {
        self.numthemes + self.numroles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_overrides_only_touch_named_fields() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut f, b"numiterations = 40\n").unwrap();

        let cfg = RunConfig {
            input: PathBuf::from("in.txt"),
            vocab: PathBuf::from("vocab.txt"),
            config: Some(f.path().to_path_buf()),
            numthemes: DEFAULT_NUM_THEMES,
            numroles: DEFAULT_NUM_ROLES,
            alphamean: DEFAULT_ALPHA_MEAN,
            beta: DEFAULT_BETA,
            numprocesses: DEFAULT_NUM_PROCESSES,
            numiterations: DEFAULT_NUM_ITERATIONS,
            maxlines: None,
            seed: 0,
        }
        .with_file_overrides()
        .unwrap();

        assert_eq!(cfg.numiterations, 40);
        assert_eq!(cfg.numthemes, DEFAULT_NUM_THEMES);
    }
}
