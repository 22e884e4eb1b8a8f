use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Endpoint of the ALE integration-flow store on a local dev server.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/ale/integration-flows";

/// Default bound on the single network call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Directory (relative to the working directory) receiving the flow snapshot.
pub const DEFAULT_SEED_DIR: &str = "data/integration/seed";

/// File name of the flow snapshot inside the seed directory.
pub const SNAPSHOT_FILE_NAME: &str = "datadog_integration_snapshot.json";

// ── CorpusSettings (ale-ingest CLI) ────────────────────────────────────────────

/// Aggregate reasoning logs into the learning corpus for ALE
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ale-ingest",
    about = "Aggregate reasoning logs into the learning corpus for ALE",
    version
)]
pub struct CorpusSettings {
    /// Project root holding `src/data/ale/`
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Reasoning log to read (defaults to `<root>/src/data/ale/reasoning_log.json`)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Corpus file to write (defaults to `<root>/src/data/ale/learning_corpus.json`)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl CorpusSettings {
    /// Resolved path of the reasoning event log.
    pub fn input_path(&self) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| ale_data_dir(&self.root).join("reasoning_log.json"))
    }

    /// Resolved path of the learning corpus.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| ale_data_dir(&self.root).join("learning_corpus.json"))
    }

    /// Effective log level after applying `--debug`.
    pub fn effective_log_level(&self) -> &str {
        effective_log_level(&self.log_level, self.debug)
    }
}

// ── SeedSettings (datadog-seed CLI) ────────────────────────────────────────────

/// What a `datadog-seed` invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedMode {
    /// Normalize the given export and push it to ALE.
    Ingest(PathBuf),
    /// Delete every Datadog-seeded flow from ALE.
    Rollback,
}

/// Convert a Datadog service export into ALE integration flows
#[derive(Parser, Debug, Clone)]
#[command(
    name = "datadog-seed",
    about = "Convert a Datadog service export into ALE integration flows",
    version,
    group(ArgGroup::new("mode").required(true).args(["input", "rollback"]))
)]
pub struct SeedSettings {
    /// Datadog service list export (comma, tab or semicolon delimited)
    pub input: Option<PathBuf>,

    /// Remove all previously seeded Datadog flows from the ALE store
    #[arg(long)]
    pub rollback: bool,

    /// ALE integration-flow endpoint
    #[arg(long, env = "ALE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Network timeout in seconds (1-300)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout_secs: u64,

    /// Directory receiving the flow snapshot
    #[arg(long, default_value = DEFAULT_SEED_DIR)]
    pub out_dir: PathBuf,

    /// Write the local snapshot only, skip the POST to ALE
    #[arg(long, conflicts_with = "rollback")]
    pub no_push: bool,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl SeedSettings {
    /// The dispatch decision. The `mode` group guarantees exactly one of
    /// `input` / `--rollback` is present.
    pub fn mode(&self) -> SeedMode {
        match (&self.input, self.rollback) {
            (Some(path), false) => SeedMode::Ingest(path.clone()),
            _ => SeedMode::Rollback,
        }
    }

    /// Full path of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.out_dir.join(SNAPSHOT_FILE_NAME)
    }

    /// Effective log level after applying `--debug`.
    pub fn effective_log_level(&self) -> &str {
        effective_log_level(&self.log_level, self.debug)
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────────

fn ale_data_dir(root: &std::path::Path) -> PathBuf {
    root.join("src").join("data").join("ale")
}

/// `--debug` overrides whatever level was requested.
fn effective_log_level(level: &str, debug: bool) -> &str {
    if debug {
        "DEBUG"
    } else {
        level
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
