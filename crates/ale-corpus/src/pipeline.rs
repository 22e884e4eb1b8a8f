//! End-to-end corpus rebuild: load, aggregate, write.

use std::path::{Path, PathBuf};

use ale_core::error::Result;
use ale_core::models::CorpusEntry;
use ale_core::persist::write_json_pretty;
use tracing::info;

use crate::aggregator::build_corpus;
use crate::reader::load_events;

/// Outcome of a corpus rebuild.
#[derive(Debug, Clone)]
pub struct CorpusReport {
    /// Number of raw events read from the log.
    pub events_read: usize,
    /// Number of corpus entries written.
    pub entries_written: usize,
    /// Where the corpus was written.
    pub output_path: PathBuf,
}

/// Write `corpus` to `path` as indented JSON, replacing any previous corpus.
pub fn write_corpus(path: &Path, corpus: &[CorpusEntry]) -> Result<()> {
    write_json_pretty(path, corpus)
}

/// Regenerate the corpus at `output` from the event log at `input`.
pub fn rebuild_corpus(input: &Path, output: &Path) -> Result<CorpusReport> {
    let events = load_events(input)?;
    let corpus = build_corpus(&events);
    write_corpus(output, &corpus)?;

    info!(
        "Aggregated {} events into {} tags",
        events.len(),
        corpus.len()
    );

    Ok(CorpusReport {
        events_read: events.len(),
        entries_written: corpus.len(),
        output_path: output.to_path_buf(),
    })
}
