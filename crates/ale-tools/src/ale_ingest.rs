mod bootstrap;

use ale_core::settings::CorpusSettings;
use ale_corpus::pipeline::rebuild_corpus;
use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let settings = CorpusSettings::parse();

    bootstrap::setup_logging(settings.effective_log_level())?;
    tracing::info!("ALE corpus builder v{} starting", env!("CARGO_PKG_VERSION"));

    let report = rebuild_corpus(&settings.input_path(), &settings.output_path())?;

    println!(
        "Wrote {} learning entries to {}",
        report.entries_written,
        report.output_path.display()
    );

    Ok(())
}
