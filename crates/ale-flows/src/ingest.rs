//! Export ingestion: read a service list, expand it into flows, write the
//! local snapshot and hand it to ALE.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use ale_core::error::{AleError, Result};
use ale_core::models::{FlowRecord, DATADOG_SOURCE};
use ale_core::persist::write_json_pretty;
use chrono::Utc;
use tracing::{debug, info};

use crate::client::{AleClient, Delivery, HttpTransport};
use crate::delimiter::detect_delimiter;
use crate::normalizer::{normalize_row, ServiceRow};

/// Bytes inspected when sniffing the delimiter.
pub const SNIFF_SAMPLE_BYTES: u64 = 4096;

/// Result of an ingest run.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub flows: Vec<FlowRecord>,
    pub snapshot_path: PathBuf,
    /// `None` when the push to ALE was skipped.
    pub delivery: Option<Delivery>,
}

/// Parse the export at `path` into flow records.
///
/// The delimiter is sniffed from the first 4 KiB; the file is then read from
/// the start with the first line as header.
pub fn read_flows(path: &Path) -> Result<Vec<FlowRecord>> {
    let read_err = |source| AleError::FileRead {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |e: csv::Error| AleError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut file = File::open(path).map_err(read_err)?;

    let mut sample = Vec::new();
    file.by_ref()
        .take(SNIFF_SAMPLE_BYTES)
        .read_to_end(&mut sample)
        .map_err(read_err)?;
    let delimiter = detect_delimiter(&String::from_utf8_lossy(&sample));
    debug!(
        "Detected delimiter {:?} for {}",
        delimiter as char,
        path.display()
    );
    file.seek(SeekFrom::Start(0)).map_err(read_err)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(BufReader::new(file));
    let headers = reader.headers().map_err(csv_err)?.clone();

    let mut flows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let row = ServiceRow::from_record(&headers, &record);
        flows.extend(normalize_row(&row, Utc::now()));
    }
    Ok(flows)
}

/// Full ingest: validate the input, write the snapshot to `snapshot_path`
/// and, when a client is given, POST the flows to ALE.
///
/// The snapshot is written before any network traffic, so a failed push
/// never costs the local artifact.
pub fn ingest<T: HttpTransport>(
    input: &Path,
    snapshot_path: &Path,
    client: Option<&AleClient<T>>,
) -> Result<IngestReport> {
    if !input.exists() {
        return Err(AleError::InputNotFound(input.to_path_buf()));
    }
    if let Some(dir) = snapshot_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| AleError::FileWrite {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let flows = read_flows(input)?;
    write_json_pretty(snapshot_path, &flows)?;
    info!(
        "Wrote {} flows from {} to {}",
        flows.len(),
        input.display(),
        snapshot_path.display()
    );

    let delivery = client.map(|c| c.push_flows(&flows));

    Ok(IngestReport {
        flows,
        snapshot_path: snapshot_path.to_path_buf(),
        delivery,
    })
}

/// Remove every Datadog-seeded flow from ALE. Local files are untouched.
pub fn rollback<T: HttpTransport>(client: &AleClient<T>) -> Delivery {
    client.delete_by_source(DATADOG_SOURCE)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
