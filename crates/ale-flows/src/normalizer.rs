//! Service row lookup and expansion into ALE flow records.
//!
//! # Input contract
//!
//! Headers are matched case-insensitively after trimming. Each logical field
//! accepts the header names below, consulted in order; the first one holding
//! a non-empty value wins, otherwise the default applies.
//!
//! | field        | headers                      | default           |
//! |--------------|------------------------------|-------------------|
//! | name         | `service_name`, `name`       | `unknown_service` |
//! | owner        | `team`, `owner`              | `unassigned`      |
//! | env          | `env`, `environment`         | `prod`            |
//! | status       | `status`                     | `healthy`         |
//! | dependencies | `dependencies`, `depends_on` | none              |
//! | latency      | `latency_ms`, `latency (ms)` | `0`               |
//! | error rate   | `error_rate`, `error rate`   | `0`               |

use std::collections::HashMap;

use ale_core::models::{
    confidence_for_status, format_last_seen, FlowRecord, DATADOG_SOURCE, EXTERNAL_SYSTEM,
};
use chrono::{DateTime, Utc};
use sha1::{Digest, Sha1};
use tracing::warn;

/// Dependency placeholder hashed into the id of an external flow.
const NO_DEPENDENCY: &str = "_none_";

// ── ServiceField ──────────────────────────────────────────────────────────────

/// A logical column of the export: accepted header names plus a default.
#[derive(Debug, Clone, Copy)]
pub struct ServiceField {
    pub headers: &'static [&'static str],
    pub default: &'static str,
}

pub const NAME: ServiceField = ServiceField {
    headers: &["service_name", "name"],
    default: "unknown_service",
};

pub const OWNER: ServiceField = ServiceField {
    headers: &["team", "owner"],
    default: "unassigned",
};

pub const ENV: ServiceField = ServiceField {
    headers: &["env", "environment"],
    default: "prod",
};

pub const STATUS: ServiceField = ServiceField {
    headers: &["status"],
    default: "healthy",
};

pub const DEPENDENCIES: ServiceField = ServiceField {
    headers: &["dependencies", "depends_on"],
    default: "",
};

pub const LATENCY_MS: ServiceField = ServiceField {
    headers: &["latency_ms", "latency (ms)"],
    default: "0",
};

pub const ERROR_RATE: ServiceField = ServiceField {
    headers: &["error_rate", "error rate"],
    default: "0",
};

// ── ServiceRow ────────────────────────────────────────────────────────────────

/// One export record keyed by normalised (trimmed, lower-cased) header.
#[derive(Debug, Clone, Default)]
pub struct ServiceRow {
    cells: HashMap<String, String>,
}

impl ServiceRow {
    /// Build a row from `(header, value)` pairs. A repeated header keeps the
    /// last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let cells = pairs
            .into_iter()
            .map(|(k, v)| (normalize_header(k.as_ref()), v.into()))
            .collect();
        Self { cells }
    }

    /// Pair a CSV record with the header record. Cells beyond the header are
    /// ignored; missing trailing cells are simply absent.
    pub fn from_record(headers: &csv::StringRecord, record: &csv::StringRecord) -> Self {
        Self::from_pairs(headers.iter().zip(record.iter()))
    }

    /// First non-empty value among the field's headers.
    pub fn lookup(&self, field: &ServiceField) -> Option<&str> {
        field
            .headers
            .iter()
            .filter_map(|h| self.cells.get(*h))
            .map(String::as_str)
            .find(|v| !v.is_empty())
    }

    /// [`lookup`](Self::lookup) falling back to the field default.
    pub fn get_or_default(&self, field: &ServiceField) -> &str {
        self.lookup(field).unwrap_or(field.default)
    }

    /// Trimmed, non-empty entries of the comma-separated dependency cell.
    pub fn dependencies(&self) -> Vec<&str> {
        self.get_or_default(&DEPENDENCIES)
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .collect()
    }

    /// Numeric value of `field`; unparseable or non-finite text counts as zero.
    pub fn number(&self, field: &ServiceField) -> f64 {
        let raw = self.get_or_default(field);
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                warn!(
                    "Non-numeric {} value {:?}, using 0",
                    field.headers[0], raw
                );
                0.0
            }
        }
    }
}

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

// ── Flow expansion ────────────────────────────────────────────────────────────

/// Deterministic flow id: `{from}_to_{to}_{first 8 hex digits of sha1}`.
pub fn flow_id(system_from: &str, system_to: &str) -> String {
    let base = format!("{}_to_{}", system_from, system_to);
    let digest = format!("{:x}", Sha1::digest(base.as_bytes()));
    format!("{}_{}", base, &digest[..8])
}

/// Expand one service row into flow records, one per listed dependency, or a
/// single flow to `external` when none are listed.
///
/// `seen_at` is stamped as `last_seen` on every produced flow.
pub fn normalize_row(row: &ServiceRow, seen_at: DateTime<Utc>) -> Vec<FlowRecord> {
    let name = row.get_or_default(&NAME);
    let owner = row.get_or_default(&OWNER);
    let env = row.get_or_default(&ENV);
    let status = row.get_or_default(&STATUS).to_lowercase();
    let latency_ms = row.number(&LATENCY_MS);
    let error_rate = row.number(&ERROR_RATE);
    let confidence = confidence_for_status(&status);
    let last_seen = format_last_seen(seen_at);

    let deps = row.dependencies();
    let targets: Vec<(&str, &str)> = if deps.is_empty() {
        vec![(NO_DEPENDENCY, EXTERNAL_SYSTEM)]
    } else {
        deps.iter().map(|d| (*d, *d)).collect()
    };

    targets
        .into_iter()
        .map(|(id_target, system_to)| FlowRecord {
            flow_id: flow_id(name, id_target),
            source: DATADOG_SOURCE.to_string(),
            system_from: name.to_string(),
            system_to: system_to.to_string(),
            env: env.to_string(),
            status: status.clone(),
            last_seen: last_seen.clone(),
            latency_ms,
            error_rate,
            owner_team: owner.to_string(),
            confidence,
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
