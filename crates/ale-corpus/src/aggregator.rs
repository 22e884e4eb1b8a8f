//! Tag-level aggregation of reasoning events into the learning corpus.

use ale_core::models::{round2, CorpusEntry, DEFAULT_RISK_SCORE};
use indexmap::IndexMap;
use serde_json::Value;

// ── TagBucket ─────────────────────────────────────────────────────────────────

/// Running statistics for one tag.
#[derive(Debug, Clone, Default)]
pub struct TagBucket {
    pub occurrences: u64,
    pub risks: Vec<f64>,
}

impl TagBucket {
    /// Record one sighting of the tag with the owning event's risk.
    pub fn record(&mut self, risk: f64) {
        self.occurrences += 1;
        self.risks.push(risk);
    }

    /// Mean of the recorded risks, or the default risk when none were seen.
    pub fn average_risk(&self) -> f64 {
        if self.risks.is_empty() {
            return DEFAULT_RISK_SCORE;
        }
        self.risks.iter().sum::<f64>() / self.risks.len() as f64
    }

    /// Finalize into a corpus entry for `tag`.
    fn into_entry(self, tag: String) -> CorpusEntry {
        let average = self.average_risk();
        let strength = (average + self.occurrences as f64 / 100.0).min(1.0);
        let recommendation = format!("Monitor {} during sequencing.", tag.replace('_', " "));
        CorpusEntry {
            tag,
            occurrences: self.occurrences,
            average_risk: round2(average),
            recommendation_strength: round2(strength),
            recommendation,
        }
    }
}

// ── CorpusBuilder ─────────────────────────────────────────────────────────────

/// Accumulates events into per-tag buckets, keeping first-seen tag order.
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    buckets: IndexMap<String, TagBucket>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one raw event into the buckets.
    ///
    /// Events without a `context_tags` array are ignored. Each string tag is
    /// trimmed; blank and non-string tags are skipped. A tag repeated within
    /// one event is counted once per repetition.
    pub fn add_event(&mut self, event: &Value) {
        let Some(tags) = event.get("context_tags").and_then(Value::as_array) else {
            return;
        };
        let risk = risk_score(event);

        for raw in tags {
            let Some(tag) = raw.as_str().map(str::trim).filter(|t| !t.is_empty()) else {
                continue;
            };
            self.buckets.entry(tag.to_string()).or_default().record(risk);
        }
    }

    /// Number of distinct tags seen so far.
    pub fn tag_count(&self) -> usize {
        self.buckets.len()
    }

    /// Produce the corpus, most frequent tags first. Ties keep the order in
    /// which the tags were first seen.
    pub fn finish(self) -> Vec<CorpusEntry> {
        let mut corpus: Vec<CorpusEntry> = self
            .buckets
            .into_iter()
            .map(|(tag, bucket)| bucket.into_entry(tag))
            .collect();
        corpus.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
        corpus
    }
}

/// Build the learning corpus from raw reasoning events.
pub fn build_corpus(events: &[Value]) -> Vec<CorpusEntry> {
    let mut builder = CorpusBuilder::new();
    for event in events {
        builder.add_event(event);
    }
    builder.finish()
}

/// Numeric `risk_score` of an event; booleans, strings, `null` and missing
/// values fall back to the default risk.
fn risk_score(event: &Value) -> f64 {
    event
        .get("risk_score")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_RISK_SCORE)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
