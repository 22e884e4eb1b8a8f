use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag stamped on every flow produced from a Datadog export.
pub const DATADOG_SOURCE: &str = "datadog";

/// `system_to` value for a service that lists no dependencies.
pub const EXTERNAL_SYSTEM: &str = "external";

/// Risk score assumed for events that carry no usable `risk_score`.
pub const DEFAULT_RISK_SCORE: f64 = 0.5;

/// One aggregated per-tag summary in the learning corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    /// Tag text, trimmed of surrounding whitespace.
    pub tag: String,
    /// Number of times the tag was seen across all events.
    pub occurrences: u64,
    /// Mean risk of the events carrying the tag, 2 decimal places.
    pub average_risk: f64,
    /// `min(1, average_risk + occurrences / 100)`, 2 decimal places.
    pub recommendation_strength: f64,
    /// Human-readable advice derived from the tag.
    pub recommendation: String,
}

/// A directional dependency edge between two systems, ready for ALE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub flow_id: String,
    pub source: String,
    pub system_from: String,
    pub system_to: String,
    pub env: String,
    pub status: String,
    /// Processing time, not the time recorded in the export.
    pub last_seen: String,
    pub latency_ms: f64,
    pub error_rate: f64,
    pub owner_team: String,
    pub confidence: f64,
}

/// Confidence assigned to a flow given its lower-cased status.
pub fn confidence_for_status(status: &str) -> f64 {
    if status == "healthy" {
        0.9
    } else {
        0.6
    }
}

/// Format a UTC instant as ISO-8601 with microseconds and a literal `Z`.
///
/// Example: `2024-03-01T09:15:00.000000Z`.
pub fn format_last_seen(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Round `value` to two decimal places, exact binary ties going to even
/// (`0.125` becomes `0.12`).
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_confidence_for_status() {
        assert!((confidence_for_status("healthy") - 0.9).abs() < f64::EPSILON);
        assert!((confidence_for_status("degraded") - 0.6).abs() < f64::EPSILON);
        assert!((confidence_for_status("") - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_last_seen_has_micros_and_z() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap();
        assert_eq!(format_last_seen(ts), "2024-03-01T09:15:00.000000Z");
    }

    #[test]
    fn test_round2() {
        assert!((round2(0.8400000000000001) - 0.84).abs() < f64::EPSILON);
        assert!((round2(0.666_666) - 0.67).abs() < f64::EPSILON);
        assert!((round2(1.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round2_exact_ties_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.625), 0.62);
        assert_eq!(round2(0.375), 0.38);
        // 2.675 is stored just below the tie.
        assert_eq!(round2(2.675), 2.67);
    }

    #[test]
    fn test_corpus_entry_field_order() {
        let entry = CorpusEntry {
            tag: "latency".to_string(),
            occurrences: 2,
            average_risk: 0.8,
            recommendation_strength: 0.82,
            recommendation: "Monitor latency during sequencing.".to_string(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"tag":"latency","occurrences":2,"average_risk":0.8,"recommendation_strength":0.82,"recommendation":"Monitor latency during sequencing."}"#
        );
    }

    #[test]
    fn test_flow_record_serializes_all_fields() {
        let flow = FlowRecord {
            flow_id: "api_to_db_12345678".to_string(),
            source: DATADOG_SOURCE.to_string(),
            system_from: "api".to_string(),
            system_to: "db".to_string(),
            env: "prod".to_string(),
            status: "healthy".to_string(),
            last_seen: "2024-03-01T09:15:00.000000Z".to_string(),
            latency_ms: 12.5,
            error_rate: 0.0,
            owner_team: "core".to_string(),
            confidence: 0.9,
        };
        let value = serde_json::to_value(&flow).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 11);
        assert_eq!(obj["source"], "datadog");
        assert_eq!(obj["latency_ms"], 12.5);
    }
}
