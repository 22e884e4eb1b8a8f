//! Delimiter sniffing for service exports.
//!
//! Datadog exports reach us as comma, tab or semicolon separated text
//! depending on the locale and tool that produced them.

use std::collections::HashMap;

/// Delimiters we recognise, in tie-breaking preference order.
pub const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b'\t', b';'];

/// Used when no candidate appears consistently in the sample.
pub const FALLBACK_DELIMITER: u8 = b',';

/// Share of sampled lines that must agree on a delimiter's per-line count.
const MIN_CONSISTENCY: f64 = 0.9;

/// Infer the field delimiter of a delimited text sample.
///
/// For every candidate the number of unquoted occurrences is counted per
/// line. A candidate qualifies when its most common non-zero count covers at
/// least 90% of the lines. The most consistent candidate wins, ties going to
/// the earlier entry of [`CANDIDATE_DELIMITERS`]. Falls back to a comma.
pub fn detect_delimiter(sample: &str) -> u8 {
    let lines = sample_lines(sample);
    if lines.is_empty() {
        return FALLBACK_DELIMITER;
    }

    let mut best: Option<(u8, f64)> = None;
    for &candidate in &CANDIDATE_DELIMITERS {
        let Some(consistency) = consistency(&lines, candidate) else {
            continue;
        };
        if consistency < MIN_CONSISTENCY {
            continue;
        }
        // Strictly greater keeps the earlier candidate on ties.
        if best.map_or(true, |(_, score)| consistency > score) {
            best = Some((candidate, consistency));
        }
    }

    best.map(|(d, _)| d).unwrap_or(FALLBACK_DELIMITER)
}

/// Non-blank lines of the sample. A trailing line without a newline is
/// dropped when other lines exist, since the sample may cut it short.
fn sample_lines(sample: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = sample.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() > 1 && !sample.ends_with('\n') {
        lines.pop();
    }
    lines
}

/// Fraction of lines whose count of `delimiter` equals the modal count, or
/// `None` when the modal count is zero.
fn consistency(lines: &[&str], delimiter: u8) -> Option<f64> {
    let mut frequencies: HashMap<usize, usize> = HashMap::new();
    for line in lines {
        *frequencies.entry(count_unquoted(line, delimiter)).or_default() += 1;
    }

    let (mode, hits) = frequencies
        .into_iter()
        .max_by(|(count_a, hits_a), (count_b, hits_b)| {
            hits_a.cmp(hits_b).then(count_a.cmp(count_b))
        })?;
    if mode == 0 {
        return None;
    }
    Some(hits as f64 / lines.len() as f64)
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}
