mod bootstrap;

use std::process::ExitCode;
use std::time::Duration;

use ale_core::settings::{SeedMode, SeedSettings};
use ale_flows::client::HttpResponse;
use ale_flows::{ingest, rollback, AleClient, Delivery, IngestReport, ReqwestTransport};
use clap::Parser;

fn main() -> ExitCode {
    // clap prints usage and exits with status 2 on a bad invocation.
    let settings = SeedSettings::parse();

    if let Err(e) = bootstrap::setup_logging(settings.effective_log_level()) {
        eprintln!("Failed to initialise logging: {}", e);
    }
    tracing::info!("Datadog seeder v{} starting", env!("CARGO_PKG_VERSION"));

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &SeedSettings) -> anyhow::Result<()> {
    let timeout = Duration::from_secs(settings.timeout_secs);

    match settings.mode() {
        SeedMode::Ingest(input) => {
            let client = if settings.no_push {
                None
            } else {
                Some(AleClient::new(&settings.endpoint, timeout)?)
            };
            let report =
                ingest::<ReqwestTransport>(&input, &settings.snapshot_path(), client.as_ref())?;
            for line in ingest_lines(&report) {
                println!("{}", line);
            }
        }
        SeedMode::Rollback => {
            let client = AleClient::new(&settings.endpoint, timeout)?;
            println!("{}", rollback_line(&rollback(&client)));
        }
    }

    Ok(())
}

// ── Console report ─────────────────────────────────────────────────────────────

fn ingest_lines(report: &IngestReport) -> Vec<String> {
    let count = report.flows.len();
    let mut lines = vec![
        format!(
            "✅ Generated {} flows → {}",
            count,
            report.snapshot_path.display()
        ),
        "Next: POST to /api/ale/integration-flows to seed the intelligence layer.".to_string(),
    ];

    match &report.delivery {
        None => {}
        Some(Delivery::Accepted(resp)) => {
            let mut line = format!("✅ Successfully seeded {} flows to ALE store.", count);
            if let Some(total) = resp.json_u64("total") {
                line.push_str(&format!(" Store now holds {} flows.", total));
            }
            lines.push(line);
        }
        Some(Delivery::Rejected(resp)) => lines.push(format!("⚠️ Seeding failed: {}", status_text(resp))),
        Some(Delivery::Unreachable(msg)) => {
            lines.push(format!("⚠️ Could not reach ALE endpoint: {}", msg))
        }
    }
    lines
}

fn rollback_line(delivery: &Delivery) -> String {
    match delivery {
        Delivery::Accepted(resp) => {
            let mut line = "♻️ Rollback complete: all Datadog-seeded flows removed.".to_string();
            if let Some(removed) = resp.json_u64("removed") {
                line.push_str(&format!(" ({} removed)", removed));
            }
            line
        }
        Delivery::Rejected(resp) => format!("⚠️ Rollback failed: {}", status_text(resp)),
        Delivery::Unreachable(msg) => {
            format!("⚠️ Could not reach ALE endpoint for rollback: {}", msg)
        }
    }
}

fn status_text(resp: &HttpResponse) -> String {
    format!("{} - {}", resp.status, resp.body.trim())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn report(delivery: Option<Delivery>) -> IngestReport {
        IngestReport {
            flows: Vec::new(),
            snapshot_path: PathBuf::from("data/integration/seed/datadog_integration_snapshot.json"),
            delivery,
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_ingest_lines_without_push() {
        let lines = ingest_lines(&report(None));
        assert_eq!(
            lines[0],
            "✅ Generated 0 flows → data/integration/seed/datadog_integration_snapshot.json"
        );
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Next: POST"));
    }

    #[test]
    fn test_ingest_lines_accepted_with_total() {
        let lines = ingest_lines(&report(Some(Delivery::Accepted(response(
            200,
            r#"{"success":true,"count":0,"total":12}"#,
        )))));
        assert!(lines[1].starts_with("Next: POST"));
        assert_eq!(
            lines[2],
            "✅ Successfully seeded 0 flows to ALE store. Store now holds 12 flows."
        );
    }

    #[test]
    fn test_ingest_lines_rejected() {
        let lines = ingest_lines(&report(Some(Delivery::Rejected(response(500, "oops\n")))));
        assert_eq!(lines[2], "⚠️ Seeding failed: 500 - oops");
    }

    #[test]
    fn test_ingest_lines_unreachable() {
        let lines = ingest_lines(&report(Some(Delivery::Unreachable(
            "connection refused".to_string(),
        ))));
        assert_eq!(lines[2], "⚠️ Could not reach ALE endpoint: connection refused");
    }

    #[test]
    fn test_rollback_line_variants() {
        assert_eq!(
            rollback_line(&Delivery::Accepted(response(200, r#"{"removed":5}"#))),
            "♻️ Rollback complete: all Datadog-seeded flows removed. (5 removed)"
        );
        assert_eq!(
            rollback_line(&Delivery::Rejected(response(404, "missing"))),
            "⚠️ Rollback failed: 404 - missing"
        );
        assert_eq!(
            rollback_line(&Delivery::Unreachable("timed out".to_string())),
            "⚠️ Could not reach ALE endpoint for rollback: timed out"
        );
    }

    #[test]
    fn test_run_missing_input_is_fatal_and_writes_nothing() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let out_dir = tmp.path().join("seed");
        let settings = SeedSettings::parse_from([
            "datadog-seed".into(),
            tmp.path().join("absent.csv").into_os_string(),
            "--out-dir".into(),
            out_dir.clone().into_os_string(),
            "--no-push".into(),
        ]);

        let err = run(&settings).unwrap_err();

        assert!(err.to_string().starts_with("File not found:"));
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_run_no_push_writes_snapshot() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let input = tmp.path().join("services.csv");
        std::fs::write(&input, "service_name,team\napi,core\n").expect("seed");
        let out_dir = tmp.path().join("seed");
        let settings = SeedSettings::parse_from([
            "datadog-seed".into(),
            input.into_os_string(),
            "--out-dir".into(),
            out_dir.clone().into_os_string(),
            "--no-push".into(),
        ]);

        run(&settings).expect("run");

        assert!(out_dir.join("datadog_integration_snapshot.json").is_file());
    }
}
