//! Decode scanned QR payloads from the command line
//!
//! Payloads come from arguments, or one per line on stdin. With a subject
//! directory the scans are fully resolved (lookup + presence update).

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use aicp::config::AppConfig;
use aicp::format::{format_date, format_time, location_label};
use aicp::{
    decode, logging, DirectoryLookup, ScanOutcome, ScanResolver, SubjectDetails, SubjectType,
};

/// Widest payload excerpt shown in the table
const PAYLOAD_PREVIEW_CHARS: usize = 48;

#[derive(Parser, Debug)]
#[command(name = "aicp-scan", version, about = "Decode and resolve access QR payloads")]
struct Cli {
    /// Payloads to decode; read from stdin when omitted
    payloads: Vec<String>,

    /// Configuration file (defaults to ./aicp.toml when present)
    #[arg(short, long, env = "AICP_CONFIG")]
    config: Option<PathBuf>,

    /// JSON file of known subjects; enables full scan resolution
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Emit one JSON object per payload instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Report {
    Decoded {
        payload: String,
        #[serde(flatten)]
        token: aicp::AccessToken,
    },
    Rejected {
        payload: String,
        invalid: String,
    },
    Resolved {
        payload: String,
        outcome: ScanOutcome,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    logging::init(&config.logging);

    let payloads = if cli.payloads.is_empty() {
        read_stdin_payloads()?
    } else {
        cli.payloads.clone()
    };
    tracing::info!(count = payloads.len(), "decoding payloads");

    let directory_path = cli.directory.clone().or(config.scanner.directory.clone());
    let reports = match directory_path {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("reading subject directory {}", path.display()))?;
            let lookup = DirectoryLookup::from_json_str(&json)
                .with_context(|| format!("parsing subject directory {}", path.display()))?;
            tracing::info!(subjects = lookup.len(), path = %path.display(), "subject directory loaded");

            let resolver = ScanResolver::new(lookup);
            payloads
                .into_iter()
                .map(|payload| {
                    let outcome = resolver.resolve(&payload);
                    Report::Resolved { payload, outcome }
                })
                .collect::<Vec<_>>()
        }
        None => payloads
            .into_iter()
            .map(|payload| match decode(&payload) {
                Ok(token) => Report::Decoded { payload, token },
                Err(invalid) => Report::Rejected {
                    payload,
                    invalid: invalid.reason().to_string(),
                },
            })
            .collect(),
    };

    if cli.json {
        for report in &reports {
            println!("{}", serde_json::to_string(report)?);
        }
    } else {
        println!("{}", render_table(&reports, &config.scanner.locations));
    }

    Ok(())
}

fn read_stdin_payloads() -> anyhow::Result<Vec<String>> {
    let stdin = io::stdin();
    let mut payloads = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if !line.trim().is_empty() {
            payloads.push(line);
        }
    }
    Ok(payloads)
}

fn render_table(reports: &[Report], locations: &HashMap<String, String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Payload", "Result", "Type", "Id", "Detail"]);

    for report in reports {
        let row = match report {
            Report::Decoded { payload, token } => vec![
                preview(payload),
                "ok".to_string(),
                token.subject_type.to_string(),
                token.subject_id.clone(),
                String::new(),
            ],
            Report::Rejected { payload, invalid } => vec![
                preview(payload),
                "invalid".to_string(),
                String::new(),
                String::new(),
                invalid.clone(),
            ],
            Report::Resolved { payload, outcome } => outcome_row(payload, outcome, locations),
        };
        table.add_row(row);
    }

    table
}

fn outcome_row(
    payload: &str,
    outcome: &ScanOutcome,
    locations: &HashMap<String, String>,
) -> Vec<String> {
    match outcome {
        ScanOutcome::Resident { token, pass } => vec![
            preview(payload),
            "resident".to_string(),
            token.subject_type.to_string(),
            token.subject_id.clone(),
            match &pass.house_number {
                Some(house) => format!("{} (casa {})", pass.name, house),
                None => pass.name.clone(),
            },
        ],
        ScanOutcome::Visitor {
            token,
            details,
            status,
            expired,
        } => vec![
            preview(payload),
            if *expired { "expired" } else { "visitor" }.to_string(),
            token.subject_type.to_string(),
            token.subject_id.clone(),
            match &details.expires_at {
                Some(expiry) if token.subject_type == SubjectType::OneTime => {
                    format!("{} - {} (expira {})", details.name, status, format_date(expiry))
                }
                _ => format!("{} - {}", details.name, status),
            },
        ],
        ScanOutcome::Event { token, details } => vec![
            preview(payload),
            "event".to_string(),
            token.subject_type.to_string(),
            token.subject_id.clone(),
            event_detail(details, locations),
        ],
        ScanOutcome::Invalid { reason } => vec![
            preview(payload),
            "invalid".to_string(),
            String::new(),
            String::new(),
            reason.clone(),
        ],
    }
}

fn event_detail(details: &SubjectDetails, locations: &HashMap<String, String>) -> String {
    let when = [
        details.event_date.as_deref().map(format_date),
        details.event_time.as_deref().map(format_time),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    let place = match details.event_location.as_deref().map(str::trim) {
        Some(location) if !location.is_empty() => location_label(location, locations),
        _ => "No especificado".to_string(),
    };

    format!("{} {} - {}", details.name, when, place)
}

fn preview(payload: &str) -> String {
    let trimmed = payload.trim();
    if trimmed.chars().count() <= PAYLOAD_PREVIEW_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(PAYLOAD_PREVIEW_CHARS).collect();
        format!("{head}…")
    }
}
