use crate::infra::{build_engine, read_profile};
use chrono::SecondsFormat;
use clap::Args;
use scheme_finder::config::{AppConfig, KnowledgeBaseConfig};
use scheme_finder::eligibility::{
    normalize_region, EligibilityResponse, MatchResult, ALL_REGIONS,
};
use scheme_finder::error::AppError;
use scheme_finder::guide::{GuideRenderer, PlainTextGuide};
use scheme_finder::intake::{InMemorySessionStore, IntakeService, IntakeStage};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_SCRIPT: [&str; 7] = ["hi", "1", "farmer", "yes", "40,000", "yes", "1"];

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Profile JSON file (field name -> value)
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Region code; defaults to the profile's `state`, else ALL
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Scheme catalogue JSON file; defaults to SCHEMES_PATH or the bundled catalogue
    #[arg(long)]
    pub(crate) schemes: Option<PathBuf>,
    /// Print the plain-text application guide after the ranked list
    #[arg(long)]
    pub(crate) guide: bool,
    /// Emit the eligibility response as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Sender identity used for the simulated chat
    #[arg(long, default_value = "whatsapp:+910000000000")]
    pub(crate) identity: String,
    /// File with one inbound message per line; a farmer walkthrough otherwise
    #[arg(long)]
    pub(crate) script: Option<PathBuf>,
    /// Emit the transcript as JSON lines
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct TranscriptEntry<'a> {
    turn: usize,
    inbound: &'a str,
    reply: &'a str,
    stage: IntakeStage,
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let MatchArgs {
        profile,
        region,
        schemes,
        guide,
        json,
    } = args;

    let config = AppConfig::load()?;
    let knowledge_base = KnowledgeBaseConfig {
        schemes_path: schemes.or(config.knowledge_base.schemes_path),
    };
    let engine = build_engine(&knowledge_base)?;
    let profile = read_profile(&profile)?;

    let region = normalize_region(
        region
            .as_deref()
            .or_else(|| profile.region())
            .unwrap_or(ALL_REGIONS),
    );
    let matches = engine.find_matches(&profile, &region);

    if json {
        let response = EligibilityResponse::from_matches(&matches);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        render_matches(&region, &matches);
    }

    if guide {
        let artifact = PlainTextGuide::new().render(&profile, &matches, "en")?;
        println!("\n{}", String::from_utf8_lossy(&artifact.bytes));
    }

    Ok(())
}

fn render_matches(region: &str, matches: &[MatchResult]) {
    println!("Eligible schemes for region {region}: {}", matches.len());
    if matches.is_empty() {
        println!("  No scheme matched the supplied profile.");
        return;
    }

    for (rank, result) in matches.iter().enumerate() {
        println!(
            "{}. {} [{}] score {}",
            rank + 1,
            result.scheme.scheme_name,
            result.scheme.scheme_id,
            result.score
        );
        for reason in &result.reasons {
            println!("     - {reason}");
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        identity,
        script,
        json,
    } = args;

    let messages: Vec<String> = match script {
        Some(path) => std::fs::read_to_string(path)?
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect(),
        None => DEFAULT_SCRIPT.iter().map(|line| line.to_string()).collect(),
    };

    let config = AppConfig::load()?;
    let engine = build_engine(&config.knowledge_base)?;
    let store = Arc::new(InMemorySessionStore::new());
    let service = IntakeService::new(store, engine, config.intake.clone());

    if !json {
        println!("Conversational intake demo for {identity}");
    }
    for (index, message) in messages.iter().enumerate() {
        let reply = match service.handle_turn(&identity, message) {
            Ok(reply) => reply,
            Err(err) => {
                println!("  Turn rejected: {err}");
                return Ok(());
            }
        };

        if json {
            let entry = TranscriptEntry {
                turn: index + 1,
                inbound: message,
                reply: &reply.reply,
                stage: reply.stage,
            };
            println!("{}", serde_json::to_string(&entry)?);
            continue;
        }

        println!("\n> {message}");
        for line in reply.reply.lines() {
            println!("< {line}");
        }
        println!("  [stage: {}]", reply.stage.label());
    }

    if json {
        return Ok(());
    }

    match service.session(&identity) {
        Ok(Some(session)) => {
            println!(
                "\nSession episode {} updated {}",
                session.episode,
                session
                    .updated_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true)
            );
            match &session.last_outcome {
                Some(outcome) => {
                    render_matches(&outcome.region, &outcome.matches);
                    if outcome.guide_requested {
                        if let Ok(artifact) = service.guide(&identity) {
                            println!("\n{}", String::from_utf8_lossy(&artifact.bytes));
                        }
                    }
                }
                None => println!("No eligibility results recorded yet."),
            }
        }
        Ok(None) => println!("\nNo session stored for {identity}"),
        Err(err) => println!("\nSession store unavailable: {err}"),
    }

    Ok(())
}
