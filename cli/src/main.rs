use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, NaiveDateTime};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tips_core::{DangerLevel, EngineConfig, HealthMetric};
use tips_engine::lifecycle::parse_slot;
use tips_engine::reminders::reminder_schedule;
use tips_engine::{
    parse_metrics_str, respond, respond_health_tips, Clock, FixedClock, HealthTipsResponse,
    SystemClock, TipsEngine, TipsResponse,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn,tips_engine=info";

#[derive(Parser, Debug)]
#[command(
    name = "tips-cli",
    about = "Gợi ý lịch hẹn khám từ lịch sử chỉ số sức khoẻ."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sinh danh sách gợi ý lịch hẹn từ file JSON chỉ số.
    Suggest {
        /// Đường dẫn tới file JSON chỉ số (mảng, hoặc object có `metrics`/`rows`).
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        user_id: i64,
        /// Thời điểm hiện tại theo RFC 3339, mặc định là giờ hệ thống.
        #[arg(long)]
        now: Option<String>,
        /// Seed cho nguồn ngẫu nhiên, để kết quả lặp lại được.
        #[arg(long)]
        seed: Option<u64>,
        /// In nguyên response JSON.
        #[arg(long)]
        json: bool,
    },
    /// Sinh lời khuyên lối sống từ cùng file JSON chỉ số.
    HealthTips {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        user_id: i64,
        #[arg(long)]
        now: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// In lịch nhắc cho một lịch hẹn đã chọn.
    Reminders {
        /// `YYYY-MM-DD HH:MM` hoặc RFC 3339.
        #[arg(long)]
        slot: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        danger_level: u8,
        #[arg(long)]
        now: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    match Args::parse().command {
        Command::Suggest {
            input,
            user_id,
            now,
            seed,
            json,
        } => suggest(input, user_id, now.as_deref(), seed, json),
        Command::HealthTips {
            input,
            user_id,
            now,
            seed,
            json,
        } => health_tips(input, user_id, now.as_deref(), seed, json),
        Command::Reminders {
            slot,
            danger_level,
            now,
        } => reminders(&slot, danger_level, now.as_deref()),
    }
}

fn suggest(
    input: PathBuf,
    user_id: i64,
    now: Option<&str>,
    seed: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let metrics = read_metrics(&input)?;
    let mut engine = engine_at(now, seed)?;

    tracing::info!(readings = metrics.len(), user_id, "generating appointment tips");
    let response = respond(&mut engine, metrics, user_id);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_summary(&response);
    }
    Ok(())
}

fn health_tips(
    input: PathBuf,
    user_id: i64,
    now: Option<&str>,
    seed: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let metrics = read_metrics(&input)?;
    let mut engine = engine_at(now, seed)?;

    tracing::info!(readings = metrics.len(), user_id, "generating health tips");
    let response = respond_health_tips(&mut engine, metrics, user_id);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_tips(&response);
    }
    Ok(())
}

fn read_metrics(input: &Path) -> anyhow::Result<Vec<HealthMetric>> {
    let data = std::fs::read_to_string(input)
        .with_context(|| format!("Không đọc được file {:?}", input))?;
    parse_metrics_str(&data).with_context(|| format!("Không parse được chỉ số trong {:?}", input))
}

fn engine_at(now: Option<&str>, seed: Option<u64>) -> anyhow::Result<TipsEngine<FixedClock, StdRng>> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ok(TipsEngine::new(EngineConfig::from_env())
        .with_clock(clock_at(now)?)
        .with_rng(rng))
}

fn reminders(slot: &str, danger_level: u8, now: Option<&str>) -> anyhow::Result<()> {
    let appointment_at = parse_slot(slot)?;
    let level = DangerLevel::try_from(danger_level)?;
    let now: NaiveDateTime = clock_at(now)?.now().naive_local();

    let schedule = reminder_schedule(appointment_at, level, now);
    if schedule.is_empty() {
        println!("No upcoming reminders for {appointment_at}");
    }
    for remind_at in schedule {
        println!("{}", remind_at.format(tips_core::SLOT_FORMAT));
    }
    Ok(())
}

fn clock_at(now: Option<&str>) -> anyhow::Result<FixedClock> {
    match now {
        Some(text) => {
            let at = DateTime::parse_from_rfc3339(text)
                .with_context(|| format!("Thời điểm không hợp lệ: {text}"))?;
            Ok(FixedClock(at))
        }
        None => Ok(FixedClock(SystemClock.now())),
    }
}

fn print_summary(response: &TipsResponse) {
    println!("Suggestions: {}", response.suggestions.len());
    for suggestion in &response.suggestions {
        println!(
            "\n[{}] {} ({}, {})",
            suggestion.danger_level, suggestion.title, suggestion.specialty, suggestion.timeframe
        );
        println!("  {}", suggestion.reason);
        println!("  Slots: {}", suggestion.proposed_slots.join(", "));
    }
}

fn print_tips(response: &HealthTipsResponse) {
    println!("Health tips: {}", response.suggestions.len());
    for tip in &response.suggestions {
        println!("\n[{}] {}: {}", tip.priority, tip.category, tip.suggestion_text);
    }
}
