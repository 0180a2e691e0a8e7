//! Analyze command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::ValueEnum;
use ronda::{
    AnalysisConfig, Analyzer, AssetClass, EntityData, FundamentalsSource, NewsSource, QualityReport,
};
use tracing::info;

use crate::data::{self, EntityDirectory};

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Full report as JSON.
    Json,
}

/// Analyze each entity directory and print its report.
pub(crate) async fn analyze_entities(
    dirs: &[PathBuf],
    as_of: Option<String>,
    config_path: Option<PathBuf>,
    asset_class: Option<AssetClass>,
    format: OutputFormat,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => AnalysisConfig::from_path(&path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(class) = asset_class {
        config.asset_class = class;
    }
    let analyzer = Arc::new(Analyzer::new(config)?);

    let as_of = as_of.as_deref().map(data::parse_date).transpose()?;

    let handles: Vec<_> = dirs
        .iter()
        .cloned()
        .map(|dir| {
            let analyzer = Arc::clone(&analyzer);
            tokio::task::spawn_blocking(move || analyze_one(&analyzer, &dir, as_of))
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.await??);
    }

    match format {
        OutputFormat::Json => {
            if let [report] = reports.as_slice() {
                println!("{}", report.to_json()?);
            } else {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }
        }
        OutputFormat::Text => {
            for report in &reports {
                print_report(report);
            }
        }
    }

    Ok(())
}

fn analyze_one(analyzer: &Analyzer, dir: &Path, as_of: Option<NaiveDate>) -> Result<QualityReport> {
    let source = EntityDirectory::new(dir);
    let entity = source.entity();
    let news: &dyn NewsSource = &source;
    let fundamentals: &dyn FundamentalsSource = &source;
    let data = EntityData::collect(entity.clone(), &source, &source, Some(news), Some(fundamentals))
        .with_context(|| format!("loading {}", dir.display()))?;

    // latest bar when no date is given
    let as_of = as_of
        .or_else(|| data.prices.iter().map(|bar| bar.date).max())
        .unwrap_or_else(|| Utc::now().date_naive());

    info!(
        %entity,
        %as_of,
        events = data.events.len(),
        bars = data.prices.len(),
        "loaded entity"
    );
    Ok(analyzer.analyze(&data, as_of))
}

fn print_report(report: &QualityReport) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Management Quality Report                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Entity:      {}", report.entity);
    println!("Period:      {} to {}", report.period_start, report.period_end);
    println!("Asset class: {}", report.asset_class);
    println!();

    let score = &report.score;
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("SCORE");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    println!("  Composite:   {:.3}", score.composite);
    println!("  Leakage:     {:.3}", score.leakage_score);
    println!("  Conviction:  {:.3}", score.conviction_score);
    println!("  Retention:   {:.3}", score.retention_score);
    println!("  Tier:        {} ({})", score.tier, score.tier.description());
    println!("  Confidence:  {} ({} events)", score.confidence, score.events_scored);
    println!();

    let s = &report.summaries;
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("AXES");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    println!(
        "  Leakage:    {} high, {} neutral, {} tight ship (avg drift {:.2}%)",
        s.leakage.high_leakage_count,
        s.leakage.neutral_count,
        s.leakage.tight_ship_count,
        s.leakage.average_pre_drift_pct
    );
    println!(
        "  Conviction: {} institutional, {} retail hype, {} low interest, {} mixed",
        s.conviction.institutional_count,
        s.conviction.retail_hype_count,
        s.conviction.low_interest_count,
        s.conviction.mixed_count
    );
    println!(
        "  Retention:  {} positive, {} fade, {} recovery, {} sustained drop, {} neutral",
        s.retention.positive_count,
        s.retention.fade_count,
        s.retention.over_reaction_count,
        s.retention.sustained_drop_count,
        s.retention.neutral_count
    );
    println!();

    if !report.patterns.concerns.is_empty() || !report.patterns.quality.is_empty() {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("PATTERNS");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        for concern in &report.patterns.concerns {
            println!("  ✗ {concern}");
        }
        for quality in &report.patterns.quality {
            println!("  ✓ {quality}");
        }
        println!();
    }

    if !report.high_impact.is_empty() {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("HIGH IMPACT");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        println!(
            "{:<12} {:>8} {:>8} {:>8}  {}",
            "Date", "Move", "Volume", "Held", "Headline"
        );
        println!("{}", "─".repeat(62));
        for event in &report.high_impact {
            println!(
                "{:<12} {:>7.2}% {:>7.2}x {:>8.2}  {}",
                event.date.to_string(),
                event.day_of_change_pct,
                event.volume_ratio,
                event.retention_ratio,
                event.headline
            );
            if let Some(news) = &event.news {
                println!("{:<40}  {}: {}", "", news.source, news.title);
            }
        }
        println!();
    }

    if !report.financial_results.is_empty() {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("FINANCIAL RESULTS");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        println!(
            "{:<12} {:<4} {:<10} {:>8}  {:<10} {:>8}",
            "Date", "Type", "Period", "Move", "Review", "YoY pp"
        );
        println!("{}", "─".repeat(62));
        for result in &report.financial_results {
            let yoy = result
                .yoy_reaction_diff_pp
                .map_or_else(|| "-".to_string(), |pp| format!("{pp:+.2}"));
            println!(
                "{:<12} {:<4} {:<10} {:>7.2}%  {:<10} {:>8}",
                result.date.to_string(),
                result.result_type.code(),
                result.period,
                result.day_of_change_pct,
                format!("{:?}", result.market_review),
                yoy
            );
        }
        println!();
    }

    let quality = &report.data_quality;
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("DATA QUALITY");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    println!(
        "  Announcements: {} supplied, {} in period, {} classified, {} dropped",
        quality.events_supplied,
        quality.events_in_period,
        quality.events_classified,
        quality.events_dropped
    );
    println!("  Trading days:  {}", quality.trading_days);
    for gap in &quality.gaps {
        println!("  ⚠ {gap}");
    }
    println!();
}
