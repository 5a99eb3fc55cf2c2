mod config;
mod customizer;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::config::{ConfigError, load_sub_weights, parse_slide, resolve_weights};
use crate::customizer::WeightEditor;
use crate::customizer::session::{SessionError, load_script, replay};
use crate::input::{InputError, load_snapshot};
use crate::model::category::{FundCategory, builtin_categories};
use crate::model::weights::{ActivePreset, PresetName, WeightPreset};
use crate::pipeline::stage2_aggregate::Aggregator;
use crate::pipeline::stage3_rank::{
    AmcFilter, RankQuery, SortDirection, SortField, SortState, order_snapshot, rank_funds,
    unique_amcs,
};
use crate::pipeline::stage4_report::{
    ReportError, ReportFormat, write_breakdowns, write_rankings, write_weight_steps,
};
use crate::report::{FundBreakdown, ReportContext};

const TOOL_NAME: &str = "fundscore";

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("no fund matches '{0}'")]
    NoSuchFund(String),
}

#[derive(Debug, Parser)]
#[command(name = "fundscore", version, about = "Rank mutual funds within a category by weighted scores")]
struct Cli {
    /// Debug-level logging unless RUST_LOG is set.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score, filter and sort a category snapshot.
    Rank(RankArgs),
    /// Per-category score breakdown for every fund.
    Scores(ScoresArgs),
    /// Walk the weight sliders through a sequence of edits.
    Weights(WeightsArgs),
    /// Replay a timed event script against a snapshot.
    Session(SessionArgs),
    /// List the known fund categories.
    Categories,
}

#[derive(Debug, Args)]
struct WeightArgs {
    #[arg(long, value_enum, default_value_t = PresetName::Balanced)]
    preset: PresetName,
    /// Explicit top-level weights in slider order: consistency,recent,risk,valuation,quality.
    #[arg(long)]
    weights: Option<String>,
    /// JSON sub-weight table replacing the built-in one.
    #[arg(long)]
    sub_weights: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct RankArgs {
    #[arg(long)]
    input: PathBuf,
    /// Category slug; overrides the one recorded in the snapshot.
    #[arg(long)]
    category: Option<String>,
    #[command(flatten)]
    weights: WeightArgs,
    #[arg(long, default_value = "")]
    search: String,
    /// AMC name to keep, or "all".
    #[arg(long)]
    amc: Option<String>,
    #[arg(long, value_enum, default_value_t = SortField::OverallScore)]
    sort: SortField,
    #[arg(long, value_enum, default_value_t = SortDirection::Desc)]
    direction: SortDirection,
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ScoresArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    category: Option<String>,
    /// Scheme code, or a case-insensitive fragment of the fund name.
    #[arg(long)]
    fund: Option<String>,
    #[command(flatten)]
    weights: WeightArgs,
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct WeightsArgs {
    #[arg(long, value_enum, default_value_t = PresetName::Balanced)]
    preset: PresetName,
    /// Start from explicit weights instead of a preset.
    #[arg(long)]
    weights: Option<String>,
    /// Slider edit as <category>=<value>; repeatable, applied in order.
    #[arg(long = "slide")]
    slides: Vec<String>,
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SessionArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    category: Option<String>,
    /// JSON array of events, each with an `at_ms` timestamp.
    #[arg(long)]
    script: PathBuf,
    #[arg(long)]
    sub_weights: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    if let Err(err) = run(cli.command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Rank(args) => run_rank(&args),
        Command::Scores(args) => run_scores(&args),
        Command::Weights(args) => run_weights(&args),
        Command::Session(args) => run_session(&args),
        Command::Categories => {
            for c in builtin_categories() {
                println!("{}\t{}", c.slug, c.display_name);
            }
            Ok(())
        }
    }
}

fn run_rank(args: &RankArgs) -> Result<(), CliError> {
    let snapshot = load_snapshot(&args.input, args.category.as_deref())?;
    let aggregator = build_aggregator(args.weights.sub_weights.as_deref())?;
    let (weights, active) = resolve_weights(args.weights.preset, args.weights.weights.as_deref())?;

    let query = RankQuery {
        search: args.search.clone(),
        amc: AmcFilter::from_arg(args.amc.as_deref()),
        sort: SortState::new(args.sort, args.direction),
    };
    if let AmcFilter::Only(amc) = &query.amc
        && !unique_amcs(&snapshot.rows).contains(amc)
    {
        tracing::warn!(amc = %amc, "AMC does not appear in the snapshot");
    }

    let view = rank_funds(&snapshot.rows, &weights, &aggregator, &query);
    let ctx = build_context(snapshot.category, snapshot.rows.len(), active, &weights, &query);
    write_rankings(&ctx, &view, args.format, args.out.as_deref())?;
    Ok(())
}

fn run_scores(args: &ScoresArgs) -> Result<(), CliError> {
    let snapshot = load_snapshot(&args.input, args.category.as_deref())?;
    let aggregator = build_aggregator(args.weights.sub_weights.as_deref())?;
    let (weights, active) = resolve_weights(args.weights.preset, args.weights.weights.as_deref())?;

    let breakdowns: Vec<FundBreakdown> = order_snapshot(&snapshot.rows, &weights, &aggregator)
        .into_iter()
        .filter(|f| match &args.fund {
            Some(needle) => fund_matches(&f.row.scheme_code, &f.row.scheme_name, needle),
            None => true,
        })
        .map(|f| FundBreakdown {
            scheme_code: f.row.scheme_code.clone(),
            scheme_name: f.row.scheme_name.clone(),
            amc: f.row.amc.clone(),
            main_scores: aggregator.main_scores(&f.row.normalized_scores),
            overall_score: f.overall_score,
        })
        .collect();

    if let Some(needle) = &args.fund
        && breakdowns.is_empty()
    {
        return Err(CliError::NoSuchFund(needle.clone()));
    }
    write_breakdowns(active.key(), &breakdowns, args.format, args.out.as_deref())?;
    Ok(())
}

fn run_weights(args: &WeightsArgs) -> Result<(), CliError> {
    let mut editor = match &args.weights {
        Some(raw) => {
            let (weights, _) = resolve_weights(args.preset, Some(raw))?;
            WeightEditor::custom(weights)
        }
        None => WeightEditor::from_preset(args.preset),
    };

    let mut steps = vec![(format!("start ({})", editor.active().key()), editor.clone())];
    for raw in &args.slides {
        let (category, value) = parse_slide(raw)?;
        editor = editor.slide(category, value);
        steps.push((format!("{category}={value}"), editor.clone()));
    }
    write_weight_steps(&steps, args.format, args.out.as_deref())?;
    Ok(())
}

fn run_session(args: &SessionArgs) -> Result<(), CliError> {
    let snapshot = load_snapshot(&args.input, args.category.as_deref())?;
    let aggregator = build_aggregator(args.sub_weights.as_deref())?;
    let events = load_script(&args.script)?;

    let category = snapshot.category;
    let session = replay(snapshot.rows, aggregator, &events)?;
    let view = session.view();

    let ctx = build_context(
        category,
        session.rows().len(),
        session.editor().active(),
        session.editor().weights(),
        session.query(),
    );
    write_rankings(&ctx, &view, args.format, args.out.as_deref())?;
    Ok(())
}

fn build_aggregator(sub_weights: Option<&Path>) -> Result<Aggregator, CliError> {
    match sub_weights {
        Some(path) => Ok(Aggregator::new(load_sub_weights(path)?)),
        None => Ok(Aggregator::default()),
    }
}

fn build_context(
    category: Option<&FundCategory>,
    n_funds_total: usize,
    active: ActivePreset,
    weights: &WeightPreset,
    query: &RankQuery,
) -> ReportContext {
    ReportContext {
        tool_name: TOOL_NAME.to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        category: category.map(|c| c.display_name.to_string()),
        preset: active.key().to_string(),
        weights: *weights,
        total_weight: weights.total(),
        weights_valid: weights.is_valid(),
        search: query.search.clone(),
        amc: match &query.amc {
            AmcFilter::All => "all".to_string(),
            AmcFilter::Only(amc) => amc.clone(),
        },
        sort_field: query.sort.field.key().to_string(),
        sort_direction: match query.sort.direction {
            SortDirection::Asc => "asc".to_string(),
            SortDirection::Desc => "desc".to_string(),
        },
        n_funds_total,
    }
}

fn fund_matches(scheme_code: &str, scheme_name: &str, needle: &str) -> bool {
    scheme_code == needle
        || scheme_name
            .to_lowercase()
            .contains(&needle.trim().to_lowercase())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
