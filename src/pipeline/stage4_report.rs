use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use thiserror::Error;

use crate::customizer::WeightEditor;
use crate::pipeline::stage3_rank::RankedFund;
use crate::report::json::{render_breakdowns_json, render_rankings_json, render_weight_steps_json};
use crate::report::text::{
    render_breakdowns_text, render_rankings_text, render_weight_steps_text,
};
use crate::report::{FundBreakdown, ReportContext, format_opt, summarize};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Tsv,
}

pub fn write_rankings(
    ctx: &ReportContext,
    view: &[RankedFund<'_>],
    format: ReportFormat,
    out: Option<&Path>,
) -> Result<(), ReportError> {
    let summary = summarize(view);
    let body = match format {
        ReportFormat::Text => render_rankings_text(ctx, &summary, view),
        ReportFormat::Json => render_rankings_json(ctx, &summary, view)?,
        ReportFormat::Tsv => rankings_tsv(view),
    };
    emit(&body, out)
}

pub fn write_breakdowns(
    preset: &str,
    breakdowns: &[FundBreakdown],
    format: ReportFormat,
    out: Option<&Path>,
) -> Result<(), ReportError> {
    let body = match format {
        ReportFormat::Text => render_breakdowns_text(preset, breakdowns),
        ReportFormat::Json => render_breakdowns_json(breakdowns)?,
        ReportFormat::Tsv => breakdowns_tsv(breakdowns),
    };
    emit(&body, out)
}

pub fn write_weight_steps(
    steps: &[(String, WeightEditor)],
    format: ReportFormat,
    out: Option<&Path>,
) -> Result<(), ReportError> {
    let body = match format {
        ReportFormat::Json => render_weight_steps_json(steps)?,
        ReportFormat::Text | ReportFormat::Tsv => render_weight_steps_text(steps),
    };
    emit(&body, out)
}

fn rankings_tsv(view: &[RankedFund<'_>]) -> String {
    let mut out = String::new();
    out.push_str(
        "score_rank\tscheme_code\tfund_key\tscheme_name\tamc\toverall_score\tcagr_3y\tsharpe\tvolatility\taum\n",
    );
    for f in view {
        let av = &f.row.actual_values;
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            f.score_rank,
            f.row.scheme_code,
            f.row.fund_key,
            tsv_text(&f.row.scheme_name),
            tsv_text(&f.row.amc),
            tsv_num(f.overall_score, 1),
            tsv_num(av.returns.cagr_3y, 2),
            tsv_num(av.risk_adjusted.sharpe, 3),
            tsv_num(av.risk.volatility, 2),
            tsv_num(av.portfolio_quality.aum, 2),
        ));
    }
    out
}

fn breakdowns_tsv(breakdowns: &[FundBreakdown]) -> String {
    let mut out = String::new();
    out.push_str("scheme_code\tscheme_name\tconsistency\trecent_performance\trisk\tvaluation\tportfolio_quality\toverall_score\n");
    for b in breakdowns {
        let m = &b.main_scores;
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            b.scheme_code,
            tsv_text(&b.scheme_name),
            tsv_num(m.consistency, 4),
            tsv_num(m.recent_performance, 4),
            tsv_num(m.risk, 4),
            tsv_num(m.valuation, 4),
            tsv_num(m.portfolio_quality, 4),
            tsv_num(b.overall_score, 1),
        ));
    }
    out
}

/// Tabs and line breaks inside a field would shift columns.
fn tsv_text(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

fn tsv_num(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(_) => format_opt(value, decimals),
        None => "NA".to_string(),
    }
}

fn emit(body: &str, out: Option<&Path>) -> Result<(), ReportError> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut w = BufWriter::new(File::create(path)?);
            w.write_all(body.as_bytes())?;
            w.flush()?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(body.as_bytes())?;
            if !body.ends_with('\n') {
                lock.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_report.rs"]
mod tests;
