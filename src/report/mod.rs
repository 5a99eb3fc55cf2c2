pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::weights::{MainScores, WeightPreset};
use crate::pipeline::stage3_rank::RankedFund;

/// Run-level facts printed above a ranking.
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub tool_name: String,
    pub tool_version: String,
    pub category: Option<String>,
    pub preset: String,
    pub weights: WeightPreset,
    pub total_weight: f64,
    pub weights_valid: bool,
    pub search: String,
    pub amc: String,
    pub sort_field: String,
    pub sort_direction: String,
    pub n_funds_total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreSummary {
    pub n_shown: usize,
    pub n_scored: usize,
    pub median: Option<f64>,
    pub p10: Option<f64>,
    pub p90: Option<f64>,
}

/// Per-fund category breakdown under one weight vector.
#[derive(Debug, Clone, Serialize)]
pub struct FundBreakdown {
    pub scheme_code: String,
    pub scheme_name: String,
    pub amc: String,
    pub main_scores: MainScores,
    pub overall_score: Option<f64>,
}

pub fn summarize(view: &[RankedFund<'_>]) -> ScoreSummary {
    let scores: Vec<f64> = view.iter().filter_map(|f| f.overall_score).collect();
    ScoreSummary {
        n_shown: view.len(),
        n_scored: scores.len(),
        median: median(&scores),
        p10: p10(&scores),
        p90: p90(&scores),
    }
}

pub fn quantile_indexed(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    let idx = ((n - 1) as f64 * p).ceil() as usize;
    Some(sorted[idx])
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile_indexed(values, 0.5)
}

pub fn p10(values: &[f64]) -> Option<f64> {
    quantile_indexed(values, 0.10)
}

pub fn p90(values: &[f64]) -> Option<f64> {
    quantile_indexed(values, 0.90)
}

pub fn format_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "—".to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
