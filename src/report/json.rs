use serde::Serialize;

use crate::customizer::WeightEditor;
use crate::pipeline::stage3_rank::RankedFund;
use crate::report::{FundBreakdown, ReportContext, ScoreSummary};

#[derive(Serialize)]
struct RankingReport<'a, 'r> {
    #[serde(flatten)]
    context: &'a ReportContext,
    summary: &'a ScoreSummary,
    funds: &'a [RankedFund<'r>],
}

#[derive(Serialize)]
struct WeightStep<'a> {
    step: &'a str,
    #[serde(flatten)]
    editor: &'a WeightEditor,
    total_weight: f64,
    valid: bool,
}

pub fn render_rankings_json(
    ctx: &ReportContext,
    summary: &ScoreSummary,
    view: &[RankedFund<'_>],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&RankingReport {
        context: ctx,
        summary,
        funds: view,
    })
}

pub fn render_breakdowns_json(breakdowns: &[FundBreakdown]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(breakdowns)
}

pub fn render_weight_steps_json(steps: &[(String, WeightEditor)]) -> serde_json::Result<String> {
    let rows: Vec<WeightStep<'_>> = steps
        .iter()
        .map(|(label, editor)| WeightStep {
            step: label,
            editor,
            total_weight: editor.total_weight(),
            valid: editor.is_valid(),
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}
