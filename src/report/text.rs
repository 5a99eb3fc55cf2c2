use crate::customizer::WeightEditor;
use crate::model::weights::Category;
use crate::pipeline::stage3_rank::RankedFund;
use crate::report::{FundBreakdown, ReportContext, ScoreSummary, format_opt};

const NAME_WIDTH: usize = 44;
const AMC_WIDTH: usize = 22;

pub fn render_rankings_text(
    ctx: &ReportContext,
    summary: &ScoreSummary,
    view: &[RankedFund<'_>],
) -> String {
    let mut out = String::new();

    let title = match &ctx.category {
        Some(name) => format!("{name} Fund Rankings"),
        None => "Fund Rankings".to_string(),
    };
    out.push_str(&format!("{title}\n"));
    out.push_str(&format!("{}\n\n", "=".repeat(title.chars().count())));

    out.push_str(&format!("Preset: {}\n", ctx.preset));
    out.push_str(&format!("Weights: {}\n", weights_line(ctx)));
    if !ctx.weights_valid {
        out.push_str(&format!(
            "WARNING: weights sum to {}, not 100; scores are on a shifted scale\n",
            ctx.total_weight
        ));
    }
    if !ctx.search.trim().is_empty() {
        out.push_str(&format!("Search: {}\n", ctx.search));
    }
    out.push_str(&format!("AMC: {}\n", ctx.amc));
    out.push_str(&format!(
        "Sort: {} {}\n",
        ctx.sort_field, ctx.sort_direction
    ));
    out.push_str(&format!(
        "{} of {} funds ranked ({} with a complete score)\n",
        summary.n_shown, ctx.n_funds_total, summary.n_scored
    ));
    out.push_str(&format!(
        "Overall score p10/median/p90: {} / {} / {}\n\n",
        format_opt(summary.p10, 1),
        format_opt(summary.median, 1),
        format_opt(summary.p90, 1)
    ));

    if view.is_empty() {
        out.push_str("No funds match the current filters.\n");
        return out;
    }

    out.push_str(&format!(
        "{:>4}  {:<NAME_WIDTH$}  {:<AMC_WIDTH$}  {:>6}  {:>8}  {:>7}  {:>7}  {:>10}\n",
        "Rank", "Fund", "AMC", "Score", "3Y CAGR", "Sharpe", "Vol", "AUM (cr)"
    ));
    for fund in view {
        let av = &fund.row.actual_values;
        out.push_str(&format!(
            "{:>4}  {:<NAME_WIDTH$}  {:<AMC_WIDTH$}  {:>6}  {:>8}  {:>7}  {:>7}  {:>10}\n",
            fund.score_rank,
            truncate(&fund.row.scheme_name, NAME_WIDTH),
            truncate(&fund.row.amc, AMC_WIDTH),
            format_opt(fund.overall_score, 1),
            percent(av.returns.cagr_3y),
            format_opt(av.risk_adjusted.sharpe, 2),
            percent(av.risk.volatility),
            format_opt(av.portfolio_quality.aum, 0),
        ));
    }
    out
}

pub fn render_breakdowns_text(preset: &str, breakdowns: &[FundBreakdown]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Category scores ({preset} weights)\n\n"));
    out.push_str(&format!("{:<NAME_WIDTH$}", "Fund"));
    for c in Category::ALL {
        out.push_str(&format!("  {:>11}", short_label(c)));
    }
    out.push_str(&format!("  {:>7}\n", "Overall"));

    for b in breakdowns {
        out.push_str(&format!("{:<NAME_WIDTH$}", truncate(&b.scheme_name, NAME_WIDTH)));
        for c in Category::ALL {
            out.push_str(&format!("  {:>11}", format_opt(b.main_scores.get(c), 1)));
        }
        out.push_str(&format!("  {:>7}\n", format_opt(b.overall_score, 1)));
    }
    out
}

pub fn render_weight_steps_text(steps: &[(String, WeightEditor)]) -> String {
    let mut out = String::new();
    for (label, editor) in steps {
        let w = editor.weights();
        let locked: Vec<&str> = editor.locked().iter().map(|c| c.key()).collect();
        out.push_str(&format!(
            "{label:<28} C={:>5} P={:>5} R={:>5} V={:>5} Q={:>5}  total={}{}  preset={}  locked=[{}]\n",
            w.consistency,
            w.recent_performance,
            w.risk,
            w.valuation,
            w.portfolio_quality,
            editor.total_weight(),
            if editor.is_valid() { "" } else { " (!)" },
            editor.active().key(),
            locked.join(",")
        ));
    }
    out
}

fn weights_line(ctx: &ReportContext) -> String {
    Category::ALL
        .iter()
        .map(|&c| format!("{}={}", c.label(), ctx.weights.get(c)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn short_label(c: Category) -> &'static str {
    match c {
        Category::Consistency => "Consistency",
        Category::RecentPerformance => "Recent",
        Category::Risk => "Risk",
        Category::Valuation => "Valuation",
        Category::PortfolioQuality => "Portfolio",
    }
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "—".to_string(),
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
