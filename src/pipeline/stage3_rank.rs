use std::cmp::Ordering;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::model::fund::FundRankingRow;
use crate::model::subscores::present;
use crate::model::weights::WeightPreset;
use crate::pipeline::stage2_aggregate::Aggregator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    OverallScore,
    #[serde(rename = "return_3m")]
    #[value(name = "return_3m")]
    Return3m,
    #[serde(rename = "return_6m")]
    #[value(name = "return_6m")]
    Return6m,
    #[serde(rename = "cagr_1y")]
    #[value(name = "cagr_1y")]
    Cagr1y,
    #[serde(rename = "cagr_3y")]
    #[value(name = "cagr_3y")]
    Cagr3y,
    #[serde(rename = "cagr_5y")]
    #[value(name = "cagr_5y")]
    Cagr5y,
    #[serde(rename = "rolling_3y")]
    #[value(name = "rolling_3y")]
    Rolling3y,
    #[serde(rename = "rolling_5y")]
    #[value(name = "rolling_5y")]
    Rolling5y,
    Volatility,
    UpBeta,
    DownBeta,
    Sharpe,
    Sortino,
    Ir,
    Aum,
    Ter,
    Turnover,
}

impl SortField {
    pub fn key(self) -> &'static str {
        match self {
            SortField::OverallScore => "overall_score",
            SortField::Return3m => "return_3m",
            SortField::Return6m => "return_6m",
            SortField::Cagr1y => "cagr_1y",
            SortField::Cagr3y => "cagr_3y",
            SortField::Cagr5y => "cagr_5y",
            SortField::Rolling3y => "rolling_3y",
            SortField::Rolling5y => "rolling_5y",
            SortField::Volatility => "volatility",
            SortField::UpBeta => "up_beta",
            SortField::DownBeta => "down_beta",
            SortField::Sharpe => "sharpe",
            SortField::Sortino => "sortino",
            SortField::Ir => "ir",
            SortField::Aum => "aum",
            SortField::Ter => "ter",
            SortField::Turnover => "turnover",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Clicking the active column flips direction; a new column starts descending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            let direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
            Self { field, direction }
        } else {
            Self {
                field,
                direction: SortDirection::Desc,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmcFilter {
    #[default]
    All,
    Only(String),
}

impl AmcFilter {
    pub fn from_arg(value: Option<&str>) -> Self {
        match value {
            None | Some("all") => AmcFilter::All,
            Some(amc) => AmcFilter::Only(amc.to_string()),
        }
    }

    fn accepts(&self, amc: &str) -> bool {
        match self {
            AmcFilter::All => true,
            AmcFilter::Only(wanted) => wanted == amc,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankQuery {
    pub search: String,
    pub amc: AmcFilter,
    pub sort: SortState,
}

/// A fund with its ephemeral overall score and its rank among the filtered set by score.
#[derive(Debug, Clone, Serialize)]
pub struct RankedFund<'a> {
    #[serde(flatten)]
    pub row: &'a FundRankingRow,
    pub overall_score: Option<f64>,
    #[serde(rename = "scoreRank")]
    pub score_rank: usize,
}

impl RankedFund<'_> {
    pub fn sort_value(&self, field: SortField) -> Option<f64> {
        let av = &self.row.actual_values;
        let raw = match field {
            SortField::OverallScore => self.overall_score,
            SortField::Return3m => av.returns.return_3m,
            SortField::Return6m => av.returns.return_6m,
            SortField::Cagr1y => av.returns.cagr_1y,
            SortField::Cagr3y => av.returns.cagr_3y,
            SortField::Cagr5y => av.returns.cagr_5y,
            SortField::Rolling3y => av.consistency.rolling_3y,
            SortField::Rolling5y => av.consistency.rolling_5y,
            SortField::Volatility => av.risk.volatility,
            SortField::UpBeta => av.risk.up_beta,
            SortField::DownBeta => av.risk.down_beta,
            SortField::Sharpe => av.risk_adjusted.sharpe,
            SortField::Sortino => av.risk_adjusted.sortino,
            SortField::Ir => av.risk_adjusted.ir,
            SortField::Aum => av.portfolio_quality.aum,
            SortField::Ter => av.portfolio_quality.ter,
            SortField::Turnover => av.portfolio_quality.turnover,
        };
        present(raw)
    }

    fn cagr_3y_score(&self) -> f64 {
        present(self.row.normalized_scores.returns.cagr_3y).unwrap_or(f64::NEG_INFINITY)
    }
}

/// Full ranking pass: score, filter, assign score ranks, then order for display.
pub fn rank_funds<'a>(
    rows: &'a [FundRankingRow],
    weights: &WeightPreset,
    aggregator: &Aggregator,
    query: &RankQuery,
) -> Vec<RankedFund<'a>> {
    let scored = score_rows(rows, weights, aggregator);
    let filtered = filter_rows(scored, &query.search, &query.amc);
    let mut ranked = assign_score_ranks(filtered);
    sort_for_display(&mut ranked, query.sort);

    tracing::debug!(
        total = rows.len(),
        shown = ranked.len(),
        sort = query.sort.field.key(),
        "ranking pass complete"
    );
    ranked
}

pub fn score_rows<'a>(
    rows: &'a [FundRankingRow],
    weights: &WeightPreset,
    aggregator: &Aggregator,
) -> Vec<RankedFund<'a>> {
    rows.iter()
        .map(|row| RankedFund {
            row,
            overall_score: aggregator.overall_score(&row.normalized_scores, weights),
            score_rank: 0,
        })
        .collect()
}

/// Case-insensitive substring match on name or AMC, then exact AMC match.
pub fn filter_rows<'a>(
    rows: Vec<RankedFund<'a>>,
    search: &str,
    amc: &AmcFilter,
) -> Vec<RankedFund<'a>> {
    let needle = if search.trim().is_empty() {
        None
    } else {
        Some(search.to_lowercase())
    };
    rows.into_iter()
        .filter(|f| match &needle {
            Some(q) => {
                f.row.scheme_name.to_lowercase().contains(q.as_str())
                    || f.row.amc.to_lowercase().contains(q.as_str())
            }
            None => true,
        })
        .filter(|f| amc.accepts(&f.row.amc))
        .collect()
}

/// Orders by score with missing scores counted as 0 and returns the rows in that order,
/// each carrying its 1-based rank.
pub fn assign_score_ranks(rows: Vec<RankedFund<'_>>) -> Vec<RankedFund<'_>> {
    let mut ranked = rows;
    ranked.sort_by(compare_for_score_rank);
    for (idx, fund) in ranked.iter_mut().enumerate() {
        fund.score_rank = idx + 1;
    }
    ranked
}

/// Stable display sort; missing values sink below every present value in both directions.
pub fn sort_for_display(rows: &mut [RankedFund<'_>], sort: SortState) {
    rows.sort_by(|a, b| {
        compare_nullable(
            a.sort_value(sort.field),
            b.sort_value(sort.field),
            sort.direction,
        )
    });
}

pub fn compare_nullable(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

/// Overall score descending (missing as -inf), then 3Y CAGR sub-score descending (missing as -inf).
pub fn compare_overall_then_cagr(a: &RankedFund<'_>, b: &RankedFund<'_>) -> Ordering {
    let sa = a.overall_score.unwrap_or(f64::NEG_INFINITY);
    let sb = b.overall_score.unwrap_or(f64::NEG_INFINITY);
    sb.partial_cmp(&sa)
        .unwrap_or(Ordering::Equal)
        .then_with(|| compare_cagr_desc(a, b))
}

fn compare_for_score_rank(a: &RankedFund<'_>, b: &RankedFund<'_>) -> Ordering {
    let sa = a.overall_score.unwrap_or(0.0);
    let sb = b.overall_score.unwrap_or(0.0);
    sb.partial_cmp(&sa)
        .unwrap_or(Ordering::Equal)
        .then_with(|| compare_cagr_desc(a, b))
}

fn compare_cagr_desc(a: &RankedFund<'_>, b: &RankedFund<'_>) -> Ordering {
    b.cagr_3y_score()
        .partial_cmp(&a.cagr_3y_score())
        .unwrap_or(Ordering::Equal)
}

/// The producer-side order of a whole category snapshot, before any user filter.
pub fn order_snapshot<'a>(
    rows: &'a [FundRankingRow],
    weights: &WeightPreset,
    aggregator: &Aggregator,
) -> Vec<RankedFund<'a>> {
    let mut scored = score_rows(rows, weights, aggregator);
    scored.sort_by(compare_overall_then_cagr);
    for (idx, fund) in scored.iter_mut().enumerate() {
        fund.score_rank = idx + 1;
    }
    scored
}

pub fn unique_amcs(rows: &[FundRankingRow]) -> Vec<String> {
    let set: std::collections::BTreeSet<&str> = rows.iter().map(|r| r.amc.as_str()).collect();
    set.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_rank.rs"]
mod tests;
