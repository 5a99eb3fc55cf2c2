use crate::model::subscores::{NormalizedSubScores, present};
use crate::model::subweights::{
    ConsistencyWeights, DEFAULT_SUB_WEIGHTS, PortfolioQualityWeights, RecentPerformanceWeights,
    RiskWeights, SubWeightTable, ValuationWeights,
};
use crate::model::weights::{MainScores, WeightPreset};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEntry {
    pub value: Option<f64>,
    pub weight: f64,
}

impl WeightedEntry {
    pub fn new(value: Option<f64>, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// All-or-nothing weighted mean: one absent or NaN value voids the result.
///
/// The denominator is the sum of the declared weights, so a table whose
/// weights do not add up to 100 still yields a proper mean. A zero total
/// has no mean and yields `None`.
pub fn weighted_average(entries: &[WeightedEntry]) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for entry in entries {
        let value = present(entry.value)?;
        weighted_sum += value * entry.weight;
        total_weight += entry.weight;
    }
    if total_weight == 0.0 {
        return None;
    }
    Some(weighted_sum / total_weight)
}

/// Scale-by-10, round half away from zero, divide.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Category and overall scoring against an injected sub-weight table.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    table: SubWeightTable,
}

impl Aggregator {
    pub fn new(table: SubWeightTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SubWeightTable {
        &self.table
    }

    pub fn main_scores(&self, ns: &NormalizedSubScores) -> MainScores {
        main_scores_with(&self.table, ns)
    }

    pub fn overall_score(&self, ns: &NormalizedSubScores, weights: &WeightPreset) -> Option<f64> {
        overall_from_main(&self.main_scores(ns), weights)
    }
}

pub fn calculate_main_scores(ns: &NormalizedSubScores) -> MainScores {
    main_scores_with(&DEFAULT_SUB_WEIGHTS, ns)
}

pub fn calculate_overall_score(ns: &NormalizedSubScores, weights: &WeightPreset) -> Option<f64> {
    overall_from_main(&calculate_main_scores(ns), weights)
}

/// Second strict gate: every category must be scored, otherwise the fund gets no overall score.
pub fn overall_from_main(main: &MainScores, weights: &WeightPreset) -> Option<f64> {
    let c = main.consistency?;
    let p = main.recent_performance?;
    let r = main.risk?;
    let v = main.valuation?;
    let q = main.portfolio_quality?;

    let overall = (c * weights.consistency
        + p * weights.recent_performance
        + r * weights.risk
        + v * weights.valuation
        + q * weights.portfolio_quality)
        / 100.0;

    Some(round1(overall))
}

fn main_scores_with(table: &SubWeightTable, ns: &NormalizedSubScores) -> MainScores {
    MainScores {
        consistency: consistency_score(&table.consistency, ns),
        recent_performance: recent_performance_score(&table.recent_performance, ns),
        risk: risk_score(&table.risk, ns),
        valuation: valuation_score(&table.valuation, ns),
        portfolio_quality: portfolio_quality_score(&table.portfolio_quality, ns),
    }
}

// Each scorer destructures its weight struct so a new sub-metric cannot be silently skipped.

fn consistency_score(w: &ConsistencyWeights, ns: &NormalizedSubScores) -> Option<f64> {
    let ConsistencyWeights {
        alpha_3y,
        alpha_5y,
        confidence,
        alpha_iqr_3y,
        alpha_iqr_5y,
    } = *w;
    let s = &ns.consistency;
    weighted_average(&[
        WeightedEntry::new(s.alpha_3y, alpha_3y),
        WeightedEntry::new(s.alpha_5y, alpha_5y),
        WeightedEntry::new(s.confidence, confidence),
        WeightedEntry::new(s.alpha_iqr_3y, alpha_iqr_3y),
        WeightedEntry::new(s.alpha_iqr_5y, alpha_iqr_5y),
    ])
}

fn recent_performance_score(w: &RecentPerformanceWeights, ns: &NormalizedSubScores) -> Option<f64> {
    let RecentPerformanceWeights {
        cagr_3y,
        cagr_5y,
        cagr_1y,
        return_6m,
        return_3m,
    } = *w;
    let s = &ns.returns;
    weighted_average(&[
        WeightedEntry::new(s.cagr_3y, cagr_3y),
        WeightedEntry::new(s.cagr_5y, cagr_5y),
        WeightedEntry::new(s.cagr_1y, cagr_1y),
        WeightedEntry::new(s.return_6m, return_6m),
        WeightedEntry::new(s.return_3m, return_3m),
    ])
}

fn risk_score(w: &RiskWeights, ns: &NormalizedSubScores) -> Option<f64> {
    let RiskWeights {
        volatility,
        max_dd,
        sharpe,
        sortino,
        ir,
        up_beta,
        down_beta,
    } = *w;
    let risk = &ns.risk;
    let adj = &ns.risk_adjusted;
    weighted_average(&[
        WeightedEntry::new(risk.volatility, volatility),
        WeightedEntry::new(risk.max_dd, max_dd),
        WeightedEntry::new(adj.sharpe, sharpe),
        WeightedEntry::new(adj.sortino, sortino),
        WeightedEntry::new(adj.ir, ir),
        WeightedEntry::new(risk.up_beta, up_beta),
        WeightedEntry::new(risk.down_beta, down_beta),
    ])
}

fn valuation_score(w: &ValuationWeights, ns: &NormalizedSubScores) -> Option<f64> {
    let ValuationWeights { roe, pe, pb } = *w;
    let s = &ns.valuation;
    weighted_average(&[
        WeightedEntry::new(s.roe, roe),
        WeightedEntry::new(s.pe, pe),
        WeightedEntry::new(s.pb, pb),
    ])
}

fn portfolio_quality_score(w: &PortfolioQualityWeights, ns: &NormalizedSubScores) -> Option<f64> {
    let PortfolioQualityWeights {
        manager_experience,
        turnover,
        aum,
        sector_hhi,
        ter,
        stock_count,
        top10,
        top3_sector,
    } = *w;
    let s = &ns.portfolio_quality;
    weighted_average(&[
        WeightedEntry::new(s.manager_experience, manager_experience),
        WeightedEntry::new(s.turnover, turnover),
        WeightedEntry::new(s.aum, aum),
        WeightedEntry::new(s.sector_hhi, sector_hhi),
        WeightedEntry::new(s.ter, ter),
        WeightedEntry::new(s.stock_count, stock_count),
        WeightedEntry::new(s.top10, top10),
        WeightedEntry::new(s.top3_sector, top3_sector),
    ])
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_aggregate.rs"]
mod tests;
