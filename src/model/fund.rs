use serde::{Deserialize, Serialize};

use crate::model::subscores::NormalizedSubScores;

/// One fund as handed over by the rankings producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRankingRow {
    pub scheme_code: String,
    #[serde(default)]
    pub fund_key: String,
    #[serde(default = "unknown_fund")]
    pub scheme_name: String,
    #[serde(default = "unknown_amc")]
    pub amc: String,
    #[serde(default)]
    pub normalized_scores: NormalizedSubScores,
    #[serde(default)]
    pub actual_values: ActualValues,
    #[serde(default)]
    pub meta: FundMeta,
}

fn unknown_fund() -> String {
    "Unknown Fund".to_string()
}

fn unknown_amc() -> String {
    "Unknown AMC".to_string()
}

/// Human-facing raw metrics. Not aligned with the sub-score keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualValues {
    pub returns: ActualReturns,
    pub consistency: ActualConsistency,
    pub risk: ActualRisk,
    pub risk_adjusted: ActualRiskAdjusted,
    pub portfolio_quality: ActualPortfolioQuality,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualReturns {
    pub return_3m: Option<f64>,
    pub return_6m: Option<f64>,
    pub cagr_1y: Option<f64>,
    pub cagr_3y: Option<f64>,
    pub cagr_5y: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualConsistency {
    pub rolling_3y: Option<f64>,
    pub rolling_5y: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualRisk {
    pub volatility: Option<f64>,
    pub up_beta: Option<f64>,
    pub down_beta: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualRiskAdjusted {
    pub sharpe: Option<f64>,
    pub sortino: Option<f64>,
    pub ir: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualPortfolioQuality {
    pub aum: Option<f64>,
    pub ter: Option<f64>,
    pub turnover: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundMeta {
    pub universe_size: Option<u32>,
    pub normalized_at: Option<String>,
}
