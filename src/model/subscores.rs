use serde::{Deserialize, Serialize};

/// Percentile-normalized sub-scores for one fund, each in [0, 100] or absent.
///
/// Produced upstream against the fund's category peers; the scoring engine
/// treats them as read-only input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizedSubScores {
    pub returns: ReturnsScores,
    pub consistency: ConsistencyScores,
    pub risk: RiskScores,
    pub risk_adjusted: RiskAdjustedScores,
    pub valuation: ValuationScores,
    pub portfolio_quality: PortfolioQualityScores,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnsScores {
    pub cagr_1y: Option<f64>,
    pub cagr_3y: Option<f64>,
    pub cagr_5y: Option<f64>,
    pub return_3m: Option<f64>,
    pub return_6m: Option<f64>,
}

/// Older snapshots carry the rolling-return names; they map onto the alpha fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsistencyScores {
    #[serde(alias = "rolling_3y")]
    pub alpha_3y: Option<f64>,
    #[serde(alias = "rolling_5y")]
    pub alpha_5y: Option<f64>,
    pub confidence: Option<f64>,
    #[serde(alias = "iqr_3y")]
    pub alpha_iqr_3y: Option<f64>,
    #[serde(alias = "iqr_5y")]
    pub alpha_iqr_5y: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskScores {
    pub volatility: Option<f64>,
    pub max_dd: Option<f64>,
    pub up_beta: Option<f64>,
    pub down_beta: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAdjustedScores {
    pub sharpe: Option<f64>,
    pub sortino: Option<f64>,
    pub ir: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationScores {
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub roe: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioQualityScores {
    pub stock_count: Option<f64>,
    pub aum: Option<f64>,
    pub top10: Option<f64>,
    pub sector_hhi: Option<f64>,
    pub top3_sector: Option<f64>,
    pub turnover: Option<f64>,
    pub ter: Option<f64>,
    pub manager_experience: Option<f64>,
}

/// Absent and NaN are the same thing to the scorer.
pub fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}
