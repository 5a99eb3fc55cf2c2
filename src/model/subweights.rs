use serde::{Deserialize, Serialize};

/// Fixed intra-category sub-weights. Not user-configurable at runtime, but an
/// alternate table can be injected for experiments and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubWeightTable {
    pub consistency: ConsistencyWeights,
    pub recent_performance: RecentPerformanceWeights,
    pub risk: RiskWeights,
    pub valuation: ValuationWeights,
    pub portfolio_quality: PortfolioQualityWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsistencyWeights {
    pub alpha_3y: f64,
    pub alpha_5y: f64,
    pub confidence: f64,
    pub alpha_iqr_3y: f64,
    pub alpha_iqr_5y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecentPerformanceWeights {
    pub cagr_3y: f64,
    pub cagr_5y: f64,
    pub cagr_1y: f64,
    pub return_6m: f64,
    pub return_3m: f64,
}

/// Draws from both the `risk` and `risk_adjusted` sub-score groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskWeights {
    pub volatility: f64,
    pub max_dd: f64,
    pub sharpe: f64,
    pub sortino: f64,
    pub ir: f64,
    pub up_beta: f64,
    pub down_beta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValuationWeights {
    pub roe: f64,
    pub pe: f64,
    pub pb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioQualityWeights {
    pub manager_experience: f64,
    pub turnover: f64,
    pub aum: f64,
    pub sector_hhi: f64,
    pub ter: f64,
    pub stock_count: f64,
    pub top10: f64,
    pub top3_sector: f64,
}

pub const DEFAULT_SUB_WEIGHTS: SubWeightTable = SubWeightTable::default_v1();

impl SubWeightTable {
    pub const fn default_v1() -> Self {
        Self {
            consistency: ConsistencyWeights {
                alpha_3y: 25.0,
                alpha_5y: 25.0,
                confidence: 30.0,
                alpha_iqr_3y: 10.0,
                alpha_iqr_5y: 10.0,
            },
            recent_performance: RecentPerformanceWeights {
                cagr_3y: 30.0,
                cagr_5y: 25.0,
                cagr_1y: 20.0,
                return_6m: 15.0,
                return_3m: 10.0,
            },
            risk: RiskWeights {
                volatility: 20.0,
                max_dd: 15.0,
                sharpe: 15.0,
                sortino: 15.0,
                ir: 15.0,
                up_beta: 10.0,
                down_beta: 10.0,
            },
            valuation: ValuationWeights {
                roe: 50.0,
                pe: 40.0,
                pb: 10.0,
            },
            portfolio_quality: PortfolioQualityWeights {
                manager_experience: 20.0,
                turnover: 20.0,
                aum: 10.0,
                sector_hhi: 10.0,
                ter: 10.0,
                stock_count: 10.0,
                top10: 10.0,
                top3_sector: 10.0,
            },
        }
    }

    /// Declared weight total per category, in category order.
    pub fn totals(&self) -> [(&'static str, f64); 5] {
        let c = self.consistency;
        let p = self.recent_performance;
        let r = self.risk;
        let v = self.valuation;
        let q = self.portfolio_quality;
        [
            (
                "consistency",
                c.alpha_3y + c.alpha_5y + c.confidence + c.alpha_iqr_3y + c.alpha_iqr_5y,
            ),
            (
                "recent_performance",
                p.cagr_3y + p.cagr_5y + p.cagr_1y + p.return_6m + p.return_3m,
            ),
            (
                "risk",
                r.volatility + r.max_dd + r.sharpe + r.sortino + r.ir + r.up_beta + r.down_beta,
            ),
            ("valuation", v.roe + v.pe + v.pb),
            (
                "portfolio_quality",
                q.manager_experience
                    + q.turnover
                    + q.aum
                    + q.sector_hhi
                    + q.ter
                    + q.stock_count
                    + q.top10
                    + q.top3_sector,
            ),
        ]
    }

    pub fn all_weights(&self) -> Vec<f64> {
        let c = self.consistency;
        let p = self.recent_performance;
        let r = self.risk;
        let v = self.valuation;
        let q = self.portfolio_quality;
        vec![
            c.alpha_3y,
            c.alpha_5y,
            c.confidence,
            c.alpha_iqr_3y,
            c.alpha_iqr_5y,
            p.cagr_3y,
            p.cagr_5y,
            p.cagr_1y,
            p.return_6m,
            p.return_3m,
            r.volatility,
            r.max_dd,
            r.sharpe,
            r.sortino,
            r.ir,
            r.up_beta,
            r.down_beta,
            v.roe,
            v.pe,
            v.pb,
            q.manager_experience,
            q.turnover,
            q.aum,
            q.sector_hhi,
            q.ter,
            q.stock_count,
            q.top10,
            q.top3_sector,
        ]
    }
}

impl Default for SubWeightTable {
    fn default() -> Self {
        Self::default_v1()
    }
}
