use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The five top-level scoring categories, in slider order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Consistency,
    RecentPerformance,
    Risk,
    Valuation,
    PortfolioQuality,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Consistency,
        Category::RecentPerformance,
        Category::Risk,
        Category::Valuation,
        Category::PortfolioQuality,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Consistency => "consistency",
            Category::RecentPerformance => "recent_performance",
            Category::Risk => "risk",
            Category::Valuation => "valuation",
            Category::PortfolioQuality => "portfolio_quality",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Consistency => "Consistency",
            Category::RecentPerformance => "Recent Performance",
            Category::Risk => "Risk",
            Category::Valuation => "Valuation",
            Category::PortfolioQuality => "Portfolio Quality",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == s.trim())
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Top-level weights. A valid preset sums to 100, but nothing here enforces it:
/// the aggregator divides by 100 regardless, so an off-total vector shifts scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPreset {
    pub consistency: f64,
    pub recent_performance: f64,
    pub risk: f64,
    pub valuation: f64,
    pub portfolio_quality: f64,
}

impl WeightPreset {
    pub const BALANCED: WeightPreset = WeightPreset {
        consistency: 25.0,
        recent_performance: 20.0,
        risk: 20.0,
        valuation: 15.0,
        portfolio_quality: 20.0,
    };

    pub const AGGRESSIVE: WeightPreset = WeightPreset {
        consistency: 15.0,
        recent_performance: 35.0,
        risk: 10.0,
        valuation: 15.0,
        portfolio_quality: 25.0,
    };

    pub const CONSERVATIVE: WeightPreset = WeightPreset {
        consistency: 35.0,
        recent_performance: 10.0,
        risk: 25.0,
        valuation: 20.0,
        portfolio_quality: 10.0,
    };

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Consistency => self.consistency,
            Category::RecentPerformance => self.recent_performance,
            Category::Risk => self.risk,
            Category::Valuation => self.valuation,
            Category::PortfolioQuality => self.portfolio_quality,
        }
    }

    pub fn set(&mut self, category: Category, value: f64) {
        let slot = match category {
            Category::Consistency => &mut self.consistency,
            Category::RecentPerformance => &mut self.recent_performance,
            Category::Risk => &mut self.risk,
            Category::Valuation => &mut self.valuation,
            Category::PortfolioQuality => &mut self.portfolio_quality,
        };
        *slot = value;
    }

    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|&c| self.get(c)).sum()
    }

    pub fn is_valid(&self) -> bool {
        self.total() == 100.0
    }
}

impl Default for WeightPreset {
    fn default() -> Self {
        Self::BALANCED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PresetName {
    Balanced,
    Aggressive,
    Conservative,
}

impl PresetName {
    pub const ALL: [PresetName; 3] = [
        PresetName::Balanced,
        PresetName::Aggressive,
        PresetName::Conservative,
    ];

    pub fn weights(self) -> WeightPreset {
        match self {
            PresetName::Balanced => WeightPreset::BALANCED,
            PresetName::Aggressive => WeightPreset::AGGRESSIVE,
            PresetName::Conservative => WeightPreset::CONSERVATIVE,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            PresetName::Balanced => "balanced",
            PresetName::Aggressive => "aggressive",
            PresetName::Conservative => "conservative",
        }
    }
}

/// Which preset button is lit. `Custom` is a state, not a stored preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivePreset {
    Preset(PresetName),
    Custom,
}

impl ActivePreset {
    pub fn key(self) -> &'static str {
        match self {
            ActivePreset::Preset(p) => p.key(),
            ActivePreset::Custom => "custom",
        }
    }
}

/// Category scores for one fund; `None` when any sub-metric of that category is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MainScores {
    pub consistency: Option<f64>,
    pub recent_performance: Option<f64>,
    pub risk: Option<f64>,
    pub valuation: Option<f64>,
    pub portfolio_quality: Option<f64>,
}

impl MainScores {
    pub fn get(&self, category: Category) -> Option<f64> {
        match category {
            Category::Consistency => self.consistency,
            Category::RecentPerformance => self.recent_performance,
            Category::Risk => self.risk,
            Category::Valuation => self.valuation,
            Category::PortfolioQuality => self.portfolio_quality,
        }
    }

    pub fn is_complete(&self) -> bool {
        Category::ALL.iter().all(|&c| self.get(c).is_some())
    }
}
