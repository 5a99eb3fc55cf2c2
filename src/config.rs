use std::path::Path;

use thiserror::Error;

use crate::input::{InputError, open_maybe_gz};
use crate::model::subweights::SubWeightTable;
use crate::model::weights::{ActivePreset, Category, PresetName, WeightPreset};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read sub-weight table: {0}")]
    Input(#[from] InputError),
    #[error("invalid sub-weight table {path}: {source}")]
    SubWeights {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("sub-weight table has a negative or non-finite weight")]
    BadSubWeight,
    #[error("invalid --weights '{0}' (expected five comma-separated numbers)")]
    WeightVector(String),
    #[error("invalid --slide '{0}' (expected <category>=<value>)")]
    Slide(String),
}

pub fn load_sub_weights(path: &Path) -> Result<SubWeightTable, ConfigError> {
    let reader = open_maybe_gz(path)?;
    let table: SubWeightTable =
        serde_json::from_reader(reader).map_err(|source| ConfigError::SubWeights {
            path: path.display().to_string(),
            source,
        })?;
    check_sub_weights(&table)?;
    tracing::info!(path = %path.display(), "using custom sub-weight table");
    Ok(table)
}

/// Rejects unusable weights; an off-100 category total only warns.
pub fn check_sub_weights(table: &SubWeightTable) -> Result<(), ConfigError> {
    if table
        .all_weights()
        .iter()
        .any(|w| !w.is_finite() || *w < 0.0)
    {
        return Err(ConfigError::BadSubWeight);
    }
    for (category, total) in table.totals() {
        if total != 100.0 {
            tracing::warn!(category, total, "sub-weights do not sum to 100");
        }
    }
    Ok(())
}

/// Parses `c,p,r,v,q` in slider order.
pub fn parse_weight_vector(raw: &str) -> Result<WeightPreset, ConfigError> {
    let values = raw
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ConfigError::WeightVector(raw.to_string()))?;
    if values.len() != Category::ALL.len() || values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(ConfigError::WeightVector(raw.to_string()));
    }
    let mut weights = WeightPreset::BALANCED;
    for (category, value) in Category::ALL.into_iter().zip(values) {
        weights.set(category, value);
    }
    Ok(weights)
}

pub fn parse_slide(raw: &str) -> Result<(Category, f64), ConfigError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ConfigError::Slide(raw.to_string()))?;
    let category = key
        .parse::<Category>()
        .map_err(|_| ConfigError::Slide(raw.to_string()))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::Slide(raw.to_string()))?;
    Ok((category, value))
}

/// Explicit weights win over the preset and make the run custom.
pub fn resolve_weights(
    preset: PresetName,
    explicit: Option<&str>,
) -> Result<(WeightPreset, ActivePreset), ConfigError> {
    match explicit {
        Some(raw) => {
            let weights = parse_weight_vector(raw)?;
            if !weights.is_valid() {
                tracing::warn!(
                    total = weights.total(),
                    "weights do not sum to 100; overall scores will be on a shifted scale"
                );
            }
            Ok((weights, ActivePreset::Custom))
        }
        None => Ok((preset.weights(), ActivePreset::Preset(preset))),
    }
}
