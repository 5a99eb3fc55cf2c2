use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::weights::{ActivePreset, Category, PresetName, WeightPreset};

pub const SLIDER_MIN: f64 = 0.0;
pub const SLIDER_MAX: f64 = 100.0;

/// Slider state for the five top-level weights.
///
/// Every transition takes `&self` and returns the next state. A slid category is
/// locked and left alone by later redistributions until a preset is selected again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightEditor {
    weights: WeightPreset,
    locked: BTreeSet<Category>,
    active: ActivePreset,
}

impl Default for WeightEditor {
    fn default() -> Self {
        Self::from_preset(PresetName::Balanced)
    }
}

impl WeightEditor {
    pub fn from_preset(preset: PresetName) -> Self {
        Self {
            weights: preset.weights(),
            locked: BTreeSet::new(),
            active: ActivePreset::Preset(preset),
        }
    }

    /// Starts an editing session from arbitrary weights with nothing locked.
    pub fn custom(weights: WeightPreset) -> Self {
        Self {
            weights,
            locked: BTreeSet::new(),
            active: ActivePreset::Custom,
        }
    }

    pub fn weights(&self) -> &WeightPreset {
        &self.weights
    }

    pub fn locked(&self) -> &BTreeSet<Category> {
        &self.locked
    }

    pub fn active(&self) -> ActivePreset {
        self.active
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.total()
    }

    pub fn is_valid(&self) -> bool {
        self.weights.is_valid()
    }

    pub fn select_preset(&self, preset: PresetName) -> Self {
        tracing::debug!(preset = preset.key(), "preset selected");
        Self::from_preset(preset)
    }

    pub fn slide(&self, category: Category, value: f64) -> Self {
        let value = value.clamp(SLIDER_MIN, SLIDER_MAX);
        let old = self.weights.get(category);

        // Uses the lock set from before this edit.
        let unlocked: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|&c| c != category && !self.locked.contains(&c))
            .collect();

        let mut weights = self.weights;
        if unlocked.is_empty() {
            let others: f64 = Category::ALL
                .into_iter()
                .filter(|&c| c != category)
                .map(|c| self.weights.get(c))
                .sum();
            let max_allowed = 100.0 - others;
            weights.set(category, value.min(max_allowed).max(0.0));
        } else {
            let unlocked_total: f64 = unlocked.iter().map(|&c| self.weights.get(c)).sum();
            let delta = value - old;
            let actual_value = if delta > 0.0 && unlocked_total < delta {
                old + unlocked_total
            } else {
                value
            };
            let actual_delta = actual_value - old;
            weights.set(category, actual_value);

            if unlocked_total > 0.0 && actual_delta != 0.0 {
                redistribute(&mut weights, &self.weights, &unlocked, unlocked_total, actual_delta);
            }
        }

        let mut locked = self.locked.clone();
        locked.insert(category);

        let next = Self {
            weights,
            locked,
            active: ActivePreset::Custom,
        };
        if !next.is_valid() {
            tracing::warn!(
                category = category.key(),
                total = next.total_weight(),
                "weights no longer sum to 100 after slide"
            );
        }
        next
    }
}

/// Spreads `-delta` over `unlocked` in proportion to their previous weights.
/// The last member takes whatever rounding left over; every member is floored at 0.
fn redistribute(
    weights: &mut WeightPreset,
    previous: &WeightPreset,
    unlocked: &[Category],
    unlocked_total: f64,
    delta: f64,
) {
    let mut remaining = delta;
    let last = unlocked.len() - 1;
    for (idx, &c) in unlocked.iter().enumerate() {
        let prev = previous.get(c);
        let adjustment = if idx == last {
            remaining
        } else {
            let proportion = prev / unlocked_total;
            round_half_up(delta * proportion)
        };
        weights.set(c, (prev - adjustment).max(0.0));
        remaining -= adjustment;
    }
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

#[cfg(test)]
#[path = "../../tests/src_inline/customizer/editor.rs"]
mod tests;
