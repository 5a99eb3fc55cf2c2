use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::customizer::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::customizer::editor::WeightEditor;
use crate::input::open_maybe_gz;
use crate::model::fund::FundRankingRow;
use crate::model::weights::{Category, PresetName};
use crate::pipeline::stage2_aggregate::Aggregator;
use crate::pipeline::stage3_rank::{
    AmcFilter, RankQuery, RankedFund, SortDirection, SortField, SortState, rank_funds,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot read session script: {0}")]
    Input(#[from] crate::input::InputError),
    #[error("invalid session script {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("event at {at_ms} ms comes before the previous event at {previous_ms} ms")]
    OutOfOrder { at_ms: u64, previous_ms: u64 },
}

/// One user action on the rankings screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Preset {
        name: PresetName,
    },
    Slide {
        category: Category,
        value: f64,
    },
    Search {
        query: String,
    },
    Amc {
        #[serde(default)]
        amc: Option<String>,
    },
    /// Without a direction this behaves like a header click.
    Sort {
        field: SortField,
        #[serde(default)]
        direction: Option<SortDirection>,
    },
    Tick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: SessionEvent,
}

/// UI-local state of a rankings screen over one fund snapshot.
#[derive(Debug, Clone)]
pub struct RankingSession {
    rows: Vec<FundRankingRow>,
    aggregator: Aggregator,
    editor: WeightEditor,
    search_input: String,
    search: Debouncer<String>,
    query: RankQuery,
    now: Duration,
}

impl RankingSession {
    pub fn new(rows: Vec<FundRankingRow>, aggregator: Aggregator) -> Self {
        Self {
            rows,
            aggregator,
            editor: WeightEditor::default(),
            search_input: String::new(),
            search: Debouncer::new(SEARCH_DEBOUNCE),
            query: RankQuery::default(),
            now: Duration::ZERO,
        }
    }

    pub fn editor(&self) -> &WeightEditor {
        &self.editor
    }

    pub fn query(&self) -> &RankQuery {
        &self.query
    }

    /// What the search box shows, which may be ahead of the query in effect.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn rows(&self) -> &[FundRankingRow] {
        &self.rows
    }

    pub fn apply(&mut self, event: SessionEvent, now: Duration) -> Result<(), SessionError> {
        if now < self.now {
            return Err(SessionError::OutOfOrder {
                at_ms: now.as_millis() as u64,
                previous_ms: self.now.as_millis() as u64,
            });
        }
        self.now = now;
        self.settle_search(now);

        match event {
            SessionEvent::Preset { name } => {
                self.editor = self.editor.select_preset(name);
            }
            SessionEvent::Slide { category, value } => {
                self.editor = self.editor.slide(category, value);
            }
            SessionEvent::Search { query } => {
                self.search_input = query.clone();
                self.search.push(query, now);
            }
            SessionEvent::Amc { amc } => {
                self.query.amc = AmcFilter::from_arg(amc.as_deref());
            }
            SessionEvent::Sort { field, direction } => {
                self.query.sort = match direction {
                    Some(direction) => SortState::new(field, direction),
                    None => self.query.sort.toggle(field),
                };
            }
            SessionEvent::Tick => {}
        }
        Ok(())
    }

    /// Makes any pending search text effective immediately.
    pub fn flush_search(&mut self) {
        if let Some(query) = self.search.flush() {
            self.query.search = query;
        }
    }

    pub fn view(&self) -> Vec<RankedFund<'_>> {
        rank_funds(
            &self.rows,
            self.editor.weights(),
            &self.aggregator,
            &self.query,
        )
    }

    fn settle_search(&mut self, now: Duration) {
        if let Some(query) = self.search.poll(now) {
            tracing::debug!(query = %query, "search query settled");
            self.query.search = query;
        }
    }
}

pub fn load_script(path: &Path) -> Result<Vec<TimedEvent>, SessionError> {
    let reader = open_maybe_gz(path)?;
    serde_json::from_reader(reader).map_err(|source| SessionError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Replays a script from a fresh session; a trailing search edit is settled at the end.
pub fn replay(
    rows: Vec<FundRankingRow>,
    aggregator: Aggregator,
    events: &[TimedEvent],
) -> Result<RankingSession, SessionError> {
    let mut session = RankingSession::new(rows, aggregator);
    for timed in events {
        session.apply(timed.event.clone(), Duration::from_millis(timed.at_ms))?;
    }
    session.flush_search();
    tracing::info!(
        events = events.len(),
        preset = session.editor.active().key(),
        total_weight = session.editor.total_weight(),
        "session replayed"
    );
    Ok(session)
}

#[cfg(test)]
#[path = "../../tests/src_inline/customizer/session.rs"]
mod tests;
