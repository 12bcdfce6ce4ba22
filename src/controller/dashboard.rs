//! Statistics overview for a selectable time range, with the
//! intermediaries panel beneath it.

use serde_json::Value;

use crate::api::{ApiError, Metadata, Resource, StatsRange};
use crate::config::Credential;
use crate::controller::intermediaries::{
    IntermediaryPanel, PanelView, SectionRequest, SectionResult,
};
use crate::ui::fetch::{FetchIntent, FetchReducer, FetchState};
use crate::ui::mvi::Reducer;
use crate::ui::notice::Notice;

#[derive(Debug, Clone, PartialEq)]
pub struct StatsRequest {
    pub range: StatsRange,
    pub generation: u64,
    pub credential: Credential,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub label: String,
    pub value: String,
    /// List screen the tile links to, when the key names a resource.
    pub link: Option<Resource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub range_label: &'static str,
    pub loading: bool,
    pub error: Option<String>,
    pub tiles: Vec<Tile>,
    pub intermediaries: PanelView,
}

pub struct DashboardController {
    range: StatsRange,
    credential: Option<Credential>,
    state: FetchState<Value>,
    last_issued: Option<(StatsRange, Credential)>,
    panel: IntermediaryPanel,
}

impl DashboardController {
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            range: StatsRange::default(),
            credential,
            state: FetchState::default(),
            last_issued: None,
            panel: IntermediaryPanel::new(),
        }
    }

    pub fn range(&self) -> StatsRange {
        self.range
    }

    pub fn set_range(&mut self, range: StatsRange) {
        self.range = range;
    }

    pub fn cycle_range(&mut self) {
        self.range = self.range.next();
    }

    pub fn set_credential(&mut self, credential: Option<Credential>) {
        self.credential = credential;
    }

    pub fn poll_effect(&mut self) -> Option<StatsRequest> {
        let credential = self.credential.clone()?;
        let key = (self.range, credential.clone());
        if self.last_issued.as_ref() == Some(&key) {
            return None;
        }
        self.last_issued = Some(key);

        let generation = self.state.next_generation();
        self.state = FetchReducer::<Value>::reduce(
            std::mem::take(&mut self.state),
            FetchIntent::Request { generation },
        );
        Some(StatsRequest {
            range: self.range,
            generation,
            credential,
        })
    }

    /// Load the statistics and the intermediary list again.
    pub fn refetch(&mut self) {
        self.last_issued = None;
        self.panel.refetch();
    }

    pub fn panel(&self) -> &IntermediaryPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut IntermediaryPanel {
        &mut self.panel
    }

    /// Intermediary list and drill-down fetches, separate from the stats.
    pub fn poll_section_effects(&mut self) -> Vec<SectionRequest> {
        self.panel.poll_effects(self.range, self.credential.as_ref())
    }

    pub fn on_section_result(&mut self, result: SectionResult) -> Option<Notice> {
        self.panel.on_result(result)
    }

    pub fn on_result(&mut self, generation: u64, result: Result<Value, ApiError>) -> Option<Notice> {
        let current = generation == self.state.generation;
        let (intent, notice) = match result {
            Ok(data) => (
                FetchIntent::Success {
                    generation,
                    data,
                    extra: Metadata::new(),
                },
                None,
            ),
            Err(err) => {
                let message = err.user_message();
                let notice = current.then(|| Notice::error(message.clone()));
                (FetchIntent::Fail { generation, message }, notice)
            }
        };
        self.state = FetchReducer::<Value>::reduce(std::mem::take(&mut self.state), intent);
        notice
    }

    pub fn view(&self) -> DashboardView {
        let tiles = self.state.ready().map(tiles).unwrap_or_default();
        DashboardView {
            range_label: self.range.label(),
            loading: self.state.loading,
            error: self.state.failure().map(str::to_string),
            tiles,
            intermediaries: self.panel.view(),
        }
    }
}

/// One tile per top-level statistic. Aggregates arrive as
/// `[{"total": n}]` and count as 0 when empty.
fn tiles(stats: &Value) -> Vec<Tile> {
    let Some(map) = stats.as_object() else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                Value::Array(items) => match items.first().and_then(|first| first.get("total")) {
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::String(s)) => s.clone(),
                    _ => "0".to_string(),
                },
                _ => return None,
            };
            Some(Tile {
                label: title_case(key),
                value,
                link: key.parse().ok(),
            })
        })
        .collect()
}

fn title_case(key: &str) -> String {
    key.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
