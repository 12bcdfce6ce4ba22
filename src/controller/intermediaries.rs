//! Intermediaries and the clients they brought in, listed under the
//! dashboard statistics. Expanding a row drills down one level and loads
//! its quote summary.

use serde_json::Value;

use crate::api::types::{display_value, entity_id};
use crate::api::{ApiError, Metadata, StatsRange};
use crate::config::Credential;
use crate::ui::fetch::{FetchIntent, FetchReducer, FetchState};
use crate::ui::mvi::Reducer;
use crate::ui::notice::Notice;

#[derive(Debug, Clone, PartialEq)]
pub enum SectionRequest {
    Intermediaries {
        generation: u64,
        credential: Credential,
    },
    /// Clients of one intermediary plus the quotes raised for them.
    Clients {
        intermediary: String,
        generation: u64,
        credential: Credential,
    },
    ClientQuotes {
        client: String,
        generation: u64,
        credential: Credential,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClientsInfo {
    pub clients: Vec<Value>,
    pub quotes: Vec<Value>,
}

#[derive(Debug)]
pub enum SectionResult {
    Intermediaries {
        generation: u64,
        result: Result<Vec<Value>, ApiError>,
    },
    Clients {
        generation: u64,
        result: Result<ClientsInfo, ApiError>,
    },
    ClientQuotes {
        generation: u64,
        result: Result<Vec<Value>, ApiError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuoteCounts {
    pub total: usize,
    pub new: usize,
    pub pending: usize,
    pub closed: usize,
}

impl QuoteCounts {
    /// Count the quotes belonging to `user_id`, by status.
    pub fn of(quotes: &[Value], user_id: &str) -> Self {
        let mut counts = Self::default();
        let owned = quotes
            .iter()
            .filter(|quote| quote.get("user").and_then(Value::as_str) == Some(user_id));
        for quote in owned {
            counts.total += 1;
            match quote.get("quoteStatus").and_then(Value::as_str) {
                Some("new") => counts.new += 1,
                Some("pending") => counts.pending += 1,
                Some("closed") => counts.closed += 1,
                _ => {}
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Intermediary,
    Client,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDetail {
    Loading,
    Failed(String),
    Counts(QuoteCounts),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub kind: RowKind,
    pub name: String,
    pub expanded: bool,
    pub selected: bool,
    /// Quote summary; only expanded rows carry one.
    pub detail: Option<RowDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub loading: bool,
    pub error: Option<String>,
    pub rows: Vec<PanelRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowRef {
    Intermediary(usize),
    Client(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DrillKey {
    id: String,
    credential: Credential,
}

pub struct IntermediaryPanel {
    intermediaries: FetchState<Vec<Value>>,
    clients: FetchState<ClientsInfo>,
    client_quotes: FetchState<Vec<Value>>,
    expanded: Option<String>,
    expanded_client: Option<String>,
    selected: usize,
    last_list: Option<(StatsRange, Credential)>,
    last_clients: Option<DrillKey>,
    last_quotes: Option<DrillKey>,
}

impl Default for IntermediaryPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl IntermediaryPanel {
    pub fn new() -> Self {
        Self {
            intermediaries: FetchState::default(),
            clients: FetchState::default(),
            client_quotes: FetchState::default(),
            expanded: None,
            expanded_client: None,
            selected: 0,
            last_list: None,
            last_clients: None,
            last_quotes: None,
        }
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn expanded_client(&self) -> Option<&str> {
        self.expanded_client.as_deref()
    }

    /// Reload the list; any open drill-down closes.
    pub fn refetch(&mut self) {
        self.last_list = None;
    }

    /// Requests for whatever changed. The list is loaded alongside each
    /// statistics range, drill-downs whenever a row is expanded.
    pub fn poll_effects(
        &mut self,
        range: StatsRange,
        credential: Option<&Credential>,
    ) -> Vec<SectionRequest> {
        let Some(credential) = credential else {
            return Vec::new();
        };
        let mut requests = Vec::new();

        let list_key = (range, credential.clone());
        if self.last_list.as_ref() != Some(&list_key) {
            self.last_list = Some(list_key);
            self.collapse_all();
            let generation = self.intermediaries.next_generation();
            request(&mut self.intermediaries, generation);
            requests.push(SectionRequest::Intermediaries {
                generation,
                credential: credential.clone(),
            });
        }

        if let Some(id) = self.expanded.clone() {
            let key = DrillKey {
                id: id.clone(),
                credential: credential.clone(),
            };
            if self.last_clients.as_ref() != Some(&key) {
                self.last_clients = Some(key);
                let generation = self.clients.next_generation();
                request(&mut self.clients, generation);
                tracing::debug!(intermediary = %id, generation, "intermediary clients fetch");
                requests.push(SectionRequest::Clients {
                    intermediary: id,
                    generation,
                    credential: credential.clone(),
                });
            }
        }

        if let Some(id) = self.expanded_client.clone() {
            let key = DrillKey {
                id: id.clone(),
                credential: credential.clone(),
            };
            if self.last_quotes.as_ref() != Some(&key) {
                self.last_quotes = Some(key);
                let generation = self.client_quotes.next_generation();
                request(&mut self.client_quotes, generation);
                requests.push(SectionRequest::ClientQuotes {
                    client: id,
                    generation,
                    credential: credential.clone(),
                });
            }
        }
        requests
    }

    pub fn on_result(&mut self, result: SectionResult) -> Option<Notice> {
        match result {
            SectionResult::Intermediaries { generation, result } => {
                let notice = settle(&mut self.intermediaries, generation, result);
                self.clamp_selection();
                notice
            }
            SectionResult::Clients { generation, result } => {
                settle(&mut self.clients, generation, result)
            }
            SectionResult::ClientQuotes { generation, result } => {
                settle(&mut self.client_quotes, generation, result)
            }
        }
    }

    pub fn select_next(&mut self) {
        let rows = self.rows().len();
        if rows > 0 {
            self.selected = (self.selected.min(rows - 1) + 1) % rows;
        }
    }

    pub fn select_prev(&mut self) {
        let rows = self.rows().len();
        if rows > 0 {
            let current = self.selected.min(rows - 1);
            self.selected = (current + rows - 1) % rows;
        }
    }

    /// Expand the selected row, or collapse it when already open.
    /// Collapsing forgets the drill-down so reopening loads it fresh.
    pub fn toggle_selected(&mut self) {
        let rows = self.rows();
        let Some(row) = rows.get(self.selected).copied() else {
            return;
        };
        match row {
            RowRef::Intermediary(index) => {
                let id = self.intermediary_id(index);
                if id.is_some() && id == self.expanded {
                    self.collapse_all();
                } else {
                    self.collapse_all();
                    self.expanded = id;
                }
                self.selected = self
                    .rows()
                    .iter()
                    .position(|row| *row == RowRef::Intermediary(index))
                    .unwrap_or(0);
            }
            RowRef::Client(index) => {
                let id = self.client_id(index);
                self.last_quotes = None;
                self.expanded_client = if id.is_some() && id == self.expanded_client {
                    None
                } else {
                    id
                };
            }
        }
    }

    pub fn view(&self) -> PanelView {
        let rows = self.rows();
        let intermediaries = self.intermediaries.ready().map(Vec::as_slice).unwrap_or(&[]);
        let clients = self.loaded_clients().map(|info| info.clients.as_slice()).unwrap_or(&[]);

        let rows = rows
            .iter()
            .enumerate()
            .filter_map(|(position, row)| {
                let selected = position == self.selected;
                match *row {
                    RowRef::Intermediary(index) => {
                        let entity = intermediaries.get(index)?;
                        let id = entity_id(entity);
                        let expanded = id.is_some() && id == self.expanded.as_deref();
                        Some(PanelRow {
                            kind: RowKind::Intermediary,
                            name: full_name(entity),
                            expanded,
                            selected,
                            detail: expanded.then(|| self.clients_detail(id.unwrap_or_default())),
                        })
                    }
                    RowRef::Client(index) => {
                        let entity = clients.get(index)?;
                        let id = entity_id(entity);
                        let expanded = id.is_some() && id == self.expanded_client.as_deref();
                        Some(PanelRow {
                            kind: RowKind::Client,
                            name: full_name(entity),
                            expanded,
                            selected,
                            detail: expanded.then(|| self.quotes_detail(id.unwrap_or_default())),
                        })
                    }
                }
            })
            .collect();

        PanelView {
            loading: self.intermediaries.loading,
            error: self.intermediaries.failure().map(str::to_string),
            rows,
        }
    }

    /// Intermediaries in order, with the clients of the expanded one
    /// right beneath it once they have loaded.
    fn rows(&self) -> Vec<RowRef> {
        let Some(intermediaries) = self.intermediaries.ready() else {
            return Vec::new();
        };
        let client_count = self.loaded_clients().map(|info| info.clients.len()).unwrap_or(0);
        let mut rows = Vec::new();
        for (index, intermediary) in intermediaries.iter().enumerate() {
            rows.push(RowRef::Intermediary(index));
            if self.expanded.is_some() && entity_id(intermediary) == self.expanded.as_deref() {
                rows.extend((0..client_count).map(RowRef::Client));
            }
        }
        rows
    }

    /// Clients, only when they belong to the expanded intermediary.
    fn loaded_clients(&self) -> Option<&ClientsInfo> {
        let issued_for = self.last_clients.as_ref().map(|key| key.id.as_str());
        if issued_for.is_none() || issued_for != self.expanded.as_deref() {
            return None;
        }
        self.clients.ready()
    }

    fn clients_detail(&self, intermediary: &str) -> RowDetail {
        let issued = self.last_clients.as_ref().map(|key| key.id.as_str()) == Some(intermediary);
        drill_detail(&self.clients, issued, |info| {
            QuoteCounts::of(&info.quotes, intermediary)
        })
    }

    fn quotes_detail(&self, client: &str) -> RowDetail {
        let issued = self.last_quotes.as_ref().map(|key| key.id.as_str()) == Some(client);
        drill_detail(&self.client_quotes, issued, |quotes| {
            QuoteCounts::of(quotes, client)
        })
    }

    fn intermediary_id(&self, index: usize) -> Option<String> {
        self.intermediaries
            .ready()?
            .get(index)
            .and_then(entity_id)
            .map(str::to_string)
    }

    fn client_id(&self, index: usize) -> Option<String> {
        self.loaded_clients()?
            .clients
            .get(index)
            .and_then(entity_id)
            .map(str::to_string)
    }

    fn collapse_all(&mut self) {
        self.expanded = None;
        self.expanded_client = None;
        self.last_clients = None;
        self.last_quotes = None;
    }

    fn clamp_selection(&mut self) {
        let rows = self.rows().len();
        if self.selected >= rows {
            self.selected = rows.saturating_sub(1);
        }
    }
}

fn request<T: Clone + PartialEq + Send + 'static>(state: &mut FetchState<T>, generation: u64) {
    *state = FetchReducer::<T>::reduce(std::mem::take(state), FetchIntent::Request { generation });
}

/// Apply an outcome. Only the current generation raises a notice.
fn settle<T: Clone + PartialEq + Send + 'static>(
    state: &mut FetchState<T>,
    generation: u64,
    result: Result<T, ApiError>,
) -> Option<Notice> {
    let current = generation == state.generation;
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
    *state = FetchReducer::<T>::reduce(std::mem::take(state), intent);
    notice
}

fn drill_detail<T>(
    state: &FetchState<T>,
    issued: bool,
    counts: impl FnOnce(&T) -> QuoteCounts,
) -> RowDetail {
    if !issued || state.loading {
        return RowDetail::Loading;
    }
    if let Some(message) = state.failure() {
        return RowDetail::Failed(message.to_string());
    }
    match state.ready() {
        Some(data) => RowDetail::Counts(counts(data)),
        None => RowDetail::Loading,
    }
}

fn full_name(entity: &Value) -> String {
    let first = entity.get("firstname").and_then(Value::as_str).unwrap_or("");
    let last = entity.get("lastname").and_then(Value::as_str).unwrap_or("");
    let name = format!("{} {}", first, last).trim().to_string();
    if name.is_empty() {
        display_value(entity, "name")
    } else {
        name
    }
}
