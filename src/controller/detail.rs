//! Single-entity detail screen with its domain actions.

use serde_json::Value;

use crate::api::types::lookup;
use crate::api::{ApiError, EntityPayload, Metadata, Resource};
use crate::config::Credential;
use crate::controller::catalog::{self, DetailField, DetailSection, RelatedTable};
use crate::controller::{ConfirmPrompt, GetRequest};
use crate::ui::fetch::{
    FetchIntent, FetchReducer, FetchState, MutationIntent, MutationKind, MutationReducer,
    MutationState,
};
use crate::ui::mvi::Reducer;
use crate::ui::notice::Notice;

const REFUND_PROMPT: &str = "Refund the amount to the seller/winner? The same amount they paid \
will be refunded from the linked PayPal account and the user who did not pay will stay locked \
until an admin unlocks them. The auction status becomes 'Refunded'. This cannot be undone.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAction {
    Unlock,
    Refund,
}

impl DetailAction {
    pub fn kind(&self) -> MutationKind {
        match self {
            DetailAction::Unlock => MutationKind::Unlock,
            DetailAction::Refund => MutationKind::Refund,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DetailAction::Unlock => "Unlock Account",
            DetailAction::Refund => "Refund Amount",
        }
    }

    pub(crate) fn prompt(&self, resource: Resource) -> ConfirmPrompt {
        match self {
            DetailAction::Unlock => ConfirmPrompt {
                title: "Unlock User".to_string(),
                message: format!("Are you sure you want to unlock this {}?", resource.singular()),
            },
            DetailAction::Refund => ConfirmPrompt {
                title: "Refund Payment".to_string(),
                message: REFUND_PROMPT.to_string(),
            },
        }
    }

    pub(crate) fn success_message(&self) -> &'static str {
        match self {
            DetailAction::Unlock => "User unlocked successfully",
            DetailAction::Refund => "Refund Initiated Successfully",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub action: DetailAction,
    pub resource: Resource,
    pub id: String,
    pub credential: Credential,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Skeleton,
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub label: &'static str,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub title: &'static str,
    pub rows: Vec<FieldRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedView {
    pub title: &'static str,
    pub headers: Vec<&'static str>,
    /// `None` while the entity is loading.
    pub rows: Option<Vec<Vec<String>>>,
    pub empty: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    pub action: DetailAction,
    pub label: &'static str,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub error: Option<String>,
    pub sections: Vec<SectionView>,
    pub related: Vec<RelatedView>,
    pub actions: Vec<ActionView>,
    pub editable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DepsKey {
    id: String,
    credential: Credential,
    refresh: u64,
}

pub struct DetailController {
    resource: Resource,
    id: String,
    credential: Option<Credential>,
    state: FetchState<Value>,
    refresh: u64,
    last_issued: Option<DepsKey>,
    unlock: MutationState,
    refund: MutationState,
    pending_action: Option<DetailAction>,
}

impl DetailController {
    pub fn new(resource: Resource, id: impl Into<String>, credential: Option<Credential>) -> Self {
        Self {
            resource,
            id: id.into(),
            credential,
            state: FetchState::default(),
            refresh: 0,
            last_issued: None,
            unlock: MutationState::new(MutationKind::Unlock),
            refund: MutationState::new(MutationKind::Refund),
            pending_action: None,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &FetchState<Value> {
        &self.state
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn set_credential(&mut self, credential: Option<Credential>) {
        self.credential = credential;
    }

    /// Fetch again with the same id.
    pub fn refetch(&mut self) {
        self.refresh = self.refresh.wrapping_add(1);
    }

    pub fn poll_effect(&mut self) -> Option<GetRequest> {
        let credential = self.credential.clone()?;
        let key = DepsKey {
            id: self.id.clone(),
            credential: credential.clone(),
            refresh: self.refresh,
        };
        if self.last_issued.as_ref() == Some(&key) {
            return None;
        }
        self.last_issued = Some(key);

        let generation = self.state.next_generation();
        self.dispatch(FetchIntent::Request { generation });
        tracing::debug!(resource = %self.resource, id = %self.id, generation, "detail fetch");
        Some(GetRequest {
            resource: self.resource,
            id: self.id.clone(),
            generation,
            credential,
        })
    }

    pub fn on_result(
        &mut self,
        generation: u64,
        result: Result<EntityPayload, ApiError>,
    ) -> Option<Notice> {
        let current = generation == self.state.generation;
        match result {
            Ok(payload) => {
                self.dispatch(FetchIntent::Success {
                    generation,
                    data: payload.entity,
                    extra: payload.extra,
                });
                None
            }
            Err(err) => {
                let message = err.user_message();
                self.dispatch(FetchIntent::Fail {
                    generation,
                    message: message.clone(),
                });
                current.then(|| Notice::error(message))
            }
        }
    }

    /// Actions the loaded entity currently allows.
    pub fn available_actions(&self) -> Vec<DetailAction> {
        let Some(entity) = self.state.ready() else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        if self.resource == Resource::User && is_true(entity, "is_locked") {
            actions.push(DetailAction::Unlock);
        }
        if self.resource == Resource::Auction && refundable(entity) {
            actions.push(DetailAction::Refund);
        }
        actions
    }

    pub fn request_action(&mut self, action: DetailAction) -> Option<ConfirmPrompt> {
        if !self.available_actions().contains(&action) || self.mutation(action).loading {
            return None;
        }
        self.pending_action = Some(action);
        Some(action.prompt(self.resource))
    }

    /// Answer the pending prompt. Declining sends nothing.
    pub fn confirm_action(&mut self, accept: bool) -> Option<ActionRequest> {
        let action = self.pending_action.take()?;
        if !accept {
            tracing::debug!(action = action.kind().as_str(), id = %self.id, "action declined");
            return None;
        }
        let credential = self.credential.clone()?;
        self.dispatch_mutation(action, MutationIntent::Request);
        Some(ActionRequest {
            action,
            resource: self.resource,
            id: self.id.clone(),
            credential,
        })
    }

    /// On success the detail is fetched again.
    pub fn on_action_result(
        &mut self,
        action: DetailAction,
        result: Result<String, ApiError>,
    ) -> Notice {
        match result {
            Ok(message) => {
                self.dispatch_mutation(action, MutationIntent::Success);
                self.refetch();
                let text = if message.trim().is_empty() {
                    action.success_message().to_string()
                } else {
                    message
                };
                Notice::success(text)
            }
            Err(err) => {
                let message = err.user_message();
                self.dispatch_mutation(
                    action,
                    MutationIntent::Fail {
                        message: message.clone(),
                    },
                );
                Notice::error(message)
            }
        }
    }

    pub fn view(&self) -> DetailView {
        let title = format!("{} Details", self.resource.singular());
        let editable = self.resource.can_edit() && self.state.ready().is_some();
        if let Some(message) = self.state.failure() {
            return DetailView {
                title,
                error: Some(message.to_string()),
                sections: Vec::new(),
                related: Vec::new(),
                actions: Vec::new(),
                editable: false,
            };
        }

        let entity = self.state.data.as_ref().unwrap_or(&Value::Null);
        let sections = catalog::detail_sections(self.resource)
            .iter()
            .filter_map(|section| self.section_view(section, entity))
            .collect();
        let related = catalog::related_tables(self.resource)
            .iter()
            .map(|table| self.related_view(table))
            .collect();
        let actions = self
            .available_actions()
            .into_iter()
            .map(|action| ActionView {
                action,
                label: action.label(),
                busy: self.mutation(action).loading,
            })
            .collect();

        DetailView {
            title,
            error: None,
            sections,
            related,
            actions,
            editable,
        }
    }

    fn section_view(&self, section: &DetailSection, entity: &Value) -> Option<SectionView> {
        if !section.gate.holds(entity) {
            return None;
        }
        let source = match section.source {
            None => entity,
            Some(key) => match resolve_source(&self.state.extra, entity, key) {
                Some(value) => value,
                None if self.state.loading => &Value::Null,
                None => return None,
            },
        };
        let rows = section
            .fields
            .iter()
            .filter(|field| field.gate.holds(source))
            .map(|field| self.field_row(field, source))
            .collect();
        Some(SectionView {
            title: section.title,
            rows,
        })
    }

    fn field_row(&self, field: &DetailField, source: &Value) -> FieldRow {
        let value = if self.state.loading {
            FieldValue::Skeleton
        } else {
            FieldValue::Text(catalog::format_cell(source, field.path, field.format))
        };
        FieldRow {
            label: field.label,
            value,
        }
    }

    fn related_view(&self, table: &RelatedTable) -> RelatedView {
        let rows = if self.state.loading {
            None
        } else {
            let items = self
                .state
                .extra
                .get(table.source)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            Some(
                items
                    .iter()
                    .map(|item| {
                        table
                            .columns
                            .iter()
                            .map(|column| catalog::format_cell(item, column.path, column.format))
                            .collect()
                    })
                    .collect(),
            )
        };
        RelatedView {
            title: table.title,
            headers: table.columns.iter().map(|column| column.header).collect(),
            rows,
            empty: table.empty,
        }
    }

    fn mutation(&self, action: DetailAction) -> &MutationState {
        match action {
            DetailAction::Unlock => &self.unlock,
            DetailAction::Refund => &self.refund,
        }
    }

    fn dispatch(&mut self, intent: FetchIntent<Value>) {
        self.state = FetchReducer::<Value>::reduce(std::mem::take(&mut self.state), intent);
    }

    fn dispatch_mutation(&mut self, action: DetailAction, intent: MutationIntent) {
        let slot = match action {
            DetailAction::Unlock => &mut self.unlock,
            DetailAction::Refund => &mut self.refund,
        };
        *slot = MutationReducer::reduce(std::mem::take(slot), intent);
    }
}

/// Sibling payload key first, then a nested field of the entity.
fn resolve_source<'a>(extra: &'a Metadata, entity: &'a Value, key: &str) -> Option<&'a Value> {
    extra
        .get(key)
        .or_else(|| lookup(entity, key))
        .filter(|value| value.is_object())
}

fn is_true(entity: &Value, path: &str) -> bool {
    matches!(lookup(entity, path), Some(Value::Bool(true)))
}

/// Confirmed auction where exactly one side has paid.
fn refundable(auction: &Value) -> bool {
    is_true(auction, "auction_confirmed")
        && (is_true(auction, "is_Seller_paid10_percent")
            != is_true(auction, "is_Winner_paid10_percent"))
}
