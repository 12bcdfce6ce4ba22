//! Edit form for users and vehicles.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::api::types::lookup;
use crate::api::{ApiError, EntityPayload, Resource};
use crate::config::Credential;
use crate::controller::catalog::{self, FieldKind, FormField};
use crate::controller::{GetRequest, SubmitError};
use crate::ui::fetch::{
    FetchIntent, FetchReducer, FetchState, MutationIntent, MutationKind, MutationReducer,
    MutationState,
};
use crate::ui::mvi::Reducer;
use crate::ui::notice::Notice;

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub resource: Resource,
    pub id: String,
    pub body: Value,
    pub credential: Credential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The parent screen should refetch.
    Saved,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
    pub focused: bool,
    /// Choices for select fields.
    pub options: Option<&'static [&'static str]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditView {
    pub title: String,
    pub loading: bool,
    pub error: Option<String>,
    pub fields: Vec<EditFieldView>,
    pub saving: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DepsKey {
    id: String,
    credential: Credential,
    opened: u64,
}

pub struct EditController {
    resource: Resource,
    id: String,
    credential: Option<Credential>,
    state: FetchState<Value>,
    values: BTreeMap<String, String>,
    focus: usize,
    update: MutationState,
    open: bool,
    opened: u64,
    last_issued: Option<DepsKey>,
}

impl EditController {
    /// A form that is open right away and loads the entity on first poll.
    pub fn new(resource: Resource, id: impl Into<String>, credential: Option<Credential>) -> Self {
        Self {
            resource,
            id: id.into(),
            credential,
            state: FetchState::default(),
            values: BTreeMap::new(),
            focus: 0,
            update: MutationState::new(MutationKind::Update),
            open: true,
            opened: 0,
            last_issued: None,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn update_state(&self) -> &MutationState {
        &self.update
    }

    /// Open again; current values are fetched fresh.
    pub fn reopen(&mut self) {
        self.open = true;
        self.opened = self.opened.wrapping_add(1);
    }

    /// Load the entity again while the form stays open.
    pub fn refetch(&mut self) {
        self.last_issued = None;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.values.clear();
        self.focus = 0;
    }

    pub fn poll_effect(&mut self) -> Option<GetRequest> {
        if !self.open {
            return None;
        }
        let credential = self.credential.clone()?;
        let key = DepsKey {
            id: self.id.clone(),
            credential: credential.clone(),
            opened: self.opened,
        };
        if self.last_issued.as_ref() == Some(&key) {
            return None;
        }
        self.last_issued = Some(key);

        let generation = self.state.next_generation();
        self.dispatch(FetchIntent::Request { generation });
        Some(GetRequest {
            resource: self.resource,
            id: self.id.clone(),
            generation,
            credential,
        })
    }

    pub fn on_fetch_result(
        &mut self,
        generation: u64,
        result: Result<EntityPayload, ApiError>,
    ) -> Option<Notice> {
        let current = generation == self.state.generation;
        match result {
            Ok(payload) => {
                if current {
                    self.values = seed_values(self.fields(), &payload.entity);
                    self.focus = 0;
                }
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

    fn fields(&self) -> &'static [FormField] {
        catalog::form_fields(self.resource)
    }

    /// Fields shown for the current values, in form order.
    pub fn visible_fields(&self) -> Vec<&'static FormField> {
        self.fields()
            .iter()
            .filter(|field| field.visible_when.holds_in_form(&self.values))
            .collect()
    }

    pub fn focused_field(&self) -> Option<&'static FormField> {
        let visible = self.visible_fields();
        visible
            .get(self.focus.min(visible.len().saturating_sub(1)))
            .copied()
    }

    pub fn focus_next(&mut self) {
        let count = self.visible_fields().len();
        if count > 0 {
            self.focus = (self.focus.min(count - 1) + 1) % count;
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.visible_fields().len();
        if count > 0 {
            let current = self.focus.min(count - 1);
            self.focus = (current + count - 1) % count;
        }
    }

    pub fn set_field(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.fields().iter().find(|field| field.key == key) {
            self.values.insert(field.key.to_string(), value.into());
            self.clamp_focus();
        }
    }

    /// Append to the focused text field. Select fields ignore typing.
    pub fn type_char(&mut self, c: char) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if matches!(field.kind, FieldKind::Select(_)) {
            return;
        }
        self.values.entry(field.key.to_string()).or_default().push(c);
    }

    pub fn backspace(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if let Some(value) = self.values.get_mut(field.key) {
            value.pop();
        }
    }

    /// Step the focused select field to its next option.
    pub fn cycle_option(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let FieldKind::Select(options) = field.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let current = self.values.get(field.key).map(String::as_str);
        let next = match options.iter().position(|option| Some(*option) == current) {
            Some(index) => options[(index + 1) % options.len()],
            None => options[0],
        };
        self.set_field(field.key, next);
    }

    /// Validate and build the update. Nothing is sent on `Err`.
    pub fn submit(&mut self) -> Result<UpdateRequest, SubmitError> {
        if self.update.loading {
            return Err(SubmitError::InFlight);
        }
        let credential = self.credential.clone().ok_or(SubmitError::SignedOut)?;
        if self.state.ready().is_none() {
            return Err(SubmitError::NotLoaded);
        }

        for field in self.visible_fields() {
            if field.required && self.raw_value(field).trim().is_empty() {
                return Err(SubmitError::MissingField(field.label));
            }
        }
        // Hidden conditional fields still go out with their seeded values.
        let body: Map<String, Value> = self
            .fields()
            .iter()
            .map(|field| (field.key.to_string(), typed_value(field, self.raw_value(field))))
            .collect();

        self.dispatch_update(MutationIntent::Request);
        tracing::info!(resource = %self.resource, id = %self.id, fields = body.len(), "submitting update");
        Ok(UpdateRequest {
            resource: self.resource,
            id: self.id.clone(),
            body: Value::Object(body),
            credential,
        })
    }

    pub fn on_update_result(&mut self, result: Result<Value, ApiError>) -> (EditOutcome, Notice) {
        match result {
            Ok(_) => {
                self.dispatch_update(MutationIntent::Success);
                self.close();
                let notice = Notice::success(format!(
                    "{} Updated Successfully",
                    self.resource.singular()
                ));
                (EditOutcome::Saved, notice)
            }
            Err(err) => {
                let message = err.user_message();
                self.dispatch_update(MutationIntent::Fail {
                    message: message.clone(),
                });
                (EditOutcome::Failed, Notice::error(message))
            }
        }
    }

    pub fn view(&self) -> EditView {
        let focused = self.focused_field().map(|field| field.key);
        let fields = self
            .visible_fields()
            .into_iter()
            .map(|field| EditFieldView {
                key: field.key,
                label: field.label,
                value: self.values.get(field.key).cloned().unwrap_or_default(),
                required: field.required,
                focused: Some(field.key) == focused,
                options: match field.kind {
                    FieldKind::Select(options) => Some(options),
                    _ => None,
                },
            })
            .collect();
        EditView {
            title: format!("Edit {}", self.resource.singular()),
            loading: self.state.loading,
            error: self.state.failure().map(str::to_string),
            fields,
            saving: self.update.loading,
        }
    }

    fn raw_value(&self, field: &FormField) -> &str {
        self.values.get(field.key).map(String::as_str).unwrap_or("")
    }

    fn clamp_focus(&mut self) {
        let count = self.visible_fields().len();
        if self.focus >= count {
            self.focus = count.saturating_sub(1);
        }
    }

    fn dispatch(&mut self, intent: FetchIntent<Value>) {
        self.state = FetchReducer::<Value>::reduce(std::mem::take(&mut self.state), intent);
    }

    fn dispatch_update(&mut self, intent: MutationIntent) {
        self.update = MutationReducer::reduce(std::mem::take(&mut self.update), intent);
    }
}

/// One string per form field, taken from the fetched entity.
fn seed_values(fields: &[FormField], entity: &Value) -> BTreeMap<String, String> {
    fields
        .iter()
        .map(|field| {
            let value = match lookup(entity, field.key) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) if field.kind == FieldKind::Date => {
                    s.split('T').next().unwrap_or(s).to_string()
                }
                Some(Value::String(s)) => s.clone(),
                Some(Value::Bool(b)) => b.to_string(),
                Some(Value::Number(n)) => n.to_string(),
                Some(other) => other.to_string(),
            };
            (field.key.to_string(), value)
        })
        .collect()
}

/// Numbers and booleans go out typed; everything else as text.
fn typed_value(field: &FormField, raw: &str) -> Value {
    let trimmed = raw.trim();
    match field.kind {
        FieldKind::Number => {
            if let Ok(n) = trimmed.parse::<i64>() {
                return Value::Number(n.into());
            }
            match trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
                Some(n) => Value::Number(n),
                None => Value::String(trimmed.to_string()),
            }
        }
        FieldKind::Select(_) => match trimmed {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => Value::String(other.to_string()),
        },
        _ => Value::String(trimmed.to_string()),
    }
}
