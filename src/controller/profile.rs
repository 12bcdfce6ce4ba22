//! The signed-in admin's own profile.

use serde_json::Value;

use crate::api::types::entity_id;
use crate::api::{ApiError, EntityPayload};
use crate::config::Credential;
use crate::controller::catalog::{self, PROFILE_FIELDS};
use crate::controller::detail::{FieldRow, FieldValue};
use crate::ui::fetch::{FetchIntent, FetchReducer, FetchState};
use crate::ui::mvi::Reducer;
use crate::ui::notice::Notice;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRequest {
    pub generation: u64,
    pub credential: Credential,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub error: Option<String>,
    pub rows: Vec<FieldRow>,
    pub editable: bool,
}

pub struct ProfileController {
    credential: Option<Credential>,
    state: FetchState<Value>,
    refresh: u64,
    last_issued: Option<(Credential, u64)>,
}

impl ProfileController {
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            credential,
            state: FetchState::default(),
            refresh: 0,
            last_issued: None,
        }
    }

    pub fn set_credential(&mut self, credential: Option<Credential>) {
        self.credential = credential;
    }

    pub fn refetch(&mut self) {
        self.refresh = self.refresh.wrapping_add(1);
    }

    pub fn poll_effect(&mut self) -> Option<ProfileRequest> {
        let credential = self.credential.clone()?;
        let key = (credential.clone(), self.refresh);
        if self.last_issued.as_ref() == Some(&key) {
            return None;
        }
        self.last_issued = Some(key);

        let generation = self.state.next_generation();
        self.dispatch(FetchIntent::Request { generation });
        Some(ProfileRequest {
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

    /// Id to open the edit form against, once the profile has loaded.
    pub fn edit_target(&self) -> Option<String> {
        self.state.ready().and_then(entity_id).map(str::to_string)
    }

    pub fn view(&self) -> ProfileView {
        if let Some(message) = self.state.failure() {
            return ProfileView {
                error: Some(message.to_string()),
                rows: Vec::new(),
                editable: false,
            };
        }
        let entity = self.state.data.as_ref().unwrap_or(&Value::Null);
        let rows = PROFILE_FIELDS
            .iter()
            .map(|field| FieldRow {
                label: field.label,
                value: if self.state.loading {
                    FieldValue::Skeleton
                } else {
                    FieldValue::Text(catalog::format_cell(entity, field.path, field.format))
                },
            })
            .collect();
        ProfileView {
            error: None,
            rows,
            editable: self.edit_target().is_some(),
        }
    }

    fn dispatch(&mut self, intent: FetchIntent<Value>) {
        self.state = FetchReducer::<Value>::reduce(std::mem::take(&mut self.state), intent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_and_exposes_edit_target() {
        let mut profile = ProfileController::new(Some(Credential::new("t")));
        let request = profile.poll_effect().expect("mount");
        assert!(profile.view().rows.iter().all(|r| r.value == FieldValue::Skeleton));

        profile.on_result(
            request.generation,
            Ok(EntityPayload {
                entity: json!({"_id": "me1", "name": "Ada", "role": "admin"}),
                extra: Default::default(),
            }),
        );
        let view = profile.view();
        assert!(view.editable);
        assert_eq!(profile.edit_target().as_deref(), Some("me1"));
        assert_eq!(view.rows[0].value, FieldValue::Text("Ada".to_string()));
        assert_eq!(view.rows[2].value, FieldValue::Text("N/A".to_string()));
    }

    #[test]
    fn refetch_after_save() {
        let mut profile = ProfileController::new(Some(Credential::new("t")));
        profile.poll_effect().expect("mount");
        assert!(profile.poll_effect().is_none());
        profile.refetch();
        assert!(profile.poll_effect().is_some());
    }

    #[test]
    fn failure_shows_error() {
        let mut profile = ProfileController::new(Some(Credential::new("t")));
        let request = profile.poll_effect().expect("mount");
        let notice = profile.on_result(
            request.generation,
            Err(ApiError::from_status(401, b"")),
        );
        assert!(notice.is_some());
        assert!(profile.view().error.is_some());
        assert!(profile.edit_target().is_none());
    }
}
