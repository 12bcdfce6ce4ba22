//! Async executor for controller requests.
//!
//! The UI thread never awaits. It sends a [`UiCommand`] over a tokio channel;
//! the worker runs each one on its own task and posts the outcome back as an
//! [`AppEvent::Api`].

use std::sync::mpsc::Sender;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::api::{ApiClient, ApiError, EntityPayload, ListPage, Resource};
use crate::config::{ApiConfig, ConfigStore};
use crate::controller::{
    ActionRequest, ClientsInfo, DeleteRequest, DetailAction, GetRequest, ListRequest,
    LoginRequest, ProfileRequest, SectionRequest, SectionResult, StatsRequest, UpdateRequest,
};
use crate::session::Session;
use crate::ui::events::{AppEvent, Tagged};

/// Which open form a get-by-id was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityPurpose {
    Detail,
    Edit,
}

#[derive(Debug)]
pub enum UiCommand {
    Login(LoginRequest),
    FetchList(ListRequest),
    Delete(DeleteRequest),
    FetchEntity {
        purpose: EntityPurpose,
        request: GetRequest,
    },
    Update(UpdateRequest),
    Action(ActionRequest),
    FetchStats(StatsRequest),
    FetchSection(SectionRequest),
    FetchProfile(ProfileRequest),
}

impl UiCommand {
    pub fn name(&self) -> &'static str {
        match self {
            UiCommand::Login(_) => "login",
            UiCommand::FetchList(_) => "list",
            UiCommand::Delete(_) => "delete",
            UiCommand::FetchEntity { .. } => "get",
            UiCommand::Update(_) => "update",
            UiCommand::Action(_) => "action",
            UiCommand::FetchStats(_) => "statistics",
            UiCommand::FetchSection(_) => "intermediaries",
            UiCommand::FetchProfile(_) => "profile",
        }
    }
}

#[derive(Debug)]
pub enum ApiEvent {
    LoggedIn(Result<Session, ApiError>),
    List {
        resource: Resource,
        generation: u64,
        result: Result<ListPage, ApiError>,
    },
    Deleted {
        resource: Resource,
        result: Result<(), ApiError>,
    },
    Entity {
        purpose: EntityPurpose,
        resource: Resource,
        generation: u64,
        result: Result<EntityPayload, ApiError>,
    },
    Updated {
        resource: Resource,
        result: Result<Value, ApiError>,
    },
    Action {
        action: DetailAction,
        result: Result<String, ApiError>,
    },
    Stats {
        generation: u64,
        result: Result<Value, ApiError>,
    },
    Section(SectionResult),
    Profile {
        generation: u64,
        result: Result<EntityPayload, ApiError>,
    },
}

pub type UiCommandSender = mpsc::Sender<Tagged<UiCommand>>;

/// The client the worker sends through, rebuilt when a config reload
/// changes the `[api]` section.
pub struct ClientSlot {
    config: ConfigStore,
    applied: ApiConfig,
    client: ApiClient,
}

impl ClientSlot {
    pub fn new(config: ConfigStore, client: ApiClient) -> Self {
        let applied = config.get().api;
        Self {
            config,
            applied,
            client,
        }
    }

    /// The client for the next command. A settings change that fails to
    /// build keeps the previous client.
    pub fn current(&mut self) -> &ApiClient {
        let api = self.config.get().api;
        if api != self.applied {
            match ApiClient::new(&api) {
                Ok(client) => {
                    tracing::info!(base_url = %api.base_url, "api client rebuilt");
                    self.client = client;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "keeping previous api client");
                }
            }
            self.applied = api;
        }
        &self.client
    }
}

/// Drain commands until every sender is gone.
pub async fn run_worker(
    mut slot: ClientSlot,
    mut commands: mpsc::Receiver<Tagged<UiCommand>>,
    events: Sender<AppEvent>,
) {
    while let Some(Tagged { screen, inner }) = commands.recv().await {
        let client = slot.current().clone();
        let events = events.clone();
        tokio::spawn(async move {
            let name = inner.name();
            let event = execute(&client, inner).await;
            if events
                .send(AppEvent::Api(Tagged {
                    screen,
                    inner: event,
                }))
                .is_err()
            {
                tracing::debug!(command = name, "ui gone, result dropped");
            }
        });
    }
    tracing::debug!("command channel closed, worker exiting");
}

/// Run one command against the API.
pub async fn execute(client: &ApiClient, command: UiCommand) -> ApiEvent {
    match command {
        UiCommand::Login(request) => ApiEvent::LoggedIn(
            client
                .login(&request.email, request.password.expose())
                .await,
        ),
        UiCommand::FetchList(request) => ApiEvent::List {
            resource: request.resource,
            generation: request.generation,
            result: client
                .list(&request.credential, request.resource, &request.query)
                .await,
        },
        UiCommand::Delete(request) => ApiEvent::Deleted {
            resource: request.resource,
            result: client
                .delete(&request.credential, request.resource, &request.id)
                .await,
        },
        UiCommand::FetchEntity { purpose, request } => ApiEvent::Entity {
            purpose,
            resource: request.resource,
            generation: request.generation,
            result: client
                .get(&request.credential, request.resource, &request.id)
                .await,
        },
        UiCommand::Update(request) => ApiEvent::Updated {
            resource: request.resource,
            result: client
                .update(&request.credential, request.resource, &request.id, &request.body)
                .await,
        },
        UiCommand::Action(request) => {
            let result = match request.action {
                DetailAction::Unlock => client.unlock_user(&request.credential, &request.id).await,
                DetailAction::Refund => client
                    .refund_payment(&request.credential, &request.id)
                    .await
                    .map(|body| server_message(&body)),
            };
            ApiEvent::Action {
                action: request.action,
                result,
            }
        }
        UiCommand::FetchStats(request) => ApiEvent::Stats {
            generation: request.generation,
            result: client.statistics(&request.credential, request.range).await,
        },
        UiCommand::FetchSection(request) => ApiEvent::Section(fetch_section(client, request).await),
        UiCommand::FetchProfile(request) => ApiEvent::Profile {
            generation: request.generation,
            result: client.my_profile(&request.credential).await,
        },
    }
}

async fn fetch_section(client: &ApiClient, request: SectionRequest) -> SectionResult {
    match request {
        SectionRequest::Intermediaries {
            generation,
            credential,
        } => SectionResult::Intermediaries {
            generation,
            result: client.intermediaries(&credential).await,
        },
        SectionRequest::Clients {
            intermediary,
            generation,
            credential,
        } => {
            let result = match client.intermediary_clients(&credential, &intermediary).await {
                Ok(clients) => client
                    .client_quotes(&credential, &intermediary)
                    .await
                    .map(|quotes| ClientsInfo { clients, quotes }),
                Err(err) => Err(err),
            };
            SectionResult::Clients { generation, result }
        }
        SectionRequest::ClientQuotes {
            client: user_id,
            generation,
            credential,
        } => SectionResult::ClientQuotes {
            generation,
            result: client.client_quotes(&credential, &user_id).await,
        },
    }
}

/// The `message` field of a mutation response, empty when absent.
pub fn server_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn reload_rebuilds_client_for_new_base_url() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://a.example\"\n").expect("write");
        let store = ConfigStore::new(Config::load_from(&path).expect("load"), path.clone());
        let client = ApiClient::new(&store.get().api).expect("client");
        let mut slot = ClientSlot::new(store.clone(), client);
        assert_eq!(slot.current().base_url(), "http://a.example");

        std::fs::write(&path, "[api]\nbase_url = \"http://b.example/\"\n").expect("write");
        store.reload().expect("reload");
        assert_eq!(slot.current().base_url(), "http://b.example");
    }

    #[test]
    fn unchanged_api_section_keeps_client() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://a.example\"\n").expect("write");
        let store = ConfigStore::new(Config::load_from(&path).expect("load"), path.clone());
        let client = ApiClient::new(&store.get().api).expect("client");
        let mut slot = ClientSlot::new(store.clone(), client);

        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://a.example\"\n[ui]\ndefault_page_size = 5\n",
        )
        .expect("write");
        store.reload().expect("reload");
        assert_eq!(slot.current().base_url(), "http://a.example");
        assert_eq!(slot.applied, store.get().api);
    }
}
