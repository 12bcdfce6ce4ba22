use std::time::{Duration, Instant};

use serde_json::Value;

use crate::api::{ApiError, Resource};
use crate::config::{ConfigStore, Credential};
use crate::controller::{
    ConfirmPrompt, DashboardController, DetailAction, DetailController, EditController,
    EditOutcome, ListController, ProfileController, SignInController, SubmitError,
};
use crate::session::{Session, SessionStore};
use crate::ui::events::Tagged;
use crate::ui::notice::{Notice, NoticeQueue};
use crate::ui::pagination::PageSize;
use crate::ui::route::Route;
use crate::ui::worker::{ApiEvent, EntityPurpose, UiCommand, UiCommandSender};

/// Navigation tabs shown in the header, in order.
pub const NAV: [Route; 7] = [
    Route::Dashboard,
    Route::List(Resource::User),
    Route::List(Resource::Vehicle),
    Route::List(Resource::Auction),
    Route::List(Resource::Bid),
    Route::List(Resource::Transaction),
    Route::List(Resource::Query),
];

pub enum Screen {
    SignIn(SignInController),
    Dashboard(DashboardController),
    Profile(ProfileController),
    List(ListController),
    Detail(DetailController),
    NotFound(String),
}

/// What a yes/no prompt will do once answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirm {
    Delete,
    Action(DetailAction),
}

pub struct App {
    should_quit: bool,
    route: Route,
    screen: Screen,
    /// Bumped on every navigation; results for older screens are dropped.
    screen_serial: u64,
    session: Option<Session>,
    session_store: SessionStore,
    config: ConfigStore,
    page_size: PageSize,
    notices: NoticeQueue,
    confirm: Option<(ConfirmPrompt, PendingConfirm)>,
    edit: Option<EditController>,
    search_active: bool,
    sender: Option<UiCommandSender>,
    size: Option<(u16, u16)>,
}

impl App {
    pub fn new(config: ConfigStore, session_store: SessionStore, session: Option<Session>) -> Self {
        let current = config.get();
        let mut app = Self {
            should_quit: false,
            route: Route::SignIn,
            screen: Screen::SignIn(SignInController::new()),
            screen_serial: 0,
            session,
            session_store,
            config,
            page_size: current.default_page_size(),
            notices: NoticeQueue::new(Duration::from_secs(current.ui.notice_ttl_seconds)),
            confirm: None,
            edit: None,
            search_active: false,
            sender: None,
            size: None,
        };
        let start = if app.session.is_some() {
            Route::Dashboard
        } else {
            Route::SignIn
        };
        app.navigate(start);
        app
    }

    pub fn set_sender(&mut self, sender: UiCommandSender) {
        self.sender = Some(sender);
        self.pump_effects();
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    pub fn confirm(&self) -> Option<&ConfirmPrompt> {
        self.confirm.as_ref().map(|(prompt, _)| prompt)
    }

    pub fn edit(&self) -> Option<&EditController> {
        self.edit.as_ref()
    }

    pub fn edit_mut(&mut self) -> Option<&mut EditController> {
        self.edit.as_mut()
    }

    pub fn search_active(&self) -> bool {
        self.search_active
    }

    pub fn set_search_active(&mut self, active: bool) {
        self.search_active = active && matches!(self.screen, Screen::List(_));
    }

    /// True while keys go to a text field rather than to shortcuts.
    pub fn is_typing(&self) -> bool {
        self.edit.is_some() || self.search_active || matches!(self.screen, Screen::SignIn(_))
    }

    pub fn size(&self) -> Option<(u16, u16)> {
        self.size
    }

    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        self.size = Some((cols, rows));
    }

    pub fn on_tick(&mut self) {
        self.notices.expire(Instant::now());
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice, Instant::now());
    }

    /// Re-read the config file. New page size applies to lists mounted later.
    pub fn reload_config(&mut self) {
        match self.config.reload() {
            Ok(()) => {
                let config = self.config.get();
                self.page_size = config.default_page_size();
                self.notices
                    .set_ttl(Duration::from_secs(config.ui.notice_ttl_seconds));
                self.notify(Notice::info("Configuration reloaded."));
            }
            Err(err) => self.notify(Notice::error(err.to_string())),
        }
    }

    fn credential(&self) -> Option<Credential> {
        self.session.as_ref().map(Session::credential)
    }

    /// Switch screens. Every route but sign-in needs an admin session.
    pub fn navigate(&mut self, route: Route) {
        let route = route.guard(self.session.as_ref());
        let credential = self.credential();
        tracing::info!(path = %route.path(), "navigate");

        self.screen = match &route {
            Route::SignIn => Screen::SignIn(SignInController::new()),
            Route::Dashboard => Screen::Dashboard(DashboardController::new(credential)),
            Route::Profile => Screen::Profile(ProfileController::new(credential)),
            Route::List(resource) => {
                Screen::List(ListController::new(*resource, self.page_size, credential))
            }
            Route::Detail(resource, id) => {
                Screen::Detail(DetailController::new(*resource, id.clone(), credential))
            }
            Route::NotFound(path) => Screen::NotFound(path.clone()),
        };
        self.route = route;
        self.screen_serial = self.screen_serial.wrapping_add(1);
        self.confirm = None;
        self.edit = None;
        self.search_active = false;
        self.pump_effects();
    }

    /// Move along the header tabs.
    pub fn cycle_nav(&mut self, forward: bool) {
        if self.session.is_none() {
            return;
        }
        let current = NAV.iter().position(|route| *route == self.route);
        let next = match (current, forward) {
            (Some(index), true) => (index + 1) % NAV.len(),
            (Some(index), false) => (index + NAV.len() - 1) % NAV.len(),
            (None, _) => 0,
        };
        self.navigate(NAV[next].clone());
    }

    /// Back from a detail to its list, otherwise to the dashboard.
    pub fn go_back(&mut self) {
        let target = match &self.route {
            Route::Detail(resource, _) => Route::List(*resource),
            Route::SignIn => return,
            _ => Route::Dashboard,
        };
        self.navigate(target);
    }

    pub fn sign_out(&mut self) {
        if let Err(err) = self.session_store.clear() {
            tracing::warn!(error = %err, "failed to remove session file");
        }
        self.session = None;
        self.notify(Notice::info("Signed out."));
        self.navigate(Route::SignIn);
    }

    // ------------------------------------------------------------------
    // Screen actions
    // ------------------------------------------------------------------

    pub fn submit_sign_in(&mut self) {
        let Screen::SignIn(form) = &mut self.screen else {
            return;
        };
        match form.submit() {
            Ok(request) => {
                self.send_command(UiCommand::Login(request));
            }
            Err(SubmitError::InFlight) => {}
            Err(err) => self.notify(Notice::error(err.to_string())),
        }
    }

    pub fn open_selected(&mut self) {
        let Screen::List(list) = &self.screen else {
            return;
        };
        if let Some(id) = list.selected_id() {
            let route = Route::Detail(list.resource(), id);
            self.navigate(route);
        }
    }

    pub fn request_delete(&mut self) {
        let Screen::List(list) = &mut self.screen else {
            return;
        };
        let Some(id) = list.selected_id() else {
            return;
        };
        match list.request_delete(&id) {
            Some(prompt) => self.confirm = Some((prompt, PendingConfirm::Delete)),
            None => {
                let resource = list.resource();
                if !resource.can_delete() {
                    self.notify(Notice::info(format!(
                        "{} cannot be deleted.",
                        resource.plural()
                    )));
                }
            }
        }
    }

    /// Ask before an account action. Lists only offer unlock, on the row
    /// under the cursor.
    pub fn request_action(&mut self, action: DetailAction) {
        let prompt = match &mut self.screen {
            Screen::Detail(detail) => detail.request_action(action),
            Screen::List(list) if action == DetailAction::Unlock => list
                .selected_id()
                .and_then(|id| list.request_unlock(&id)),
            _ => None,
        };
        if let Some(prompt) = prompt {
            self.confirm = Some((prompt, PendingConfirm::Action(action)));
        }
    }

    /// Answer the open prompt. Declining sends nothing.
    pub fn answer_confirm(&mut self, accept: bool) {
        let Some((_, pending)) = self.confirm.take() else {
            return;
        };
        let command = match (pending, &mut self.screen) {
            (PendingConfirm::Delete, Screen::List(list)) => {
                list.confirm_delete(accept).map(UiCommand::Delete)
            }
            (PendingConfirm::Action(_), Screen::Detail(detail)) => {
                detail.confirm_action(accept).map(UiCommand::Action)
            }
            (PendingConfirm::Action(DetailAction::Unlock), Screen::List(list)) => {
                list.confirm_unlock(accept).map(UiCommand::Action)
            }
            _ => None,
        };
        if let Some(command) = command {
            self.send_command(command);
        }
    }

    /// Open the edit form for the entity on screen.
    pub fn open_edit(&mut self) {
        let credential = self.credential();
        let target = match &self.screen {
            Screen::Detail(detail) if detail.resource().can_edit() => {
                Some((detail.resource(), detail.id().to_string()))
            }
            Screen::Profile(profile) => profile.edit_target().map(|id| (Resource::User, id)),
            _ => None,
        };
        if let Some((resource, id)) = target {
            self.edit = Some(EditController::new(resource, id, credential));
            self.pump_effects();
        }
    }

    pub fn close_edit(&mut self) {
        self.edit = None;
    }

    pub fn submit_edit(&mut self) {
        let Some(edit) = &mut self.edit else {
            return;
        };
        match edit.submit() {
            Ok(request) => {
                self.send_command(UiCommand::Update(request));
            }
            Err(SubmitError::InFlight) => {}
            Err(err) => self.notify(Notice::error(err.to_string())),
        }
    }

    pub fn refetch(&mut self) {
        if !self.reset_screen_fetch() {
            return;
        }
        self.pump_effects();
    }

    /// Forget what the screen last asked for so the next pump asks again.
    fn reset_screen_fetch(&mut self) -> bool {
        match &mut self.screen {
            Screen::Dashboard(dashboard) => dashboard.refetch(),
            Screen::Profile(profile) => profile.refetch(),
            Screen::List(list) => list.refetch(),
            Screen::Detail(detail) => detail.refetch(),
            Screen::SignIn(_) | Screen::NotFound(_) => return false,
        }
        true
    }

    // ------------------------------------------------------------------
    // Effects
    // ------------------------------------------------------------------

    /// Send whatever requests the screen and the edit form want now.
    pub fn pump_effects(&mut self) {
        if self.sender.is_none() {
            return;
        }
        let mut commands = Vec::new();
        match &mut self.screen {
            Screen::Dashboard(dashboard) => {
                commands.extend(dashboard.poll_effect().map(UiCommand::FetchStats));
                commands.extend(
                    dashboard
                        .poll_section_effects()
                        .into_iter()
                        .map(UiCommand::FetchSection),
                );
            }
            Screen::Profile(profile) => {
                commands.extend(profile.poll_effect().map(UiCommand::FetchProfile));
            }
            Screen::List(list) => {
                commands.extend(list.poll_effect().map(UiCommand::FetchList));
            }
            Screen::Detail(detail) => {
                commands.extend(detail.poll_effect().map(|request| UiCommand::FetchEntity {
                    purpose: EntityPurpose::Detail,
                    request,
                }));
            }
            Screen::SignIn(_) | Screen::NotFound(_) => {}
        }
        let screen_commands = commands.len();
        if let Some(edit) = &mut self.edit {
            commands.extend(edit.poll_effect().map(|request| UiCommand::FetchEntity {
                purpose: EntityPurpose::Edit,
                request,
            }));
        }

        // A fetch that never left stays unissued, so R or the next pump retries.
        let mut screen_failed = false;
        let mut edit_failed = false;
        for (index, command) in commands.into_iter().enumerate() {
            if !self.send_command(command) {
                if index < screen_commands {
                    screen_failed = true;
                } else {
                    edit_failed = true;
                }
            }
        }
        if screen_failed {
            self.reset_screen_fetch();
        }
        if edit_failed {
            if let Some(edit) = &mut self.edit {
                edit.refetch();
            }
        }
    }

    fn send_command(&mut self, command: UiCommand) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };
        let name = command.name();
        match sender.try_send(Tagged {
            screen: self.screen_serial,
            inner: command,
        }) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(command = name, error = %err, "failed to queue command");
                self.notify(Notice::error("Could not send the request. Please try again."));
                false
            }
        }
    }

    /// Feed a worker result back into the screen that asked for it.
    pub fn on_api_event(&mut self, event: Tagged<ApiEvent>) {
        if event.screen != self.screen_serial {
            tracing::debug!(screen = event.screen, current = self.screen_serial, "result for a closed screen dropped");
            return;
        }

        let notice = match event.inner {
            ApiEvent::LoggedIn(result) => self.on_login_result(result),
            ApiEvent::Entity {
                purpose: EntityPurpose::Edit,
                generation,
                result,
                ..
            } => self
                .edit
                .as_mut()
                .and_then(|edit| edit.on_fetch_result(generation, result)),
            ApiEvent::Updated { result, .. } => self.on_update_result(result),
            other => self.on_screen_result(other),
        };

        if let Some(notice) = notice {
            self.notify(notice);
        }
        self.pump_effects();
    }

    fn on_login_result(&mut self, result: Result<Session, ApiError>) -> Option<Notice> {
        let Screen::SignIn(form) = &mut self.screen else {
            return None;
        };
        match form.on_result(result) {
            Ok(session) => {
                self.on_signed_in(session);
                None
            }
            Err(notice) => Some(notice),
        }
    }

    /// A saved edit closes the form and refetches what is behind it.
    fn on_update_result(&mut self, result: Result<Value, ApiError>) -> Option<Notice> {
        let edit = self.edit.as_mut()?;
        let (outcome, notice) = edit.on_update_result(result);
        if outcome == EditOutcome::Saved {
            self.edit = None;
            match &mut self.screen {
                Screen::Detail(detail) => detail.refetch(),
                Screen::Profile(profile) => profile.refetch(),
                _ => {}
            }
        }
        Some(notice)
    }

    fn on_screen_result(&mut self, event: ApiEvent) -> Option<Notice> {
        match (event, &mut self.screen) {
            (
                ApiEvent::List {
                    resource,
                    generation,
                    result,
                },
                Screen::List(list),
            ) if list.resource() == resource => list.on_list_result(generation, result),
            (ApiEvent::Deleted { resource, result }, Screen::List(list))
                if list.resource() == resource =>
            {
                Some(list.on_delete_result(result))
            }
            (
                ApiEvent::Entity {
                    resource,
                    generation,
                    result,
                    ..
                },
                Screen::Detail(detail),
            ) if detail.resource() == resource => detail.on_result(generation, result),
            (ApiEvent::Action { action, result }, Screen::Detail(detail)) => {
                Some(detail.on_action_result(action, result))
            }
            (
                ApiEvent::Action {
                    action: DetailAction::Unlock,
                    result,
                },
                Screen::List(list),
            ) => Some(list.on_unlock_result(result)),
            (ApiEvent::Stats { generation, result }, Screen::Dashboard(dashboard)) => {
                dashboard.on_result(generation, result)
            }
            (ApiEvent::Section(result), Screen::Dashboard(dashboard)) => {
                dashboard.on_section_result(result)
            }
            (ApiEvent::Profile { generation, result }, Screen::Profile(profile)) => {
                profile.on_result(generation, result)
            }
            (other, _) => {
                tracing::debug!(event = ?other, "result does not match the current screen");
                None
            }
        }
    }

    fn on_signed_in(&mut self, session: Session) {
        if let Err(err) = self.session_store.save(&session) {
            tracing::warn!(error = %err, "failed to persist session");
            self.notify(Notice::error(format!("Session not saved: {}", err)));
        }
        tracing::info!(user = %session.user.id, "signed in");
        self.notify(Notice::success(format!("Welcome, {}", session.user.name)));
        self.session = Some(session);
        self.navigate(Route::Dashboard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::UserIdentity;
    use tokio::sync::mpsc;

    fn admin() -> Session {
        Session::new(
            "tok",
            UserIdentity {
                id: "u1".to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                role: "admin".to_string(),
            },
        )
    }

    fn make_app(
        session: Option<Session>,
    ) -> (App, mpsc::Receiver<Tagged<UiCommand>>, tempfile::TempDir) {
        make_app_with_queue(session, 16)
    }

    fn make_app_with_queue(
        session: Option<Session>,
        queue: usize,
    ) -> (App, mpsc::Receiver<Tagged<UiCommand>>, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SessionStore::new(dir.path().join("session.json"));
        let config = ConfigStore::new(Config::default(), dir.path().join("config.toml"));
        let mut app = App::new(config, store, session);
        let (tx, rx) = mpsc::channel(queue);
        app.set_sender(tx);
        (app, rx, dir)
    }

    fn list_fetch(commands: Vec<Tagged<UiCommand>>) -> (u64, crate::controller::ListRequest) {
        let mut fetches: Vec<_> = commands
            .into_iter()
            .filter_map(|command| match command.inner {
                UiCommand::FetchList(request) => Some((command.screen, request)),
                _ => None,
            })
            .collect();
        assert_eq!(fetches.len(), 1, "expected exactly one list fetch");
        fetches.remove(0)
    }

    fn drain(rx: &mut mpsc::Receiver<Tagged<UiCommand>>) -> Vec<Tagged<UiCommand>> {
        let mut out = Vec::new();
        while let Ok(command) = rx.try_recv() {
            out.push(command);
        }
        out
    }

    #[test]
    fn signed_out_starts_at_sign_in() {
        let (app, mut rx, _dir) = make_app(None);
        assert_eq!(app.route(), &Route::SignIn);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn guarded_routes_redirect_without_session() {
        let (mut app, _rx, _dir) = make_app(None);
        app.navigate(Route::List(Resource::User));
        assert_eq!(app.route(), &Route::SignIn);
    }

    #[test]
    fn dashboard_mount_fetches_stats_and_intermediaries() {
        let (app, mut rx, _dir) = make_app(Some(admin()));
        assert_eq!(app.route(), &Route::Dashboard);
        let commands = drain(&mut rx);
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0].inner, UiCommand::FetchStats(_)));
        assert!(matches!(commands[1].inner, UiCommand::FetchSection(_)));
    }

    #[test]
    fn nav_cycles_to_users_list() {
        let (mut app, mut rx, _dir) = make_app(Some(admin()));
        drain(&mut rx);
        app.cycle_nav(true);
        assert_eq!(app.route(), &Route::List(Resource::User));
        let commands = drain(&mut rx);
        assert_eq!(commands.len(), 1);
        match &commands[0].inner {
            UiCommand::FetchList(request) => {
                assert_eq!(request.query.current_page, 1);
                assert_eq!(request.query.result_per_page, 10);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn results_for_closed_screens_are_dropped() {
        let (mut app, mut rx, _dir) = make_app(Some(admin()));
        let stale = drain(&mut rx).remove(0);
        app.cycle_nav(true);
        drain(&mut rx);

        app.on_api_event(Tagged {
            screen: stale.screen,
            inner: ApiEvent::Stats {
                generation: 1,
                result: Ok(serde_json::json!({"users": [{"total": 3}]})),
            },
        });
        assert!(matches!(app.screen(), Screen::List(_)));
        assert!(app.notices().is_empty());
    }

    #[test]
    fn reload_picks_up_page_size() {
        let (mut app, mut rx, dir) = make_app(Some(admin()));
        std::fs::write(
            dir.path().join("config.toml"),
            "[ui]\ndefault_page_size = 5\n",
        )
        .expect("write config");
        app.reload_config();
        app.navigate(Route::List(Resource::Auction));
        let request = drain(&mut rx)
            .into_iter()
            .find_map(|command| match command.inner {
                UiCommand::FetchList(request) => Some(request),
                _ => None,
            })
            .expect("list fetch");
        assert_eq!(request.query.result_per_page, 5);
    }

    #[test]
    fn sign_out_clears_session() {
        let (mut app, _rx, _dir) = make_app(Some(admin()));
        app.sign_out();
        assert!(app.session().is_none());
        assert_eq!(app.route(), &Route::SignIn);
    }

    #[test]
    fn declined_delete_sends_nothing() {
        let (mut app, mut rx, _dir) = make_app(Some(admin()));
        app.navigate(Route::List(Resource::Bid));
        let fetch = drain(&mut rx).pop().expect("list fetch");
        let UiCommand::FetchList(request) = fetch.inner else {
            panic!("expected list fetch");
        };
        app.on_api_event(Tagged {
            screen: fetch.screen,
            inner: ApiEvent::List {
                resource: Resource::Bid,
                generation: request.generation,
                result: Ok(crate::api::ListPage {
                    items: vec![serde_json::json!({"_id": "b1"})],
                    total_count: 1,
                    filtered_count: 1,
                }),
            },
        });

        app.request_delete();
        assert!(app.confirm().is_some());
        app.answer_confirm(false);
        assert!(app.confirm().is_none());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn user_list_unlock_refetches_once() {
        let (mut app, mut rx, _dir) = make_app(Some(admin()));
        app.navigate(Route::List(Resource::User));
        let (screen, request) = list_fetch(drain(&mut rx));
        app.on_api_event(Tagged {
            screen,
            inner: ApiEvent::List {
                resource: Resource::User,
                generation: request.generation,
                result: Ok(crate::api::ListPage {
                    items: vec![serde_json::json!({"_id": "u7", "is_locked": true})],
                    total_count: 1,
                    filtered_count: 1,
                }),
            },
        });

        app.request_action(DetailAction::Unlock);
        assert_eq!(app.confirm().map(|prompt| prompt.title.as_str()), Some("Unlock User"));
        app.answer_confirm(true);
        let commands = drain(&mut rx);
        assert_eq!(commands.len(), 1);
        match &commands[0].inner {
            UiCommand::Action(action) => {
                assert_eq!(action.action, DetailAction::Unlock);
                assert_eq!(action.id, "u7");
            }
            other => panic!("unexpected command {:?}", other),
        }

        app.on_api_event(Tagged {
            screen,
            inner: ApiEvent::Action {
                action: DetailAction::Unlock,
                result: Ok("User unlocked".to_string()),
            },
        });
        let (_, refetch) = list_fetch(drain(&mut rx));
        assert_eq!(refetch.query, request.query);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn reload_key_refetches_list() {
        let (mut app, mut rx, _dir) = make_app(Some(admin()));
        app.navigate(Route::List(Resource::Auction));
        let (_, first) = list_fetch(drain(&mut rx));
        app.refetch();
        let (_, second) = list_fetch(drain(&mut rx));
        assert_eq!(second.query, first.query);
        assert!(second.generation > first.generation);
    }

    #[test]
    fn full_queue_leaves_fetch_to_retry() {
        let (mut app, mut rx, _dir) = make_app_with_queue(Some(admin()), 1);
        // The dashboard's statistics fetch fills the queue.
        app.navigate(Route::List(Resource::Bid));
        assert!(!app.notices().is_empty());
        let queued = drain(&mut rx);
        assert!(queued
            .iter()
            .all(|command| !matches!(command.inner, UiCommand::FetchList(_))));

        app.pump_effects();
        list_fetch(drain(&mut rx));
    }
}
