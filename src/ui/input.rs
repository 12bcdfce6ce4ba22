use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::controller::DetailAction;
use crate::ui::app::{App, Screen};
use crate::ui::route::Route;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if is_ctrl_char(key, 'c') || is_ctrl_char(key, 'q') {
        app.request_quit();
        return;
    }
    if is_ctrl_char(key, 'r') {
        app.reload_config();
        return;
    }

    if app.confirm().is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.answer_confirm(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_confirm(false),
            _ => {}
        }
        app.pump_effects();
        return;
    }

    if app.edit().is_some() {
        handle_edit_key(app, key);
        app.pump_effects();
        return;
    }

    if app.search_active() {
        handle_search_key(app, key);
        app.pump_effects();
        return;
    }

    if matches!(app.screen(), Screen::SignIn(_)) {
        handle_sign_in_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Tab => app.cycle_nav(true),
        KeyCode::BackTab => app.cycle_nav(false),
        KeyCode::Esc => app.go_back(),
        KeyCode::Char('p') => app.navigate(Route::Profile),
        KeyCode::Char('L') => app.sign_out(),
        _ => handle_screen_key(app, key),
    }
    app.pump_effects();
}

fn handle_screen_key(app: &mut App, key: KeyEvent) {
    match app.screen() {
        Screen::List(_) => handle_list_key(app, key),
        Screen::Detail(_) => match key.code {
            KeyCode::Char('e') => app.open_edit(),
            KeyCode::Char('u') => app.request_action(DetailAction::Unlock),
            KeyCode::Char('r') => app.request_action(DetailAction::Refund),
            KeyCode::Char('R') => app.refetch(),
            _ => {}
        },
        Screen::Profile(_) => match key.code {
            KeyCode::Char('e') => app.open_edit(),
            KeyCode::Char('R') => app.refetch(),
            _ => {}
        },
        Screen::Dashboard(_) if key.code == KeyCode::Char('R') => app.refetch(),
        Screen::Dashboard(_) => {
            let Screen::Dashboard(dashboard) = app.screen_mut() else {
                return;
            };
            match key.code {
                KeyCode::Char('r') => dashboard.cycle_range(),
                KeyCode::Down | KeyCode::Char('j') => dashboard.panel_mut().select_next(),
                KeyCode::Up | KeyCode::Char('k') => dashboard.panel_mut().select_prev(),
                KeyCode::Enter => dashboard.panel_mut().toggle_selected(),
                _ => {}
            }
        }
        Screen::SignIn(_) | Screen::NotFound(_) => {}
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.open_selected();
            return;
        }
        KeyCode::Char('/') => {
            app.set_search_active(true);
            return;
        }
        KeyCode::Char('d') => {
            app.request_delete();
            return;
        }
        KeyCode::Char('u') => {
            app.request_action(DetailAction::Unlock);
            return;
        }
        KeyCode::Char('R') => {
            app.refetch();
            return;
        }
        _ => {}
    }
    let Screen::List(list) = app.screen_mut() else {
        return;
    };
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => list.select_next(),
        KeyCode::Up | KeyCode::Char('k') => list.select_prev(),
        KeyCode::Right | KeyCode::Char(']') => list.next_page(),
        KeyCode::Left | KeyCode::Char('[') => list.prev_page(),
        KeyCode::Char('s') => {
            let next = list.params().page_size.next();
            list.set_page_size(next);
        }
        KeyCode::Char('f') => list.cycle_filter(0),
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.set_search_active(false),
        KeyCode::Enter => {
            if let Screen::List(list) = app.screen_mut() {
                list.submit_search();
            }
            app.set_search_active(false);
        }
        KeyCode::Backspace => {
            if let Screen::List(list) = app.screen_mut() {
                list.backspace_search();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Screen::List(list) = app.screen_mut() {
                list.type_search(c);
            }
        }
        _ => {}
    }
}

fn handle_sign_in_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.request_quit(),
        KeyCode::Enter => app.submit_sign_in(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            if let Screen::SignIn(form) = app.screen_mut() {
                form.toggle_focus();
            }
        }
        KeyCode::Backspace => {
            if let Screen::SignIn(form) = app.screen_mut() {
                form.backspace();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Screen::SignIn(form) = app.screen_mut() {
                form.type_char(c);
            }
        }
        _ => {}
    }
}

fn handle_edit_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.close_edit();
            return;
        }
        KeyCode::Enter => {
            app.submit_edit();
            return;
        }
        _ => {}
    }
    let Some(edit) = app.edit_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::Down => edit.focus_next(),
        KeyCode::BackTab | KeyCode::Up => edit.focus_prev(),
        KeyCode::Left | KeyCode::Right => edit.cycle_option(),
        KeyCode::Backspace => edit.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => edit.type_char(c),
        _ => {}
    }
}

fn is_ctrl_char(key: KeyEvent, needle: char) -> bool {
    matches!(key.code, KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&needle))
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Resource;
    use crate::config::{Config, ConfigStore};
    use crate::session::{Session, SessionStore, UserIdentity};
    use crate::ui::events::Tagged;
    use crate::ui::worker::UiCommand;
    use crossterm::event::KeyEventState;
    use tokio::sync::mpsc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    fn list_app() -> (App, mpsc::Receiver<Tagged<UiCommand>>, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let session = Session::new(
            "tok",
            UserIdentity {
                id: "u1".to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                role: "admin".to_string(),
            },
        );
        let mut app = App::new(
            ConfigStore::new(Config::default(), dir.path().join("config.toml")),
            SessionStore::new(dir.path().join("session.json")),
            Some(session),
        );
        let (tx, mut rx) = mpsc::channel(32);
        app.set_sender(tx);
        app.navigate(Route::List(Resource::Vehicle));
        while rx.try_recv().is_ok() {}
        (app, rx, dir)
    }

    fn list_queries(rx: &mut mpsc::Receiver<Tagged<UiCommand>>) -> Vec<crate::api::ListQuery> {
        let mut out = Vec::new();
        while let Ok(command) = rx.try_recv() {
            if let UiCommand::FetchList(request) = command.inner {
                out.push(request.query);
            }
        }
        out
    }

    #[test]
    fn typing_search_fetches_only_on_enter() {
        let (mut app, mut rx, _dir) = list_app();
        handle_key(&mut app, press(KeyCode::Char('/')));
        for c in "Toyota".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        assert!(list_queries(&mut rx).is_empty());

        handle_key(&mut app, press(KeyCode::Enter));
        let queries = list_queries(&mut rx);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].keyword, "Toyota");
        assert!(!app.search_active());
    }

    #[test]
    fn page_size_key_resets_page() {
        let (mut app, mut rx, _dir) = list_app();
        handle_key(&mut app, press(KeyCode::Char('s')));
        let queries = list_queries(&mut rx);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].result_per_page, 15);
        assert_eq!(queries[0].current_page, 1);
    }

    #[test]
    fn filter_key_cycles_vehicle_type() {
        let (mut app, mut rx, _dir) = list_app();
        handle_key(&mut app, press(KeyCode::Char('f')));
        let queries = list_queries(&mut rx);
        assert_eq!(queries.len(), 1);
        assert_eq!(
            queries[0].filters.get("vehicle_type").map(String::as_str),
            Some("Car")
        );
    }

    #[test]
    fn ctrl_c_quits_from_any_screen() {
        let (mut app, _rx, _dir) = list_app();
        handle_key(
            &mut app,
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                kind: KeyEventKind::Press,
                state: KeyEventState::empty(),
            },
        );
        assert!(app.should_quit());
    }
}
