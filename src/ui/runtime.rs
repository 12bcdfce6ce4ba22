use std::io;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::config::ConfigStore;
use crate::session::SessionStore;
use crate::ui::app::App;
use crate::ui::events::{AppEvent, EventHandler};
use crate::ui::input::handle_key;
use crate::ui::render::draw;
use crate::ui::route::Route;
use crate::ui::terminal_guard::setup_terminal;
use crate::ui::worker::{run_worker, ClientSlot};

const COMMAND_QUEUE: usize = 64;

/// Run the terminal UI until the user quits.
///
/// API calls run on a multi-threaded tokio runtime owned by this function;
/// drawing and key handling stay on the calling thread.
pub fn run(config: ConfigStore, session_store: SessionStore, initial: Option<Route>) -> io::Result<()> {
    let current = config.get();
    let client = ApiClient::new(&current.api).map_err(|err| io::Error::other(err.to_string()))?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let session = match session_store.load() {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unreadable session file");
            None
        }
    };

    let tick_rate = Duration::from_millis(current.ui.tick_rate_ms.max(16));
    let events = EventHandler::new(tick_rate);
    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);
    runtime.spawn(run_worker(
        ClientSlot::new(config.clone(), client),
        command_rx,
        events.sender(),
    ));

    let mut app = App::new(config, session_store, session);
    app.set_sender(command_tx);
    if let Some(route) = initial {
        app.navigate(route);
    }

    let (mut terminal, guard) = setup_terminal()?;
    if let Ok((cols, rows)) = crossterm::terminal::size() {
        app.on_resize(cols, rows);
    }
    tracing::info!(base_url = %current.api.base_url, "terminal ui started");

    loop {
        terminal.draw(|frame| draw(frame, &app))?;
        if app.should_quit() {
            break;
        }

        match events.next(tick_rate) {
            Ok(AppEvent::Input(key)) => handle_key(&mut app, key),
            Ok(AppEvent::Tick) => app.on_tick(),
            Ok(AppEvent::Resize(cols, rows)) => app.on_resize(cols, rows),
            Ok(AppEvent::Api(event)) => app.on_api_event(event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    drop(guard);
    drop(app);
    runtime.shutdown_timeout(Duration::from_millis(500));
    tracing::info!("terminal ui stopped");
    Ok(())
}
