//! Raw-mode and alternate-screen setup that is undone on drop or panic.

use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};

use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

type Cleanup = Box<dyn FnOnce() + Send + 'static>;

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Runs its cleanup exactly once: on drop, or from the panic hook.
pub struct TerminalGuard {
    cleanup: Arc<Mutex<Option<Cleanup>>>,
}

impl TerminalGuard {
    fn new(cleanup: Cleanup) -> Self {
        Self {
            cleanup: Arc::new(Mutex::new(Some(cleanup))),
        }
    }

    fn install_panic_hook(&self) {
        let cleanup = Arc::clone(&self.cleanup);
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            run_once(&cleanup);
            default_hook(info);
        }));
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        run_once(&self.cleanup);
    }
}

fn run_once(slot: &Mutex<Option<Cleanup>>) {
    if let Ok(mut slot) = slot.lock() {
        if let Some(cleanup) = slot.take() {
            cleanup();
        }
    }
}

pub fn setup_terminal() -> io::Result<(AppTerminal, TerminalGuard)> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let guard = TerminalGuard::new(Box::new(|| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = stdout.execute(Show);
    }));
    guard.install_panic_hook();

    Ok((terminal, guard))
}
