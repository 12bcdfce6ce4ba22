use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use crate::ui::worker::ApiEvent;

/// Result of a worker task, tagged with the screen that asked for it.
#[derive(Debug)]
pub struct Tagged<T> {
    pub screen: u64,
    pub inner: T,
}

#[derive(Debug)]
pub enum AppEvent {
    Input(KeyEvent),
    Tick,
    Resize(u16, u16),
    Api(Tagged<ApiEvent>),
}

pub struct EventHandler {
    rx: Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    /// Spawn the input thread. Keys, resizes and ticks arrive on one channel
    /// shared with the API worker.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let event_tx = tx.clone();

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .saturating_sub(last_tick.elapsed())
                    .min(Duration::from_millis(50));

                match event::poll(timeout) {
                    Ok(true) => {
                        let sent = match event::read() {
                            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                                event_tx.send(AppEvent::Input(key))
                            }
                            Ok(Event::Resize(cols, rows)) => {
                                event_tx.send(AppEvent::Resize(cols, rows))
                            }
                            Ok(_) => Ok(()),
                            Err(err) => {
                                tracing::error!(error = %err, "terminal read failed");
                                break;
                            }
                        };
                        if sent.is_err() {
                            break;
                        }
                    }
                    Ok(false) => {}
                    Err(err) => {
                        tracing::error!(error = %err, "terminal poll failed");
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if event_tx.send(AppEvent::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { rx, tx }
    }

    pub fn next(&self, timeout: Duration) -> Result<AppEvent, mpsc::RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }
}
