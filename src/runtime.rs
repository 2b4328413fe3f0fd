//! Input plumbing for the interactive loop.
//!
//! Terminal input is read on its own thread and stamped there, so keystroke
//! timing does not depend on how long a redraw took. When nothing arrives
//! within the refresh interval the loop gets a [`AppEvent::Refresh`] instead.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::debug;

#[derive(Clone, Debug)]
pub enum AppEvent {
    /// a key press, stamped when it was read
    Key { key: KeyEvent, at: Instant },
    Resize,
    /// the live display is due for a redraw; timed sessions may expire
    Refresh { at: Instant },
}

impl AppEvent {
    /// A key press stamped now.
    pub fn key(key: KeyEvent) -> Self {
        AppEvent::Key {
            key,
            at: Instant::now(),
        }
    }
}

pub trait EventSource {
    fn next_within(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Any channel of events is a source; tests feed one directly.
impl EventSource for Receiver<AppEvent> {
    fn next_within(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.recv_timeout(timeout)
    }
}

/// Start reading terminal input in the background. Key releases, reported
/// on some platforms, are dropped. The channel disconnects when the terminal
/// stops producing events.
pub fn terminal_events() -> Receiver<AppEvent> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || loop {
        let evt = match event::read() {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => AppEvent::key(key),
            Ok(Event::Resize(_, _)) => AppEvent::Resize,
            Ok(_) => continue,
            Err(e) => {
                debug!("terminal input closed: {}", e);
                break;
            }
        };
        if tx.send(evt).is_err() {
            break;
        }
    });

    rx
}

/// Paces the interactive loop: every call yields the next input event, or a
/// refresh once `interval` passes without one.
pub struct RefreshLoop<S: EventSource> {
    source: S,
    interval: Duration,
}

impl<S: EventSource> RefreshLoop<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self { source, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_event(&self) -> AppEvent {
        match self.source.next_within(self.interval) {
            Ok(evt) => evt,
            Err(RecvTimeoutError::Timeout) => AppEvent::Refresh { at: Instant::now() },
            // a closed source returns at once; keep the refresh pace anyway
            Err(RecvTimeoutError::Disconnected) => {
                thread::sleep(self.interval);
                AppEvent::Refresh { at: Instant::now() }
            }
        }
    }
}
