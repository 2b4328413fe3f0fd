use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gti::app::{Action, App, AppState, Plan};
use gti::config::Config;
use gti::history::HistoryLog;
use gti::quotes::CustomText;
use gti::runtime::{AppEvent, RefreshLoop};
use gti::session::Mode;

fn key(c: char) -> AppEvent {
    AppEvent::key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Drives the app through the refresh loop the binary uses, without a TTY.
fn drive(app: &mut App, events: &RefreshLoop<Receiver<AppEvent>>, max_steps: u32) -> bool {
    (0..max_steps).any(|_| app.handle(events.next_event()) == Action::Quit)
}

#[test]
fn headless_quote_flow_records_history() {
    let dir = tempfile::tempdir().unwrap();
    let history_path = dir.path().join("history.jsonl");
    let mut app = App::new(
        Config::default(),
        HistoryLog::new(&history_path, true),
        Plan::Quote {
            source: Box::new(CustomText("hid".to_string())),
            count: 1,
        },
    );

    let (tx, rx) = mpsc::channel();
    let events = RefreshLoop::new(rx, Duration::from_millis(5));
    let backspace = AppEvent::key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
    for ev in [key('h'), key('x'), backspace, key('i'), key('d')] {
        tx.send(ev).unwrap();
    }

    drive(&mut app, &events, 50);

    assert_eq!(app.state, AppState::Results);
    let record = &app.outcome.as_ref().unwrap().record;
    assert_eq!(record.mode, Mode::Quote);
    assert_eq!(record.text_length, 3);
    assert_eq!(record.metrics.corrected_errors, 1);
    assert_eq!(record.metrics.uncorrected_errors, 0);
    assert_eq!(record.metrics.backspace_count, 1);

    let saved = HistoryLog::new(&history_path, true).load().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].metrics, record.metrics);
}

#[test]
fn escape_quits_without_recording() {
    let dir = tempfile::tempdir().unwrap();
    let history_path = dir.path().join("history.jsonl");
    let mut app = App::new(
        Config::default(),
        HistoryLog::new(&history_path, true),
        Plan::Quote {
            source: Box::new(CustomText("hello".to_string())),
            count: 1,
        },
    );

    let (tx, rx) = mpsc::channel();
    let events = RefreshLoop::new(rx, Duration::from_millis(5));
    tx.send(key('h')).unwrap();
    tx.send(AppEvent::key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
        .unwrap();

    assert!(drive(&mut app, &events, 50));
    assert_eq!(app.state, AppState::Typing);
    assert!(!history_path.exists());
}
