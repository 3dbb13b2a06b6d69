use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use tapr::content::Mode;
use tapr::runtime::{Runner, TermEvent, TestEventSource};
use tapr::session::{Effect, KeyInput, Session, State};

// Headless integration using the internal runtime + Session without a TTY:
// the same event plumbing the binary uses, fed from a channel.

fn key(code: KeyCode) -> TermEvent {
    TermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

#[test]
fn headless_round_autocompletes() {
    let mut session = Session::new();
    session.set_mode(Mode::Words);
    session.reset_with("hi ok".to_string());

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));

    for c in "hi ok".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }

    let mut finished = false;
    for _ in 0..100u32 {
        if let TermEvent::Key(k) = runner.step().unwrap() {
            if session.handle_key(k.into()) == Effect::ShowResults {
                finished = true;
                break;
            }
        }
    }

    assert!(finished, "round should auto-complete when lengths match");
    assert_eq!(session.state(), State::Results);
    assert_eq!(session.accuracy(), 100.0);
    assert_eq!(session.correct_char_count(), 5);
}

#[test]
fn headless_submission_restart_and_quit_flow() {
    let mut session = Session::new();
    session.set_mode(Mode::Sentence);
    session.reset_with("typing practice".to_string());

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));

    // Type a partial input, then submit with Enter.
    for c in "typ".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();

    let mut last = Effect::Redraw;
    for _ in 0..100u32 {
        if let TermEvent::Key(k) = runner.step().unwrap() {
            last = session.handle_key(k.into());
            if last == Effect::ShowResults {
                break;
            }
        }
    }

    assert_eq!(last, Effect::ShowResults);
    assert_eq!(session.state(), State::Results);
    assert_eq!(session.progress(), (3, 15));

    // Any key restarts in the same mode; the driver performs the reset.
    assert_eq!(session.handle_key(KeyInput::Char(' ')), Effect::Restart);
    session.reset_with("again".to_string());
    assert_eq!(session.state(), State::Typing);
    assert_eq!(session.progress(), (0, 5));
    assert_eq!(session.mode, Some(Mode::Sentence));

    // Finish once more and quit from the results screen.
    session.handle_key(KeyInput::Enter);
    assert_eq!(session.handle_key(KeyInput::Char('q')), Effect::Quit);
    assert_eq!(session.state(), State::Terminated);
}

#[test]
fn headless_mode_switch_from_results() {
    let mut session = Session::new();
    session.set_mode(Mode::Words);
    session.reset_with("ab".to_string());

    session.handle_key(KeyInput::Char('a'));
    session.handle_key(KeyInput::Char('b'));
    assert_eq!(session.state(), State::Results);

    assert_eq!(session.handle_key(KeyInput::Char('m')), Effect::SelectMode);
    assert_eq!(session.state(), State::ModeSelect);
    assert_eq!(session.mode, None, "mode selection must run again");
}

#[test]
fn headless_ticks_do_not_disturb_the_session() {
    let mut session = Session::new();
    session.set_mode(Mode::Sentence);
    session.reset_with("abc".to_string());

    let (_tx, rx) = mpsc::channel::<TermEvent>();
    let mut runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(1));

    for _ in 0..10u32 {
        match runner.step().unwrap() {
            TermEvent::Tick => {}
            other => panic!("expected only ticks, got {other:?}"),
        }
    }

    assert_eq!(session.state(), State::Typing);
    assert!(!session.has_started());
    assert_eq!(session.progress(), (0, 3));
}
