use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the round loop.
#[derive(Clone, Debug)]
pub enum TermEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize).
pub trait EventSource {
    /// Wait up to `timeout` for the next event; `None` means the timeout
    /// expired without one.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TermEvent>>;
}

/// Production event source backed by crossterm.
///
/// Deliberately poll-based rather than a background reader thread: while the
/// mode-selection prompt runs in cooked mode, nothing may be consuming
/// terminal input behind stdin's back.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrosstermEventSource;

impl EventSource for CrosstermEventSource {
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TermEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            CtEvent::Key(key) => Ok(Some(TermEvent::Key(key))),
            CtEvent::Resize(_, _) => Ok(Some(TermEvent::Resize)),
            _ => Ok(None),
        }
    }
}

/// Channel-fed event source for headless tests.
pub struct TestEventSource {
    rx: Receiver<TermEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TermEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TermEvent>> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Ok(Some(ev)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => Ok(None),
        }
    }
}

/// Advances the application one event at a time, substituting a `Tick` when
/// the tick interval passes without input. Ticks drive the live elapsed-time
/// display during an active attempt.
pub struct Runner<E: EventSource> {
    events: E,
    tick_interval: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(events: E, tick_interval: Duration) -> Self {
        Self {
            events,
            tick_interval,
        }
    }

    /// Blocks up to one tick interval and returns the next event.
    pub fn step(&mut self) -> io::Result<TermEvent> {
        Ok(self
            .events
            .poll_event(self.tick_interval)?
            .unwrap_or(TermEvent::Tick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, Duration::from_millis(1));

        match runner.step().unwrap() {
            TermEvent::Tick => {}
            other => panic!("expected Tick on timeout, got {other:?}"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(TermEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, Duration::from_millis(10));

        match runner.step().unwrap() {
            TermEvent::Resize => {}
            other => panic!("expected Resize event, got {other:?}"),
        }
    }

    #[test]
    fn step_returns_tick_when_sender_dropped() {
        let (tx, rx) = mpsc::channel::<TermEvent>();
        drop(tx);
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, Duration::from_millis(1));

        match runner.step().unwrap() {
            TermEvent::Tick => {}
            other => panic!("expected Tick after disconnect, got {other:?}"),
        }
    }
}
