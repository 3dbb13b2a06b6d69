use std::time::{Duration, SystemTime};

use crossterm::event::{KeyCode, KeyEvent};
use rand::Rng;

use crate::content::{self, Mode};

/// Lifecycle of one process run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    ModeSelect,
    Typing,
    Results,
    Terminated,
}

/// A single input event as seen by the state machine, already stripped of
/// terminal-specific detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    Enter,
    Esc,
    Other,
}

impl From<KeyEvent> for KeyInput {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char(c) => KeyInput::Char(c),
            KeyCode::Backspace => KeyInput::Backspace,
            KeyCode::Enter => KeyInput::Enter,
            KeyCode::Esc => KeyInput::Esc,
            _ => KeyInput::Other,
        }
    }
}

/// What the driver must do after a key has been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Repaint the current view.
    Redraw,
    /// The attempt concluded; paint the results view.
    ShowResults,
    /// Regenerate the target and start a fresh attempt in the same mode.
    Restart,
    /// Mode was cleared; run the selection prompt before the next attempt.
    SelectMode,
    /// Tear down the terminal and exit.
    Quit,
}

/// Per-character classification of the target text against the input buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharOutcome {
    Correct,
    Incorrect,
    Pending,
}

/// State for one run of the typing test: the current mode, the target text,
/// the evolving input buffer and the timing boundaries of the attempt.
///
/// The session never touches the terminal. Keys arrive as [`KeyInput`],
/// transitions are reported back as [`Effect`], and all metrics are derived
/// from `input` and `target` on every call rather than cached.
#[derive(Debug)]
pub struct Session {
    /// Selected once per round group; survives restarts until cleared with
    /// "m" on the results screen.
    pub mode: Option<Mode>,
    /// Immutable for the duration of one attempt.
    pub target: String,
    pub input: String,
    pub started_at: Option<SystemTime>,
    pub finished_at: Option<SystemTime>,
    state: State,
}

impl Session {
    pub fn new() -> Self {
        Self {
            mode: None,
            target: String::new(),
            input: String::new(),
            started_at: None,
            finished_at: None,
            state: State::ModeSelect,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
    }

    /// Start a fresh attempt with a target drawn for the current mode.
    /// An unset mode falls back to sentences, matching the selection default.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        let mode = self.mode.unwrap_or(Mode::Sentence);
        self.reset_with(content::target_text(mode, rng));
    }

    /// Start a fresh attempt against the given target. Idempotent.
    pub fn reset_with(&mut self, target: String) {
        self.target = target;
        self.input.clear();
        self.started_at = None;
        self.finished_at = None;
        self.state = State::Typing;
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Apply one key and report the resulting transition.
    pub fn handle_key(&mut self, key: KeyInput) -> Effect {
        match self.state {
            State::Terminated => Effect::Quit,
            State::ModeSelect => Effect::Redraw,
            State::Results => self.handle_restart_key(key),
            State::Typing => self.handle_typing_key(key),
        }
    }

    /// On the results screen the next keystroke decides what happens: "m"
    /// forces a fresh mode selection, "q" quits, anything else restarts in
    /// the same mode.
    fn handle_restart_key(&mut self, key: KeyInput) -> Effect {
        match key {
            KeyInput::Char(c) if c.eq_ignore_ascii_case(&'m') => {
                self.mode = None;
                self.state = State::ModeSelect;
                Effect::SelectMode
            }
            KeyInput::Char(c) if c.eq_ignore_ascii_case(&'q') => {
                self.state = State::Terminated;
                Effect::Quit
            }
            _ => Effect::Restart,
        }
    }

    fn handle_typing_key(&mut self, key: KeyInput) -> Effect {
        match key {
            KeyInput::Esc => {
                // Quit without showing results.
                self.state = State::Terminated;
                Effect::Quit
            }
            KeyInput::Backspace => {
                self.input.pop();
                Effect::Redraw
            }
            KeyInput::Enter => self.conclude(),
            KeyInput::Char(c) if matches!(c, ' '..='~') => {
                if self.input.is_empty() && self.started_at.is_none() {
                    self.started_at = Some(SystemTime::now());
                }
                self.input.push(c);
                if self.input.len() == self.target.len() {
                    // Auto-completion: typed length reached target length.
                    self.conclude()
                } else {
                    Effect::Redraw
                }
            }
            // Anything outside visible ASCII is ignored.
            KeyInput::Char(_) | KeyInput::Other => Effect::Redraw,
        }
    }

    fn conclude(&mut self) -> Effect {
        if self.finished_at.is_none() {
            self.finished_at = Some(SystemTime::now());
        }
        self.state = State::Results;
        Effect::ShowResults
    }

    /// Positions where the input matches the target. Trailing input beyond
    /// the target is neither counted nor penalized here, but it does grow the
    /// accuracy denominator.
    pub fn correct_char_count(&self) -> usize {
        self.input
            .chars()
            .zip(self.target.chars())
            .filter(|(typed, expected)| typed == expected)
            .count()
    }

    pub fn accuracy(&self) -> f64 {
        if self.input.is_empty() {
            return 0.0;
        }
        self.correct_char_count() as f64 / self.input.len() as f64 * 100.0
    }

    /// Words per minute over the concluded attempt. Counts words actually
    /// typed (whitespace-separated tokens of the input), not words matched
    /// correctly; this is the observable contract of the test, kept as is.
    pub fn wpm(&self) -> u32 {
        let (Some(started), Some(finished)) = (self.started_at, self.finished_at) else {
            return 0;
        };
        let elapsed = finished.duration_since(started).unwrap_or_default();
        if elapsed.is_zero() {
            return 0;
        }
        let words_typed = self.input.split_whitespace().count() as f64;
        (words_typed / (elapsed.as_secs_f64() / 60.0)).round() as u32
    }

    /// (characters typed, target length)
    pub fn progress(&self) -> (usize, usize) {
        (self.input.len(), self.target.len())
    }

    /// Running time while the attempt is active, final time once concluded.
    pub fn elapsed(&self) -> Duration {
        match (self.started_at, self.finished_at) {
            (Some(started), Some(finished)) => {
                finished.duration_since(started).unwrap_or_default()
            }
            (Some(started), None) => started.elapsed().unwrap_or_default(),
            _ => Duration::ZERO,
        }
    }

    /// Classification of every target position for the renderer. The cursor
    /// sits at [`Self::cursor_pos`].
    pub fn char_outcomes(&self) -> Vec<CharOutcome> {
        let typed = self.input.as_bytes();
        self.target
            .bytes()
            .enumerate()
            .map(|(idx, expected)| match typed.get(idx) {
                Some(&c) if c == expected => CharOutcome::Correct,
                Some(_) => CharOutcome::Incorrect,
                None => CharOutcome::Pending,
            })
            .collect()
    }

    pub fn cursor_pos(&self) -> usize {
        self.input.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
