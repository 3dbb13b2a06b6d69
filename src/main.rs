pub mod content;
pub mod runtime;
pub mod session;
pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    error::Error,
    io::{self, stdin, BufRead, Write},
    time::Duration,
};

use crate::content::Mode;
use crate::runtime::{CrosstermEventSource, EventSource, Runner, TermEvent};
use crate::session::{Effect, Session, State};

const TICK_RATE_MS: u64 = 100;

/// minimal typing test for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Measures typing speed and accuracy against a random sentence or a sequence of random words, with live per-character feedback."
)]
pub struct Cli {
    /// start directly in a mode, skipping the selection prompt
    #[clap(short, long, value_enum)]
    mode: Option<CliMode>,

    /// seed for deterministic target-text selection
    #[clap(long)]
    seed: Option<u64>,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum CliMode {
    Sentence,
    Words,
}

impl CliMode {
    fn as_mode(self) -> Mode {
        match self {
            CliMode::Sentence => Mode::Sentence,
            CliMode::Words => Mode::Words,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut session = Session::new();
    if let Some(mode) = cli.mode {
        session.set_mode(mode.as_mode());
    }

    let result = run(&mut session, &mut rng);

    // Best-effort restore so the terminal is usable even on an error path.
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);

    result
}

/// Outer loop: one iteration per group of rounds played in a single mode.
/// Raw mode and the alternate screen are held only while a round is active;
/// the mode prompt runs in cooked, line-buffered mode in between.
fn run(session: &mut Session, rng: &mut StdRng) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource,
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        if session.mode.is_none() {
            match prompt_mode()? {
                Some(mode) => session.set_mode(mode),
                // EOF on stdin: quit cleanly.
                None => return Ok(()),
            }
        }

        session.reset(rng);

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let outcome = run_rounds(&mut terminal, session, rng, &mut runner);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        match outcome? {
            RoundExit::SwitchMode => continue,
            RoundExit::Quit => return Ok(()),
        }
    }
}

#[derive(Debug)]
enum RoundExit {
    SwitchMode,
    Quit,
}

fn run_rounds<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    rng: &mut StdRng,
    runner: &mut Runner<E>,
) -> Result<RoundExit, Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*session, f.area()))?;

    loop {
        match runner.step()? {
            TermEvent::Tick => {
                // Repaint during an active attempt so the elapsed time moves.
                if session.state() == State::Typing && session.has_started() {
                    terminal.draw(|f| f.render_widget(&*session, f.area()))?;
                }
            }
            TermEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*session, f.area()))?;
            }
            TermEvent::Key(key) => {
                if is_ctrl_c(&key) {
                    return Ok(RoundExit::Quit);
                }
                match session.handle_key(key.into()) {
                    Effect::Redraw | Effect::ShowResults => {
                        terminal.draw(|f| f.render_widget(&*session, f.area()))?;
                    }
                    Effect::Restart => {
                        session.reset(rng);
                        terminal.draw(|f| f.render_widget(&*session, f.area()))?;
                    }
                    Effect::SelectMode => return Ok(RoundExit::SwitchMode),
                    Effect::Quit => return Ok(RoundExit::Quit),
                }
            }
        }
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Blocking, line-based mode selection. Runs in cooked mode so input is
/// echoed and delivered a full line at a time; re-prompts on anything but
/// "1" or "2". Returns `None` when stdin reaches EOF.
fn prompt_mode() -> io::Result<Option<Mode>> {
    let mut out = io::stdout();
    writeln!(out)?;
    writeln!(out, "Choose a mode:")?;
    writeln!(out, "  1) Sentences")?;
    writeln!(out, "  2) Random words")?;
    writeln!(out)?;

    let mut line = String::new();
    loop {
        write!(out, "Enter 1 or 2: ")?;
        out.flush()?;

        line.clear();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match line.trim() {
            "1" => return Ok(Some(Mode::Sentence)),
            "2" => return Ok(Some(Mode::Words)),
            _ => writeln!(out, "Invalid input!")?,
        }
    }
}
