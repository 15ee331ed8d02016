mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use wave_shooter::{AudioCue, Difficulty, Direction, Input, Session, SessionPhase, Settings};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

#[derive(Parser, Debug)]
#[command(name = "wave_shooter", about = "Single-screen arcade shooter for the terminal")]
struct Args {
    /// Start straight away at this difficulty (easy, medium, hard)
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// JSON settings file overriding the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the RNG (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (RUST_LOG controls the level)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Stand-in for a sound system: rings the terminal bell for the loud cues.
struct TerminalAudio {
    muted: bool,
}

impl TerminalAudio {
    fn play<W: Write>(&self, out: &mut W, cue: AudioCue) -> std::io::Result<()> {
        log::debug!("audio cue {:?}", cue);
        if self.muted {
            return Ok(());
        }
        match cue {
            AudioCue::EnemyDestroyed | AudioCue::SessionEnd => {
                out.queue(Print("\x07"))?;
            }
            AudioCue::Fire | AudioCue::SessionStart => {}
        }
        Ok(())
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    last_score: Option<u32>,
) -> std::io::Result<Option<Difficulty>> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  WAVE  SHOOTER  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if let Some(score) = last_score {
        let last = format!("Last Score: {}", score);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(last.chars().count() as u16 / 2),
            cy.saturating_sub(5),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&last))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select difficulty:"))?;

    let options: &[(&str, Difficulty, Color, &str)] = &[
        ("1", Difficulty::Easy, Color::Green, "Slow formation"),
        ("2", Difficulty::Medium, Color::Yellow, "Balanced challenge"),
        ("3", Difficulty::Hard, Color::Red, "Fast and relentless!"),
    ];

    for (i, (key, difficulty, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", difficulty.as_str().to_uppercase())))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" - {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            })) => match code {
                KeyCode::Char('1') => return Ok(Some(Difficulty::Easy)),
                KeyCode::Char('2') => return Ok(Some(Difficulty::Medium)),
                KeyCode::Char('3') => return Ok(Some(Difficulty::Hard)),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(None),
                _ => {}
            },
            Ok(_) => {}
            Err(_) => return Ok(None),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum LoopExit {
    Quit,
    Menu,
}

/// Held keys are tracked in a `key_frame` map holding the frame number of the
/// last press/repeat event per key.  Each frame the fresh keys are folded
/// into left/right hold state and forwarded to the session only when they
/// change, so the session sees clean press/release signals on terminals
/// with and without key-release reporting.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    audio: &TerminalAudio,
    clock: Instant,
) -> anyhow::Result<LoopExit> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut held = (false, false);
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        let now_ms = clock.elapsed().as_millis() as u64;
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            if session.is_running() {
                                session.terminate()?;
                            }
                            return Ok(LoopExit::Quit);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            if session.is_running() {
                                session.terminate()?;
                            }
                            return Ok(LoopExit::Quit);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if session.phase() == SessionPhase::Terminated =>
                        {
                            return Ok(LoopExit::Menu);
                        }
                        KeyCode::Char(' ') => {
                            session.handle_input(Input::Fire, now_ms);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Fold held keys into press/release signals ────────────────────────
        let left = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]
            .iter()
            .any(|k| is_held(&key_frame, k, frame));
        let right = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]
            .iter()
            .any(|k| is_held(&key_frame, k, frame));
        if left != held.0 {
            let input = if left { Input::Press(Direction::Left) } else { Input::Release(Direction::Left) };
            session.handle_input(input, now_ms);
        }
        if right != held.1 {
            let input = if right { Input::Press(Direction::Right) } else { Input::Release(Direction::Right) };
            session.handle_input(input, now_ms);
        }
        held = (left, right);

        session.pump(now_ms, rng);

        for event in session.drain_events() {
            if let Some(cue) = event.audio_cue() {
                audio.play(out, cue)?;
            }
        }

        display::render(out, &session.frame())?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: Option<&PathBuf>) -> anyhow::Result<()> {
    // The terminal is in raw mode, so logs only ever go to a file.
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("installing logger")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    log::info!("Wave Shooter starting ({}x{} field)", settings.field_width, settings.field_height);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let audio = TerminalAudio { muted: args.mute };
    let result = run(&mut out, &rx, settings, rng, args.difficulty, &audio);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: Settings,
    mut rng: StdRng,
    mut preselected: Option<Difficulty>,
    audio: &TerminalAudio,
) -> anyhow::Result<()> {
    let clock = Instant::now();
    let mut session = Session::new(settings);
    let mut last_score = None;

    loop {
        let difficulty = match preselected.take() {
            Some(d) => d,
            None => match show_menu(out, rx, last_score)? {
                Some(d) => d,
                None => break,
            },
        };

        session.start(difficulty, clock.elapsed().as_millis() as u64, &mut rng)?;
        let exit = game_loop(out, &mut session, rx, &mut rng, audio, clock)?;

        last_score = session.final_score();
        if session.phase() == SessionPhase::Terminated {
            session.reset()?;
        }
        if let LoopExit::Quit = exit {
            break;
        }
    }
    Ok(())
}
