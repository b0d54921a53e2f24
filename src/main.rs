mod bell;
mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
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
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use asteroid_dodger::audio::AudioDirector;
use asteroid_dodger::modes::GameMode;
use asteroid_dodger::run::{format_time, BestRecord, Command, RunController, Transition};
use asteroid_dodger::settings::Settings;
use asteroid_dodger::store::JsonFileStore;

use bell::BellAudio;

const DEFAULT_CONFIG: &str = "asteroid_dodger.toml";

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 4;

/// Longest frame the simulation will swallow in one step.
const MAX_FRAME_DELTA_MS: u64 = 100;

#[derive(Parser, Debug)]
#[command(name = "asteroid_dodger", version, about = "Dodge waves of spinning obstacles in your terminal")]
struct Cli {
    /// TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Skip the menu and start in this mode (normal, hard, secret, dodger).
    #[arg(long)]
    mode: Option<GameMode>,
    /// Seed for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,
    /// Score file, overriding the settings.
    #[arg(long)]
    store: Option<PathBuf>,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

fn axis(negative: bool, positive: bool) -> i8 {
    i8::from(positive) - i8::from(negative)
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_settings(cli: &Cli) -> (Settings, Option<String>) {
    match &cli.config {
        Some(path) => Settings::load_or_default(path),
        None if Path::new(DEFAULT_CONFIG).exists() => Settings::load_or_default(DEFAULT_CONFIG),
        None => (Settings::default(), None),
    }
}

/// Log to a file; the terminal belongs to the game while it runs.
fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false);
    match File::create(&settings.log_path) {
        Ok(file) => builder.with_writer(Mutex::new(file)).init(),
        Err(_) => builder.with_writer(std::io::sink).init(),
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum MenuResult {
    Start(GameMode),
    ToggleMute,
    Quit,
}

fn menu_action(code: KeyCode, modifiers: KeyModifiers) -> Option<MenuResult> {
    match code {
        KeyCode::Char('1') => Some(MenuResult::Start(GameMode::Normal)),
        KeyCode::Char('2') => Some(MenuResult::Start(GameMode::Hard)),
        KeyCode::Char('3') => Some(MenuResult::Start(GameMode::Dodger)),
        KeyCode::Char('4') => Some(MenuResult::Start(GameMode::Secret)),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(MenuResult::Quit),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(MenuResult::ToggleMute),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(MenuResult::Quit),
        _ => None,
    }
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    store: &JsonFileStore,
    muted: bool,
) -> Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;
    let left = cx.saturating_sub(22);

    let title = "✶  ASTEROID  DODGER  ✶";
    out.queue(cursor::MoveTo(cx.saturating_sub(title.chars().count() as u16 / 2), cy.saturating_sub(7)))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(left, cy.saturating_sub(4)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select mode:"))?;

    let options: &[(&str, GameMode, Color, &str)] = &[
        ("1", GameMode::Normal, Color::Green, "Steady waves, generous power-ups"),
        ("2", GameMode::Hard, Color::Red, "Faster rocks, faster ship"),
        ("3", GameMode::Dodger, Color::Yellow, "Hard waves, normal ship"),
        ("4", GameMode::Secret, Color::Magenta, "★ Power-ups rain down"),
    ];

    for (i, (key, mode, color, desc)) in options.iter().enumerate() {
        let best = BestRecord::load(store, &mode.config());
        let row = cy.saturating_sub(2) + 2 * i as u16;
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{key}] ")))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", mode.config().label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" {desc}")))?;
        out.queue(cursor::MoveTo(left + 4, row + 1))?;
        out.queue(Print(format!("Best {}  Wave {}", format_time(best.time_ms), best.wave)))?;
    }

    let legend: &[(&str, Color, &str)] = &[
        ("»", Color::Green, " Speed    move faster"),
        ("~", Color::Red, " Slowdown obstacles crawl"),
        ("◆", Color::Magenta, " Shield   smash through obstacles"),
    ];
    for (i, (sym, color, desc)) in legend.iter().enumerate() {
        out.queue(cursor::MoveTo(left, cy + 7 + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*desc))?;
    }

    out.queue(cursor::MoveTo(left, cy + 11))?;
    out.queue(style::SetForegroundColor(if muted { Color::DarkGrey } else { Color::Cyan }))?;
    out.queue(Print(if muted { "Music: OFF" } else { "Music: ON" }))?;

    out.queue(cursor::MoveTo(left, cy + 13))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Arrows / WASD : Move   M : Music   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        let event = rx.recv().context("input thread stopped")?;
        let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. }) = event else {
            continue;
        };
        if let Some(result) = menu_action(code, modifiers) {
            return Ok(result);
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum LoopExit {
    Menu { muted: bool },
    Quit,
}

fn command_for(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char('0') => Some(Command::TogglePause),
        KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Char('1') => Some(Command::ToggleMute),
        KeyCode::Char('i') | KeyCode::Char('I') => Some(Command::ToggleInstructions),
        KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('2') => Some(Command::ReturnToMenu),
        _ => None,
    }
}

/// Input model: a `key_frame` map records the frame of the last press/repeat
/// for every key, and each frame the still-fresh direction keys become the
/// steering vector. Discrete keys act once on press.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    controller: &mut RunController<&mut StdRng, &mut JsonFileStore>,
    audio: &mut AudioDirector<BellAudio>,
    frame_time: Duration,
) -> Result<LoopExit> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(LoopExit::Quit),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(LoopExit::Quit);
                        }
                        _ => {}
                    }
                    if let Some(command) = command_for(code) {
                        if let Transition::ExitToMenu { muted } = controller.handle(command) {
                            audio.dispatch_all(&controller.drain_events());
                            return Ok(LoopExit::Menu { muted });
                        }
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let left = is_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame);
        let right = is_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame);
        let up = is_held(&key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame);
        let down = is_held(&key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame);
        controller.steer(axis(left, right), axis(up, down));

        let now = Instant::now();
        let delta_ms = (now.duration_since(last_tick).as_millis() as u64).min(MAX_FRAME_DELTA_MS);
        last_tick = now;
        controller.update(delta_ms);

        audio.dispatch_all(&controller.drain_events());
        let bell = audio.host_mut().take_bells() > 0;
        display::render(out, controller, bell)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (settings, settings_warning) = load_settings(&cli);
    init_tracing(&settings);
    if let Some(w) = settings_warning {
        warn!("settings ignored, using defaults: {w}");
    }

    let store_path = cli.store.clone().unwrap_or_else(|| settings.store_path.clone());
    let mut store = JsonFileStore::open(&store_path);
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(store = %store_path.display(), seed = ?cli.seed, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events where the terminal supports them.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &cli, &settings, &mut rng, &mut store);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        warn!("exiting on error: {e:#}");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    cli: &Cli,
    settings: &Settings,
    rng: &mut StdRng,
    store: &mut JsonFileStore,
) -> Result<()> {
    let frame_time = Duration::from_millis(settings.frame_ms.max(1));
    let mut muted = settings.muted;
    let mut pending_mode = cli.mode;

    loop {
        let mode = match pending_mode.take() {
            Some(mode) => mode,
            None => match show_menu(out, rx, store, muted)? {
                MenuResult::Start(mode) => mode,
                MenuResult::ToggleMute => {
                    muted = !muted;
                    info!(muted, "music toggled from menu");
                    continue;
                }
                MenuResult::Quit => break,
            },
        };

        let mut audio = AudioDirector::new(BellAudio::default(), muted);
        let mut controller = RunController::with_muted(mode, &mut *rng, &mut *store, muted);
        match game_loop(out, rx, &mut controller, &mut audio, frame_time)? {
            LoopExit::Menu { muted: m } => muted = m,
            LoopExit::Quit => break,
        }
    }
    info!("bye");
    Ok(())
}
