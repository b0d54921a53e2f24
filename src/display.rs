/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the run.
/// No game logic is performed; the 800×600 field is scaled onto whatever
/// terminal grid is available and translated into crossterm commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use rand::Rng;

use asteroid_dodger::effects::EffectKind;
use asteroid_dodger::entities::{Obstacle, PowerUp, PowerUpKind, Vec2, FIELD_HEIGHT, FIELD_WIDTH};
use asteroid_dodger::modes::GameMode;
use asteroid_dodger::run::{format_time, RunController, RunPhase};
use asteroid_dodger::store::ScoreStore;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_TIME: Color = Color::Yellow;
const C_HUD_WAVE: Color = Color::Cyan;
const C_SHIP: Color = Color::White;
const C_SHIP_BOOSTED: Color = Color::Yellow;
const C_SHIP_SHIELDED: Color = Color::Magenta;
const C_OBSTACLE: Color = Color::Grey;
const C_OBSTACLE_SLOWED: Color = Color::DarkCyan;
const C_SPEED: Color = Color::Green;
const C_SLOWDOWN: Color = Color::Red;
const C_SHIELD: Color = Color::Magenta;
const C_WARNING: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

const SPIN_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Terminal rows taken by the HUD above and the hint line below the field.
const HUD_ROWS: u16 = 2;

// ── Field → grid mapping ──────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Grid {
    width: u16,
    height: u16,
}

impl Grid {
    fn inner_cols(self) -> f32 {
        f32::from(self.width.saturating_sub(3).max(1))
    }

    fn inner_rows(self) -> f32 {
        f32::from(self.height.saturating_sub(HUD_ROWS + 3).max(1))
    }

    /// Cell for a field position, `None` when it lies outside the field.
    fn cell(self, pos: Vec2) -> Option<(u16, u16)> {
        if !(0.0..=FIELD_WIDTH).contains(&pos.x) || !(0.0..=FIELD_HEIGHT).contains(&pos.y) {
            return None;
        }
        let col = 1 + (pos.x / FIELD_WIDTH * self.inner_cols()).round() as u16;
        let row = HUD_ROWS + (pos.y / FIELD_HEIGHT * self.inner_rows()).round() as u16;
        Some((col, row))
    }

    fn center_col(self, text: &str) -> u16 {
        (self.width / 2).saturating_sub(text.chars().count() as u16 / 2)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write, R: Rng, S: ScoreStore>(
    out: &mut W,
    game: &RunController<R, S>,
    bell: bool,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let grid = Grid { width, height };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, grid)?;
    draw_hud(out, grid, game)?;

    let world = game.world();
    for obstacle in &world.obstacles {
        draw_obstacle(out, grid, obstacle)?;
    }
    for power_up in world.power_ups.iter() {
        draw_power_up(out, grid, power_up)?;
    }
    draw_ship(out, grid, game)?;

    if let Some(seconds) = game.countdown_seconds() {
        draw_wave_warning(out, grid, seconds)?;
    }
    draw_controls_hint(out, grid, game)?;

    match game.phase() {
        RunPhase::NotStarted => draw_start_hint(out, grid)?,
        RunPhase::Paused => draw_pause(out, grid, game.instructions_visible())?,
        RunPhase::GameOver => draw_game_over(out, grid, game)?,
        RunPhase::Running => {}
    }

    if bell {
        out.queue(Print('\x07'))?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, grid: Grid) -> std::io::Result<()> {
    let w = grid.width as usize;
    let h = grid.height;
    let top = HUD_ROWS - 1;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, top))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in HUD_ROWS..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(grid.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write, R: Rng, S: ScoreStore>(
    out: &mut W,
    grid: Grid,
    game: &RunController<R, S>,
) -> std::io::Result<()> {
    let best = game.best();

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(format!(
        "Time: {}  Best: {}",
        format_time(game.score_ms()),
        format_time(best.time_ms)
    )))?;

    let label = format!("[ {} ]", game.config().label.to_uppercase());
    out.queue(cursor::MoveTo(grid.center_col(&label), 0))?;
    out.queue(style::SetForegroundColor(mode_color(game.mode())))?;
    out.queue(Print(&label))?;

    let mut tags: Vec<(String, Color)> = Vec::new();
    let effects = game.effects();
    for (kind, glyph, name, color) in [
        (EffectKind::SpeedBoost, "»", "SPEED", C_SPEED),
        (EffectKind::Shield, "◆", "SHIELD", C_SHIELD),
        (EffectKind::Slowdown, "~", "SLOW", C_SLOWDOWN),
    ] {
        if let Some(ms) = effects.remaining_ms(kind) {
            tags.push((format!("[{glyph} {name} {:.1}s] ", ms as f32 / 1000.0), color));
        }
    }
    let wave_str = format!("Wave: {}  Highest: {}", game.wave(), best.wave.max(game.wave()));
    let right_len: usize = tags.iter().map(|(t, _)| t.chars().count()).sum::<usize>() + wave_str.chars().count();

    out.queue(cursor::MoveTo(grid.width.saturating_sub(right_len as u16 + 1), 0))?;
    for (tag, color) in &tags {
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(tag))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_WAVE))?;
    out.queue(Print(&wave_str))?;
    Ok(())
}

fn mode_color(mode: GameMode) -> Color {
    match mode {
        GameMode::Normal => Color::Green,
        GameMode::Hard => Color::Red,
        GameMode::Secret => Color::Magenta,
        GameMode::Dodger => Color::Yellow,
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_ship<W: Write, R: Rng, S: ScoreStore>(
    out: &mut W,
    grid: Grid,
    game: &RunController<R, S>,
) -> std::io::Result<()> {
    let Some((col, row)) = grid.cell(game.world().ship.body.position) else {
        return Ok(());
    };
    let effects = game.effects();
    let (sprite, color) = if effects.is_shielded() {
        ("(▲)", C_SHIP_SHIELDED)
    } else if effects.is_boosted() {
        ("»▲«", C_SHIP_BOOSTED)
    } else {
        (" ▲ ", C_SHIP)
    };
    out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(sprite))?;
    Ok(())
}

fn draw_obstacle<W: Write>(out: &mut W, grid: Grid, obstacle: &Obstacle) -> std::io::Result<()> {
    let Some((col, row)) = grid.cell(obstacle.body.position) else {
        return Ok(());
    };
    let frame = ((obstacle.angle / 90.0) as usize) % SPIN_FRAMES.len();
    let color = if obstacle.slowed { C_OBSTACLE_SLOWED } else { C_OBSTACLE };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(SPIN_FRAMES[frame]))?;
    Ok(())
}

/// Symbols:
///   »  (green)   speed boost
///   ~  (red)     slowdown
///   ◆  (magenta) shield
fn draw_power_up<W: Write>(out: &mut W, grid: Grid, power_up: &PowerUp) -> std::io::Result<()> {
    let Some((col, row)) = grid.cell(power_up.body.position) else {
        return Ok(());
    };
    let (glyph, color) = match power_up.kind {
        PowerUpKind::Speed => ("»", C_SPEED),
        PowerUpKind::Slowdown => ("~", C_SLOWDOWN),
        PowerUpKind::Shield => ("◆", C_SHIELD),
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_wave_warning<W: Write>(out: &mut W, grid: Grid, seconds: u64) -> std::io::Result<()> {
    let text = format!("Next Wave Incoming: {seconds}");
    out.queue(cursor::MoveTo(grid.center_col(&text), HUD_ROWS + 1))?;
    out.queue(style::SetForegroundColor(C_WARNING))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_centered_lines<W: Write>(out: &mut W, grid: Grid, lines: &[(String, Color)]) -> std::io::Result<()> {
    let start_row = (grid.height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(grid.center_col(text), start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

fn draw_start_hint<W: Write>(out: &mut W, grid: Grid) -> std::io::Result<()> {
    let lines = [
        ("Move to start!".to_string(), Color::White),
        ("(Use ARROW KEYS or WASD to move.)".to_string(), C_HINT),
    ];
    // Sit just above the ship, which starts in the middle of the field.
    let top = Grid {
        height: grid.height.saturating_sub(6),
        ..grid
    };
    draw_centered_lines(out, top, &lines)
}

fn draw_pause<W: Write>(out: &mut W, grid: Grid, instructions: bool) -> std::io::Result<()> {
    let mut lines = vec![("PAUSED".to_string(), Color::Yellow)];
    if instructions {
        for text in [
            "Dodge the spinning obstacles for as long as you can.",
            "A new wave replaces them every few seconds.",
            "» Speed: move faster for a while.",
            "~ Slowdown: halves obstacle speed.",
            "◆ Shield: smash through obstacles unharmed.",
            "Speed and Shield cannot be held together.",
            "",
            "P / 0 : Resume   M / 1 : Music   ESC / 2 : Menu",
        ] {
            lines.push((text.to_string(), Color::White));
        }
    } else {
        lines.push(("Press I for Instructions".to_string(), C_HINT));
    }
    draw_centered_lines(out, grid, &lines)
}

fn draw_game_over<W: Write, R: Rng, S: ScoreStore>(
    out: &mut W,
    grid: Grid,
    game: &RunController<R, S>,
) -> std::io::Result<()> {
    let best = game.best();
    let Some(outcome) = game.outcome() else {
        return Ok(());
    };
    let time = outcome.time_ms;
    let wave = outcome.wave;
    let new_best_time = outcome.new_best_time;
    let new_best_wave = outcome.new_best_wave;

    let best_color = |fresh: bool| if fresh { Color::Yellow } else { Color::DarkGrey };
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Time: {}   Wave: {wave}", format_time(time)), Color::Yellow),
        (
            if new_best_time {
                format!("★ NEW BEST TIME: {} ★", format_time(best.time_ms))
            } else {
                format!("Best Time: {}", format_time(best.time_ms))
            },
            best_color(new_best_time),
        ),
        (
            if new_best_wave {
                format!("★ NEW HIGHEST WAVE: {} ★", best.wave)
            } else {
                format!("Highest Wave: {}", best.wave)
            },
            best_color(new_best_wave),
        ),
        ("SPACE - Play Again   ESC - Menu   Q - Quit".to_string(), Color::White),
    ];
    draw_centered_lines(out, grid, &lines)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write, R: Rng, S: ScoreStore>(
    out: &mut W,
    grid: Grid,
    game: &RunController<R, S>,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, grid.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Arrows / WASD : Move   P : Pause   M : Music   ESC : Menu   Q : Quit"))?;

    let music = if game.is_muted() { "Music: OFF" } else { "Music: ON" };
    out.queue(cursor::MoveTo(
        grid.width.saturating_sub(music.len() as u16 + 1),
        grid.height.saturating_sub(1),
    ))?;
    out.queue(Print(music))?;
    Ok(())
}
