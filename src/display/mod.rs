/// Rendering layer - all terminal I/O lives here.
///
/// Draws a `Frame` snapshot.  Play-field units are scaled onto the terminal
/// cells inside the border; no game logic happens here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use wave_shooter::compute::Rect;
use wave_shooter::config::Difficulty;
use wave_shooter::entities::{EnemyVariant, Frame, SessionPhase};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_SHOT_PLAYER: Color = Color::Cyan;
const C_SHOT_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

fn variant_color(variant: EnemyVariant) -> Color {
    match variant {
        EnemyVariant::Yellow => Color::Yellow,
        EnemyVariant::Blue => Color::Blue,
        EnemyVariant::Red => Color::Red,
        EnemyVariant::Violet => Color::Magenta,
    }
}

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

// ── Field → terminal mapping ─────────────────────────────────────────────────

/// Cells inside the border: columns `1..width-1`, rows `2..height-2`.
struct Viewport {
    field_w: f32,
    field_h: f32,
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn new(frame: &Frame, width: u16, height: u16) -> Self {
        Self {
            field_w: frame.field.x.max(1.0),
            field_h: frame.field.y.max(1.0),
            cols: width.saturating_sub(2).max(1),
            rows: height.saturating_sub(4).max(1),
        }
    }

    fn col(&self, x: f32) -> u16 {
        let c = (x / self.field_w * self.cols as f32).floor();
        1 + (c.max(0.0) as u16).min(self.cols - 1)
    }

    fn row(&self, y: f32) -> u16 {
        let r = (y / self.field_h * self.rows as f32).floor();
        2 + (r.max(0.0) as u16).min(self.rows - 1)
    }

    /// Width of `rect` in cells, at least one.
    fn span(&self, rect: &Rect) -> usize {
        ((rect.size.x / self.field_w * self.cols as f32).round() as usize).max(1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, frame: &Frame) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(frame, width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, frame, width)?;

    for (rect, variant) in &frame.enemies {
        draw_enemy(out, &view, rect, *variant)?;
    }
    for rect in &frame.player_shots {
        draw_shot(out, &view, rect, "║", C_SHOT_PLAYER)?;
    }
    for rect in &frame.enemy_shots {
        draw_shot(out, &view, rect, "↓", C_SHOT_ENEMY)?;
    }

    draw_player(out, &view, &frame.player)?;
    draw_controls_hint(out, height)?;

    if frame.phase == SessionPhase::Terminated {
        draw_game_over(out, frame, width, height)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, frame: &Frame, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>8}", frame.hud.score)))?;

    let level_str = format!("Level {}", frame.hud.level);
    let diff_str = format!(" [ {} ]", frame.difficulty.as_str().to_uppercase());
    let total = (level_str.len() + diff_str.len()) as u16;
    out.queue(cursor::MoveTo((width / 2).saturating_sub(total / 2), 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;
    out.queue(style::SetForegroundColor(difficulty_color(frame.difficulty)))?;
    out.queue(Print(&diff_str))?;

    let hearts: String = "♥".repeat(frame.hud.lives as usize);
    let lives_text = format!("Lives: {}", hearts);
    let rx = width.saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, view: &Viewport, rect: &Rect) -> std::io::Result<()> {
    let span = view.span(rect).max(3);
    let body = format!("/{}\\", "▲".repeat(span - 2));
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(view.col(rect.left()), view.row(rect.top())))?;
    out.queue(Print(body))?;
    Ok(())
}

fn draw_enemy<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    variant: EnemyVariant,
) -> std::io::Result<()> {
    let span = view.span(rect);
    let sprite = match (variant, span) {
        (_, 1) => "▼".to_string(),
        (_, 2) => "<>".to_string(),
        (EnemyVariant::Yellow | EnemyVariant::Red, n) => format!("<{}>", "▼".repeat(n - 2)),
        (EnemyVariant::Blue | EnemyVariant::Violet, n) => format!("({})", "◉".repeat(n - 2)),
    };
    out.queue(style::SetForegroundColor(variant_color(variant)))?;
    out.queue(cursor::MoveTo(view.col(rect.left()), view.row(rect.top())))?;
    out.queue(Print(sprite))?;
    Ok(())
}

fn draw_shot<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(view.col(rect.center_x()), view.row(rect.top())))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    frame: &Frame,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", frame.hud.score);
    let level_line = format!("Reached level {}", frame.hud.level);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        (&level_line, Color::Cyan),
        ("R - Menu  Q - Quit", Color::White),
    ];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
