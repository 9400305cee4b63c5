use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::Theme;
use crate::game::{CellKind, DeathReason, Game, GameStatus};
use crate::input::Direction;
use crate::observer::{FoodObserver, SnakeObserver};
use crate::point::{Bounds, Point};
use crate::snake::Snake;

/// Terminal columns used per board cell, so cells look roughly square.
const CELL_WIDTH: u16 = 2;

/// Cell buffer kept in sync purely through game notifications.
///
/// Only cells touched by a notification are rewritten, mirroring how the
/// board changes: one head added, at most one tail removed, food moved.
#[derive(Debug, Clone)]
pub struct CellCanvas {
    bounds: Bounds,
    cells: Vec<CellKind>,
    food: Option<Point>,
    dirty: usize,
}

impl CellCanvas {
    /// Snapshots every cell of `game`.
    #[must_use]
    pub fn from_game(game: &Game) -> Self {
        let bounds = game.bounds();
        let mut cells = vec![CellKind::Empty; bounds.total_cells()];
        for cell in bounds.cells() {
            cells[index(bounds, cell)] = game.classify(cell.x(), cell.y());
        }

        Self {
            bounds,
            cells,
            food: game.food(),
            dirty: bounds.total_cells(),
        }
    }

    #[must_use]
    pub fn cell(&self, point: Point) -> CellKind {
        self.cells[index(self.bounds, point)]
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of cell writes since the last call.
    pub fn take_dirty_count(&mut self) -> usize {
        std::mem::take(&mut self.dirty)
    }

    fn set(&mut self, point: Point, kind: CellKind) {
        let slot = index(self.bounds, point);
        self.cells[slot] = kind;
        self.dirty += 1;
    }
}

fn index(bounds: Bounds, point: Point) -> usize {
    // Points are normalised, so both coordinates are non-negative.
    point.y() as usize * usize::from(bounds.width) + point.x() as usize
}

impl SnakeObserver for CellCanvas {
    fn on_snake_grew(&mut self, snake: &Snake, head: Point) {
        if let Some(neck) = snake.neck() {
            self.set(neck, CellKind::SnakeBody);
        }
        self.set(head, CellKind::SnakeHead);
    }

    fn on_tail_removed(&mut self, _snake: &Snake, tail: Point) {
        let kind = if self.food == Some(tail) {
            CellKind::Food
        } else {
            CellKind::Empty
        };
        self.set(tail, kind);
    }
}

impl FoodObserver for CellCanvas {
    fn on_food_changed(&mut self, game: &Game, food: Option<Point>) {
        // Food set by hand can sit under an obstacle or the snake.
        for cell in self.food.take().into_iter().chain(food) {
            let kind = game.classify(cell.x(), cell.y());
            if self.cell(cell) != kind {
                self.set(cell, kind);
            }
        }
        self.food = food;
    }
}

/// What the driver is currently doing, shown in the HUD.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo<'a> {
    pub bot_enabled: bool,
    pub paused: bool,
    pub theme: &'a Theme,
}

/// Renders the full frame: board, HUD line and any overlay.
pub fn render(frame: &mut Frame<'_>, canvas: &CellCanvas, game: &Game, hud: HudInfo<'_>) {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    let board_width = canvas.bounds().width.saturating_mul(CELL_WIDTH).saturating_add(2);
    let board_height = canvas.bounds().height.saturating_add(2);
    let board_area = Rect {
        x: play_area.x,
        y: play_area.y,
        width: board_width.min(play_area.width),
        height: board_height.min(play_area.height),
    };

    let block = Block::bordered()
        .title(" torus snake ")
        .border_style(Style::new().fg(hud.theme.border_fg));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    render_cells(frame, inner, canvas, hud.theme);
    render_hud(frame, hud_area, game, hud);

    match game.status() {
        GameStatus::Playing if hud.paused => render_popup(
            frame,
            board_area,
            " pause ",
            vec![Line::from("PAUSED"), Line::from(""), Line::from("[P] Resume  [Q] Quit")],
        ),
        GameStatus::Playing => {}
        GameStatus::GameOver => render_popup(
            frame,
            board_area,
            " game over ",
            vec![
                Line::from("GAME OVER"),
                Line::from(format!("Score: {}", game.score())),
                Line::from(match game.death_reason() {
                    Some(DeathReason::Obstacle) => "Cause: hit an obstacle",
                    Some(DeathReason::SelfCollision) => "Cause: hit yourself",
                    None => "",
                }),
                Line::from(""),
                Line::from("[Enter] Play again  [Q] Quit"),
            ],
        ),
        GameStatus::Victory => render_popup(
            frame,
            board_area,
            " victory ",
            vec![
                Line::from("BOARD FILLED"),
                Line::from(format!("Score: {}", game.score())),
                Line::from(""),
                Line::from("[Enter] Play again  [Q] Quit"),
            ],
        ),
    }
}

fn render_cells(frame: &mut Frame<'_>, inner: Rect, canvas: &CellCanvas, theme: &Theme) {
    let buffer = frame.buffer_mut();

    for cell in canvas.bounds().cells() {
        let Some((x, y)) = cell_to_terminal(inner, cell) else {
            continue;
        };

        let kind = canvas.cell(cell);
        let glyph = match kind {
            CellKind::Empty => "  ",
            CellKind::Food => "()",
            _ => "██",
        };
        let style = match kind {
            CellKind::Empty => Style::new().bg(theme.play_bg),
            CellKind::SnakeHead => Style::new()
                .fg(theme.cell_color(kind))
                .bg(theme.play_bg)
                .add_modifier(Modifier::BOLD),
            _ => Style::new().fg(theme.cell_color(kind)).bg(theme.play_bg),
        };

        buffer.set_string(x, y, glyph, style);
    }
}

fn render_hud(frame: &mut Frame<'_>, area: Rect, game: &Game, hud: HudInfo<'_>) {
    let mode = if hud.bot_enabled { "bot" } else { "manual" };
    let line = Line::from(vec![
        Span::styled(
            format!(" Score {} ", game.score()),
            Style::new().fg(hud.theme.hud_score).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "Length {}  Heading {}  Mode {}  [B] bot  [P] pause  [Q] quit",
                game.snake().len(),
                direction_label(game.current_direction()),
                mode
            ),
            Style::new().fg(hud.theme.hud_muted),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Left => "left",
        Direction::Up => "up",
        Direction::Right => "right",
        Direction::Down => "down",
    }
}

fn render_popup(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &'static str,
    lines: Vec<Line<'_>>,
) {
    let popup = centered_popup(area, 80, 60);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(title)),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}

fn cell_to_terminal(inner: Rect, cell: Point) -> Option<(u16, u16)> {
    let x_offset = u16::try_from(cell.x()).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(cell.y()).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
