use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::point::{Bounds, Point};
use crate::snake::Snake;

/// Collects every cell not occupied by the snake or an obstacle.
#[must_use]
pub fn free_cells(bounds: Bounds, snake: &Snake, obstacles: &HashSet<Point>) -> Vec<Point> {
    bounds
        .cells()
        .filter(|cell| !snake.contains(*cell) && !obstacles.contains(cell))
        .collect()
}

/// Picks a uniformly random free cell, or `None` when the board is full.
///
/// Scans the whole board on every call, which is fine for boards in the tens
/// of cells per side.
// TODO: keep an incremental free-cell set on `Game` if boards grow past ~100x100.
#[must_use]
pub fn pick_random_free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: Bounds,
    snake: &Snake,
    obstacles: &HashSet<Point>,
) -> Option<Point> {
    free_cells(bounds, snake, obstacles).choose(rng).copied()
}
