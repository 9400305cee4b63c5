use crate::input::Direction;

/// Logical board dimensions. Every [`Point`] is normalised against one of these.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Bounds {
    pub width: u16,
    pub height: u16,
}

impl Bounds {
    /// Creates bounds for a `width` x `height` board. Both must be at least 1.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        assert!(
            width > 0 && height > 0,
            "board dimensions must be positive, got {width}x{height}"
        );
        Self { width, height }
    }

    /// Returns `(x, y)` wrapped into these bounds.
    #[must_use]
    pub fn point(self, x: i32, y: i32) -> Point {
        Point {
            x: x.rem_euclid(i32::from(self.width)),
            y: y.rem_euclid(i32::from(self.height)),
        }
    }

    /// Returns the total number of cells on the board.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Iterates every cell, column by column.
    pub fn cells(self) -> impl Iterator<Item = Point> {
        (0..i32::from(self.width))
            .flat_map(move |x| (0..i32::from(self.height)).map(move |y| Point { x, y }))
    }
}

/// A cell on the toroidal board.
///
/// Fields are private so that a `Point` is always normalised: the only way to
/// obtain one is through [`Bounds::point`] or by stepping an existing point.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    #[must_use]
    pub fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(self) -> i32 {
        self.y
    }

    /// Returns the neighbouring cell one step in `direction`, wrapping at the edges.
    #[must_use]
    pub fn step(self, direction: Direction, bounds: Bounds) -> Self {
        let (dx, dy) = direction.delta();
        bounds.point(self.x + dx, self.y + dy)
    }
}
