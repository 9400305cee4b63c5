use std::collections::VecDeque;
use std::fmt;

use crate::input::{Direction, direction_change_is_valid};
use crate::observer::SnakeObserver;
use crate::point::{Bounds, Point};

/// Snake body and heading.
///
/// Segments are stored tail first: the front of the deque is the tail and the
/// back is the head. The body never contains the same cell twice.
pub struct Snake {
    body: VecDeque<Point>,
    direction: Direction,
    bounds: Bounds,
    observer: Option<Box<dyn SnakeObserver>>,
}

impl Snake {
    /// Creates a one-cell snake at `(0, height / 2)` heading right.
    #[must_use]
    pub fn new(bounds: Bounds) -> Self {
        let start = bounds.point(0, i32::from(bounds.height / 2));
        Self::from_segments(bounds, vec![start], Direction::Right)
    }

    /// Creates a snake from explicit segments, tail first.
    ///
    /// Panics when `segments` is empty or contains the same cell twice.
    #[must_use]
    pub fn from_segments(bounds: Bounds, segments: Vec<Point>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        let mut body = VecDeque::with_capacity(segments.len());
        for segment in segments {
            assert!(
                !body.contains(&segment),
                "duplicate snake segment at ({}, {})",
                segment.x(),
                segment.y()
            );
            body.push_back(segment);
        }

        Self {
            body,
            direction,
            bounds,
            observer: None,
        }
    }

    /// Registers the observer notified on every grow and tail removal.
    pub fn set_observer(&mut self, observer: Box<dyn SnakeObserver>) {
        self.observer = Some(observer);
    }

    /// Changes heading unless `direction` reverses the current one.
    ///
    /// Returns `false` and leaves the heading untouched on a reversal.
    pub fn update_direction(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }

        self.direction = direction;
        true
    }

    /// Returns the cell the head would move into this tick.
    #[must_use]
    pub fn next_head(&self) -> Point {
        self.head().step(self.direction, self.bounds)
    }

    /// Returns true if any segment occupies `point`.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.body.contains(&point)
    }

    /// Pushes `point` as the new head.
    ///
    /// The caller must rule out collisions first; growing into an occupied
    /// cell panics.
    pub fn grow(&mut self, point: Point) {
        assert!(
            !self.contains(point),
            "snake cannot grow into its own body at ({}, {})",
            point.x(),
            point.y()
        );

        self.body.push_back(point);

        if let Some(mut observer) = self.observer.take() {
            observer.on_snake_grew(self, point);
            self.observer = Some(observer);
        }
    }

    /// Pops the tail segment and returns it.
    pub fn remove_tail(&mut self) -> Point {
        let tail = self
            .body
            .pop_front()
            .expect("snake body must always contain at least one segment");

        if let Some(mut observer) = self.observer.take() {
            observer.on_tail_removed(self, tail);
            self.observer = Some(observer);
        }

        tail
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Point {
        *self
            .body
            .back()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the current tail position.
    #[must_use]
    pub fn tail(&self) -> Point {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the segment right behind the head, if the snake is longer than one cell.
    #[must_use]
    pub fn neck(&self) -> Option<Point> {
        self.body.len().checked_sub(2).map(|index| self.body[index])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Iterates over body segments from tail to head.
    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }
}

impl fmt::Debug for Snake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snake")
            .field("body", &self.body)
            .field("direction", &self.direction)
            .field("bounds", &self.bounds)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::input::Direction;
    use crate::observer::{CellEvent, EventLog};
    use crate::point::Bounds;

    use super::Snake;

    #[test]
    fn new_snake_starts_on_the_left_edge_heading_right() {
        let bounds = Bounds::new(10, 7);
        let snake = Snake::new(bounds);

        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), bounds.point(0, 3));
        assert_eq!(snake.direction(), Direction::Right);
    }

    #[test]
    fn reversal_is_rejected_and_heading_kept() {
        let mut snake = Snake::new(Bounds::new(10, 10));

        assert!(!snake.update_direction(Direction::Left));
        assert_eq!(snake.direction(), Direction::Right);

        assert!(snake.update_direction(Direction::Right));
        assert!(snake.update_direction(Direction::Up));
        assert_eq!(snake.direction(), Direction::Up);

        assert!(!snake.update_direction(Direction::Down));
        assert_eq!(snake.direction(), Direction::Up);
    }

    #[test]
    fn next_head_wraps_without_moving() {
        let bounds = Bounds::new(4, 4);
        let snake = Snake::from_segments(bounds, vec![bounds.point(3, 1)], Direction::Right);

        assert_eq!(snake.next_head(), bounds.point(0, 1));
        assert_eq!(snake.head(), bounds.point(3, 1));
    }

    #[test]
    fn grow_and_remove_keep_tail_first_order() {
        let bounds = Bounds::new(10, 10);
        let mut snake = Snake::from_segments(bounds, vec![bounds.point(2, 2)], Direction::Right);

        snake.grow(bounds.point(3, 2));
        snake.grow(bounds.point(4, 2));
        assert_eq!(snake.head(), bounds.point(4, 2));
        assert_eq!(snake.neck(), Some(bounds.point(3, 2)));
        assert_eq!(snake.tail(), bounds.point(2, 2));

        assert_eq!(snake.remove_tail(), bounds.point(2, 2));
        assert_eq!(snake.len(), 2);
        assert!(!snake.contains(bounds.point(2, 2)));
    }

    #[test]
    #[should_panic(expected = "cannot grow into its own body")]
    fn growing_into_body_panics() {
        let bounds = Bounds::new(10, 10);
        let mut snake = Snake::from_segments(
            bounds,
            vec![bounds.point(1, 1), bounds.point(2, 1)],
            Direction::Right,
        );

        snake.grow(bounds.point(1, 1));
    }

    #[test]
    #[should_panic(expected = "duplicate snake segment")]
    fn duplicate_segments_are_rejected() {
        let bounds = Bounds::new(5, 5);
        let _ = Snake::from_segments(
            bounds,
            vec![bounds.point(1, 1), bounds.point(6, 1)],
            Direction::Right,
        );
    }

    #[test]
    fn observer_sees_grow_and_tail_removal() {
        let bounds = Bounds::new(6, 6);
        let log = Rc::new(RefCell::new(EventLog::new()));
        let mut snake = Snake::from_segments(bounds, vec![bounds.point(0, 0)], Direction::Right);
        snake.set_observer(Box::new(Rc::clone(&log)));

        let tail = snake.remove_tail();
        snake.grow(bounds.point(1, 0));

        assert_eq!(
            log.borrow().events(),
            &[CellEvent::TailRemoved(tail), CellEvent::SnakeGrew(bounds.point(1, 0))]
        );
    }
}
