//! Cell-level change notifications published by [`Snake`] and [`Game`].
//!
//! Notifications are delivered synchronously at the point of mutation. While
//! a callback runs the observer is detached from its publisher and only sees
//! shared references, so it cannot re-enter the mutation API.

use std::cell::RefCell;
use std::rc::Rc;

use crate::game::Game;
use crate::point::Point;
use crate::snake::Snake;

/// Receives snake body changes.
pub trait SnakeObserver {
    /// Called after `head` was pushed as the new head of `snake`.
    fn on_snake_grew(&mut self, _snake: &Snake, _head: Point) {}

    /// Called after `tail` was popped from `snake`.
    ///
    /// During a plain move of a one-cell snake the body is momentarily empty here.
    fn on_tail_removed(&mut self, _snake: &Snake, _tail: Point) {}
}

/// Receives food position changes. `None` means the board is full.
pub trait FoodObserver {
    fn on_food_changed(&mut self, game: &Game, food: Option<Point>);
}

impl<T: SnakeObserver + ?Sized> SnakeObserver for Rc<RefCell<T>> {
    fn on_snake_grew(&mut self, snake: &Snake, head: Point) {
        self.borrow_mut().on_snake_grew(snake, head);
    }

    fn on_tail_removed(&mut self, snake: &Snake, tail: Point) {
        self.borrow_mut().on_tail_removed(snake, tail);
    }
}

impl<T: FoodObserver + ?Sized> FoodObserver for Rc<RefCell<T>> {
    fn on_food_changed(&mut self, game: &Game, food: Option<Point>) {
        self.borrow_mut().on_food_changed(game, food);
    }
}

/// Records every notification in arrival order. Useful for replay and tests.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CellEvent {
    FoodChanged(Option<Point>),
    SnakeGrew(Point),
    TailRemoved(Point),
}

#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<CellEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[CellEvent] {
        &self.events
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<CellEvent> {
        std::mem::take(&mut self.events)
    }
}

impl SnakeObserver for EventLog {
    fn on_snake_grew(&mut self, _snake: &Snake, head: Point) {
        self.events.push(CellEvent::SnakeGrew(head));
    }

    fn on_tail_removed(&mut self, _snake: &Snake, tail: Point) {
        self.events.push(CellEvent::TailRemoved(tail));
    }
}

impl FoodObserver for EventLog {
    fn on_food_changed(&mut self, _game: &Game, food: Option<Point>) {
        self.events.push(CellEvent::FoodChanged(food));
    }
}
