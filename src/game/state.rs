use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::action::Direction;

/// Random draws tried before placement falls back to scanning the grid
pub const PLACEMENT_ATTEMPTS: usize = 256;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The controllable body: an ordered chain of cells, head first.
///
/// Every segment shares the head's heading. Trailing segments never apply the
/// heading themselves; on each [`Body::advance`] they take the cell their
/// predecessor held before the step.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Segments, with head at index 0
    segments: Vec<Position>,
    /// Current heading, `None` while the body stands still
    direction: Option<Direction>,
    /// Cell the tail left on the last advance
    vacated: Option<Position>,
}

impl Body {
    /// Create a single-segment body at rest
    pub fn new(start: Position) -> Self {
        Self {
            segments: vec![start],
            direction: None,
            vacated: None,
        }
    }

    /// Build a body from explicit segments, head first.
    ///
    /// Returns `None` for an empty segment list.
    pub fn from_segments(segments: Vec<Position>, direction: Option<Direction>) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }

        Some(Self {
            segments,
            direction,
            vacated: None,
        })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.segments[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.segments[self.segments.len() - 1]
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// The heading as a raw `(dx, dy)` vector; `(0, 0)` while at rest
    pub fn velocity(&self) -> (i32, i32) {
        self.direction.map_or((0, 0), |dir| dir.delta())
    }

    /// Change the heading unless it would reverse the body onto itself.
    ///
    /// Returns whether the new heading was taken.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        match self.direction {
            Some(current) if current.is_opposite(direction) => false,
            _ => {
                self.direction = Some(direction);
                true
            }
        }
    }

    /// Advance one cell along the current heading.
    ///
    /// No bounds checking happens here; an out-of-grid head is left for the
    /// collision check to find.
    pub fn advance(&mut self) {
        let mut prev = self.segments[0];
        if let Some(direction) = self.direction {
            self.segments[0] = prev.moved_in_direction(direction);
        }

        for segment in self.segments.iter_mut().skip(1) {
            prev = std::mem::replace(segment, prev);
        }

        self.vacated = Some(prev);
    }

    /// Append one segment at the cell the tail just left.
    ///
    /// Before the first advance there is no such cell and the new segment
    /// stacks on the tail until the next step separates them.
    pub fn grow(&mut self) {
        let cell = self.vacated.take().unwrap_or_else(|| self.tail());
        self.segments.push(cell);
    }

    /// Get the length of the body
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: a body keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All segment positions, head to tail
    pub fn positions(&self) -> &[Position] {
        &self.segments
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.segments[1..]
    }

    /// Check if position collides with body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Check if any segment, head included, occupies the position
    pub fn occupies(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the grid
    Wall,
    /// Head ran into another segment
    SelfCollision,
    /// Body covers every cell, nowhere left for the target
    BoardFull,
}

/// The cell the body is trying to reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    position: Position,
}

impl Target {
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Move the target to a uniformly chosen cell the body does not occupy.
    ///
    /// Rejection sampling runs for at most [`PLACEMENT_ATTEMPTS`] draws, then
    /// the free cells are enumerated and one is picked directly. Returns
    /// false, leaving the target in place, when the body covers the grid.
    pub fn relocate<R: Rng + ?Sized>(
        &mut self,
        body: &Body,
        columns: i32,
        rows: i32,
        rng: &mut R,
    ) -> bool {
        if columns <= 0 || rows <= 0 {
            return false;
        }

        for _ in 0..PLACEMENT_ATTEMPTS {
            let pos = Position::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
            if !body.occupies(pos) {
                self.position = pos;
                return true;
            }
        }

        let free: Vec<Position> = (0..rows)
            .flat_map(|y| (0..columns).map(move |x| Position::new(x, y)))
            .filter(|pos| !body.occupies(*pos))
            .collect();

        debug!(
            "Target placement fell back to a grid scan, {} free cells",
            free.len()
        );

        match free.choose(rng) {
            Some(&pos) => {
                self.position = pos;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn row_body(len: i32, direction: Direction) -> Body {
        // Head at (len + 1, 5), trailing to the left
        let segments = (0..len).map(|i| Position::new(len + 1 - i, 5)).collect();
        Body::from_segments(segments, Some(direction)).unwrap()
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Position::new(5, 6));
        assert_eq!(pos.moved_by(0, -1), Position::new(5, 4));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_body_creation() {
        let body = Body::new(Position::new(6, 9));
        assert_eq!(body.len(), 1);
        assert_eq!(body.head(), Position::new(6, 9));
        assert_eq!(body.tail(), Position::new(6, 9));
        assert_eq!(body.direction(), None);
        assert_eq!(body.velocity(), (0, 0));
        assert!(Body::from_segments(Vec::new(), None).is_none());
    }

    #[test]
    fn test_body_at_rest_does_not_move() {
        let mut body = Body::new(Position::new(6, 9));
        body.advance();
        assert_eq!(body.positions(), &[Position::new(6, 9)]);
    }

    #[test]
    fn test_advance_shifts_segments() {
        let mut body = row_body(3, Direction::Right);
        assert_eq!(
            body.positions(),
            &[Position::new(4, 5), Position::new(3, 5), Position::new(2, 5)]
        );

        body.advance();
        assert_eq!(
            body.positions(),
            &[Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)]
        );

        // Turning only redirects the head; the rest follows the old path
        body.set_direction(Direction::Down);
        body.advance();
        assert_eq!(
            body.positions(),
            &[Position::new(5, 6), Position::new(5, 5), Position::new(4, 5)]
        );
    }

    #[test]
    fn test_advance_leaves_grid_unchecked() {
        let mut body = Body::from_segments(vec![Position::new(0, 0)], Some(Direction::Left))
            .unwrap();
        body.advance();
        assert_eq!(body.head(), Position::new(-1, 0));
    }

    #[test]
    fn test_reverse_direction_rejected() {
        let mut body = row_body(3, Direction::Right);
        assert!(!body.set_direction(Direction::Left));
        assert_eq!(body.direction(), Some(Direction::Right));

        assert!(body.set_direction(Direction::Right));
        assert!(body.set_direction(Direction::Up));
        assert_eq!(body.velocity(), (0, -1));
    }

    #[test]
    fn test_any_direction_accepted_from_rest() {
        for dir in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let mut body = Body::new(Position::new(3, 3));
            assert!(body.set_direction(dir));
            assert_eq!(body.direction(), Some(dir));
        }
    }

    #[test]
    fn test_grow_takes_vacated_cell() {
        let mut body = Body::new(Position::new(6, 9));
        body.set_direction(Direction::Right);
        body.advance();
        body.grow();
        assert_eq!(
            body.positions(),
            &[Position::new(7, 9), Position::new(6, 9)]
        );

        body.advance();
        body.grow();
        assert_eq!(
            body.positions(),
            &[Position::new(8, 9), Position::new(7, 9), Position::new(6, 9)]
        );
    }

    #[test]
    fn test_grow_before_moving_stacks_on_tail() {
        let mut body = Body::new(Position::new(1, 1));
        body.grow();
        assert_eq!(body.len(), 2);
        assert_eq!(body.positions(), &[Position::new(1, 1), Position::new(1, 1)]);

        // A second grow without an advance also stacks
        body.grow();
        assert_eq!(body.tail(), Position::new(1, 1));
        assert_eq!(body.len(), 3);
    }

    #[test]
    fn test_collision_detection() {
        let body = row_body(3, Direction::Right);
        assert!(!body.collides_with_body(Position::new(4, 5))); // head
        assert!(body.collides_with_body(Position::new(3, 5))); // body
        assert!(!body.collides_with_body(Position::new(10, 10))); // empty
        assert!(body.occupies(Position::new(4, 5)));
    }

    #[test]
    fn test_relocate_avoids_body() {
        let mut rng = StdRng::seed_from_u64(42);
        let body = row_body(6, Direction::Right);
        let mut target = Target::new(Position::new(0, 0));

        for _ in 0..200 {
            assert!(target.relocate(&body, 10, 10, &mut rng));
            let pos = target.position();
            assert!(!body.occupies(pos));
            assert!((0..10).contains(&pos.x));
            assert!((0..10).contains(&pos.y));
        }
    }

    #[test]
    fn test_relocate_finds_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(7);
        // A 3x1 strip with only (2, 0) free
        let body = Body::from_segments(
            vec![Position::new(0, 0), Position::new(1, 0)],
            Some(Direction::Left),
        )
        .unwrap();
        let mut target = Target::new(Position::new(0, 0));

        assert!(target.relocate(&body, 3, 1, &mut rng));
        assert_eq!(target.position(), Position::new(2, 0));
    }

    #[test]
    fn test_relocate_on_full_grid_keeps_position() {
        let mut rng = StdRng::seed_from_u64(1);
        let body = Body::from_segments(
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(0, 1),
            ],
            Some(Direction::Up),
        )
        .unwrap();
        let mut target = Target::new(Position::new(1, 1));

        assert!(!target.relocate(&body, 2, 2, &mut rng));
        assert_eq!(target.position(), Position::new(1, 1));
    }
}
