use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{
    action::Direction,
    config::GameConfig,
    state::{Body, CollisionType, Position, Target},
};

/// Whether the game still accepts ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// Terminal; nothing mutates once here
    Over(CollisionType),
}

/// Result of a game tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    /// Whether the game is still running after this tick
    pub running: bool,
    /// Body length, which doubles as the score
    pub score: usize,
    /// Whether the head reached the target this tick
    pub ate_target: bool,
    /// What ended the game, if this or an earlier tick ended it
    pub collision: Option<CollisionType>,
}

/// Complete game state: one body, one target and the run flag.
///
/// Driven from outside: [`GameState::set_direction`] records the latest
/// steering request and [`GameState::tick`] advances the simulation by one
/// step. Nothing here draws or reads input.
#[derive(Debug, Clone)]
pub struct GameState {
    body: Body,
    target: Target,
    status: Status,
    pending_direction: Option<Direction>,
    columns: i32,
    rows: i32,
    ticks: u32,
    seed: Option<u64>,
    rng: StdRng,
}

impl GameState {
    /// Start a new game, seeding placement from `config.seed` when set
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut state = Self::with_rng(config, rng);
        state.seed = config.seed;
        state
    }

    /// Start a new game drawing target cells from the given generator
    pub fn with_rng(config: &GameConfig, rng: StdRng) -> Self {
        Self {
            body: Body::new(config.body_start),
            target: Target::new(config.target_start),
            status: Status::Running,
            pending_direction: None,
            columns: config.columns(),
            rows: config.rows(),
            ticks: 0,
            seed: None,
            rng,
        }
    }

    /// Replace the body and target, e.g. to set up a scenario
    pub fn with_layout(mut self, body: Body, target: Position) -> Self {
        self.body = body;
        self.target = Target::new(target);
        self
    }

    /// Request a new heading for the next tick.
    ///
    /// The latest request before a tick wins. Requests made after the game
    /// is over are ignored.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.is_running() {
            self.pending_direction = Some(direction);
        }
    }

    /// Like [`GameState::set_direction`] for a raw `(dx, dy)` vector.
    ///
    /// Anything other than the four cardinal unit vectors is ignored.
    pub fn set_direction_delta(&mut self, dx: i32, dy: i32) {
        if let Some(direction) = Direction::from_delta(dx, dy) {
            self.set_direction(direction);
        }
    }

    /// Execute one tick of the game
    pub fn tick(&mut self) -> TickResult {
        if let Status::Over(reason) = self.status {
            return self.result(false, Some(reason));
        }

        if let Some(direction) = self.pending_direction.take() {
            if !self.body.set_direction(direction) {
                debug!("Ignored reversal to {:?}", direction);
            }
        }

        self.body.advance();
        self.ticks += 1;

        if let Some(collision) = self.check_collision() {
            return self.finish(collision, false);
        }

        if self.body.head() != self.target.position() {
            return self.result(false, None);
        }

        self.body.grow();
        debug!(
            "Target consumed at ({}, {}), length {}",
            self.body.head().x,
            self.body.head().y,
            self.body.len()
        );

        if !self
            .target
            .relocate(&self.body, self.columns, self.rows, &mut self.rng)
        {
            return self.finish(CollisionType::BoardFull, true);
        }

        self.result(true, None)
    }

    /// Check whether the head has left the grid or hit another segment
    fn check_collision(&self) -> Option<CollisionType> {
        let head = self.body.head();

        if !self.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if self.body.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn finish(&mut self, reason: CollisionType, ate_target: bool) -> TickResult {
        self.status = Status::Over(reason);
        self.pending_direction = None;
        info!(
            "Game over after {} ticks ({:?}). Score: {}",
            self.ticks,
            reason,
            self.score()
        );
        self.result(ate_target, Some(reason))
    }

    fn result(&self, ate_target: bool, collision: Option<CollisionType>) -> TickResult {
        TickResult {
            running: self.is_running(),
            score: self.score(),
            ate_target,
            collision,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.columns && pos.y >= 0 && pos.y < self.rows
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn game_over_reason(&self) -> Option<CollisionType> {
        match self.status {
            Status::Running => None,
            Status::Over(reason) => Some(reason),
        }
    }

    /// Body length; the only score the game keeps
    pub fn score(&self) -> usize {
        self.body.len()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Current heading of the head, `None` before the first turn
    pub fn direction(&self) -> Option<Direction> {
        self.body.direction()
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Segment cells, head first; a fresh snapshot on every call
    pub fn body_positions(&self) -> Vec<Position> {
        self.body.positions().to_vec()
    }

    pub fn target_position(&self) -> Position {
        self.target.position()
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Seed used for target placement, if one was configured
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
