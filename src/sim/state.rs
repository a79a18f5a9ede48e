//! Game state and core simulation types

use std::ops::RangeInclusive;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::consts::*;
use crate::geom::Rect;

/// Current phase of play. `Over` is left only through a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Over,
}

/// Fixed parameters of a run. Defaults come from `consts`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    pub width: f64,
    pub height: f64,
    pub gravity: f64,
    pub jump_impulse: f64,
    pub pipe_speed: f64,
    pub pipe_gap: f64,
    pub pipe_width: f64,
    pub body_x: f64,
    pub body_radius: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            pipe_speed: PIPE_SPEED,
            pipe_gap: PIPE_GAP,
            pipe_width: PIPE_WIDTH,
            body_x: BODY_X,
            body_radius: BODY_RADIUS,
        }
    }
}

impl Rules {
    /// Range the gap centre is drawn from, inclusive on both ends
    pub fn gap_range(&self) -> RangeInclusive<i64> {
        self.pipe_gap as i64..=(self.height - self.pipe_gap) as i64
    }

    /// Vertical centre of the world, where the body starts
    pub fn start_y(&self) -> f64 {
        (self.height / 2.0).floor()
    }
}

/// The player-controlled body. Only `y` and `velocity` ever change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    pub radius: f64,
}

impl Body {
    pub fn new(rules: &Rules) -> Self {
        Self {
            x: rules.body_x,
            y: rules.start_y(),
            velocity: 0.0,
            radius: rules.body_radius,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.x, self.y, self.radius)
    }
}

/// Identifier of an obstacle pair, unique within a `GameState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(pub u64);

/// Top and bottom pipe sharing one horizontal position
#[derive(Debug, Clone, PartialEq)]
pub struct PipePair {
    pub id: PairId,
    pub top: Rect,
    pub bottom: Rect,
    pub gap_center: f64,
    /// Set once the pair has been credited toward the score
    pub passed: bool,
}

impl PipePair {
    /// Pair whose left edge is at `x` with the gap centred on `gap_center`
    pub fn new(id: PairId, x: f64, gap_center: f64, rules: &Rules) -> Self {
        let half_gap = (rules.pipe_gap / 2.0).floor();
        Self {
            id,
            top: Rect::new(x, 0.0, x + rules.pipe_width, gap_center - half_gap),
            bottom: Rect::new(x, gap_center + half_gap, x + rules.pipe_width, rules.height),
            gap_center,
            passed: false,
        }
    }

    /// Right edge x, shared by both pipes
    pub fn right(&self) -> f64 {
        self.top.x2
    }

    pub fn translate(&mut self, dx: f64) {
        self.top.translate(dx, 0.0);
        self.bottom.translate(dx, 0.0);
    }

    pub fn rects(&self) -> [Rect; 2] {
        [self.top, self.bottom]
    }
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Spawned(PairId),
    Retired(PairId),
    Scored(u32),
    Jumped,
    GameOver { score: u32 },
    Restarted,
}

/// Complete mutable state of one game
#[derive(Debug, Clone)]
pub struct GameState {
    pub rules: Rules,
    pub phase: Phase,
    pub body: Body,
    pub pipes: Vec<PipePair>,
    pub score: u32,
    /// Ticks since the last (re)start
    pub time_ticks: u64,
    pub events: Vec<GameEvent>,
    pub(super) rng: StdRng,
    next_pair_id: u64,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_rules(Rules::default(), seed)
    }

    pub fn with_rules(rules: Rules, seed: u64) -> Self {
        Self {
            rules,
            phase: Phase::Running,
            body: Body::new(&rules),
            pipes: Vec::new(),
            score: 0,
            time_ticks: 0,
            events: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            next_pair_id: 0,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    pub fn next_pair_id(&mut self) -> PairId {
        let id = PairId(self.next_pair_id);
        self.next_pair_id += 1;
        id
    }

    pub fn pair(&self, id: PairId) -> Option<&PipePair> {
        self.pipes.iter().find(|p| p.id == id)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
