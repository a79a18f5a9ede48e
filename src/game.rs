//! Top-level controller
//!
//! Owns the simulation state, the two repeating timers that drive it, and the
//! canvas the state is mirrored into. The tick and spawn timers are re-armed
//! here after each firing rather than by the tasks themselves, so a restart
//! only has to cancel the two handles it holds.

use std::time::Duration;

use crate::clock::{Scheduler, TimerId};
use crate::consts::{MAX_CATCHUP_TASKS, SPAWN_INTERVAL, TICK_INTERVAL};
use crate::geom::Rect;
use crate::scene::Scene;
use crate::sim::{self, GameEvent, GameState, Phase, Rules};
use crate::surface::{Canvas, Surface};

/// Work the scheduler can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Tick,
    Spawn,
}

pub struct Game {
    state: GameState,
    clock: Scheduler<Task>,
    tick_timer: Option<TimerId>,
    spawn_timer: Option<TimerId>,
    canvas: Canvas,
    scene: Scene,
    outbox: Vec<GameEvent>,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self::with_rules(Rules::default(), seed)
    }

    pub fn with_rules(rules: Rules, seed: u64) -> Self {
        let state = GameState::with_rules(rules, seed);
        let mut canvas = Canvas::new();
        let scene = Scene::new(&mut canvas, &state);
        let mut game = Self {
            state,
            clock: Scheduler::new(),
            tick_timer: None,
            spawn_timer: None,
            canvas,
            scene,
            outbox: Vec::new(),
        };
        game.start_timers();
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn clock(&self) -> &Scheduler<Task> {
        &self.clock
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn tick_timer(&self) -> Option<TimerId> {
        self.tick_timer
    }

    pub fn spawn_timer(&self) -> Option<TimerId> {
        self.spawn_timer
    }

    /// Events produced since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Run every task due at or before `now` (time since the game started).
    /// Returns the number of tasks run.
    pub fn advance_to(&mut self, now: Duration) -> usize {
        let mut ran = 0;
        while let Some((id, task)) = self.clock.pop_due(now) {
            self.run(id, task);
            ran += 1;
            if ran >= MAX_CATCHUP_TASKS {
                let late = self.clock.rebase_overdue(now);
                if late > 0 {
                    log::warn!("Frame fell behind, {} timers pushed to {:?}", late, now);
                }
                break;
            }
        }
        self.clock.advance_to(now);
        ran
    }

    pub fn jump(&mut self) {
        sim::jump(&mut self.state);
        self.sync();
    }

    /// Start a fresh game. Only valid once the current one is over.
    pub fn restart(&mut self) {
        if self.state.phase != Phase::Over {
            return;
        }
        self.cancel_timers();
        sim::restart(&mut self.state);
        self.sync();
        self.start_timers();
    }

    /// True if the world point lands on the restart button
    pub fn hits_restart_button(&self, x: f64, y: f64) -> bool {
        self.scene
            .restart_button()
            .is_some_and(|button| self.canvas.overlapping(Rect::point(x, y)).contains(&button))
    }

    fn start_timers(&mut self) {
        self.tick_timer = Some(self.clock.after(Duration::ZERO, Task::Tick));
        self.spawn_timer = Some(self.clock.after(Duration::ZERO, Task::Spawn));
    }

    fn cancel_timers(&mut self) {
        for id in [self.tick_timer.take(), self.spawn_timer.take()].into_iter().flatten() {
            if self.clock.cancel(id) {
                log::debug!("Cancelled pending timer {:?}", id);
            }
        }
    }

    fn run(&mut self, id: TimerId, task: Task) {
        match task {
            Task::Tick => {
                if self.tick_timer != Some(id) {
                    return;
                }
                sim::tick(&mut self.state);
                self.tick_timer = self.rearm(TICK_INTERVAL, Task::Tick);
            }
            Task::Spawn => {
                if self.spawn_timer != Some(id) {
                    return;
                }
                sim::spawn(&mut self.state);
                self.spawn_timer = self.rearm(SPAWN_INTERVAL, Task::Spawn);
            }
        }
        self.sync();
    }

    fn rearm(&mut self, interval: Duration, task: Task) -> Option<TimerId> {
        match self.state.phase {
            Phase::Running => Some(self.clock.after(interval, task)),
            Phase::Over => None,
        }
    }

    fn sync(&mut self) {
        let events = self.state.drain_events();
        self.scene.apply(&mut self.canvas, &self.state, &events);
        self.outbox.extend(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Advance one frame at a time, like the terminal loop does
    fn play_until(game: &mut Game, end: Duration) {
        let mut t = game.clock().now();
        while t < end {
            t = (t + TICK_INTERVAL).min(end);
            game.advance_to(t);
        }
    }

    #[test]
    fn test_first_tick_and_spawn_at_start() {
        let mut game = Game::new(1);
        assert_eq!(game.advance_to(Duration::ZERO), 2);
        assert_eq!(game.state().time_ticks, 1);
        assert_eq!(game.state().pipes.len(), 1);
        // Spawned after the tick, so it has not moved yet
        assert_eq!(game.state().pipes[0].top.x1, 400.0);
    }

    #[test]
    fn test_tick_and_spawn_cadence() {
        // Nothing moves, so nothing can collide
        let rules = Rules {
            gravity: 0.0,
            pipe_speed: 0.0,
            ..Rules::default()
        };
        let mut game = Game::with_rules(rules, 1);
        game.advance_to(ms(100));
        // t = 0, 20, 40, 60, 80, 100
        assert_eq!(game.state().time_ticks, 6);
        assert_eq!(game.state().pipes.len(), 1);
        play_until(&mut game, ms(1499));
        assert_eq!(game.state().pipes.len(), 1);
        play_until(&mut game, ms(1500));
        assert_eq!(game.state().pipes.len(), 2);
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn test_jump_is_forwarded() {
        let mut game = Game::new(1);
        game.advance_to(ms(0));
        game.jump();
        assert_eq!(game.state().body.velocity, -10.0);
        assert!(game.drain_events().contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_timers_stop_when_over() {
        let mut game = Game::new(1);
        // Without jumping the body falls to the floor within a second
        play_until(&mut game, ms(1000));
        assert_eq!(game.phase(), Phase::Over);
        assert_eq!(game.tick_timer(), None);
        // The spawn timer is dropped the next time it fires
        play_until(&mut game, ms(2000));
        assert_eq!(game.spawn_timer(), None);
        assert_eq!(game.clock().pending(), 0);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut game = Game::new(1);
        game.advance_to(ms(40));
        let ticks = game.state().time_ticks;
        game.restart();
        assert_eq!(game.state().time_ticks, ticks);
    }

    #[test]
    fn test_catch_up_is_bounded() {
        let mut game = Game::new(1);
        let ran = game.advance_to(ms(60_000));
        assert_eq!(ran, MAX_CATCHUP_TASKS);
        assert_eq!(game.phase(), Phase::Running);
        // Remaining work waits for the next frame instead of replaying a minute
        assert_eq!(game.clock().next_due(), Some(ms(60_000)));
        assert_eq!(game.advance_to(ms(60_000)), 2);
    }
}
