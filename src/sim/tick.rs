//! Fixed timestep simulation tick
//!
//! One `tick` integrates gravity, scrolls the pipes, retires the ones that
//! left the screen, credits at most one point and finally checks collisions.

use super::state::{Body, GameEvent, GameState, Phase};

/// Advance the game state by one fixed timestep. No-op once the game is over.
pub fn tick(state: &mut GameState) {
    if state.phase == Phase::Over {
        return;
    }
    state.time_ticks += 1;
    let rules = state.rules;

    state.body.velocity += rules.gravity;
    state.body.y += state.body.velocity;

    for pair in &mut state.pipes {
        pair.translate(-rules.pipe_speed);
    }

    let events = &mut state.events;
    state.pipes.retain(|pair| {
        if pair.right() < 0.0 {
            events.push(GameEvent::Retired(pair.id));
            false
        } else {
            true
        }
    });

    // Compare against the body's current left edge, it moved this tick
    let body_left = state.body.rect().x1;
    let mut scored = false;
    for pair in state.pipes.iter_mut().filter(|p| !p.passed) {
        if pair.right() < body_left {
            pair.passed = true;
            if !scored {
                state.score += 1;
                scored = true;
            }
        }
    }
    if scored {
        log::debug!("Score: {}", state.score);
        state.events.push(GameEvent::Scored(state.score));
    }

    check_collisions(state);
}

/// Set the body's velocity to the jump impulse (overrides, does not add)
pub fn jump(state: &mut GameState) {
    if state.phase == Phase::Running {
        state.body.velocity = state.rules.jump_impulse;
        state.events.push(GameEvent::Jumped);
    }
}

/// Reset to a fresh running game. Timers are the caller's to cancel.
pub fn restart(state: &mut GameState) {
    state.body = Body::new(&state.rules);
    state.pipes.clear();
    state.score = 0;
    state.time_ticks = 0;
    state.phase = Phase::Running;
    state.events.push(GameEvent::Restarted);
    log::info!("Game restarted");
}

/// True if the body touches the ceiling, the floor or any pipe
pub fn is_colliding(state: &GameState) -> bool {
    let body = state.body.rect();
    if body.y1 <= 0.0 || body.y2 >= state.rules.height {
        return true;
    }
    state
        .pipes
        .iter()
        .flat_map(|pair| pair.rects())
        .any(|pipe| pipe.overlaps(&body))
}

/// End the game if the body collides. Returns true only on the call that
/// performed the transition; later calls are no-ops.
pub fn check_collisions(state: &mut GameState) -> bool {
    if state.phase == Phase::Over || !is_colliding(state) {
        return false;
    }
    state.phase = Phase::Over;
    state.events.push(GameEvent::GameOver { score: state.score });
    log::info!("Game over after {} ticks, final score {}", state.time_ticks, state.score);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{PairId, PipePair};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_gravity_then_jump() {
        let mut state = GameState::new(7);
        tick(&mut state);
        assert!(approx(state.body.velocity, 0.6));
        assert!(approx(state.body.y, 300.6));

        jump(&mut state);
        assert_eq!(state.body.velocity, -10.0);
        tick(&mut state);
        assert!(approx(state.body.velocity, -9.4));
        assert!(approx(state.body.y, 291.2));
    }

    #[test]
    fn test_jump_overrides_velocity() {
        let mut state = GameState::new(7);
        state.body.velocity = 25.0;
        jump(&mut state);
        assert_eq!(state.body.velocity, -10.0);
        state.body.velocity = -42.0;
        jump(&mut state);
        assert_eq!(state.body.velocity, -10.0);
    }

    #[test]
    fn test_jump_ignored_when_over() {
        let mut state = GameState::new(7);
        state.phase = Phase::Over;
        state.body.velocity = 3.0;
        jump(&mut state);
        assert_eq!(state.body.velocity, 3.0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_tick_is_noop_when_over() {
        let mut state = GameState::new(7);
        let id = state.next_pair_id();
        state.pipes.push(PipePair::new(id, 300.0, 300.0, &state.rules));
        state.phase = Phase::Over;
        let before = state.clone();
        tick(&mut state);
        assert_eq!(state.body, before.body);
        assert_eq!(state.pipes, before.pipes);
        assert_eq!(state.time_ticks, before.time_ticks);
    }

    #[test]
    fn test_pipe_retired_when_right_edge_below_zero() {
        let mut state = GameState::new(7);
        let id = state.next_pair_id();
        // Right edge at 4: one tick brings it to -1
        state.pipes.push(PipePair::new(id, -56.0, 300.0, &state.rules));
        state.pipes[0].passed = true;
        tick(&mut state);
        assert!(state.pipes.is_empty());
        assert!(state.events.contains(&GameEvent::Retired(id)));
    }

    #[test]
    fn test_pipe_kept_at_right_edge_zero() {
        let mut state = GameState::new(7);
        let id = state.next_pair_id();
        state.pipes.push(PipePair::new(id, -55.0, 300.0, &state.rules));
        state.pipes[0].passed = true;
        tick(&mut state);
        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.pipes[0].right(), 0.0);
    }

    #[test]
    fn test_score_once_per_pair() {
        let mut state = GameState::new(7);
        let id = state.next_pair_id();
        // Right edge at 89, body left edge at 85: crosses on the first tick
        state.pipes.push(PipePair::new(id, 29.0, 300.0, &state.rules));
        tick(&mut state);
        assert_eq!(state.score, 1);
        assert!(state.pipes[0].passed);
        assert_eq!(state.events, vec![GameEvent::Scored(1)]);

        tick(&mut state);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_at_most_one_point_per_tick() {
        let mut state = GameState::new(7);
        for x in [20.0, 25.0] {
            let id = state.next_pair_id();
            state.pipes.push(PipePair::new(id, x, 300.0, &state.rules));
        }
        tick(&mut state);
        assert_eq!(state.score, 1);
        assert!(state.pipes.iter().all(|p| p.passed));
    }

    #[test]
    fn test_ceiling_collision_is_idempotent() {
        let mut state = GameState::new(7);
        state.body.y = 15.0;
        assert!(check_collisions(&mut state));
        assert_eq!(state.phase, Phase::Over);
        assert!(!check_collisions(&mut state));
        let game_overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_floor_collision() {
        let mut state = GameState::new(7);
        state.body.y = 585.0;
        assert!(is_colliding(&state));
        state.body.y = 584.0;
        assert!(!is_colliding(&state));
    }

    #[test]
    fn test_pipe_collision() {
        let mut state = GameState::new(7);
        let id = state.next_pair_id();
        // Gap spans 375..525, body spans 285..315: hits the top pipe
        state.pipes.push(PipePair::new(id, 80.0, 450.0, &state.rules));
        assert!(is_colliding(&state));

        // Body sits inside the gap
        state.pipes[0] = PipePair::new(id, 80.0, 300.0, &state.rules);
        assert!(!is_colliding(&state));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = GameState::new(7);
        let id = state.next_pair_id();
        state.pipes.push(PipePair::new(id, 200.0, 300.0, &state.rules));
        state.score = 4;
        state.body.y = 10.0;
        state.body.velocity = 8.0;
        state.phase = Phase::Over;

        restart(&mut state);
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.score, 0);
        assert!(state.pipes.is_empty());
        assert_eq!(state.body.y, 300.0);
        assert_eq!(state.body.velocity, 0.0);
        assert_eq!(state.events.last(), Some(&GameEvent::Restarted));
        assert_ne!(state.next_pair_id(), PairId(0));
    }
}
