//! Obstacle spawner

use rand::Rng;

use super::state::{GameEvent, GameState, PairId, Phase, PipePair};

/// Add a pipe pair at the right edge with a random gap centre.
/// Returns `None` once the game is over.
pub fn spawn(state: &mut GameState) -> Option<PairId> {
    if state.phase == Phase::Over {
        return None;
    }
    let gap_center = state.rng.gen_range(state.rules.gap_range()) as f64;
    spawn_with_gap(state, gap_center)
}

/// Same as `spawn` with a caller-chosen gap centre
pub fn spawn_with_gap(state: &mut GameState, gap_center: f64) -> Option<PairId> {
    if state.phase == Phase::Over {
        return None;
    }
    let id = state.next_pair_id();
    let pair = PipePair::new(id, state.rules.width, gap_center, &state.rules);
    log::debug!("Spawned pair {} with gap at {}", id.0, gap_center);
    state.pipes.push(pair);
    state.events.push(GameEvent::Spawned(id));
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_enters_from_right_edge() {
        let mut state = GameState::new(42);
        let id = spawn(&mut state).unwrap();
        let pair = state.pair(id).unwrap();
        assert_eq!(pair.top.x1, 400.0);
        assert_eq!(pair.bottom.x1, 400.0);
        assert_eq!(pair.right(), 460.0);
        assert_eq!(pair.top.y1, 0.0);
        assert_eq!(pair.bottom.y2, 600.0);
        assert_eq!(pair.bottom.y1 - pair.top.y2, 150.0);
        assert!(!pair.passed);
        assert_eq!(state.events, vec![GameEvent::Spawned(id)]);
    }

    #[test]
    fn test_gap_center_within_range() {
        let mut state = GameState::new(3);
        for _ in 0..500 {
            spawn(&mut state);
        }
        assert!(
            state
                .pipes
                .iter()
                .all(|p| (150.0..=450.0).contains(&p.gap_center) && p.gap_center.fract() == 0.0)
        );
    }

    #[test]
    fn test_same_seed_same_gaps() {
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        for _ in 0..10 {
            spawn(&mut a);
            spawn(&mut b);
        }
        let gaps_a: Vec<f64> = a.pipes.iter().map(|p| p.gap_center).collect();
        let gaps_b: Vec<f64> = b.pipes.iter().map(|p| p.gap_center).collect();
        assert_eq!(gaps_a, gaps_b);
    }

    #[test]
    fn test_spawn_noop_when_over() {
        let mut state = GameState::new(42);
        state.phase = Phase::Over;
        assert_eq!(spawn(&mut state), None);
        assert!(state.pipes.is_empty());
        assert!(state.events.is_empty());
    }
}
