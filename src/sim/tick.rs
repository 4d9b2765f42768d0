//! Fixed timestep simulation tick
//!
//! Per-tick ordering: pause/start handling, scroll-speed ramp, jump
//! controller, kill-plane check, platform scroll/prune/regenerate,
//! projectile and enemy updates, collisions.

use crate::consts::*;
use crate::sim::collision::circles_touch;
use crate::sim::state::{GameEvent, GamePhase, GameState, Projectile};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Normalized jump power for this tick (0 when below the vocal threshold)
    pub jump_power: f32,
    /// Per-tick shot charge increment (frequency channel over the divider)
    pub charge_rate: f32,
    /// Fire a projectile (edge-triggered by the caller)
    pub shoot: bool,
    /// Pause toggle (edge-triggered by the caller)
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Pause is a toggle from any phase; unpausing restores the phase it
    // interrupted.
    if input.pause {
        match state.phase {
            GamePhase::Paused => state.phase = state.paused_from,
            phase => {
                state.paused_from = phase;
                state.phase = GamePhase::Paused;
                return events;
            }
        }
    }

    match state.phase {
        GamePhase::Paused => return events,
        GamePhase::Attract => {
            // A loud enough sample starts the run; the same sample already
            // drives the first jump below.
            if input.jump_power < JUMP_THRESHOLD {
                return events;
            }
            state.phase = GamePhase::Playing;
            events.push(GameEvent::RunStarted);
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    // Scroll-speed ramp: multiplicative up to the cap, then a slow creep
    // that keeps feeding the score.
    if state.speed < MAX_SCROLL_SPEED {
        state.speed = (state.speed * SPEED_RAMP).min(MAX_SCROLL_SPEED);
    }
    state.speed += SPEED_CREEP;

    state.charge = (state.charge + input.charge_rate).clamp(0.0, CHARGE_CAP);

    state.player.update(input.jump_power, &state.platforms);

    // Falling past the kill plane ends the run
    if state.player.y > KILL_PLANE {
        let score = state.score();
        state.reset_run();
        events.push(GameEvent::RunEnded { score });
        return events;
    }

    // Platforms scroll left; each pruned platform grows the chain by one
    // so the lookahead stays constant.
    for platform in &mut state.platforms {
        platform.advance(state.speed);
    }
    let before = state.platforms.len();
    state.platforms.retain(|p| !p.off_screen());
    let pruned = before - state.platforms.len();
    if pruned > 0 {
        state.construct_platforms(pruned);
    }

    // Fire a projectile if the shot charge is ready
    if input.shoot && state.charge >= SHOT_COST {
        state.projectiles.push(Projectile::new(
            state.player.x,
            state.player.y,
            state.speed,
        ));
        state.charge -= SHOT_COST;
        events.push(GameEvent::ShotFired);
    }

    // Projectiles fly forward, or scroll out at the full world speed once
    // spent, and expire off screen
    for projectile in &mut state.projectiles {
        projectile.advance(state.speed);
    }
    state.projectiles.retain(|p| p.active());

    // Enemy collisions against flying projectiles, then drift and pruning
    let mut killed = Vec::new();
    for (index, enemy) in state.enemies.iter().enumerate() {
        for projectile in state.projectiles.iter_mut().filter(|p| !p.touched) {
            if circles_touch(enemy.center(), projectile.center(), ENEMY_HIT_RADIUS) {
                projectile.touch();
                killed.push(index);
                break;
            }
        }
    }
    for index in killed.into_iter().rev() {
        state.enemies.remove(index);
        state.kills += 1;
        events.push(GameEvent::EnemyKilled);
    }
    for enemy in &mut state.enemies {
        enemy.advance(state.speed);
    }
    state.enemies.retain(|e| !e.off_screen());

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Enemy;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.phase = GamePhase::Playing;
        state
    }

    fn quiet() -> TickInput {
        TickInput::default()
    }

    /// Replace the chain with one enormous floor so long-running tests
    /// never lose the character to a gap.
    fn with_endless_floor(state: &mut GameState) {
        state.platforms.clear();
        state
            .platforms
            .push(crate::sim::platforms::Platform::new(
                -100_000.0,
                SCREEN_HEIGHT - 100.0,
                10_000,
                0,
            ));
    }

    #[test]
    fn test_attract_ignores_quiet_samples() {
        let mut state = GameState::new(1);
        let events = tick(&mut state, &quiet());
        assert!(events.is_empty());
        assert_eq!(state.phase, GamePhase::Attract);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_loud_sample_starts_run_and_jumps() {
        let mut state = GameState::new(1);
        let input = TickInput {
            jump_power: 10.0,
            ..TickInput::default()
        };
        let events = tick(&mut state, &input);
        assert!(events.contains(&GameEvent::RunStarted));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.player.is_jumping);
    }

    #[test]
    fn test_pause_toggles_and_freezes() {
        let mut state = playing_state(2);
        let ticks = state.time_ticks;
        let pause = TickInput {
            pause: true,
            ..TickInput::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &quiet());
        assert_eq!(state.time_ticks, ticks);
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_from_attract_resumes_to_attract() {
        let mut state = GameState::new(11);
        let pause = TickInput {
            pause: true,
            ..TickInput::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        // Loud samples must not start a run while paused
        let loud = TickInput {
            jump_power: 10.0,
            ..TickInput::default()
        };
        tick(&mut state, &loud);
        assert_eq!(state.phase, GamePhase::Paused);
        let events = tick(&mut state, &pause);
        assert!(events.is_empty());
        assert_eq!(state.phase, GamePhase::Attract);
    }

    #[test]
    fn test_speed_ramps_to_cap_then_creeps() {
        let mut state = playing_state(3);
        with_endless_floor(&mut state);
        for _ in 0..200 {
            tick(&mut state, &quiet());
        }
        assert!(state.speed > MAX_SCROLL_SPEED);
        let speed = state.speed;
        tick(&mut state, &quiet());
        assert!((state.speed - (speed + SPEED_CREEP)).abs() < 1e-4);
    }

    #[test]
    fn test_pruned_platforms_are_replaced() {
        let mut state = playing_state(4);
        let lookahead = state.platforms.len();
        let first_id = state.platforms[0].id;
        // Teleport the chain so the head platform is past the prune line
        let shift = state.platforms[0].x + state.platforms[0].size() + SCREEN_WIDTH + 50.0;
        for platform in &mut state.platforms {
            platform.x -= shift;
        }
        tick(&mut state, &quiet());
        assert_eq!(state.platforms.len(), lookahead);
        assert!(state.platforms[0].id > first_id);
        for pair in state.platforms.windows(2) {
            assert_eq!(pair[1].id, pair[0].id + 1);
        }
    }

    #[test]
    fn test_fall_through_ends_run() {
        let mut state = playing_state(5);
        state.platforms.clear();
        let mut ended = None;
        for _ in 0..300 {
            let events = tick(&mut state, &quiet());
            if let Some(GameEvent::RunEnded { score }) = events.first() {
                ended = Some(*score);
                break;
            }
        }
        assert!(ended.is_some(), "falling with no platforms must end the run");
        assert_eq!(state.phase, GamePhase::Attract);
        assert_eq!(state.speed, BASE_SCROLL_SPEED);
    }

    #[test]
    fn test_shot_requires_and_spends_charge() {
        let mut state = playing_state(6);
        let shoot = TickInput {
            shoot: true,
            ..TickInput::default()
        };
        let events = tick(&mut state, &shoot);
        assert!(!events.contains(&GameEvent::ShotFired));
        assert!(state.projectiles.is_empty());

        state.charge = SHOT_COST;
        let events = tick(&mut state, &shoot);
        assert!(events.contains(&GameEvent::ShotFired));
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.charge, 0.0);
    }

    #[test]
    fn test_charge_accumulates_and_caps() {
        let mut state = playing_state(7);
        let input = TickInput {
            charge_rate: 90.0,
            ..TickInput::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.charge, 90.0);
        tick(&mut state, &input);
        tick(&mut state, &input);
        assert_eq!(state.charge, CHARGE_CAP);
    }

    #[test]
    fn test_projectile_kills_enemy() {
        let mut state = playing_state(8);
        state.enemies.clear();
        state.enemies.push(Enemy {
            x: 400.0,
            y: 300.0,
        });
        let enemy_center = state.enemies[0].center();
        let mut projectile = Projectile::new(0.0, 0.0, 0.0);
        projectile.x = enemy_center.x - PROJECTILE_SIZE / 2.0;
        projectile.y = enemy_center.y - PROJECTILE_SIZE / 2.0;
        state.projectiles.push(projectile);

        let events = tick(&mut state, &quiet());
        assert!(events.contains(&GameEvent::EnemyKilled));
        assert_eq!(state.kills, 1);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles[0].touched);
    }

    #[test]
    fn test_spent_projectile_scrolls_at_world_speed() {
        let mut state = playing_state(10);
        with_endless_floor(&mut state);
        state.enemies.clear();
        let mut projectile = Projectile::new(300.0, 300.0, 12.0);
        projectile.touch();
        state.projectiles.push(projectile);
        let x0 = state.projectiles[0].x;
        tick(&mut state, &quiet());
        // Spent shots drop out at the full scroll speed, not the platform
        // drift rate
        let expected = x0 - state.speed;
        assert!((state.projectiles[0].x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_run_end_reports_score() {
        let mut state = playing_state(9);
        state.speed = MAX_SCROLL_SPEED + 7.0;
        state.kills = 2;
        state.platforms.clear();
        state.player.y = KILL_PLANE + 1.0;
        let events = tick(&mut state, &quiet());
        // Speed still ramps on the final tick before death is detected
        match events.first() {
            Some(GameEvent::RunEnded { score }) => assert!(*score >= 27),
            other => panic!("expected RunEnded, got {other:?}"),
        }
    }
}
