//! Render view
//!
//! A screen-space snapshot of the game state for the presentation layer.
//! Every world rect is projected with the current scroll offset.

use serde::Serialize;

use super::boss::warning_intensity;
use super::collision::Rect;
use super::state::{GameState, ProjectileKind};

#[derive(Debug, Clone, Serialize)]
pub struct PlatformView {
    pub rect: Rect,
    pub variant: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct BossView {
    pub rect: Rect,
    pub health: u32,
    pub max_health: u32,
    pub angry: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub rect: Rect,
    pub kind: ProjectileKind,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameView {
    pub player: Rect,
    pub ground: Rect,
    pub platforms: Vec<PlatformView>,
    pub obstacles: Vec<Rect>,
    pub bosses: Vec<BossView>,
    pub projectiles: Vec<ProjectileView>,
    pub scroll_offset: i32,
    pub score: u64,
    pub game_over: bool,
    /// Remaining boss warning (1 = just started), if one is active
    pub boss_warning: Option<f32>,
}

impl FrameView {
    /// Project the current state to screen space
    pub fn capture(state: &GameState) -> Self {
        let now = state.now_ms();

        let platforms = state
            .platforms
            .iter()
            .map(|p| PlatformView {
                rect: state.to_screen(&p.rect),
                variant: p.variant,
            })
            .collect();

        let obstacles = state
            .obstacles
            .iter()
            .map(|o| state.to_screen(&o.rect))
            .collect();

        let bosses = state
            .bosses
            .iter()
            .map(|b| BossView {
                rect: state.to_screen(&b.rect),
                health: b.health,
                max_health: b.max_health,
                angry: b.is_angry(now),
            })
            .collect();

        let projectiles = state
            .bullets
            .iter()
            .chain(&state.fireballs)
            .map(|p| ProjectileView {
                rect: state.to_screen(&p.rect),
                kind: p.kind,
            })
            .collect();

        Self {
            player: state.player.rect(),
            ground: state.ground_rect(),
            platforms,
            obstacles,
            bosses,
            projectiles,
            scroll_offset: state.scroll_offset,
            score: state.score,
            game_over: state.is_game_over(),
            boss_warning: warning_intensity(state),
        }
    }

    /// Serialize for an external renderer
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::Ruleset;
    use crate::sim::boss::{fire_player_bullet, spawn_boss};
    use crate::sim::state::Projectile;
    use glam::Vec2;

    #[test]
    fn test_screen_projection_matches_scroll() {
        let mut state = GameState::new(4, Ruleset::default());
        state.scroll_offset = -730;
        spawn_boss(&mut state, 2000.0);
        fire_player_bullet(&mut state, true);
        let id = state.next_entity_id();
        state.fireballs.push(Projectile {
            id,
            kind: ProjectileKind::Fireball,
            rect: Rect::new(2100.0, 300.0, 20.0, 20.0),
            vel: Vec2::new(-9.0, 1.0),
        });

        let view = FrameView::capture(&state);
        assert_eq!(view.scroll_offset, -730);

        // world_x == screen_x - scroll_offset
        for (p, v) in state.platforms.iter().zip(&view.platforms) {
            assert_eq!(p.rect.x, v.rect.x - view.scroll_offset as f32);
            assert_eq!(p.rect.y, v.rect.y);
            assert_eq!(p.variant, v.variant);
        }
        for (o, v) in state.obstacles.iter().zip(&view.obstacles) {
            assert_eq!(o.rect.x, v.x - view.scroll_offset as f32);
        }
        assert_eq!(view.bosses[0].rect.x, 2000.0 - 730.0);
        assert_eq!(view.bosses[0].health, 10);

        // Bullet spawns on the player, which is already in screen space
        let bullet = view.projectiles[0].rect;
        assert_eq!(view.projectiles[0].kind, ProjectileKind::Bullet);
        assert_eq!(bullet.center().x, view.player.center().x);

        let fireball = &view.projectiles[1];
        assert_eq!(fireball.kind, ProjectileKind::Fireball);
        assert_eq!(fireball.rect.x - view.scroll_offset as f32, 2100.0);
        assert_eq!(fireball.rect.y, 300.0);
    }

    #[test]
    fn test_view_flags() {
        let mut state = GameState::new(4, Ruleset::default());
        let view = FrameView::capture(&state);
        assert!(!view.game_over);
        assert!(view.boss_warning.is_none());
        assert_eq!(view.ground.y, 670.0);

        state.end_run(crate::sim::GameOverCause::Obstacle);
        let view = FrameView::capture(&state);
        assert!(view.game_over);

        let json = view.to_json().unwrap();
        assert!(json.contains("\"game_over\":true"));
    }
}
