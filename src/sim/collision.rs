//! Ground-mode collision rules
//!
//! Two rules run against the player every ground frame: the color of the
//! ground underfoot must match the player's color, and the player's box must
//! not overlap an obstacle. A shield charge absorbs one obstacle hit.

use glam::Vec2;

use super::player::Player;
use super::state::{DeathCause, GroundColor};
use super::track::Track;
use crate::consts::*;

/// Result of a collision pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    Clear,
    /// The shield took a hit; the player is briefly invulnerable
    Absorbed,
    Fatal(DeathCause),
}

impl CollisionOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, CollisionOutcome::Fatal(_))
    }
}

/// Check the player against the ground ribbon and obstacles
///
/// Invulnerability is sampled once on entry. Each overlapping obstacle
/// consumes one shield charge; an overlap with no charge left is fatal.
pub fn resolve(
    player: &mut Player,
    track: &Track,
    ground_y: f32,
    shield_charges: &mut u8,
) -> CollisionOutcome {
    if player.is_invulnerable() {
        return CollisionOutcome::Clear;
    }

    if let Some(ground) = wrong_color_ground(player, track, ground_y) {
        return CollisionOutcome::Fatal(DeathCause::WrongColor { ground });
    }

    let body = player.bounds().shrink(OBSTACLE_INSET);
    let mut absorbed = false;
    for obs in &track.obstacles {
        let hazard = obs.bounds(ground_y).shrink(OBSTACLE_INSET);
        if !body.overlaps(&hazard) {
            continue;
        }
        if *shield_charges > 0 {
            *shield_charges -= 1;
            player.grant_invulnerability(SHIELD_INVULNERABILITY_MS);
            absorbed = true;
            log::info!("Shield absorbed obstacle at x={:.0}", obs.x);
            continue;
        }
        return CollisionOutcome::Fatal(DeathCause::HazardContact);
    }

    if absorbed {
        CollisionOutcome::Absorbed
    } else {
        CollisionOutcome::Clear
    }
}

/// Color of the ground underfoot when it differs from the player's
fn wrong_color_ground(player: &Player, track: &Track, ground_y: f32) -> Option<GroundColor> {
    if player.bottom() < ground_y || !player.grounded {
        return None;
    }
    let ground = track.segment_under(player.pos.x, player.pos.x + player.width)?;
    (ground.color != player.color).then_some(ground.color)
}

/// Circle test between two centers under a combined radius
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;
    use crate::sim::track::{GroundSegment, Obstacle};

    const GROUND_Y: f32 = 620.0;

    fn track_with(color: GroundColor, obstacles: &[f32]) -> Track {
        let mut track = Track::new(1280.0);
        track.segments[0].color = color;
        track.obstacles = obstacles
            .iter()
            .map(|&x| Obstacle {
                x,
                kind: ObstacleKind::UraniumFlask,
                passed: false,
            })
            .collect();
        track
    }

    fn grounded_player(color: GroundColor) -> Player {
        let mut p = Player::new(GROUND_Y);
        p.color = color;
        p
    }

    #[test]
    fn test_wrong_color_is_fatal() {
        let mut p = grounded_player(GroundColor::Light);
        let track = track_with(GroundColor::Dark, &[]);
        let outcome = resolve(&mut p, &track, GROUND_Y, &mut 0);
        assert_eq!(
            outcome,
            CollisionOutcome::Fatal(DeathCause::WrongColor {
                ground: GroundColor::Dark
            })
        );
        if let CollisionOutcome::Fatal(cause) = outcome {
            assert!(cause.to_string().contains("Dark"));
        }
    }

    #[test]
    fn test_matching_color_is_clear() {
        let mut p = grounded_player(GroundColor::Dark);
        let track = track_with(GroundColor::Dark, &[]);
        assert_eq!(resolve(&mut p, &track, GROUND_Y, &mut 0), CollisionOutcome::Clear);
    }

    #[test]
    fn test_color_ignored_in_the_air() {
        let mut p = grounded_player(GroundColor::Light);
        p.pos.y -= 100.0;
        p.grounded = false;
        let track = track_with(GroundColor::Dark, &[]);
        assert_eq!(resolve(&mut p, &track, GROUND_Y, &mut 0), CollisionOutcome::Clear);
    }

    #[test]
    fn test_straddling_uses_older_segment() {
        let mut p = grounded_player(GroundColor::Light);
        let mut track = track_with(GroundColor::Light, &[]);
        track.segments[0].width = 100.0;
        track.segments.push_back(GroundSegment {
            x: 100.0,
            width: 500.0,
            color: GroundColor::Dark,
        });
        // Player spans [80, 124): overlaps both, the light one wins
        assert_eq!(resolve(&mut p, &track, GROUND_Y, &mut 0), CollisionOutcome::Clear);
    }

    #[test]
    fn test_obstacle_overlap_is_fatal() {
        let mut p = grounded_player(GroundColor::Light);
        let track = track_with(GroundColor::Light, &[100.0]);
        assert_eq!(
            resolve(&mut p, &track, GROUND_Y, &mut 0),
            CollisionOutcome::Fatal(DeathCause::HazardContact)
        );
    }

    #[test]
    fn test_inset_tolerance() {
        let mut p = grounded_player(GroundColor::Light);
        // Raw boxes overlap by 5px, shrunk boxes do not
        let track = track_with(GroundColor::Light, &[PLAYER_X + PLAYER_WIDTH - 5.0]);
        assert_eq!(resolve(&mut p, &track, GROUND_Y, &mut 0), CollisionOutcome::Clear);
        let track = track_with(GroundColor::Light, &[PLAYER_X + PLAYER_WIDTH - 7.0]);
        assert!(resolve(&mut p, &track, GROUND_Y, &mut 0).is_fatal());
    }

    #[test]
    fn test_shield_absorbs_exactly_one_hit() {
        let mut p = grounded_player(GroundColor::Light);
        let track = track_with(GroundColor::Light, &[100.0]);
        let mut shield = 1;
        assert_eq!(resolve(&mut p, &track, GROUND_Y, &mut shield), CollisionOutcome::Absorbed);
        assert_eq!(shield, 0);
        assert!(p.is_invulnerable());
        assert_eq!(p.invulnerable_ms, SHIELD_INVULNERABILITY_MS);
    }

    #[test]
    fn test_second_overlap_without_shield_is_fatal() {
        let mut p = grounded_player(GroundColor::Light);
        let track = track_with(GroundColor::Light, &[90.0, 100.0]);
        let mut shield = 1;
        assert_eq!(
            resolve(&mut p, &track, GROUND_Y, &mut shield),
            CollisionOutcome::Fatal(DeathCause::HazardContact)
        );
        assert_eq!(shield, 0);

        let mut p = grounded_player(GroundColor::Light);
        let mut shield = 2;
        assert_eq!(resolve(&mut p, &track, GROUND_Y, &mut shield), CollisionOutcome::Absorbed);
        assert_eq!(shield, 0);
    }

    #[test]
    fn test_invulnerable_ignores_everything() {
        let mut p = grounded_player(GroundColor::Light);
        p.grant_invulnerability(500.0);
        let track = track_with(GroundColor::Dark, &[100.0]);
        let mut shield = 1;
        assert_eq!(resolve(&mut p, &track, GROUND_Y, &mut shield), CollisionOutcome::Clear);
        assert_eq!(shield, 1);
    }

    #[test]
    fn test_within_radius() {
        assert!(within_radius(Vec2::ZERO, Vec2::new(84.0, 0.0), 85.0));
        assert!(!within_radius(Vec2::ZERO, Vec2::new(85.0, 0.0), 85.0));
    }
}
