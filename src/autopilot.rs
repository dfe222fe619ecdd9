//! Demo player
//!
//! Reads the presentation snapshot each tick and answers with the actions
//! a reasonable human would take. Used by the headless demo and by tests
//! that need a full session played out.

use crate::consts::{COLLISION_RADIUS, DIVER_Y};
use crate::sim::{Action, EntityKind, EntityView, Snapshot, SnapshotView, Steer};

/// Stop reeling above this tension
const RELEASE_TENSION: f64 = 85.0;
/// Resume reeling below this tension
const RESUME_TENSION: f64 = 70.0;
/// How far ahead (upward) the diver looks for entities
const LOOKAHEAD: f32 = 45.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    holding: bool,
    steer: Steer,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions to submit before the next tick
    pub fn decide(&mut self, snapshot: &Snapshot) -> Vec<Action> {
        if snapshot.phase.is_terminal() {
            return Vec::new();
        }
        match &snapshot.view {
            SnapshotView::Timing {
                cursor,
                target_start,
                target_width,
                ..
            } => {
                if *cursor >= *target_start && *cursor <= target_start + target_width {
                    vec![Action::Tap]
                } else {
                    Vec::new()
                }
            }
            SnapshotView::TensionReel { tension, qte, .. } => {
                let mut actions = Vec::new();
                if let Some(qte) = qte {
                    actions.push(Action::QteTap(qte.position));
                }
                if self.holding && *tension >= RELEASE_TENSION {
                    self.holding = false;
                    actions.push(Action::HoldEnd);
                } else if !self.holding && *tension < RESUME_TENSION {
                    self.holding = true;
                    actions.push(Action::HoldStart);
                }
                actions
            }
            SnapshotView::Diving { diver_x, entities, .. } => {
                let wanted = choose_steer(*diver_x as f32, entities);
                if wanted == self.steer {
                    return Vec::new();
                }
                self.steer = wanted;
                vec![match wanted {
                    Steer::Left => Action::PressLeft,
                    Steer::Right => Action::PressRight,
                    Steer::None => Action::Release,
                }]
            }
        }
    }
}

fn ahead(diver_x: f32, entity: &EntityView) -> Option<f32> {
    let rise = entity.pos.y - DIVER_Y;
    if (0.0..LOOKAHEAD).contains(&rise) {
        Some(entity.pos.x - diver_x)
    } else {
        None
    }
}

/// Dodge the closest hazard in our lane, otherwise chase the best treasure
fn choose_steer(diver_x: f32, entities: &[EntityView]) -> Steer {
    let lane = COLLISION_RADIUS + 2.0;

    let threat = entities
        .iter()
        .filter(|e| e.kind == EntityKind::Hazard)
        .filter_map(|e| ahead(diver_x, e).map(|dx| (e.pos.y, dx)))
        .filter(|(_, dx)| dx.abs() < lane)
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    if let Some((_, dx)) = threat {
        return if dx > 0.0 { Steer::Left } else { Steer::Right };
    }

    let treasure = entities
        .iter()
        .filter(|e| e.kind != EntityKind::Hazard)
        .filter_map(|e| ahead(diver_x, e).map(|dx| (e.kind.points(), e.pos.y, dx)))
        .max_by(|a, b| {
            a.0.cmp(&b.0)
                .then(b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
        });
    match treasure {
        Some((_, _, dx)) if dx > 1.0 => Steer::Right,
        Some((_, _, dx)) if dx < -1.0 => Steer::Left,
        _ => Steer::None,
    }
}
