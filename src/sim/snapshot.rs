//! Read-only presentation snapshot
//!
//! Rebuilt from the authoritative state on request. The simulation never
//! reads it back.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{SessionConfig, Variant};

use super::state::{EntityKind, Mood, PhysicsState, SessionPhase};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QteView {
    pub position: Vec2,
    pub remaining: Duration,
    pub max: Duration,
    /// 1.0 fresh, 0.0 about to expire
    pub fraction_left: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub pos: Vec2,
    pub kind: EntityKind,
}

/// Variant-specific gauges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SnapshotView {
    Timing {
        progress: f64,
        tension: f64,
        cursor: f64,
        target_start: f64,
        target_width: f64,
    },
    TensionReel {
        tension: f64,
        distance: f64,
        max_distance: f64,
        mood: Mood,
        reeling: bool,
        qte: Option<QteView>,
    },
    Diving {
        oxygen: f64,
        diver_x: f64,
        depth: f64,
        score: u64,
        entities: Vec<EntityView>,
    },
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub variant: Variant,
    pub phase: SessionPhase,
    pub ticks: u64,
    pub elapsed: Duration,
    pub view: SnapshotView,
}

impl Snapshot {
    pub fn capture(
        config: &SessionConfig,
        state: &PhysicsState,
        phase: SessionPhase,
        ticks: u64,
        elapsed: Duration,
    ) -> Self {
        let view = match state {
            PhysicsState::Timing(s) => SnapshotView::Timing {
                progress: s.progress,
                tension: s.tension,
                cursor: s.cursor,
                target_start: s.target_start,
                target_width: match config {
                    SessionConfig::Timing(c) => c.target_width,
                    _ => {
                        let variant = config.variant().as_str();
                        log::error!("Timing state captured with a {} config", variant);
                        0.0
                    }
                },
            },
            PhysicsState::TensionReel(s) => SnapshotView::TensionReel {
                tension: s.tension,
                distance: s.distance,
                max_distance: s.max_distance,
                mood: s.mood,
                reeling: s.reeling,
                qte: s.qte.map(|q| QteView {
                    position: q.position,
                    remaining: q.remaining,
                    max: q.max,
                    fraction_left: q.fraction_left(),
                }),
            },
            PhysicsState::Diving(s) => SnapshotView::Diving {
                oxygen: s.oxygen,
                diver_x: s.diver_x,
                depth: s.depth,
                score: s.score,
                entities: s
                    .entities
                    .iter()
                    .map(|e| EntityView {
                        id: e.id,
                        pos: e.pos,
                        kind: e.kind,
                    })
                    .collect(),
            },
        };

        Self {
            variant: config.variant(),
            phase,
            ticks,
            elapsed,
            view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DivingConfig, TimingConfig};
    use glam::Vec2;

    fn timing_config() -> SessionConfig {
        SessionConfig::Timing(TimingConfig {
            cursor_speed: 1.5,
            target_start: 40.0,
            target_width: 24.2,
            progress_gain: 23.5,
            fail_penalty: 11.5,
        })
    }

    #[test]
    fn test_timing_view_carries_zone_width() {
        let config = timing_config();
        let state = PhysicsState::new(&config);
        let elapsed = Duration::from_millis(50);
        let snap = Snapshot::capture(&config, &state, SessionPhase::Active, 3, elapsed);
        assert_eq!(snap.variant, Variant::Timing);
        assert_eq!(snap.ticks, 3);
        let SnapshotView::Timing {
            target_start,
            target_width,
            ..
        } = snap.view
        else {
            panic!("expected timing view");
        };
        assert_eq!(target_start, 40.0);
        assert_eq!(target_width, 24.2);
    }

    #[test]
    fn test_mismatched_config_reports_empty_zone() {
        let state = PhysicsState::new(&timing_config());
        let config = SessionConfig::Diving(DivingConfig::default());
        let snap = Snapshot::capture(&config, &state, SessionPhase::Active, 0, Duration::ZERO);
        assert!(matches!(
            snap.view,
            SnapshotView::Timing { target_width, .. } if target_width == 0.0
        ));
    }

    #[test]
    fn test_diving_view_lists_entities_in_order() {
        let config = SessionConfig::Diving(DivingConfig::default());
        let mut state = PhysicsState::new(&config);
        if let PhysicsState::Diving(d) = &mut state {
            d.spawn(EntityKind::Hazard, Vec2::new(10.0, 120.0));
            d.spawn(EntityKind::CollectibleLarge, Vec2::new(70.0, 90.0));
        }
        let snap = Snapshot::capture(&config, &state, SessionPhase::Active, 0, Duration::ZERO);
        let SnapshotView::Diving { entities, oxygen, .. } = snap.view else {
            panic!("expected diving view");
        };
        assert_eq!(oxygen, 100.0);
        let ids: Vec<u32> = entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(entities[1].kind, EntityKind::CollectibleLarge);
    }
}
