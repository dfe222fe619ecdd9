//! Session configurator
//!
//! Derives a frozen difficulty configuration from the rod's power, the
//! target's rarity and the player's active skill modifiers. These formulas are
//! the game's balance contract.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::rng::RandomSource;

/// The three challenge variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Timing bar: tap while the cursor is inside the target zone
    Timing,
    /// Reel-in: hold to reel, watch tension, hit quick-time prompts
    TensionReel,
    /// Diving: steer the diver, dodge hazards, grab collectibles
    Diving,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Timing => "timing",
            Variant::TensionReel => "reel",
            Variant::Diving => "diving",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "timing" | "bar" => Some(Variant::Timing),
            "reel" | "tension" | "tension_reel" => Some(Variant::TensionReel),
            "diving" | "dive" => Some(Variant::Diving),
            _ => None,
        }
    }
}

/// Skill and charm effects that feed the difficulty formulas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillModifiers {
    /// Added to the rod's power before clamping ("strength" skill)
    pub power_bonus: f64,
    /// Fraction removed from tension gain and miss penalty ("tension" charm)
    pub tension_relief: f64,
}

/// Upper bound on tension relief so tension can always rise
pub const MAX_TENSION_RELIEF: f64 = 0.9;

impl SkillModifiers {
    fn relief_factor(&self) -> f64 {
        let relief = if self.tension_relief.is_finite() {
            self.tension_relief.clamp(0.0, MAX_TENSION_RELIEF)
        } else {
            0.0
        };
        1.0 - relief
    }
}

/// Timing bar parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub cursor_speed: f64,
    /// Initial target zone start (the zone moves after every hit)
    pub target_start: f64,
    pub target_width: f64,
    pub progress_gain: f64,
    pub fail_penalty: f64,
}

impl TimingConfig {
    /// Draw a fresh zone start for this width
    pub fn random_zone_start(target_width: f64, rng: &mut dyn RandomSource) -> f64 {
        TARGET_ZONE_MIN + rng.next_f64() * (TARGET_ZONE_SPAN - target_width)
    }
}

/// Reel-in parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReelConfig {
    pub strength: f64,
    pub start_distance: f64,
    pub max_distance: f64,
    pub reel_speed: f64,
    pub tension_rate: f64,
    pub decay_rate: f64,
}

/// Diving parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivingConfig {
    pub oxygen_decay: f64,
    pub diver_speed: f64,
    pub spawn_interval: Duration,
    pub entity_speed: f32,
}

impl Default for DivingConfig {
    fn default() -> Self {
        Self {
            oxygen_decay: OXYGEN_DECAY,
            diver_speed: DIVER_SPEED,
            spawn_interval: SPAWN_INTERVAL,
            entity_speed: ENTITY_SPEED,
        }
    }
}

/// Frozen per-session configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionConfig {
    Timing(TimingConfig),
    TensionReel(ReelConfig),
    Diving(DivingConfig),
}

impl SessionConfig {
    pub fn variant(&self) -> Variant {
        match self {
            SessionConfig::Timing(_) => Variant::Timing,
            SessionConfig::TensionReel(_) => Variant::TensionReel,
            SessionConfig::Diving(_) => Variant::Diving,
        }
    }
}

/// Floor power at 1 (non-finite counts as the floor)
pub fn effective_power(power: f64, modifiers: &SkillModifiers) -> f64 {
    let bonus = if modifiers.power_bonus.is_finite() {
        modifiers.power_bonus
    } else {
        0.0
    };
    let power = power + bonus;
    if power.is_finite() { power.max(1.0) } else { 1.0 }
}

/// Floor rarity at 0 (non-finite counts as the floor)
pub fn effective_rarity(rarity: f64) -> f64 {
    if rarity.is_finite() { rarity.max(0.0) } else { 0.0 }
}

/// Build the session configuration for a variant
///
/// Out-of-domain inputs are clamped, never rejected. Only the timing bar
/// draws from `rng` (one draw, the initial zone start).
pub fn configure(
    variant: Variant,
    power: f64,
    rarity: f64,
    modifiers: &SkillModifiers,
    rng: &mut dyn RandomSource,
) -> SessionConfig {
    let power = effective_power(power, modifiers);
    let rarity = effective_rarity(rarity);
    let relief = modifiers.relief_factor();

    match variant {
        Variant::Timing => {
            let target_width = (22.0 + power * 2.2).min(45.0);
            SessionConfig::Timing(TimingConfig {
                cursor_speed: 1.3 + rarity * 0.45,
                target_start: TimingConfig::random_zone_start(target_width, rng),
                target_width,
                progress_gain: 22.0 + power * 1.5,
                fail_penalty: (12.0 - power * 0.5).max(5.0) * relief,
            })
        }
        Variant::TensionReel => {
            let strength = 0.5 + rarity * 0.2;
            let start_distance = 30.0 + rarity * 10.0;
            SessionConfig::TensionReel(ReelConfig {
                strength,
                start_distance,
                max_distance: start_distance + ESCAPE_MARGIN,
                reel_speed: 0.15 * power,
                tension_rate: ((0.5 * strength) / power.sqrt()).max(0.1) * relief,
                decay_rate: 1.5,
            })
        }
        Variant::Diving => SessionConfig::Diving(DivingConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedSource;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_timing_formulas() {
        let mut rng = ScriptedSource::constant(0.5);
        let SessionConfig::Timing(cfg) =
            configure(Variant::Timing, 3.0, 2.0, &SkillModifiers::default(), &mut rng)
        else {
            panic!("expected timing config");
        };
        assert!(close(cfg.target_width, 22.0 + 6.6));
        assert!(close(cfg.cursor_speed, 1.3 + 0.9));
        assert!(close(cfg.target_start, 10.0 + 0.5 * (80.0 - 28.6)));
        assert!(close(cfg.progress_gain, 26.5));
        assert!(close(cfg.fail_penalty, 10.5));
    }

    #[test]
    fn test_timing_caps_and_floors() {
        let mut rng = ScriptedSource::constant(0.0);
        let SessionConfig::Timing(cfg) =
            configure(Variant::Timing, 20.0, 0.0, &SkillModifiers::default(), &mut rng)
        else {
            panic!("expected timing config");
        };
        assert!(close(cfg.target_width, 45.0));
        assert!(close(cfg.fail_penalty, 5.0));
        assert!(close(cfg.target_start, 10.0));
    }

    #[test]
    fn test_reel_formulas() {
        let mut rng = ScriptedSource::constant(0.5);
        let SessionConfig::TensionReel(cfg) =
            configure(Variant::TensionReel, 2.0, 0.0, &SkillModifiers::default(), &mut rng)
        else {
            panic!("expected reel config");
        };
        assert!(close(cfg.strength, 0.5));
        assert!(close(cfg.start_distance, 30.0));
        assert!(close(cfg.max_distance, 50.0));
        assert!(close(cfg.reel_speed, 0.3));
        assert!(close(cfg.tension_rate, 0.25 / 2.0_f64.sqrt()));
        assert!(close(cfg.decay_rate, 1.5));
        // Reel config never touches the random source
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_reel_tension_rate_floor() {
        let mut rng = ScriptedSource::constant(0.5);
        let SessionConfig::TensionReel(cfg) =
            configure(Variant::TensionReel, 100.0, 0.0, &SkillModifiers::default(), &mut rng)
        else {
            panic!("expected reel config");
        };
        assert!(close(cfg.tension_rate, 0.1));
    }

    #[test]
    fn test_out_of_domain_inputs_are_clamped() {
        let mut rng = ScriptedSource::constant(0.5);
        let mods = SkillModifiers::default();
        let neg = configure(Variant::TensionReel, -4.0, -2.0, &mods, &mut rng);
        let one = configure(Variant::TensionReel, 1.0, 0.0, &mods, &mut rng);
        assert_eq!(neg, one);

        let nan = configure(Variant::TensionReel, f64::NAN, f64::INFINITY, &mods, &mut rng);
        assert_eq!(nan, one);
    }

    #[test]
    fn test_skill_modifiers() {
        let mut rng = ScriptedSource::constant(0.5);
        let mods = SkillModifiers {
            power_bonus: 1.0,
            tension_relief: 0.5,
        };
        let SessionConfig::TensionReel(cfg) =
            configure(Variant::TensionReel, 1.0, 0.0, &mods, &mut rng)
        else {
            panic!("expected reel config");
        };
        assert!(close(cfg.reel_speed, 0.3));
        assert!(close(cfg.tension_rate, 0.5 * (0.25 / 2.0_f64.sqrt()).max(0.1)));

        let greedy = SkillModifiers {
            power_bonus: 0.0,
            tension_relief: 5.0,
        };
        let SessionConfig::Timing(cfg) = configure(Variant::Timing, 1.0, 0.0, &greedy, &mut rng)
        else {
            panic!("expected timing config");
        };
        assert!(cfg.fail_penalty > 0.0);
    }

    #[test]
    fn test_diving_constants() {
        let mut rng = ScriptedSource::constant(0.5);
        let SessionConfig::Diving(cfg) =
            configure(Variant::Diving, 7.0, 3.0, &SkillModifiers::default(), &mut rng)
        else {
            panic!("expected diving config");
        };
        assert_eq!(cfg.spawn_interval, Duration::from_millis(500));
        assert!(close(cfg.oxygen_decay, 0.1));
        assert!(close(cfg.diver_speed, 1.5));
        assert_eq!(cfg.entity_speed, 0.8);
    }

    #[test]
    fn test_variant_names() {
        for v in [Variant::Timing, Variant::TensionReel, Variant::Diving] {
            assert_eq!(Variant::from_str(v.as_str()), Some(v));
        }
        assert_eq!(Variant::from_str("golf"), None);
    }
}
