//! Catch challenge entry point
//!
//! Headless demo: plays one session with the autopilot and prints the
//! outcome as JSON.
//!
//! Usage: catch-challenge [timing|reel|diving] [seed] [settings.json]

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::Path;

    use catch_challenge::autopilot::Autopilot;
    use catch_challenge::{
        CatchContext, EngineEvents, EngineSettings, GameContext, Outcome, SessionHandle,
        SessionHost, SkillModifiers, SoundCue, Variant,
    };

    /// Fixed tackle box for the demo
    struct DemoTackle;

    impl GameContext for DemoTackle {
        fn equipment_power(&self, rod_id: u32) -> f64 {
            match rod_id {
                0 => 1.0,
                1 => 2.5,
                _ => 5.0,
            }
        }

        fn rarity_of(&self, target: &str) -> f64 {
            match target {
                "Carp" => 0.0,
                "Pike" => 1.5,
                "Marlin" => 4.0,
                _ => 1.0,
            }
        }

        fn active_skill_modifiers(&self) -> SkillModifiers {
            SkillModifiers::default()
        }
    }

    /// Logs cues and keeps the outcome
    #[derive(Default)]
    struct ConsoleEvents {
        cues: usize,
        outcome: Option<Outcome>,
    }

    impl EngineEvents for ConsoleEvents {
        fn play_sound(&mut self, cue: SoundCue) {
            self.cues += 1;
            log::debug!("Sound: {}", cue.as_str());
        }

        fn on_outcome(&mut self, handle: SessionHandle, outcome: &Outcome) {
            log::info!("Session {} outcome: {:?}", handle, outcome.kind);
            self.outcome = Some(*outcome);
        }

        fn on_aborted(&mut self, handle: SessionHandle) {
            log::info!("Session {} aborted", handle);
        }
    }

    pub fn run() {
        let args: Vec<String> = std::env::args().skip(1).collect();

        let variant = match args.first() {
            Some(name) => match Variant::from_str(name) {
                Some(v) => v,
                None => {
                    eprintln!("unknown variant '{}', expected timing, reel or diving", name);
                    std::process::exit(2);
                }
            },
            None => Variant::TensionReel,
        };

        let mut settings = match args.get(2) {
            Some(path) => EngineSettings::load(Path::new(path)),
            None => EngineSettings::default(),
        };
        if let Some(seed) = args.get(1) {
            match seed.parse::<u64>() {
                Ok(seed) => settings.seed = Some(seed),
                Err(e) => log::warn!("Ignoring seed '{}': {}", seed, e),
            }
        }
        let mut host = SessionHost::new(DemoTackle, ConsoleEvents::default(), settings);
        let dt = host.settings().tick_duration();
        let context = CatchContext {
            rod_id: 1,
            target: "Pike".to_string(),
        };
        let handle = host.start_session(variant, &context);
        let mut pilot = Autopilot::new();

        loop {
            let snapshot = match host.snapshot(handle) {
                Ok(s) => s,
                Err(e) => {
                    log::error!("Lost session: {}", e);
                    return;
                }
            };
            for action in pilot.decide(&snapshot) {
                if let Err(e) = host.submit_action(handle, action) {
                    log::warn!("Action dropped: {}", e);
                }
            }
            match host.tick(handle, dt) {
                Ok(Some(_)) => break,
                Ok(None) => {}
                Err(e) => {
                    log::error!("Tick failed: {}", e);
                    return;
                }
            }
        }

        let final_view = host.snapshot(handle).ok();
        log::info!("{} sound cues played", host.events().cues);
        let report = serde_json::json!({
            "variant": variant.as_str(),
            "outcome": host.events().outcome,
            "ticks": final_view.as_ref().map(|s| s.ticks),
            "elapsed_ms": final_view.as_ref().map(|s| s.elapsed.as_millis() as u64),
        });
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to encode outcome: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Catch challenge (native) starting...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive SessionHost directly; nothing to run standalone
}
