//! Sound cues
//!
//! The engine never plays audio itself. It names a cue and the host's audio
//! layer decides what that sounds like.

use serde::{Deserialize, Serialize};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Zone hit, QTE hit, collectible grabbed
    Success,
    /// Zone missed, hazard touched
    Fail,
    /// A quick-time prompt appeared
    Alert,
}

impl SoundCue {
    pub const ALL: [SoundCue; 3] = [SoundCue::Success, SoundCue::Fail, SoundCue::Alert];

    /// Identifier used by the host's sound bank
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Success => "success",
            SoundCue::Fail => "fail",
            SoundCue::Alert => "alert",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_ids_are_unique() {
        let mut ids: Vec<_> = SoundCue::ALL.iter().map(|c| c.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), SoundCue::ALL.len());
    }
}
