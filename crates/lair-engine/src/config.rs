//! Session configuration and validation.

use std::error::Error;
use std::fmt;

use lair_core::{ActiveSet, LevelId, PlayerId};

/// Input for constructing a [`LockstepSession`](crate::LockstepSession).
///
/// Validated once at session start; a session never starts from a
/// configuration that cannot run.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// The level the session runs on. Recorded in the turn-log header
    /// and checked against it on playback.
    pub level: LevelId,
    /// Slots holding a participant.
    pub roster: ActiveSet,
    /// Slots under computer control from the start.
    pub computer: ActiveSet,
    /// The slot this process plays.
    pub local: PlayerId,
    /// Seed for the shared random stream.
    pub seed: u64,
    /// Whether to carry and check sync stamps, and to record
    /// fingerprints into the turn log.
    pub checksum_verify: bool,
    /// Replay-only: turns to play without frame pacing, skipping idle
    /// entries.
    pub fast_forward: u64,
}

impl SessionConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roster.count() == 0 {
            return Err(ConfigError::EmptyRoster);
        }
        if !self.roster.contains(self.local) {
            return Err(ConfigError::LocalOutsideRoster { player: self.local });
        }
        for player in self.computer.iter() {
            if !self.roster.contains(player) {
                return Err(ConfigError::ComputerOutsideRoster { player });
            }
        }
        Ok(())
    }
}

/// A configuration the session refuses to start from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No active player slots at all.
    EmptyRoster,
    /// The local player is not in the roster.
    LocalOutsideRoster {
        /// The configured local slot.
        player: PlayerId,
    },
    /// A computer-controlled slot is not in the roster.
    ComputerOutsideRoster {
        /// The offending slot.
        player: PlayerId,
    },
    /// A replay log was recorded on a different level.
    LevelMismatch {
        /// Level in the log header.
        recorded: LevelId,
        /// Level the session asked for.
        requested: LevelId,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRoster => write!(f, "session roster is empty"),
            Self::LocalOutsideRoster { player } => {
                write!(f, "local player {player} is not in the roster")
            }
            Self::ComputerOutsideRoster { player } => {
                write!(f, "computer-controlled player {player} is not in the roster")
            }
            Self::LevelMismatch {
                recorded,
                requested,
            } => write!(
                f,
                "turn log was recorded on level {recorded}, session wants level {requested}"
            ),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig {
            level: LevelId(1),
            roster: ActiveSet::from_bits(0b11),
            computer: ActiveSet::empty(),
            local: PlayerId(0),
            seed: 1,
            checksum_verify: true,
            fast_forward: 0,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn empty_roster_is_rejected() {
        let mut cfg = config();
        cfg.roster = ActiveSet::empty();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyRoster));
    }

    #[test]
    fn local_player_must_be_in_the_roster() {
        let mut cfg = config();
        cfg.local = PlayerId(3);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::LocalOutsideRoster { player: PlayerId(3) })
        );
    }

    #[test]
    fn computer_mask_must_be_inside_the_roster() {
        let mut cfg = config();
        cfg.computer = ActiveSet::from_bits(0b100);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ComputerOutsideRoster { player: PlayerId(2) })
        );
    }
}
