//! The lockstep pause handshake.
//!
//! `TogglePause` rides in the turn table like any other intent, so all
//! participants flip the paused state on the same turn. The toggle is
//! refused while any existing human player has a view transition in
//! flight; pausing mid-transition would freeze a player between views.

use lair_core::{ActiveSet, PlayerId, SessionState, MAX_PLAYERS};

use crate::player::{PlayerSlot, Transition};

/// Arbitrates pause toggle requests against the players' view state.
#[derive(Debug, Default)]
pub struct PauseController;

impl PauseController {
    /// Apply one player's toggle request. Returns whether the paused
    /// state changed.
    pub fn request_toggle(
        &self,
        requester: PlayerId,
        state: &mut SessionState,
        slots: &[PlayerSlot; MAX_PLAYERS],
        roster: ActiveSet,
        computer: ActiveSet,
    ) -> bool {
        for player in roster.iter() {
            if computer.contains(player) {
                continue;
            }
            let transition = slots[player.index()].transition;
            if transition != Transition::Idle {
                log::warn!(
                    "pause toggle from player {requester} refused: \
                     player {player} is mid-transition ({transition:?})"
                );
                return false;
            }
        }
        let paused = !state.paused();
        state.set_paused(paused);
        log::info!(
            "player {requester} {} the game",
            if paused { "paused" } else { "unpaused" }
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> [PlayerSlot; MAX_PLAYERS] {
        Default::default()
    }

    #[test]
    fn toggle_flips_the_paused_state() {
        let pause = PauseController;
        let mut state = SessionState::new(true, false);
        let slots = slots();
        let roster = ActiveSet::from_bits(0b11);

        assert!(pause.request_toggle(PlayerId(0), &mut state, &slots, roster, ActiveSet::empty()));
        assert!(state.paused());
        assert!(pause.request_toggle(PlayerId(1), &mut state, &slots, roster, ActiveSet::empty()));
        assert!(!state.paused());
    }

    #[test]
    fn toggle_refused_while_any_human_is_mid_transition() {
        let pause = PauseController;
        let mut state = SessionState::new(true, false);
        let mut slots = slots();
        slots[1].transition = Transition::EnteringPossession;
        let roster = ActiveSet::from_bits(0b11);

        assert!(!pause.request_toggle(PlayerId(0), &mut state, &slots, roster, ActiveSet::empty()));
        assert!(!state.paused());
    }

    #[test]
    fn computer_slot_transitions_do_not_block_the_toggle() {
        let pause = PauseController;
        let mut state = SessionState::new(true, false);
        let mut slots = slots();
        slots[1].transition = Transition::MapFade;
        let roster = ActiveSet::from_bits(0b11);
        let computer = ActiveSet::from_bits(0b10);

        assert!(pause.request_toggle(PlayerId(0), &mut state, &slots, roster, computer));
        assert!(state.paused());
    }
}
