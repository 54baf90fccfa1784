//! The world fingerprint: a cheap order-sensitive digest of everything
//! that must agree across participants.
//!
//! Per entity, the digest folds position, orientation, owner, class,
//! and identity with a rotate-xor accumulator; the world fingerprint is
//! the wrapping sum of entity digests plus per-player camera and
//! possession-instance contributions. Cosmetic entity classes are
//! excluded, since their spawn counts vary with local settings.
//!
//! The sweep is bounded by [`StateView::entity_limit`]; an overrun
//! aborts with [`SweepError::EntityOverrun`] rather than walking a
//! corrupt chain forever.

use std::ops::ControlFlow;

use crate::error::SweepError;
use crate::id::ActiveSet;
use crate::traits::{EntityDigest, PlayerDigest, StateView};

/// Fold one value into a rotate-xor accumulator.
fn fold(acc: u64, v: u64) -> u64 {
    acc.rotate_left(5) ^ v
}

/// Digest of a single entity.
fn entity_digest(e: &EntityDigest) -> u64 {
    let owner = match e.owner {
        Some(p) => 1 + p.0 as u64,
        None => 0,
    };
    let mut d = 0u64;
    d = fold(d, e.pos.x as u64);
    d = fold(d, e.pos.y as u64);
    d = fold(d, e.orientation as u64);
    d = fold(d, owner);
    d = fold(d, e.class as u64);
    d = fold(d, e.id.0 as u64);
    d
}

/// Digest of a single player's lockstep-visible state.
fn player_contribution(slot: u64, d: &PlayerDigest) -> u64 {
    let mut v = 0u64;
    v = fold(v, slot);
    v = fold(v, d.camera.x as u64);
    v = fold(v, d.camera.y as u64);
    v = fold(v, d.camera_zoom as u64);
    v = fold(v, d.instance as u64);
    v
}

/// Compute the world fingerprint over a state view.
///
/// `players` selects which slots contribute player state. The sweep
/// visits at most [`StateView::entity_limit`] entities; exceeding that
/// aborts with [`SweepError::EntityOverrun`] and logs a warning.
///
/// # Examples
///
/// ```
/// use lair_core::{compute_fingerprint, ActiveSet, PlayerId, StateView, EntityDigest, PlayerDigest};
/// use std::ops::ControlFlow;
///
/// struct Empty;
/// impl StateView for Empty {
///     fn entity_limit(&self) -> usize { 16 }
///     fn visit_entities(&self, _: &mut dyn FnMut(&EntityDigest) -> ControlFlow<()>) {}
///     fn player_digest(&self, _: PlayerId) -> Option<PlayerDigest> { None }
/// }
///
/// let fp = compute_fingerprint(&Empty, ActiveSet::empty()).unwrap();
/// assert_eq!(fp, 0);
/// ```
pub fn compute_fingerprint(view: &dyn StateView, players: ActiveSet) -> Result<u64, SweepError> {
    let limit = view.entity_limit();
    let mut sum = 0u64;
    let mut seen = 0usize;
    let mut overrun = false;

    view.visit_entities(&mut |e| {
        if seen >= limit {
            overrun = true;
            return ControlFlow::Break(());
        }
        seen += 1;
        if !e.class.is_cosmetic() {
            sum = sum.wrapping_add(entity_digest(e));
        }
        ControlFlow::Continue(())
    });

    if overrun {
        log::warn!("fingerprint sweep aborted: more than {limit} live entities");
        return Err(SweepError::EntityOverrun { limit });
    }

    for player in players.iter() {
        if let Some(d) = view.player_digest(player) {
            sum = sum.wrapping_add(player_contribution(player.0 as u64, &d));
        }
    }

    Ok(sum)
}

/// Fold a 64-bit fingerprint to the 32-bit stamp field.
pub fn fold_fingerprint(fp: u64) -> u32 {
    (fp >> 32) as u32 ^ fp as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{EntityId, PlayerId};
    use crate::traits::{EntityClass, MapCoord};

    struct FixedView {
        entities: Vec<EntityDigest>,
        limit: usize,
        players: Vec<(PlayerId, PlayerDigest)>,
    }

    impl StateView for FixedView {
        fn entity_limit(&self) -> usize {
            self.limit
        }

        fn visit_entities(&self, visitor: &mut dyn FnMut(&EntityDigest) -> ControlFlow<()>) {
            for e in &self.entities {
                if visitor(e).is_break() {
                    return;
                }
            }
        }

        fn player_digest(&self, player: PlayerId) -> Option<PlayerDigest> {
            self.players
                .iter()
                .find(|(p, _)| *p == player)
                .map(|(_, d)| *d)
        }
    }

    fn creature(id: u32, x: u16, y: u16) -> EntityDigest {
        EntityDigest {
            id: EntityId(id),
            class: EntityClass::Creature,
            owner: Some(PlayerId(0)),
            pos: MapCoord::new(x, y),
            orientation: 0,
        }
    }

    #[test]
    fn moving_an_entity_changes_the_fingerprint() {
        let a = FixedView {
            entities: vec![creature(1, 5, 5)],
            limit: 8,
            players: vec![],
        };
        let b = FixedView {
            entities: vec![creature(1, 5, 6)],
            limit: 8,
            players: vec![],
        };
        let roster = ActiveSet::from_bits(0b1);
        assert_ne!(
            compute_fingerprint(&a, roster).unwrap(),
            compute_fingerprint(&b, roster).unwrap()
        );
    }

    #[test]
    fn cosmetic_entities_do_not_contribute() {
        let base = FixedView {
            entities: vec![creature(1, 5, 5)],
            limit: 8,
            players: vec![],
        };
        let with_effect = FixedView {
            entities: vec![
                creature(1, 5, 5),
                EntityDigest {
                    id: EntityId(2),
                    class: EntityClass::EffectElem,
                    owner: None,
                    pos: MapCoord::new(1, 1),
                    orientation: 9,
                },
                EntityDigest {
                    id: EntityId(3),
                    class: EntityClass::AmbientSound,
                    owner: None,
                    pos: MapCoord::new(2, 2),
                    orientation: 0,
                },
            ],
            limit: 8,
            players: vec![],
        };
        let roster = ActiveSet::from_bits(0b1);
        assert_eq!(
            compute_fingerprint(&base, roster).unwrap(),
            compute_fingerprint(&with_effect, roster).unwrap()
        );
    }

    #[test]
    fn overrun_aborts_with_the_limit() {
        let view = FixedView {
            entities: (0..5).map(|i| creature(i, 0, 0)).collect(),
            limit: 3,
            players: vec![],
        };
        assert_eq!(
            compute_fingerprint(&view, ActiveSet::empty()),
            Err(SweepError::EntityOverrun { limit: 3 })
        );
    }

    #[test]
    fn player_camera_contributes_for_active_slots_only() {
        let players = vec![(
            PlayerId(1),
            PlayerDigest {
                camera: MapCoord::new(10, 20),
                camera_zoom: 3,
                instance: 0,
            },
        )];
        let view = FixedView {
            entities: vec![],
            limit: 8,
            players,
        };
        let with_p1 = compute_fingerprint(&view, ActiveSet::from_bits(0b10)).unwrap();
        let without = compute_fingerprint(&view, ActiveSet::empty()).unwrap();
        assert_ne!(with_p1, without);
    }

    #[test]
    fn fold_mixes_both_halves() {
        assert_eq!(fold_fingerprint(0), 0);
        assert_ne!(fold_fingerprint(1 << 40), 0);
        assert_ne!(fold_fingerprint(1), 0);
    }
}
