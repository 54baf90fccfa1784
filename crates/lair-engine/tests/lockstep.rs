//! Networked lockstep scenarios driven through a scripted transport.
//!
//! The local session is real; every peer is a `ScriptedTransport`
//! script. In-sync peers echo the local sync stamp, so desync scenarios
//! turn echoing off and script explicit stamps instead.

use std::io::Cursor;

use lair_core::{
    compute_fingerprint, fold_fingerprint, ActionCode, ActiveSet, Intent, LevelId, PlayerId,
    PowerKind, SyncStamp,
};
use lair_engine::{LockstepSession, SessionConfig};
use lair_test_utils::{
    cast_release_blind, charge_at, quit, set_tool_cast, set_view, stamped_idle, toggle_pause,
    MockWorld, ScriptedTransport,
};

type Session = LockstepSession<ScriptedTransport, Vec<u8>, Cursor<Vec<u8>>>;

const ROSTER: u8 = 0b11;

fn config(verify: bool) -> SessionConfig {
    SessionConfig {
        level: LevelId(1),
        roster: ActiveSet::from_bits(ROSTER),
        computer: ActiveSet::empty(),
        local: PlayerId(0),
        seed: 7,
        checksum_verify: verify,
        fast_forward: 0,
    }
}

fn transport() -> ScriptedTransport {
    ScriptedTransport::new(ActiveSet::from_bits(ROSTER), PlayerId(0))
}

fn two_keeper_world() -> MockWorld {
    MockWorld::with_keepers([PlayerId(0), PlayerId(1)])
}

#[test]
fn in_sync_peers_never_trip_the_detector() {
    let transport = transport();
    let counts = transport.counts();
    let mut session = Session::net(config(true), transport, None).unwrap();
    let mut world = two_keeper_world();

    for _ in 0..20 {
        let report = session
            .advance(&mut world, Intent::NO_ACTION)
            .unwrap()
            .unwrap();
        assert!(!report.desynced);
        assert!(report.downgraded.is_empty());
    }
    assert_eq!(counts.exchanges(), 20);
    assert_eq!(counts.resyncs(), 0);
}

#[test]
fn silent_peer_is_a_state_desync_and_one_failed_resync_downgrades_it() {
    let mut transport = transport();
    transport.stop_echoing_stamp(PlayerId(1));
    transport.fail_resync();
    let counts = transport.counts();
    let mut session = Session::net(config(true), transport, None).unwrap();
    let mut world = two_keeper_world();

    // A present-but-stampless peer is indistinguishable from a diverged
    // one: state desync, one resync attempt, downgrade on its failure.
    let report = session
        .advance(&mut world, Intent::NO_ACTION)
        .unwrap()
        .unwrap();
    assert!(report.desynced);
    assert_eq!(report.downgraded.as_slice(), &[PlayerId(1)]);
    assert!(session.state().game_desynced());
    assert!(!session.state().seed_desynced());
    assert!(world.is_computer(PlayerId(1)));

    // The flags stay sticky, and the incident gets no second resync.
    for _ in 0..5 {
        let report = session
            .advance(&mut world, Intent::NO_ACTION)
            .unwrap()
            .unwrap();
        assert!(report.desynced);
        assert!(report.downgraded.is_empty());
    }
    assert_eq!(counts.resyncs(), 1);
}

#[test]
fn seed_divergence_is_classified_separately_from_state() {
    let roster = ActiveSet::from_bits(ROSTER);
    let entering = compute_fingerprint(&two_keeper_world(), roster).unwrap();

    let mut transport = transport();
    transport.stop_echoing_stamp(PlayerId(1));
    transport.fail_resync();
    // Correct state half, drifted draw counter.
    transport.script(
        PlayerId(1),
        0,
        stamped_idle(SyncStamp {
            state: fold_fingerprint(entering),
            seed: 1234,
        }),
    );
    let mut session = Session::net(config(true), transport, None).unwrap();
    let mut world = two_keeper_world();

    let report = session
        .advance(&mut world, Intent::NO_ACTION)
        .unwrap()
        .unwrap();
    assert!(report.desynced);
    assert!(session.state().seed_desynced());
    assert!(!session.state().game_desynced());
}

#[test]
fn successful_resync_clears_the_sticky_flags() {
    let mut transport = transport();
    transport.stop_echoing_stamp(PlayerId(1));
    let counts = transport.counts();
    let mut session = Session::net(config(true), transport, None).unwrap();
    let mut world = two_keeper_world();

    let report = session
        .advance(&mut world, Intent::NO_ACTION)
        .unwrap()
        .unwrap();
    // the pass succeeded, so the turn commits clean
    assert!(!report.desynced);
    assert!(report.downgraded.is_empty());
    assert!(!world.is_computer(PlayerId(1)));
    assert_eq!(counts.resyncs(), 1);
}

#[test]
fn peer_quit_hands_their_dungeon_to_the_computer() {
    let mut transport = transport();
    transport.script(PlayerId(1), 2, quit());
    let mut session = Session::net(config(true), transport, None).unwrap();
    let mut world = two_keeper_world();

    for turn in 0..5u64 {
        let report = session
            .advance(&mut world, Intent::NO_ACTION)
            .unwrap()
            .unwrap();
        assert!(!report.quit);
        assert!(!report.desynced);
        if turn == 2 {
            assert_eq!(report.downgraded.as_slice(), &[PlayerId(1)]);
        } else {
            assert!(report.downgraded.is_empty());
        }
    }
    assert!(world.is_computer(PlayerId(1)));
    assert!(session.computer_players().contains(PlayerId(1)));
}

#[test]
fn local_quit_finishes_the_session() {
    let mut session = Session::net(config(true), transport(), None).unwrap();
    let mut world = two_keeper_world();

    let report = session.advance(&mut world, quit()).unwrap().unwrap();
    assert!(report.quit);
    assert!(session
        .advance(&mut world, Intent::NO_ACTION)
        .unwrap()
        .is_none());
}

#[test]
fn computer_toggle_excludes_the_slot_from_stamp_checks() {
    let mut transport = transport();
    // No stamps from player 1 ever, but its very first record hands the
    // dungeon to the computer, which removes it from checking.
    transport.stop_echoing_stamp(PlayerId(1));
    transport.script(
        PlayerId(1),
        0,
        Intent::with_action(ActionCode::ToggleComputer, 0, 0),
    );
    let counts = transport.counts();
    let mut session = Session::net(config(true), transport, None).unwrap();
    let mut world = two_keeper_world();

    for _ in 0..4 {
        let report = session
            .advance(&mut world, Intent::NO_ACTION)
            .unwrap()
            .unwrap();
        assert!(!report.desynced);
    }
    assert!(session.computer_players().contains(PlayerId(1)));
    assert!(world.is_computer(PlayerId(1)));
    assert_eq!(counts.resyncs(), 0);
}

#[test]
fn pause_is_refused_while_a_view_transition_is_in_flight() {
    let mut transport = transport();
    transport.script(PlayerId(1), 0, toggle_pause());
    transport.script(PlayerId(1), 1, toggle_pause());
    let mut session = Session::net(config(false), transport, None).unwrap();
    let mut world = two_keeper_world();

    // The local player enters possession of their creature this turn,
    // so the peer's toggle lands mid-transition and is refused.
    let report = session.advance(&mut world, set_view(2, 1)).unwrap().unwrap();
    assert!(!report.paused);
    assert_eq!(world.ticks(), 1);

    // Transition cleared; the retried toggle goes through, and the
    // pause takes effect before the world advances.
    let report = session
        .advance(&mut world, Intent::NO_ACTION)
        .unwrap()
        .unwrap();
    assert!(report.paused);
    assert_eq!(world.ticks(), 1);

    let report = session
        .advance(&mut world, Intent::NO_ACTION)
        .unwrap()
        .unwrap();
    assert!(report.paused);
    assert_eq!(world.ticks(), 1);
}

#[test]
fn overcharge_accumulates_only_while_held() {
    let mut cfg = config(false);
    cfg.roster = ActiveSet::from_bits(0b01);
    let mut session = Session::local(cfg, None).unwrap();
    let mut world = MockWorld::with_keepers([PlayerId(0)]);

    session
        .advance(&mut world, set_tool_cast(PowerKind::Lightning))
        .unwrap();
    session.advance(&mut world, charge_at(3, 3)).unwrap();
    session.advance(&mut world, charge_at(3, 3)).unwrap();
    assert_eq!(session.slot(PlayerId(0)).overcharge, 2);

    // letting go without a release resets the charge
    session.advance(&mut world, Intent::NO_ACTION).unwrap();
    assert_eq!(session.slot(PlayerId(0)).overcharge, 0);

    // held again, then released off the map: the cast still happens
    session.advance(&mut world, charge_at(3, 3)).unwrap();
    session.advance(&mut world, cast_release_blind()).unwrap();
    assert_eq!(
        world.last_cast(),
        Some((PlayerId(0), PowerKind::Lightning, 1))
    );
    assert_eq!(session.slot(PlayerId(0)).overcharge, 0);
}
