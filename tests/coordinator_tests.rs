//! Timer-driven behaviour of the spin coordinator.
//!
//! All tests run on a paused tokio clock, so timers fire as soon as the
//! runtime is otherwise idle.

use fairspin::builder::SpinMachineBuilder;
use fairspin::{SpinCoordinator, SpinEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::Receiver;
use tokio::time::Instant;

fn coordinator(selection: f64) -> SpinCoordinator {
    SpinMachineBuilder::new()
        .participants(["A", "B", "C"])
        .selection_random(move || selection)
        .jitter_random(|| 0.0)
        .build_coordinator()
        .unwrap()
}

async fn next_event(events: &mut Receiver<SpinEvent>) -> SpinEvent {
    events.recv().await.expect("event channel closed")
}

#[tokio::test(start_paused = true)]
async fn spin_settles_after_configured_duration() {
    let coordinator = coordinator(0.5);
    let mut events = coordinator.events();
    let started = Instant::now();

    let ticket = coordinator.request_spin().unwrap();
    assert!(coordinator.is_spinning());
    assert_eq!(coordinator.winner_index(), Some(1));
    assert_eq!(coordinator.winner_name(), None);

    assert_eq!(next_event(&mut events).await, SpinEvent::Started(ticket.clone()));
    match next_event(&mut events).await {
        SpinEvent::Settled(settlement) => {
            assert_eq!(settlement.spin_id, ticket.spin_id);
            assert_eq!(settlement.winner, "B");
            assert_eq!(settlement.wins, 1);
        }
        other => panic!("expected settlement, got {other:?}"),
    }

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(5500), "settled early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(5600), "settled late: {elapsed:?}");
    assert!(!coordinator.is_spinning());
    assert_eq!(coordinator.winner_name().as_deref(), Some("B"));
    assert_eq!(coordinator.history().wins("B"), 1);
}

#[tokio::test(start_paused = true)]
async fn reveal_follows_settlement() {
    let coordinator = coordinator(0.5);
    let mut events = coordinator.events();
    let ticket = coordinator.request_spin().unwrap();

    next_event(&mut events).await;
    next_event(&mut events).await;
    let settled_at = Instant::now();
    assert!(!coordinator.snapshot().revealed);

    assert_eq!(
        next_event(&mut events).await,
        SpinEvent::Revealed {
            spin_id: ticket.spin_id,
            winner: "B".to_string()
        }
    );
    let delay = settled_at.elapsed();
    assert!(delay >= Duration::from_millis(500), "revealed early: {delay:?}");
    assert!(delay < Duration::from_millis(600), "revealed late: {delay:?}");
    assert!(coordinator.snapshot().revealed);

    coordinator.dismiss_reveal();
    let snapshot = coordinator.snapshot();
    assert!(!snapshot.revealed);
    assert_eq!(snapshot.winner_name.as_deref(), Some("B"));
}

#[tokio::test(start_paused = true)]
async fn busy_request_is_rejected_without_effect() {
    let coordinator = coordinator(0.5);
    let ticket = coordinator.request_spin().unwrap();
    let before = coordinator.snapshot();

    let rejected = coordinator.request_spin().unwrap_err();
    assert!(rejected.is_busy());
    assert_eq!(coordinator.snapshot(), before);
    assert_eq!(
        coordinator.current_rotation_degrees(),
        ticket.target_rotation_degrees
    );
    assert_eq!(coordinator.history().total_wins(), 0);
}

#[tokio::test(start_paused = true)]
async fn under_populated_request_is_rejected() {
    let coordinator = SpinMachineBuilder::new()
        .participants(["Solo"])
        .build_coordinator()
        .unwrap();

    let rejected = coordinator.request_spin().unwrap_err();
    assert!(rejected.is_under_populated());
    assert!(!coordinator.is_spinning());
}

#[tokio::test(start_paused = true)]
async fn snapshots_track_the_lifecycle() {
    let coordinator = coordinator(0.0);
    let mut snapshots = coordinator.subscribe();
    assert!(!snapshots.borrow_and_update().is_spinning);

    let ticket = coordinator.request_spin().unwrap();
    snapshots.changed().await.unwrap();
    {
        let spinning = snapshots.borrow_and_update();
        assert!(spinning.is_spinning);
        assert_eq!(spinning.winner_index, Some(0));
        assert_eq!(spinning.winner_name, None);
        assert_eq!(spinning.current_rotation_degrees, ticket.target_rotation_degrees);
        assert_eq!(spinning.spin_duration_ms, 5500);
    }

    snapshots.changed().await.unwrap();
    let settled = snapshots.borrow_and_update().clone();
    assert!(!settled.is_spinning);
    assert_eq!(settled.winner_name.as_deref(), Some("A"));
    assert!(!settled.revealed);

    snapshots.changed().await.unwrap();
    assert!(snapshots.borrow_and_update().revealed);
}

#[tokio::test(start_paused = true)]
async fn history_totals_match_completed_spins() {
    let coordinator = SpinMachineBuilder::new()
        .participants(["A", "B", "C", "D"])
        .seed(11)
        .reveal_delay(Duration::ZERO)
        .build_coordinator()
        .unwrap();
    let mut events = coordinator.events();
    let mut previous_target = 0.0;

    for _ in 0..8 {
        let ticket = coordinator.request_spin().unwrap();
        assert!(ticket.target_rotation_degrees > previous_target);
        previous_target = ticket.target_rotation_degrees;

        loop {
            if let SpinEvent::Revealed { .. } = next_event(&mut events).await {
                break;
            }
        }
    }

    assert_eq!(coordinator.completed_spins(), 8);
    assert_eq!(coordinator.history().total_wins(), 8);
}

#[tokio::test(start_paused = true)]
async fn respinning_before_reveal_drops_the_stale_reveal() {
    let coordinator = coordinator(0.5);
    let mut events = coordinator.events();

    let first = coordinator.request_spin().unwrap();
    next_event(&mut events).await;
    assert!(matches!(next_event(&mut events).await, SpinEvent::Settled(_)));

    let second = coordinator.request_spin().unwrap();
    assert_eq!(next_event(&mut events).await, SpinEvent::Started(second.clone()));

    match next_event(&mut events).await {
        SpinEvent::Settled(settlement) => assert_eq!(settlement.spin_id, second.spin_id),
        other => panic!("expected second settlement, got {other:?}"),
    }
    match next_event(&mut events).await {
        SpinEvent::Revealed { spin_id, .. } => {
            assert_ne!(spin_id, first.spin_id);
            assert_eq!(spin_id, second.spin_id);
        }
        other => panic!("expected reveal, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_settlement() {
    let coordinator = coordinator(0.5);
    let ticket = coordinator.request_spin().unwrap();
    coordinator.shutdown();

    tokio::time::sleep(Duration::from_secs(10)).await;

    assert!(!coordinator.is_spinning());
    assert_eq!(coordinator.winner_index(), None);
    assert_eq!(coordinator.history().total_wins(), 0);
    assert_eq!(coordinator.winner_name(), None);
    assert_eq!(
        coordinator.current_rotation_degrees(),
        ticket.target_rotation_degrees
    );
}

#[tokio::test(start_paused = true)]
async fn coordinator_is_usable_after_shutdown() {
    let coordinator = coordinator(0.5);
    coordinator.request_spin().unwrap();
    coordinator.shutdown();
    assert!(!coordinator.snapshot().is_spinning);

    let mut events = coordinator.events();
    let ticket = coordinator.request_spin().unwrap();
    assert_eq!(next_event(&mut events).await, SpinEvent::Started(ticket.clone()));
    match next_event(&mut events).await {
        SpinEvent::Settled(settlement) => assert_eq!(settlement.spin_id, ticket.spin_id),
        other => panic!("expected settlement, got {other:?}"),
    }
    assert_eq!(coordinator.history().total_wins(), 1);
    assert!(coordinator.reset().is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_shutdown_never_strands_a_spin() {
    for _ in 0..10 {
        let coordinator = Arc::new(
            SpinMachineBuilder::new()
                .participants(["A", "B", "C"])
                .spin_duration(Duration::from_millis(5))
                .reveal_delay(Duration::ZERO)
                .build_coordinator()
                .unwrap(),
        );

        let spinner = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.request_spin().is_ok() })
        };
        let stopper = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.shutdown() })
        };
        assert!(spinner.await.unwrap());
        stopper.await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;

        // Either the spin was abandoned or it ran to completion on its timer.
        assert!(!coordinator.is_spinning());
        assert_eq!(
            coordinator.history().total_wins(),
            coordinator.completed_spins()
        );
        assert!(coordinator.completed_spins() <= 1);
    }
}

#[tokio::test(start_paused = true)]
async fn dropping_the_coordinator_cancels_its_timer() {
    let coordinator = coordinator(0.5);
    let mut snapshots = coordinator.subscribe();
    coordinator.request_spin().unwrap();
    let _ = snapshots.borrow_and_update();

    drop(coordinator);
    tokio::time::sleep(Duration::from_secs(10)).await;

    // The sender is gone and the last published state is still mid-spin.
    assert!(snapshots.changed().await.is_err());
    let last = snapshots.borrow();
    assert!(last.is_spinning);
    assert_eq!(last.winner_name, None);
}

#[tokio::test(start_paused = true)]
async fn roster_edits_are_refused_mid_spin() {
    let coordinator = coordinator(0.5);
    let mut events = coordinator.events();
    coordinator.request_spin().unwrap();

    assert!(coordinator.add_participant("D").is_err());
    assert!(coordinator.remove_participant("A").is_err());

    next_event(&mut events).await;
    next_event(&mut events).await;

    coordinator.add_participant("D").unwrap();
    let removed = coordinator.remove_at(0).unwrap();
    assert_eq!(removed.name(), "A");
    assert_eq!(coordinator.snapshot().participants, vec!["B", "C", "D"]);
    let history = coordinator.history();
    assert!(!history.contains("A"));
    assert_eq!(history.wins("B"), 1);
    assert_eq!(history.wins("D"), 0);
}

#[tokio::test(start_paused = true)]
async fn reset_returns_to_idle() {
    let coordinator = coordinator(0.5);
    let mut events = coordinator.events();
    coordinator.request_spin().unwrap();
    assert!(coordinator.reset().unwrap_err().is_busy());

    next_event(&mut events).await;
    next_event(&mut events).await;

    coordinator.reset().unwrap();
    assert_eq!(next_event(&mut events).await, SpinEvent::Reset);
    assert_eq!(coordinator.winner_index(), None);
    assert!(coordinator.inspect(|machine| machine.state().name() == "Idle"));
}
