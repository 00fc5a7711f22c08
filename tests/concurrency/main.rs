//! Concurrent writes against one order must serialize: no lost history
//! entries, no status that disagrees with the last entry.


use siparis::machine::{RejectReason, TransitionOutcome};
use siparis::order::OrderStatus;
use siparis::tracking::{InteractionKind, UpdateActor};

use support::machine_with;

#[tokio::test]
async fn parallel_transitions_lose_nothing() {
    let machine = machine_with(&["ord-1"]).await;

    let mut tasks = Vec::new();
    for _ in 0..12 {
        let machine = machine.clone();
        tasks.push(tokio::spawn(async move {
            machine
                .transition(
                    "ord-1",
                    OrderStatus::Confirmed,
                    UpdateActor::Restaurant,
                    None,
                    None,
                )
                .await
                .unwrap()
        }));
    }

    let mut applied = 0;
    for task in tasks {
        if task.await.unwrap().applied() {
            applied += 1;
        }
    }
    assert_eq!(applied, 12);

    let tracking = machine.tracking("ord-1").await.unwrap().unwrap();
    assert_eq!(tracking.status, OrderStatus::Confirmed);
    assert_eq!(tracking.status_updates.len(), 1 + applied);
    assert_eq!(tracking.revision, applied as u64);
}

#[tokio::test]
async fn a_racing_cancel_closes_the_order_exactly_once() {
    let machine = machine_with(&["ord-1"]).await;

    let mut tasks = Vec::new();
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Cancelled,
        OrderStatus::Delivering,
        OrderStatus::Confirmed,
    ] {
        let machine = machine.clone();
        tasks.push(tokio::spawn(async move {
            machine
                .transition("ord-1", status, UpdateActor::System, None, None)
                .await
                .unwrap()
        }));
    }

    let mut applied = 0;
    for task in tasks {
        match task.await.unwrap() {
            TransitionOutcome::Applied(_) => applied += 1,
            TransitionOutcome::Rejected(reason) => {
                assert_eq!(reason, RejectReason::TerminalState(OrderStatus::Cancelled));
            }
        }
    }

    let tracking = machine.tracking("ord-1").await.unwrap().unwrap();
    // Whatever the interleaving, the history ends at the cancel and every
    // applied transition left exactly one entry.
    assert_eq!(tracking.status, OrderStatus::Cancelled);
    assert_eq!(tracking.last_update().unwrap().status, OrderStatus::Cancelled);
    assert_eq!(tracking.status_updates.len(), 1 + applied);
    let cancels = tracking
        .status_updates
        .iter()
        .filter(|u| u.status == OrderStatus::Cancelled)
        .count();
    assert_eq!(cancels, 1);
}

#[tokio::test]
async fn orders_do_not_serialize_each_other() {
    let machine = machine_with(&["ord-1", "ord-2", "ord-3"]).await;

    let mut tasks = Vec::new();
    for id in ["ord-1", "ord-2", "ord-3"] {
        let machine = machine.clone();
        tasks.push(tokio::spawn(async move {
            for status in [
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Delivering,
                OrderStatus::Delivered,
            ] {
                let outcome = machine
                    .transition(id, status, UpdateActor::Restaurant, None, None)
                    .await
                    .unwrap();
                assert!(outcome.applied());
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for id in ["ord-1", "ord-2", "ord-3"] {
        let tracking = machine.tracking(id).await.unwrap().unwrap();
        assert_eq!(tracking.status, OrderStatus::Delivered);
        assert_eq!(tracking.status_updates.len(), 5);
    }
}

#[tokio::test]
async fn mixed_operations_keep_the_revision_in_step() {
    let machine = machine_with(&["ord-1"]).await;
    machine
        .transition(
            "ord-1",
            OrderStatus::Delivering,
            UpdateActor::Restaurant,
            None,
            None,
        )
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..6 {
        let machine = machine.clone();
        tasks.push(tokio::spawn(async move {
            machine
                .update_location(
                    "ord-1",
                    39.9 + f64::from(i) * 0.001,
                    32.8,
                    OrderStatus::Delivering,
                    None,
                )
                .await
                .unwrap();
        }));
    }
    for _ in 0..4 {
        let machine = machine.clone();
        tasks.push(tokio::spawn(async move {
            machine
                .add_customer_interaction("ord-1", InteractionKind::CallDriver, None)
                .await
                .unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let tracking = machine.tracking("ord-1").await.unwrap().unwrap();
    assert_eq!(tracking.locations.len(), 6);
    assert_eq!(tracking.interactions.len(), 4);
    // No point carried a new status, so the history holds only the
    // opening entry and the Delivering hop.
    assert_eq!(tracking.status_updates.len(), 2);
    let mutations = (tracking.status_updates.len() as u64 - 1)
        + tracking.locations.len() as u64
        + tracking.interactions.len() as u64;
    assert_eq!(tracking.revision, mutations);
}
