// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the bridge driven by tokio broadcast sources.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use subbridge::source::BroadcastSource;
use subbridge::{Bridge, BridgeConfig, Error, SourceError, SubscribeErrorPolicy};
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Callback forwarding every value into an unbounded channel.
fn forward(tx: &mpsc::UnboundedSender<u32>) -> impl Fn(&u32) + Send + Sync + 'static {
    let tx = tx.clone();
    move |v: &u32| {
        let _ = tx.send(*v);
    }
}

async fn next(rx: &mut mpsc::UnboundedReceiver<u32>) -> Option<u32> {
    timeout(Duration::from_secs(1), rx.recv()).await.ok().flatten()
}

/// Waits until `source` has exactly `count` receivers.
async fn settle(source: &BroadcastSource<u32>, count: usize) {
    timeout(Duration::from_secs(1), async {
        while source.receiver_count() != count {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("receiver count did not settle");
}

#[tokio::test]
async fn delivers_published_values_in_order() {
    let source = BroadcastSource::<u32>::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut bridge = Bridge::<u32>::new();

    bridge.activate(Some(&source), forward(&tx)).unwrap();
    for v in [1, 2, 3] {
        source.publish(v);
    }

    assert_eq!(next(&mut rx).await, Some(1));
    assert_eq!(next(&mut rx).await, Some(2));
    assert_eq!(next(&mut rx).await, Some(3));
}

#[tokio::test]
async fn switching_sources_releases_old_receiver() {
    let first = BroadcastSource::<u32>::new();
    let second = BroadcastSource::<u32>::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut bridge = Bridge::<u32>::new();

    bridge.activate(Some(&first), forward(&tx)).unwrap();
    first.publish(1);
    assert_eq!(next(&mut rx).await, Some(1));

    bridge.activate(Some(&second), forward(&tx)).unwrap();
    settle(&first, 0).await;
    assert_eq!(second.receiver_count(), 1);

    assert_eq!(first.publish(99), 0);
    second.publish(4);
    assert_eq!(next(&mut rx).await, Some(4));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn in_flight_values_are_dropped_after_unmount() {
    let source = BroadcastSource::<u32>::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut bridge = Bridge::<u32>::new();

    bridge.activate(Some(&source), forward(&tx)).unwrap();
    // Queued in the channel but not yet forwarded: the task has not run.
    source.publish(1);
    bridge.unmount();

    settle(&source, 0).await;
    // Release the last senders: the bridge's callback and our own.
    drop(bridge);
    drop(tx);
    assert_eq!(next(&mut rx).await, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unmount_waits_for_running_callback() {
    let source = BroadcastSource::<u32>::new();
    let (started_tx, started_rx) = std::sync::mpsc::channel();
    let unmounted = Arc::new(AtomicBool::new(false));
    let late = Arc::new(AtomicUsize::new(0));
    let mut bridge = Bridge::<u32>::new();

    let (flag, late_calls) = (Arc::clone(&unmounted), Arc::clone(&late));
    bridge
        .activate(Some(&source), move |_: &u32| {
            let _ = started_tx.send(());
            std::thread::sleep(Duration::from_millis(100));
            if flag.load(Ordering::SeqCst) {
                late_calls.fetch_add(1, Ordering::SeqCst);
            }
        })
        .unwrap();
    source.publish(1);

    // The forwarding task is now inside the callback on a worker thread.
    started_rx
        .recv_timeout(Duration::from_secs(1))
        .expect("callback did not start");
    bridge.unmount();
    unmounted.store(true, Ordering::SeqCst);

    source.publish(2);
    settle(&source, 0).await;
    assert_eq!(late.load(Ordering::SeqCst), 0);
    assert_eq!(bridge.stats().deliveries, 1);
}

#[tokio::test]
async fn callback_update_applies_to_async_delivery() {
    let source = BroadcastSource::<u32>::new();
    let (old_tx, mut old_rx) = mpsc::unbounded_channel();
    let (new_tx, mut new_rx) = mpsc::unbounded_channel();
    let mut bridge = Bridge::<u32>::new();

    bridge.activate(Some(&source), forward(&old_tx)).unwrap();
    bridge.activate(Some(&source), forward(&new_tx)).unwrap();
    source.publish(7);

    assert_eq!(next(&mut new_rx).await, Some(7));
    assert!(old_rx.try_recv().is_err());
    assert_eq!(bridge.stats().attaches, 1);
}

#[tokio::test]
async fn lagging_subscriber_keeps_receiving() {
    let source = BroadcastSource::<u32>::with_capacity(2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut bridge = Bridge::<u32>::new();

    bridge.activate(Some(&source), forward(&tx)).unwrap();
    // Overflow before the forwarding task gets to run.
    for v in 1..=5 {
        source.publish(v);
    }

    // Oldest values are skipped; the newest ones still arrive.
    assert_eq!(next(&mut rx).await, Some(4));
    assert_eq!(next(&mut rx).await, Some(5));

    source.publish(6);
    assert_eq!(next(&mut rx).await, Some(6));
}

#[test]
fn subscribe_outside_runtime() {
    let source = BroadcastSource::<u32>::new();
    let mut bridge = Bridge::<u32>::new();

    let err = bridge.activate(Some(&source), |_: &u32| {}).unwrap_err();
    assert!(matches!(err, Error::Source(SourceError::NoRuntime)));

    let config = BridgeConfig::default().with_subscribe_error(SubscribeErrorPolicy::Log);
    let mut lenient = Bridge::<u32>::with_config(config);
    assert!(lenient.activate(Some(&source), |_: &u32| {}).is_ok());
    assert!(!lenient.is_attached());
}

#[tokio::test]
async fn dropping_source_ends_forwarding() {
    let source = Arc::new(BroadcastSource::<u32>::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut bridge = Bridge::<u32>::new();

    bridge.activate(Some(&source), forward(&tx)).unwrap();
    source.publish(1);
    drop(source);
    drop(tx);

    // The queued value is still forwarded, then the channel closes.
    assert_eq!(next(&mut rx).await, Some(1));
    assert!(bridge.is_attached());
    drop(bridge);
    assert_eq!(next(&mut rx).await, None);
}
