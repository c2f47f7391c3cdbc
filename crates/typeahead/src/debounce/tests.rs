use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use tokio::time::{Instant, advance};

use super::*;

#[tokio::test(start_paused = true)]
async fn single_wait_fires_after_quiet_period() {
	let debouncer = Debouncer::new(Duration::from_millis(200));
	let start = Instant::now();

	assert!(debouncer.wait().await);
	assert!(start.elapsed() >= Duration::from_millis(200));
	assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn only_latest_wait_fires_exactly_once() {
	let debouncer = Arc::new(Debouncer::new(Duration::from_millis(100)));
	let fired = Arc::new(AtomicUsize::new(0));
	let mut handles = Vec::new();

	for label in 0..3usize {
		let debouncer = Arc::clone(&debouncer);
		let fired = Arc::clone(&fired);
		handles.push(tokio::spawn(async move {
			if debouncer.wait().await {
				fired.fetch_add(1, Ordering::SeqCst);
				Some(label)
			} else {
				None
			}
		}));
		tokio::task::yield_now().await;
		advance(Duration::from_millis(30)).await;
	}

	let mut winners = Vec::new();
	for handle in handles {
		winners.push(handle.await.unwrap());
	}

	assert_eq!(winners, vec![None, None, Some(2)]);
	assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_prevents_pending_wait_from_firing() {
	let debouncer = Arc::new(Debouncer::new(Duration::from_millis(100)));
	let waiter = {
		let debouncer = Arc::clone(&debouncer);
		tokio::spawn(async move { debouncer.wait().await })
	};
	tokio::task::yield_now().await;
	assert!(debouncer.is_pending());

	debouncer.cancel();
	advance(Duration::from_millis(500)).await;

	assert!(!waiter.await.unwrap());
	assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn reservation_order_decides_winner_not_poll_order() {
	let debouncer = Debouncer::new(Duration::from_millis(50));
	let first = debouncer.reserve();
	let second = debouncer.reserve();
	assert!(first.is_cancelled());
	assert!(!second.is_cancelled());

	let second = tokio::spawn(second.wait());
	tokio::task::yield_now().await;
	let first = tokio::spawn(first.wait());

	assert!(!first.await.unwrap());
	assert!(second.await.unwrap());
	assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn ticket_cancelled_before_polling_resolves_without_sleeping() {
	let debouncer = Debouncer::new(Duration::from_millis(100));
	let ticket = debouncer.reserve();
	assert!(debouncer.is_pending());

	debouncer.cancel();
	let start = Instant::now();

	assert!(!ticket.wait().await);
	assert_eq!(start.elapsed(), Duration::ZERO);
	assert!(!debouncer.is_pending());
}

#[test]
fn dropped_ticket_releases_slot() {
	let debouncer = Debouncer::new(Duration::from_millis(10));
	let stale = debouncer.reserve();
	let current = debouncer.reserve();

	drop(stale);
	assert!(debouncer.is_pending());

	drop(current);
	assert!(!debouncer.is_pending());
	assert_eq!(debouncer.wait_duration(), Duration::from_millis(10));
}
