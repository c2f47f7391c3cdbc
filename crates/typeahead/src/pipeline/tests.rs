use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;

struct Delay(Duration);

#[async_trait]
impl QueryParser for Delay {
	async fn parse(&self, query: String) -> Option<String> {
		tokio::time::sleep(self.0).await;
		Some(query)
	}
}

struct Counting(Arc<AtomicUsize>);

#[async_trait]
impl QueryParser for Counting {
	async fn parse(&self, query: String) -> Option<String> {
		self.0.fetch_add(1, Ordering::SeqCst);
		Some(query)
	}
}

#[tokio::test]
async fn empty_chain_passes_query_through() {
	let chain = QueryChain::default();
	assert!(chain.is_empty());
	assert_eq!(chain.run("abc".into()).await.as_deref(), Some("abc"));
}

#[tokio::test]
async fn stages_run_in_registration_order() {
	let chain = QueryChain::new(vec![
		Arc::new(parser_fn(|q: String| Some(format!("{q}1")))),
		Arc::new(parser_fn(|q: String| Some(format!("{q}2")))),
		Arc::new(parser_fn(|q: String| Some(q.to_uppercase()))),
	]);

	assert_eq!(chain.run("a".into()).await.as_deref(), Some("A12"));
}

#[tokio::test]
async fn veto_stops_later_stages() {
	let seen = Arc::new(AtomicUsize::new(0));
	let chain = QueryChain::new(vec![
		Arc::new(parser_fn(|_q: String| None)),
		Arc::new(Counting(Arc::clone(&seen))),
	]);

	assert_eq!(chain.run("a".into()).await, None);
	assert_eq!(seen.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn async_stage_suspends_chain() {
	let chain = QueryChain::new(vec![
		Arc::new(Delay(Duration::from_millis(100))),
		Arc::new(parser_fn(|q: String| Some(q.repeat(2)))),
	]);
	let start = tokio::time::Instant::now();

	assert_eq!(chain.run("ab".into()).await.as_deref(), Some("abab"));
	assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn debounce_lets_only_last_issued_query_through() {
	let seen = Arc::new(AtomicUsize::new(0));
	let chain = QueryChain::new(vec![Arc::new(Counting(Arc::clone(&seen)))])
		.with_debounce(Arc::new(Debouncer::new(Duration::from_millis(40))));

	let first = chain.run("a".into());
	let second = chain.run("ab".into());
	let second = tokio::spawn(second);
	tokio::task::yield_now().await;
	let first = tokio::spawn(first);

	assert_eq!(first.await.unwrap(), None);
	assert_eq!(second.await.unwrap().as_deref(), Some("ab"));
	assert_eq!(seen.load(Ordering::SeqCst), 1);
	assert_eq!(chain.len(), 1);
}
