//! Lazy streaming of query results.

use std::collections::VecDeque;
use std::ops::Range;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::stream::Stream;
use futures::FutureExt;

use super::dict::Dictionary;
use crate::cnf;
use crate::err::Error;
use crate::key;
use crate::key::index::IndexTag;
use crate::kvs::{Key, Transactor};
use crate::rdf::Triple;

/// A lazy stream of triples matching a query pattern.
///
/// The stream owns the read transaction it scans through and fetches the
/// underlying key range in bounded batches, so result sets larger than
/// memory can be consumed incrementally. Dropping the stream drops the
/// transaction, aborting the ranged read.
pub struct Triples {
	/// Where the scan currently stands
	state: State,
	/// Triples decoded from the last batch, served out one by one
	results: VecDeque<Triple>,
}

enum State {
	/// Waiting for the consumer to demand the next batch
	Ready(Box<Scan>),
	/// A batch fetch is currently in flight
	Fetching(BoxFuture<'static, (Box<Scan>, Result<Vec<Triple>, Error>)>),
	/// The range is exhausted, or the scan errored
	Complete,
}

struct Scan {
	/// The transaction which owns the snapshot being read
	tx: Transactor,
	/// The shared dictionary used to rehydrate URIs
	dict: Arc<Dictionary>,
	/// The root prefix of the store being scanned
	root: String,
	/// The index this scan runs over
	tag: IndexTag,
	/// The object ID filter for patterns without a pure prefix
	filter: Option<i64>,
	/// The remaining key range
	range: Range<Key>,
	/// Whether the last batch reached the end of the range
	exhausted: bool,
}

impl Triples {
	pub(crate) fn new(
		tx: Transactor,
		dict: Arc<Dictionary>,
		root: String,
		tag: IndexTag,
		filter: Option<i64>,
		range: Range<Key>,
	) -> Self {
		Triples {
			state: State::Ready(Box::new(Scan {
				tx,
				dict,
				root,
				tag,
				filter,
				range,
				exhausted: false,
			})),
			results: VecDeque::new(),
		}
	}

	/// A stream which yields nothing, for patterns binding an unknown URI.
	pub(crate) fn empty() -> Self {
		Triples {
			state: State::Complete,
			results: VecDeque::new(),
		}
	}
}

impl Scan {
	/// Fetch and rehydrate one batch of index keys, handing the scan state
	/// back for the next round.
	async fn fetch(mut self: Box<Self>) -> (Box<Self>, Result<Vec<Triple>, Error>) {
		let res = self.batch().await;
		(self, res)
	}

	async fn batch(&mut self) -> Result<Vec<Triple>, Error> {
		let num = *cnf::SCAN_BATCH_SIZE;
		let keys = self.tx.keys(self.range.clone(), num).await?;
		// Start the next batch just past the last key seen
		if let Some(last) = keys.last() {
			self.range.start.clone_from(last);
			self.range.start.push(0xff);
		}
		if (keys.len() as u32) < num {
			self.exhausted = true;
		}
		let mut out = Vec::with_capacity(keys.len());
		for k in keys {
			let (s, p, o) = key::index::Entry::decode(&self.root, self.tag, &k)?;
			if let Some(filter) = self.filter {
				if o != filter {
					continue;
				}
			}
			let subject = self.dict.lookup_uri(&mut self.tx, &self.root, s as u64).await?;
			let predicate = self.dict.lookup_uri(&mut self.tx, &self.root, p as u64).await?;
			let object = self.dict.lookup_uri(&mut self.tx, &self.root, o as u64).await?;
			out.push(Triple::new(subject, predicate, object));
		}
		Ok(out)
	}
}

impl Stream for Triples {
	type Item = Result<Triple, Error>;

	fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
		loop {
			// Serve buffered results first
			if let Some(triple) = self.results.pop_front() {
				return Poll::Ready(Some(Ok(triple)));
			}
			match std::mem::replace(&mut self.state, State::Complete) {
				// Nothing left to fetch
				State::Complete => return Poll::Ready(None),
				// The previous batch reached the end of the range
				State::Ready(scan) if scan.exhausted => return Poll::Ready(None),
				// Start fetching the next batch
				State::Ready(scan) => {
					self.state = State::Fetching(scan.fetch().boxed());
				}
				// Poll the in-flight batch
				State::Fetching(mut fut) => match fut.poll_unpin(cx) {
					Poll::Ready((scan, Ok(batch))) => {
						self.results.extend(batch);
						self.state = State::Ready(scan);
					}
					Poll::Ready((_, Err(e))) => {
						return Poll::Ready(Some(Err(e)));
					}
					Poll::Pending => {
						self.state = State::Fetching(fut);
						return Poll::Pending;
					}
				},
			}
		}
	}
}
