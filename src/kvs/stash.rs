use std::collections::HashMap;

/// Dictionary allocations made inside the current transaction.
///
/// The shared dictionary cache only ever holds committed pairs, so fresh
/// allocations travel here until their transaction commits; an aborted
/// transaction drops its stash with it and the retry re-reads from the
/// store.
#[derive(Default)]
pub(crate) struct Stash {
	ids: HashMap<String, u64>,
}

impl Stash {
	/// Fetch an ID allocated earlier in this transaction.
	pub(crate) fn get(&self, uri: &str) -> Option<u64> {
		self.ids.get(uri).copied()
	}

	/// Record an ID allocated in this transaction.
	pub(crate) fn set(&mut self, uri: String, id: u64) {
		self.ids.insert(uri, id);
	}

	/// Empty the stash, yielding every allocation made.
	pub(crate) fn drain(&mut self) -> impl Iterator<Item = (String, u64)> + '_ {
		self.ids.drain()
	}
}
