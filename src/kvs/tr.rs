use std::fmt;
use std::fmt::Debug;
use std::ops::Range;

use super::api::Transaction;
use super::stash::Stash;
use super::{Key, Val};
use crate::err::Error;
#[cfg(debug_assertions)]
use crate::key::debug::sprint;

const TARGET: &str = "tripledb::kvs::tr";

/// Used to determine the behaviour when a transaction is not closed correctly
#[derive(Default)]
pub enum Check {
	#[default]
	None,
	Warn,
	Panic,
}

/// Specifies whether the transaction is read-only or writeable.
#[derive(Copy, Clone)]
pub enum TransactionType {
	Read,
	Write,
}

impl From<bool> for TransactionType {
	fn from(value: bool) -> Self {
		match value {
			true => TransactionType::Write,
			false => TransactionType::Read,
		}
	}
}

/// Specifies whether the transaction is optimistic or pessimistic.
#[derive(Copy, Clone)]
pub enum LockType {
	Pessimistic,
	Optimistic,
}

impl From<bool> for LockType {
	fn from(value: bool) -> Self {
		match value {
			true => LockType::Pessimistic,
			false => LockType::Optimistic,
		}
	}
}

/// A single unit of buffered reads and writes against the datastore.
#[non_exhaustive]
pub struct Transactor {
	pub(super) inner: Inner,
	pub(super) stash: Stash,
}

pub(super) enum Inner {
	#[cfg(feature = "kv-mem")]
	Mem(super::mem::Transaction),
	#[cfg(feature = "kv-fdb")]
	FoundationDB(super::fdb::Transaction),
}

impl fmt::Display for Transactor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		#![allow(unused_variables)]
		match &self.inner {
			#[cfg(feature = "kv-mem")]
			Inner::Mem(_) => write!(f, "memory"),
			#[cfg(feature = "kv-fdb")]
			Inner::FoundationDB(_) => write!(f, "fdb"),
			#[allow(unreachable_patterns)]
			_ => unreachable!(),
		}
	}
}

macro_rules! expand_inner {
	( $v:expr, $arm:pat_param => $b:block ) => {
		match $v {
			#[cfg(feature = "kv-mem")]
			Inner::Mem($arm) => $b,
			#[cfg(feature = "kv-fdb")]
			Inner::FoundationDB($arm) => $b,
			#[allow(unreachable_patterns)]
			_ => unreachable!(),
		}
	};
}

impl Transactor {
	/// Check if transaction is finished.
	///
	/// If the transaction has been cancelled or committed, then this
	/// function will return [`true`], and any further calls to functions on
	/// this transaction will result in a [`Error::TxFinished`] error.
	pub fn closed(&self) -> bool {
		expand_inner!(&self.inner, v => { v.closed() })
	}

	/// Check if transaction is writeable.
	pub fn writeable(&self) -> bool {
		expand_inner!(&self.inner, v => { v.writeable() })
	}

	/// Set the behaviour if the transaction is dropped without being
	/// committed or cancelled.
	pub fn check_level(&mut self, check: Check) {
		expand_inner!(&mut self.inner, v => { v.check_level(check) })
	}

	/// Cancel a transaction.
	///
	/// This reverses all changes made within the transaction.
	pub async fn cancel(&mut self) -> Result<(), Error> {
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "cancel");
		expand_inner!(&mut self.inner, v => { v.cancel().await })
	}

	/// Commit a transaction.
	///
	/// This attempts to commit all changes made within the transaction.
	pub async fn commit(&mut self) -> Result<(), Error> {
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "commit");
		expand_inner!(&mut self.inner, v => { v.commit().await })
	}

	/// Check if a key exists in the datastore.
	pub async fn exists<K>(&mut self, key: K) -> Result<bool, Error>
	where
		K: Into<Key> + Debug,
	{
		let key = key.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "exists {}", sprint(&key));
		expand_inner!(&mut self.inner, v => { v.exists(key).await })
	}

	/// Fetch a key from the datastore.
	pub async fn get<K>(&mut self, key: K) -> Result<Option<Val>, Error>
	where
		K: Into<Key> + Debug,
	{
		let key = key.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "get {}", sprint(&key));
		expand_inner!(&mut self.inner, v => { v.get(key).await })
	}

	/// Insert or update a key in the datastore.
	pub async fn set<K, V>(&mut self, key: K, val: V) -> Result<(), Error>
	where
		K: Into<Key> + Debug,
		V: Into<Val> + Debug,
	{
		let key = key.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "set {} => {:?}", sprint(&key), val);
		expand_inner!(&mut self.inner, v => { v.set(key, val.into()).await })
	}

	/// Delete a key from the datastore.
	pub async fn del<K>(&mut self, key: K) -> Result<(), Error>
	where
		K: Into<Key> + Debug,
	{
		let key = key.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "del {}", sprint(&key));
		expand_inner!(&mut self.inner, v => { v.del(key).await })
	}

	/// Add a little-endian integer onto the value stored at a key in the
	/// datastore, treating a missing value as zero.
	pub async fn add<K>(&mut self, key: K, amount: i64) -> Result<(), Error>
	where
		K: Into<Key> + Debug,
	{
		let key = key.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "add {} += {}", sprint(&key), amount);
		expand_inner!(&mut self.inner, v => { v.add(key, amount).await })
	}

	/// Retrieve a specific range of keys from the datastore.
	///
	/// This function fetches the full range of keys without values, in a
	/// single request to the underlying datastore.
	pub async fn keys<K>(&mut self, rng: Range<K>, limit: u32) -> Result<Vec<Key>, Error>
	where
		K: Into<Key> + Debug,
	{
		let beg: Key = rng.start.into();
		let end: Key = rng.end.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "keys {}..{} (limit: {limit})", sprint(&beg), sprint(&end));
		expand_inner!(&mut self.inner, v => { v.keys(beg..end, limit).await })
	}

	/// Retrieve a specific range of keys from the datastore.
	///
	/// This function fetches the full range of key-value pairs, in a single
	/// request to the underlying datastore.
	pub async fn scan<K>(&mut self, rng: Range<K>, limit: u32) -> Result<Vec<(Key, Val)>, Error>
	where
		K: Into<Key> + Debug,
	{
		let beg: Key = rng.start.into();
		let end: Key = rng.end.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "scan {}..{} (limit: {limit})", sprint(&beg), sprint(&end));
		expand_inner!(&mut self.inner, v => { v.scan(beg..end, limit).await })
	}

	/// The dictionary allocations made inside this transaction.
	pub(crate) fn stash(&mut self) -> &mut Stash {
		&mut self.stash
	}
}
