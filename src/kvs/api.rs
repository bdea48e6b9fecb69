use std::ops::Range;

use super::tr::Check;
use super::{Key, Val};
use crate::err::Error;

/// The transaction contract every storage engine implements.
///
/// Write buffering, conflict detection, and read-your-writes are the
/// engine's responsibility; the [`super::Transactor`] only dispatches.
pub(super) trait Transaction {
	/// Behaviour if unclosed
	fn check_level(&mut self, check: Check);
	/// Check if closed
	fn closed(&self) -> bool;
	/// Check if writeable
	fn writeable(&self) -> bool;
	/// Cancel a transaction
	async fn cancel(&mut self) -> Result<(), Error>;
	/// Commit a transaction
	async fn commit(&mut self) -> Result<(), Error>;
	/// Check if a key exists
	async fn exists(&mut self, key: Key) -> Result<bool, Error>;
	/// Fetch a key from the database
	async fn get(&mut self, key: Key) -> Result<Option<Val>, Error>;
	/// Insert or update a key in the database
	async fn set(&mut self, key: Key, val: Val) -> Result<(), Error>;
	/// Delete a key from the database
	async fn del(&mut self, key: Key) -> Result<(), Error>;
	/// Add a little-endian integer onto the value stored at a key,
	/// treating a missing value as zero
	async fn add(&mut self, key: Key, amount: i64) -> Result<(), Error>;
	/// Retrieve a range of keys, without values
	async fn keys(&mut self, rng: Range<Key>, limit: u32) -> Result<Vec<Key>, Error>;
	/// Retrieve a range of key-value pairs
	async fn scan(&mut self, rng: Range<Key>, limit: u32) -> Result<Vec<(Key, Val)>, Error>;
}
