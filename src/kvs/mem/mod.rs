#![cfg(feature = "kv-mem")]

use std::ops::Range;

use super::tr::Check;
use super::{Key, Val};
use crate::err::Error;

#[non_exhaustive]
pub struct Datastore {
	db: echodb::Db<Key, Val>,
}

#[non_exhaustive]
pub struct Transaction {
	/// Is the transaction complete?
	done: bool,
	/// Is the transaction writeable?
	write: bool,
	/// Should we check unhandled transactions?
	check: Check,
	/// The underlying datastore transaction
	inner: echodb::Tx<Key, Val>,
}

impl Drop for Transaction {
	fn drop(&mut self) {
		if !self.done && self.write {
			// Check if already panicking
			if std::thread::panicking() {
				return;
			}
			// Handle the behaviour
			match self.check {
				Check::None => {
					trace!("A transaction was dropped without being committed or cancelled");
				}
				Check::Warn => {
					warn!("A transaction was dropped without being committed or cancelled");
				}
				Check::Panic => {
					#[cfg(debug_assertions)]
					{
						let backtrace = std::backtrace::Backtrace::force_capture();
						if let std::backtrace::BacktraceStatus::Captured = backtrace.status() {
							println!("{}", backtrace);
						}
					}
					panic!("A transaction was dropped without being committed or cancelled");
				}
			}
		}
	}
}

impl Datastore {
	/// Open a new database
	pub(crate) async fn new() -> Result<Datastore, Error> {
		Ok(Datastore {
			db: echodb::db::new(),
		})
	}

	/// Start a new transaction
	pub(crate) async fn transaction(&self, write: bool, _: bool) -> Result<Transaction, Error> {
		// Specify the check level
		#[cfg(not(debug_assertions))]
		let check = Check::Warn;
		#[cfg(debug_assertions)]
		let check = Check::Panic;
		// Create a new transaction
		match self.db.begin(write).await {
			Ok(inner) => Ok(Transaction {
				done: false,
				check,
				write,
				inner,
			}),
			Err(e) => Err(Error::Tx(e.to_string())),
		}
	}
}

impl super::api::Transaction for Transaction {
	/// Behaviour if unclosed
	fn check_level(&mut self, check: Check) {
		self.check = check;
	}

	/// Check if closed
	fn closed(&self) -> bool {
		self.done
	}

	/// Check if writeable
	fn writeable(&self) -> bool {
		self.write
	}

	/// Cancel a transaction
	async fn cancel(&mut self) -> Result<(), Error> {
		// Check to see if transaction is closed
		if self.done {
			return Err(Error::TxFinished);
		}
		// Mark this transaction as done
		self.done = true;
		// Cancel this transaction
		self.inner.cancel()?;
		// Continue
		Ok(())
	}

	/// Commit a transaction
	async fn commit(&mut self) -> Result<(), Error> {
		// Check to see if transaction is closed
		if self.done {
			return Err(Error::TxFinished);
		}
		// Check to see if transaction is writable
		if !self.write {
			return Err(Error::TxReadonly);
		}
		// Mark this transaction as done
		self.done = true;
		// Commit this transaction; overlapping writers surface a version
		// conflict here, which the retry envelope absorbs
		match self.inner.commit() {
			Ok(v) => Ok(v),
			Err(e) => Err(Error::TxRetryable(e.to_string())),
		}
	}

	/// Check if a key exists
	async fn exists(&mut self, key: Key) -> Result<bool, Error> {
		// Check to see if transaction is closed
		if self.done {
			return Err(Error::TxFinished);
		}
		// Check the key
		let res = self.inner.exi(key)?;
		// Return result
		Ok(res)
	}

	/// Fetch a key from the database
	async fn get(&mut self, key: Key) -> Result<Option<Val>, Error> {
		// Check to see if transaction is closed
		if self.done {
			return Err(Error::TxFinished);
		}
		// Get the key
		let res = self.inner.get(key)?;
		// Return result
		Ok(res)
	}

	/// Insert or update a key in the database
	async fn set(&mut self, key: Key, val: Val) -> Result<(), Error> {
		// Check to see if transaction is closed
		if self.done {
			return Err(Error::TxFinished);
		}
		// Check to see if transaction is writable
		if !self.write {
			return Err(Error::TxReadonly);
		}
		// Set the key
		self.inner.set(key, val)?;
		// Return result
		Ok(())
	}

	/// Delete a key
	async fn del(&mut self, key: Key) -> Result<(), Error> {
		// Check to see if transaction is closed
		if self.done {
			return Err(Error::TxFinished);
		}
		// Check to see if transaction is writable
		if !self.write {
			return Err(Error::TxReadonly);
		}
		// Remove the key
		self.inner.del(key)?;
		// Return result
		Ok(())
	}

	/// Add a little-endian integer onto the value stored at a key
	async fn add(&mut self, key: Key, amount: i64) -> Result<(), Error> {
		// Check to see if transaction is closed
		if self.done {
			return Err(Error::TxFinished);
		}
		// Check to see if transaction is writable
		if !self.write {
			return Err(Error::TxReadonly);
		}
		// No native atomic operator; a read-modify-write is atomic under
		// the engine's commit-time conflict detection
		let cur = match self.inner.get(key.clone())? {
			Some(v) => val_to_i64(&v)?,
			None => 0,
		};
		self.inner.set(key, cur.wrapping_add(amount).to_le_bytes().to_vec())?;
		// Return result
		Ok(())
	}

	/// Retrieve a range of keys from the database
	async fn keys(&mut self, rng: Range<Key>, limit: u32) -> Result<Vec<Key>, Error> {
		// Check to see if transaction is closed
		if self.done {
			return Err(Error::TxFinished);
		}
		// Scan the keys
		let res = self.inner.scan(rng, limit)?.into_iter().map(|(k, _)| k).collect();
		// Return result
		Ok(res)
	}

	/// Retrieve a range of key-value pairs from the database
	async fn scan(&mut self, rng: Range<Key>, limit: u32) -> Result<Vec<(Key, Val)>, Error> {
		// Check to see if transaction is closed
		if self.done {
			return Err(Error::TxFinished);
		}
		// Scan the keys
		let res = self.inner.scan(rng, limit)?;
		// Return result
		Ok(res)
	}
}

fn val_to_i64(val: &[u8]) -> Result<i64, Error> {
	let val: [u8; 8] = val
		.try_into()
		.map_err(|_| Error::Internal("add target value is not 8 bytes".to_owned()))?;
	Ok(i64::from_le_bytes(val))
}
