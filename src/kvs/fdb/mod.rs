#![cfg(feature = "kv-fdb")]

mod cnf;

use std::ops::Range;
use std::sync::Arc;

use foundationdb::options::DatabaseOption;
use foundationdb::options::MutationType;
use foundationdb::Database;
use foundationdb::RangeOption;
use foundationdb::Transaction as Tx;
use futures::StreamExt;
use once_cell::sync::Lazy;

use super::tr::Check;
use super::{Key, Val};
use crate::err::Error;

#[non_exhaustive]
pub struct Datastore {
	db: Database,
	// The Database stored above, relies on the foundationdb network being
	// booted before the client can be used. The return result of the
	// foundationdb::boot method is a handle which must be dropped before
	// the program exits. This handle is stored on the database so that it
	// is held for the duration of the programme. This pointer must be
	// declared last, so that it is dropped last.
	_fdbnet: Arc<foundationdb::api::NetworkAutoStop>,
}

#[non_exhaustive]
pub struct Transaction {
	/// Is the transaction complete?
	done: bool,
	/// Should this transaction lock?
	lock: bool,
	/// Is the transaction writeable?
	write: bool,
	/// Should we check unhandled transactions?
	check: Check,
	/// The underlying datastore transaction
	inner: Option<Tx>,
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
	///
	/// The `path` argument can be a local file path to a FoundationDB
	/// cluster file, or an empty string. If specified as an empty string,
	/// then the default cluster file placed at a system dependent location
	/// (defined by FoundationDB) will be used. See
	/// https://apple.github.io/foundationdb/administration.html for more
	/// information on cluster connection files.
	pub(crate) async fn new(path: &str) -> Result<Datastore, Error> {
		// Initialize the FoundationDB Client API
		static FDBNET: Lazy<Arc<foundationdb::api::NetworkAutoStop>> =
			Lazy::new(|| Arc::new(unsafe { foundationdb::boot() }));
		// Store the network cancellation handle
		let _fdbnet = (*FDBNET).clone();
		// Configure and setup the database
		match foundationdb::Database::from_path(path) {
			Ok(db) => {
				// Set the transaction timeout
				db.set_option(DatabaseOption::TransactionTimeout(
					*cnf::FOUNDATIONDB_TRANSACTION_TIMEOUT,
				))
				.map_err(|e| Error::Ds(format!("Unable to set transaction timeout: {e}")))?;
				// Set the transaction retry limit
				db.set_option(DatabaseOption::TransactionRetryLimit(
					*cnf::FOUNDATIONDB_TRANSACTION_RETRY_LIMIT,
				))
				.map_err(|e| Error::Ds(format!("Unable to set transaction retry limit: {e}")))?;
				// Set the transaction max retry delay
				db.set_option(DatabaseOption::TransactionMaxRetryDelay(
					*cnf::FOUNDATIONDB_TRANSACTION_MAX_RETRY_DELAY,
				))
				.map_err(|e| {
					Error::Ds(format!("Unable to set transaction max retry delay: {e}"))
				})?;
				Ok(Datastore {
					db,
					_fdbnet,
				})
			}
			Err(e) => Err(Error::Ds(e.to_string())),
		}
	}

	/// Start a new transaction
	pub(crate) async fn transaction(&self, write: bool, lock: bool) -> Result<Transaction, Error> {
		// Specify the check level
		#[cfg(not(debug_assertions))]
		let check = Check::Warn;
		#[cfg(debug_assertions)]
		let check = Check::Panic;
		// Create a new transaction
		match self.db.create_trx() {
			Ok(inner) => Ok(Transaction {
				done: false,
				lock,
				check,
				write,
				inner: Some(inner),
			}),
			Err(e) => Err(Error::Tx(e.to_string())),
		}
	}
}

impl Transaction {
	/// Reads through a read-only optimistic transaction are snapshot reads,
	/// keeping queries out of the conflict set of concurrent writers.
	/// Writeable transactions always use serializable reads so that the
	/// presence checks which guard the counters conflict correctly.
	#[inline(always)]
	fn snapshot(&self) -> bool {
		!self.write && !self.lock
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
		match self.inner.take() {
			Some(inner) => inner.cancel().reset(),
			None => unreachable!(),
		};
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
		// Commit this transaction
		match self.inner.take() {
			Some(inner) => inner.commit().await?,
			None => unreachable!(),
		};
		// Continue
		Ok(())
	}

	/// Check if a key exists
	async fn exists(&mut self, key: Key) -> Result<bool, Error> {
		// Check to see if transaction is closed
		if self.done {
			return Err(Error::TxFinished);
		}
		// Check the key
		let res = self.inner.as_ref().unwrap().get(&key, self.snapshot()).await?.is_some();
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
		let res = self.inner.as_ref().unwrap().get(&key, self.snapshot()).await?.map(|v| v.to_vec());
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
		self.inner.as_ref().unwrap().set(&key, &val);
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
		self.inner.as_ref().unwrap().clear(&key);
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
		// Apply the native atomic mutation
		self.inner.as_ref().unwrap().atomic_op(&key, &amount.to_le_bytes(), MutationType::Add);
		// Return result
		Ok(())
	}

	/// Retrieve a range of keys from the database
	async fn keys(&mut self, rng: Range<Key>, limit: u32) -> Result<Vec<Key>, Error> {
		// Check to see if transaction is closed
		if self.done {
			return Err(Error::TxFinished);
		}
		// Get the transaction
		let inner = self.inner.as_ref().unwrap();
		// Create result set
		let mut res = vec![];
		// Set the key range
		let opt = RangeOption {
			limit: Some(limit as usize),
			..RangeOption::from((rng.start.as_slice(), rng.end.as_slice()))
		};
		// Create the scan request
		let mut req = inner.get_ranges(opt, self.snapshot());
		// Scan the keys in the iterator
		while let Some(val) = req.next().await {
			for v in val?.into_iter() {
				res.push(Key::from(v.key()));
			}
		}
		// Return result
		Ok(res)
	}

	/// Retrieve a range of key-value pairs from the database
	async fn scan(&mut self, rng: Range<Key>, limit: u32) -> Result<Vec<(Key, Val)>, Error> {
		// Check to see if transaction is closed
		if self.done {
			return Err(Error::TxFinished);
		}
		// Get the transaction
		let inner = self.inner.as_ref().unwrap();
		// Create result set
		let mut res = vec![];
		// Set the key range
		let opt = RangeOption {
			limit: Some(limit as usize),
			..RangeOption::from((rng.start.as_slice(), rng.end.as_slice()))
		};
		// Create the scan request
		let mut req = inner.get_ranges(opt, self.snapshot());
		// Scan the keys in the iterator
		while let Some(val) = req.next().await {
			for v in val?.into_iter() {
				res.push((Key::from(v.key()), Val::from(v.value())));
			}
		}
		// Return result
		Ok(res)
	}
}
