use std::sync::Arc;

use super::stash::Stash;
use super::tr::{LockType, TransactionType, Transactor};
use crate::cnf;
use crate::dbs::dict::Dictionary;
use crate::dbs::index;
use crate::dbs::plan;
use crate::dbs::stream::Triples;
use crate::err::Error;
use crate::key;
use crate::rdf::Triple;

const TARGET: &str = "tripledb::kvs::ds";

/// The underlying datastore instance which stores the triples.
///
/// Every public operation runs as exactly one transaction against the
/// configured storage engine, retried on transient conflicts, so concurrent
/// callers never observe partial state.
#[non_exhaustive]
pub struct Datastore {
	// The inner datastore type
	inner: Inner,
	// The root prefix isolating this store within the keyspace
	root: String,
	// The shared URI dictionary cache
	dict: Arc<Dictionary>,
}

pub(super) enum Inner {
	#[cfg(feature = "kv-mem")]
	Mem(super::mem::Datastore),
	#[cfg(feature = "kv-fdb")]
	FoundationDB(super::fdb::Datastore),
}

/// Runs one writeable transaction around the body, commits it, and re-runs
/// the whole body when a retriable error surfaces, up to the configured
/// retry limit. Dictionary allocations are published to the shared cache
/// only once the commit has succeeded.
macro_rules! run {
	($self:ident, $tx:ident => $body:block) => {{
		let mut attempt: u32 = 0;
		loop {
			let mut $tx = $self.transaction(TransactionType::Write, LockType::Optimistic).await?;
			let err = match async { $body }.await {
				Ok(val) => match $tx.commit().await {
					Ok(()) => {
						$self.dict.publish_stash($tx.stash());
						break Ok(val);
					}
					Err(e) => e,
				},
				Err(e) => {
					$tx.cancel().await.ok();
					e
				}
			};
			if !err.is_retryable() {
				break Err(err);
			}
			if attempt >= *cnf::TRANSACTION_RETRY_LIMIT {
				break Err(Error::TxRetryLimitExceeded);
			}
			attempt += 1;
			#[cfg(debug_assertions)]
			trace!(target: TARGET, "Retrying transaction after a conflict (attempt {attempt})");
		}
	}};
}

impl Datastore {
	/// Open a new datastore.
	///
	/// The `path` selects the storage engine; the `root` prefix isolates
	/// this store's keys from anything else sharing the same keyspace.
	///
	/// ```rust,no_run
	/// # use tripledb::Datastore;
	/// # use tripledb::Error;
	/// # #[tokio::main]
	/// # async fn main() -> Result<(), Error> {
	/// let ds = Datastore::new("memory", "demo").await?;
	/// # Ok(())
	/// # }
	/// ```
	///
	/// Or connect to a FoundationDB cluster:
	///
	/// ```rust,no_run
	/// # use tripledb::Datastore;
	/// # use tripledb::Error;
	/// # #[tokio::main]
	/// # async fn main() -> Result<(), Error> {
	/// let ds = Datastore::new("fdb:/etc/foundationdb/fdb.cluster", "demo").await?;
	/// # Ok(())
	/// # }
	/// ```
	pub async fn new(path: &str, root: &str) -> Result<Datastore, Error> {
		// Initiate the desired datastore
		let inner = match path {
			"memory" => {
				#[cfg(feature = "kv-mem")]
				{
					info!(target: TARGET, "Starting kvs store in {}", path);
					let v = super::mem::Datastore::new().await.map(Inner::Mem);
					info!(target: TARGET, "Started kvs store in {}", path);
					v
				}
				#[cfg(not(feature = "kv-mem"))]
				return Err(Error::Ds(
					"Cannot connect to the `memory` storage engine as it is not enabled in this build"
						.to_owned(),
				));
			}
			// Parse and initiate a FoundationDB database
			s if s.starts_with("fdb:") => {
				#[cfg(feature = "kv-fdb")]
				{
					info!(target: TARGET, "Connecting to kvs store at {}", path);
					let s = s.trim_start_matches("fdb://").trim_start_matches("fdb:");
					let v = super::fdb::Datastore::new(s).await.map(Inner::FoundationDB);
					info!(target: TARGET, "Connected to kvs store at {}", path);
					v
				}
				#[cfg(not(feature = "kv-fdb"))]
				return Err(Error::Ds(
					"Cannot connect to the `foundationdb` storage engine as it is not enabled in this build"
						.to_owned(),
				));
			}
			// The datastore path is not valid
			_ => {
				info!(target: TARGET, "Unable to load the specified datastore {}", path);
				Err(Error::Ds("Unable to load the specified datastore".into()))
			}
		}?;
		Ok(Datastore {
			inner,
			root: root.to_owned(),
			dict: Arc::new(Dictionary::default()),
		})
	}

	/// Create a new transaction on this datastore.
	pub async fn transaction(
		&self,
		write: TransactionType,
		lock: LockType,
	) -> Result<Transactor, Error> {
		#![allow(unused_variables)]
		let write = matches!(write, TransactionType::Write);
		let lock = matches!(lock, LockType::Pessimistic);
		let inner = match &self.inner {
			#[cfg(feature = "kv-mem")]
			Inner::Mem(v) => {
				let tx = v.transaction(write, lock).await?;
				super::tr::Inner::Mem(tx)
			}
			#[cfg(feature = "kv-fdb")]
			Inner::FoundationDB(v) => {
				let tx = v.transaction(write, lock).await?;
				super::tr::Inner::FoundationDB(tx)
			}
			#[allow(unreachable_patterns)]
			_ => unreachable!(),
		};
		Ok(Transactor {
			inner,
			stash: Stash::default(),
		})
	}

	/// Insert a single triple into the store.
	///
	/// Re-inserting a triple which is already present is a no-op.
	pub async fn insert(&self, triple: &Triple) -> Result<(), Error> {
		triple.check()?;
		run!(self, tx => {
			let s = self.dict.intern(&mut tx, &self.root, &triple.subject).await?;
			let p = self.dict.intern(&mut tx, &self.root, &triple.predicate).await?;
			let o = self.dict.intern(&mut tx, &self.root, &triple.object).await?;
			index::insert(&mut tx, &self.root, s, p, o).await?;
			Ok(())
		})
	}

	/// Insert a batch of triples.
	///
	/// The input is split into chunks which are each written in their own
	/// transaction, keeping every transaction inside the payload and time
	/// budgets of the underlying store. Duplicates within and across chunks
	/// are no-ops.
	pub async fn insert_batch(&self, triples: &[Triple]) -> Result<(), Error> {
		for triple in triples {
			triple.check()?;
		}
		for chunk in triples.chunks((*cnf::INSERT_BATCH_SIZE).max(1)) {
			run!(self, tx => {
				for triple in chunk {
					let s = self.dict.intern(&mut tx, &self.root, &triple.subject).await?;
					let p = self.dict.intern(&mut tx, &self.root, &triple.predicate).await?;
					let o = self.dict.intern(&mut tx, &self.root, &triple.object).await?;
					index::insert(&mut tx, &self.root, s, p, o).await?;
				}
				Ok(())
			})?;
		}
		Ok(())
	}

	/// Delete a single triple from the store.
	///
	/// Deleting a triple which is not present is a no-op.
	pub async fn delete(&self, triple: &Triple) -> Result<(), Error> {
		triple.check()?;
		run!(self, tx => {
			let s = self.dict.lookup_id(&mut tx, &self.root, &triple.subject).await?;
			let p = self.dict.lookup_id(&mut tx, &self.root, &triple.predicate).await?;
			let o = self.dict.lookup_id(&mut tx, &self.root, &triple.object).await?;
			match (s, p, o) {
				(Some(s), Some(p), Some(o)) => {
					index::delete(&mut tx, &self.root, s, p, o).await?;
					Ok(())
				}
				// A component was never interned, so the triple cannot exist
				_ => Ok(()),
			}
		})
	}

	/// Check whether a triple is present in the store.
	pub async fn contains(&self, triple: &Triple) -> Result<bool, Error> {
		triple.check()?;
		let mut tx = self.transaction(TransactionType::Read, LockType::Optimistic).await?;
		let res = self.contains_in(&mut tx, triple).await?;
		tx.cancel().await?;
		Ok(res)
	}

	async fn contains_in(&self, tx: &mut Transactor, triple: &Triple) -> Result<bool, Error> {
		let s = self.dict.lookup_id(tx, &self.root, &triple.subject).await?;
		let p = self.dict.lookup_id(tx, &self.root, &triple.predicate).await?;
		let o = self.dict.lookup_id(tx, &self.root, &triple.object).await?;
		match (s, p, o) {
			(Some(s), Some(p), Some(o)) => index::exists(tx, &self.root, s, p, o).await,
			_ => Ok(false),
		}
	}

	/// The number of triples currently in the store.
	pub async fn count(&self) -> Result<u64, Error> {
		let mut tx = self.transaction(TransactionType::Read, LockType::Optimistic).await?;
		let val = tx.get(key::meta::Cnt::new(&self.root).encode()).await?;
		tx.cancel().await?;
		let count = match val {
			Some(v) => {
				let v: [u8; 8] = v.as_slice().try_into().map_err(|_| {
					Error::Internal("triple counter value is not 8 bytes".to_owned())
				})?;
				i64::from_le_bytes(v)
			}
			None => 0,
		};
		// The on-disk counter is a signed add target; clamp for the caller
		Ok(count.max(0) as u64)
	}

	/// Query the store for triples matching a pattern of bound and unbound
	/// components, returning a lazy stream of matches.
	///
	/// Results stream in the key order of the index chosen for the
	/// pattern; dropping the stream aborts the underlying range read.
	pub async fn query(
		&self,
		s: Option<&str>,
		p: Option<&str>,
		o: Option<&str>,
	) -> Result<Triples, Error> {
		if [s, p, o].into_iter().flatten().any(|uri| uri.is_empty()) {
			return Err(Error::InvalidUri);
		}
		let mut tx = self.transaction(TransactionType::Read, LockType::Optimistic).await?;
		// Resolve the bound components, never interning them
		let s_id = match s {
			Some(uri) => Some(self.dict.lookup_id(&mut tx, &self.root, uri).await?),
			None => None,
		};
		let p_id = match p {
			Some(uri) => Some(self.dict.lookup_id(&mut tx, &self.root, uri).await?),
			None => None,
		};
		let o_id = match o {
			Some(uri) => Some(self.dict.lookup_id(&mut tx, &self.root, uri).await?),
			None => None,
		};
		// A bound URI which was never interned matches nothing
		if [&s_id, &p_id, &o_id].into_iter().any(|id| matches!(id, Some(None))) {
			tx.cancel().await?;
			return Ok(Triples::empty());
		}
		let plan = plan::plan(
			s_id.flatten().map(|v| v as i64),
			p_id.flatten().map(|v| v as i64),
			o_id.flatten().map(|v| v as i64),
		);
		let rng = key::index::range(&self.root, plan.tag, &plan.prefix);
		Ok(Triples::new(tx, self.dict.clone(), self.root.clone(), plan.tag, plan.filter, rng))
	}
}
