//! The URI interning dictionary.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::err::Error;
use crate::key;
use crate::kvs::stash::Stash;
use crate::kvs::Transactor;

/// Interns URIs into 64-bit IDs and resolves them back.
///
/// The two directions are stored symmetrically: for every `u2i` entry the
/// matching `i2u` entry is written in the same transaction. The shared
/// in-process cache only ever holds pairs which are known to be committed;
/// pairs allocated inside a transaction travel in that transaction's stash
/// until the commit succeeds, so an aborted transaction leaves no trace and
/// the retry path re-reads from the store.
#[derive(Default)]
pub(crate) struct Dictionary {
	cache: Mutex<Cache>,
}

#[derive(Default)]
struct Cache {
	u2i: HashMap<String, u64>,
	i2u: HashMap<u64, String>,
}

impl Dictionary {
	fn cached_id(&self, uri: &str) -> Option<u64> {
		self.cache.lock().unwrap().u2i.get(uri).copied()
	}

	fn cached_uri(&self, id: u64) -> Option<String> {
		self.cache.lock().unwrap().i2u.get(&id).cloned()
	}

	/// Record a committed pair in both cache directions.
	fn publish(&self, uri: &str, id: u64) {
		let mut cache = self.cache.lock().unwrap();
		cache.u2i.insert(uri.to_owned(), id);
		cache.i2u.insert(id, uri.to_owned());
	}

	/// Publish every allocation made by a successfully committed
	/// transaction.
	pub(crate) fn publish_stash(&self, stash: &mut Stash) {
		let mut cache = self.cache.lock().unwrap();
		for (uri, id) in stash.drain() {
			cache.i2u.insert(id, uri.clone());
			cache.u2i.insert(uri, id);
		}
	}

	/// Intern a URI, allocating the next ID on first encounter.
	pub(crate) async fn intern(
		&self,
		tx: &mut Transactor,
		root: &str,
		uri: &str,
	) -> Result<u64, Error> {
		// Committed pairs first, then allocations made earlier in this
		// transaction
		if let Some(id) = self.cached_id(uri) {
			return Ok(id);
		}
		if let Some(id) = tx.stash().get(uri) {
			return Ok(id);
		}
		let u2i = key::dict::U2i::new(root, uri).encode();
		if let Some(v) = tx.get(u2i.clone()).await? {
			let id = decode_id(&v)?;
			self.publish(uri, id);
			return Ok(id);
		}
		// First encounter; allocate the next ID from the counter. The add
		// treats a missing counter as zero and the read-back observes the
		// incremented value under read-your-writes.
		let cnt = key::dict::Cnt::new(root).encode();
		tx.add(cnt.clone(), 1).await?;
		let id = match tx.get(cnt).await? {
			Some(v) => decode_id(&v)?,
			None => {
				return Err(Error::Internal(
					"dictionary counter missing after increment".to_owned(),
				))
			}
		};
		tx.set(u2i, id.to_le_bytes().to_vec()).await?;
		tx.set(key::dict::I2u::new(root, id as i64).encode(), uri.as_bytes().to_vec()).await?;
		tx.stash().set(uri.to_owned(), id);
		Ok(id)
	}

	/// Resolve a URI to its ID if it has ever been interned. Never interns.
	pub(crate) async fn lookup_id(
		&self,
		tx: &mut Transactor,
		root: &str,
		uri: &str,
	) -> Result<Option<u64>, Error> {
		if let Some(id) = self.cached_id(uri) {
			return Ok(Some(id));
		}
		if let Some(id) = tx.stash().get(uri) {
			return Ok(Some(id));
		}
		match tx.get(key::dict::U2i::new(root, uri).encode()).await? {
			Some(v) => {
				let id = decode_id(&v)?;
				self.publish(uri, id);
				Ok(Some(id))
			}
			None => Ok(None),
		}
	}

	/// Resolve an ID previously read from an index entry back to its URI.
	pub(crate) async fn lookup_uri(
		&self,
		tx: &mut Transactor,
		root: &str,
		id: u64,
	) -> Result<String, Error> {
		if let Some(uri) = self.cached_uri(id) {
			return Ok(uri);
		}
		match tx.get(key::dict::I2u::new(root, id as i64).encode()).await? {
			Some(v) => {
				let uri = String::from_utf8(v).map_err(|_| {
					Error::Internal(format!("URI for ID {id} is not valid UTF-8"))
				})?;
				self.publish(&uri, id);
				Ok(uri)
			}
			None => Err(Error::DanglingId(id)),
		}
	}
}

fn decode_id(val: &[u8]) -> Result<u64, Error> {
	let val: [u8; 8] = val
		.try_into()
		.map_err(|_| Error::Internal("dictionary ID value is not 8 bytes".to_owned()))?;
	Ok(u64::from_le_bytes(val))
}
