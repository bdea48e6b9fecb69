//! Maintenance of the four covering triple indexes.
//!
//! The four indexes are always written in lockstep: for any logical triple
//! either all four entries exist or none do, and only a transition between
//! those two states touches the triple counter.

use crate::err::Error;
use crate::key;
use crate::key::index::IndexTag;
use crate::kvs::Transactor;

/// Write a triple into all four indexes, counting it once.
///
/// Returns `false` when the triple was already present, in which case
/// neither the indexes nor the counter are touched.
pub(crate) async fn insert(
	tx: &mut Transactor,
	root: &str,
	s: u64,
	p: u64,
	o: u64,
) -> Result<bool, Error> {
	let (s, p, o) = (s as i64, p as i64, o as i64);
	let spo = key::index::Entry::new(root, IndexTag::Spo, s, p, o).encode();
	if tx.exists(spo).await? {
		return Ok(false);
	}
	for tag in IndexTag::ALL {
		tx.set(key::index::Entry::new(root, tag, s, p, o).encode(), Vec::new()).await?;
	}
	tx.add(key::meta::Cnt::new(root).encode(), 1).await?;
	Ok(true)
}

/// Clear a triple from all four indexes, uncounting it once.
///
/// Returns `false` when the triple was not present, in which case neither
/// the indexes nor the counter are touched.
pub(crate) async fn delete(
	tx: &mut Transactor,
	root: &str,
	s: u64,
	p: u64,
	o: u64,
) -> Result<bool, Error> {
	let (s, p, o) = (s as i64, p as i64, o as i64);
	let spo = key::index::Entry::new(root, IndexTag::Spo, s, p, o).encode();
	if !tx.exists(spo).await? {
		return Ok(false);
	}
	for tag in IndexTag::ALL {
		tx.del(key::index::Entry::new(root, tag, s, p, o).encode()).await?;
	}
	tx.add(key::meta::Cnt::new(root).encode(), -1).await?;
	Ok(true)
}

/// Check whether a triple is present, via a point read of its SPO key.
pub(crate) async fn exists(
	tx: &mut Transactor,
	root: &str,
	s: u64,
	p: u64,
	o: u64,
) -> Result<bool, Error> {
	let (s, p, o) = (s as i64, p as i64, o as i64);
	tx.exists(key::index::Entry::new(root, IndexTag::Spo, s, p, o).encode()).await
}
