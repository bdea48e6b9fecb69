//! Stores the four covering triple indexes
use std::fmt;
use std::ops::Range;

use crate::err::Error;
use crate::key::debug::sprint;
use crate::tup;

/// The four covering index permutations.
///
/// Together they answer every (s?, p?, o?) pattern with a pure prefix scan,
/// except (s, ·, o) which scans the subject prefix of [`IndexTag::Spo`] and
/// post-filters on the object.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexTag {
	Spo,
	Pso,
	Pos,
	Osp,
}

impl IndexTag {
	pub const ALL: [IndexTag; 4] = [IndexTag::Spo, IndexTag::Pso, IndexTag::Pos, IndexTag::Osp];

	/// The three-letter tag identifying this index within its keys.
	pub fn as_str(&self) -> &'static str {
		match self {
			IndexTag::Spo => "spo",
			IndexTag::Pso => "pso",
			IndexTag::Pos => "pos",
			IndexTag::Osp => "osp",
		}
	}

	/// Order the triple IDs into this index's key order.
	pub fn permute(&self, s: i64, p: i64, o: i64) -> [i64; 3] {
		match self {
			IndexTag::Spo => [s, p, o],
			IndexTag::Pso => [p, s, o],
			IndexTag::Pos => [p, o, s],
			IndexTag::Osp => [o, s, p],
		}
	}

	/// Reorder decoded key elements back into (subject, predicate, object).
	pub fn unpermute(&self, k: [i64; 3]) -> (i64, i64, i64) {
		match self {
			IndexTag::Spo => (k[0], k[1], k[2]),
			IndexTag::Pso => (k[1], k[0], k[2]),
			IndexTag::Pos => (k[2], k[0], k[1]),
			IndexTag::Osp => (k[1], k[2], k[0]),
		}
	}
}

impl fmt::Display for IndexTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A single entry in one of the four covering indexes.
///
/// The value stored under an index key is always empty; the key itself
/// carries the whole triple.
pub struct Entry<'a> {
	pub root: &'a str,
	pub tag: IndexTag,
	pub s: i64,
	pub p: i64,
	pub o: i64,
}

impl<'a> Entry<'a> {
	pub fn new(root: &'a str, tag: IndexTag, s: i64, p: i64, o: i64) -> Self {
		Self {
			root,
			tag,
			s,
			p,
			o,
		}
	}

	pub fn encode(&self) -> Vec<u8> {
		let mut k = prefix(self.root, self.tag);
		for id in self.tag.permute(self.s, self.p, self.o) {
			tup::append_i64(&mut k, id);
		}
		k
	}

	/// Decode an index key back into (subject, predicate, object) IDs.
	pub fn decode(root: &str, tag: IndexTag, key: &[u8]) -> Result<(i64, i64, i64), Error> {
		let pre = prefix(root, tag);
		let rest = key.strip_prefix(pre.as_slice()).ok_or_else(|| corrupt(key))?;
		let (k1, rest) = tup::take_i64(rest).map_err(|_| corrupt(key))?;
		let (k2, rest) = tup::take_i64(rest).map_err(|_| corrupt(key))?;
		let (k3, rest) = tup::take_i64(rest).map_err(|_| corrupt(key))?;
		if !rest.is_empty() {
			return Err(corrupt(key));
		}
		Ok(tag.unpermute([k1, k2, k3]))
	}
}

fn prefix(root: &str, tag: IndexTag) -> Vec<u8> {
	let mut k = Vec::with_capacity(root.len() + 16);
	tup::append_str(&mut k, root);
	tup::append_str(&mut k, "idx");
	tup::append_str(&mut k, tag.as_str());
	k
}

/// The half-open range covering every key of `tag` whose leading IDs equal
/// `ids`, in the index's own key order. An empty `ids` covers the whole
/// index.
pub fn range(root: &str, tag: IndexTag, ids: &[i64]) -> Range<Vec<u8>> {
	let mut beg = prefix(root, tag);
	for &id in ids {
		tup::append_i64(&mut beg, id);
	}
	// 0xff sorts after every byte which can begin a further tuple element,
	// so appending it bounds exactly the keys sharing this prefix.
	let mut end = beg.clone();
	end.push(0xff);
	beg..end
}

fn corrupt(key: &[u8]) -> Error {
	Error::CorruptKey(sprint(&key))
}

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn key() {
		let val = Entry::new("test", IndexTag::Spo, 1, 2, 3);
		let enc = val.encode();
		assert_eq!(enc, b"\x02test\x00\x02idx\x00\x02spo\x00\x15\x01\x15\x02\x15\x03");

		let dec = Entry::decode("test", IndexTag::Spo, &enc).unwrap();
		assert_eq!(dec, (1, 2, 3));
	}

	#[test]
	fn key_permutations() {
		let cases: [(IndexTag, &[u8]); 4] = [
			(IndexTag::Spo, b"\x02test\x00\x02idx\x00\x02spo\x00\x15\x01\x15\x02\x15\x03"),
			(IndexTag::Pso, b"\x02test\x00\x02idx\x00\x02pso\x00\x15\x02\x15\x01\x15\x03"),
			(IndexTag::Pos, b"\x02test\x00\x02idx\x00\x02pos\x00\x15\x02\x15\x03\x15\x01"),
			(IndexTag::Osp, b"\x02test\x00\x02idx\x00\x02osp\x00\x15\x03\x15\x01\x15\x02"),
		];
		for (tag, expected) in cases {
			let enc = Entry::new("test", tag, 1, 2, 3).encode();
			assert_eq!(enc, expected, "{tag}");
			let dec = Entry::decode("test", tag, &enc).unwrap();
			assert_eq!(dec, (1, 2, 3), "{tag}");
		}
	}

	#[test]
	fn range_bounds_cover_prefix() {
		let rng = range("test", IndexTag::Spo, &[1]);
		assert_eq!(rng.start, b"\x02test\x00\x02idx\x00\x02spo\x00\x15\x01".to_vec());
		assert_eq!(rng.end, b"\x02test\x00\x02idx\x00\x02spo\x00\x15\x01\xff".to_vec());
		// Keys sharing the prefix fall inside the bounds
		let inside = Entry::new("test", IndexTag::Spo, 1, 2, 3).encode();
		assert!(rng.start <= inside && inside < rng.end);
		// Keys with a different leading ID fall outside
		let outside = Entry::new("test", IndexTag::Spo, 2, 2, 3).encode();
		assert!(outside >= rng.end);
	}

	#[test]
	fn full_index_range() {
		let rng = range("test", IndexTag::Osp, &[]);
		assert_eq!(rng.start, b"\x02test\x00\x02idx\x00\x02osp\x00".to_vec());
		assert_eq!(rng.end, b"\x02test\x00\x02idx\x00\x02osp\x00\xff".to_vec());
	}

	#[test]
	fn decode_rejects_foreign_keys() {
		let enc = Entry::new("test", IndexTag::Spo, 1, 2, 3).encode();
		// Wrong tag prefix
		assert!(matches!(
			Entry::decode("test", IndexTag::Pso, &enc),
			Err(Error::CorruptKey(_))
		));
		// Wrong root prefix
		assert!(matches!(
			Entry::decode("other", IndexTag::Spo, &enc),
			Err(Error::CorruptKey(_))
		));
		// Trailing garbage after the third ID
		let mut long = enc.clone();
		long.push(0x15);
		long.push(0x09);
		assert!(matches!(
			Entry::decode("test", IndexTag::Spo, &long),
			Err(Error::CorruptKey(_))
		));
		// A truncated key misses an ID
		let short = &enc[..enc.len() - 2];
		assert!(matches!(
			Entry::decode("test", IndexTag::Spo, short),
			Err(Error::CorruptKey(_))
		));
	}
}
