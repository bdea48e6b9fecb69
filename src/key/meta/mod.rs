//! Stores store-level metadata
use crate::tup;

/// Key holding the logical triple count.
///
/// The value is a signed 8-byte little-endian add target; deletes apply a
/// two's-complement `add(-1)`.
pub struct Cnt<'a> {
	pub root: &'a str,
}

impl<'a> Cnt<'a> {
	pub fn new(root: &'a str) -> Self {
		Self {
			root,
		}
	}

	pub fn encode(&self) -> Vec<u8> {
		let mut k = Vec::with_capacity(self.root.len() + 16);
		tup::append_str(&mut k, self.root);
		tup::append_str(&mut k, "meta");
		tup::append_str(&mut k, "cnt");
		k
	}
}

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn cnt_key() {
		let val = Cnt::new("test");
		let enc = val.encode();
		assert_eq!(enc, b"\x02test\x00\x02meta\x00\x02cnt\x00");
	}
}
