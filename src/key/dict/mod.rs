//! Stores the URI interning dictionary
use crate::tup;

/// Key mapping a URI onto its interned ID.
pub struct U2i<'a> {
	pub root: &'a str,
	pub uri: &'a str,
}

impl<'a> U2i<'a> {
	pub fn new(root: &'a str, uri: &'a str) -> Self {
		Self {
			root,
			uri,
		}
	}

	pub fn encode(&self) -> Vec<u8> {
		let mut k = Vec::with_capacity(self.root.len() + self.uri.len() + 16);
		tup::append_str(&mut k, self.root);
		tup::append_str(&mut k, "dict");
		tup::append_str(&mut k, "u2i");
		tup::append_str(&mut k, self.uri);
		k
	}
}

/// Key mapping an interned ID back onto its URI.
pub struct I2u<'a> {
	pub root: &'a str,
	pub id: i64,
}

impl<'a> I2u<'a> {
	pub fn new(root: &'a str, id: i64) -> Self {
		Self {
			root,
			id,
		}
	}

	pub fn encode(&self) -> Vec<u8> {
		let mut k = Vec::with_capacity(self.root.len() + 24);
		tup::append_str(&mut k, self.root);
		tup::append_str(&mut k, "dict");
		tup::append_str(&mut k, "i2u");
		tup::append_i64(&mut k, self.id);
		k
	}
}

/// Key holding the monotonically increasing ID allocation counter.
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
		tup::append_str(&mut k, "dict");
		tup::append_str(&mut k, "cnt");
		k
	}
}
