//! The order-preserving tuple encoding used for every key in the store.
//!
//! Elements are concatenated into a byte string whose bytewise order equals
//! the lexicographic order of the element sequence: strings order by their
//! byte representation, integers by signed numeric value. The format is the
//! standard tuple layer of ordered key-value stores, so stores written by
//! other implementations of the same layout remain readable.
//!
//! A string element is its type code, the UTF-8 bytes with every `0x00`
//! escaped as `0x00 0xFF`, and a terminating `0x00`. An integer element is a
//! single code byte offset from `0x14` by the number of payload bytes
//! (positive above, negative below), followed by the minimal big-endian
//! payload; negative payloads are offset by `2^(8·n) − 1` so they sort
//! ascending.

use crate::err::Error;

/// Type code for a raw byte-string element.
const BYTES: u8 = 0x01;
/// Type code for a UTF-8 string element.
const STRING: u8 = 0x02;
/// Type code for an integer element with no payload bytes, i.e. zero.
const INT_ZERO: u8 = 0x14;
/// Ends a string element; escaped as `0x00 0xFF` when it occurs in content.
const TERMINATOR: u8 = 0x00;
/// Follows an embedded `0x00` content byte to keep it ordered before `0x01`.
const ESCAPE: u8 = 0xff;

/// Append a raw byte-string element onto a packed key.
pub fn append_bytes(out: &mut Vec<u8>, val: &[u8]) {
	out.push(BYTES);
	escape_into(out, val);
	out.push(TERMINATOR);
}

/// Append a UTF-8 string element onto a packed key.
pub fn append_str(out: &mut Vec<u8>, val: &str) {
	out.push(STRING);
	escape_into(out, val.as_bytes());
	out.push(TERMINATOR);
}

fn escape_into(out: &mut Vec<u8>, val: &[u8]) {
	for &byte in val {
		out.push(byte);
		if byte == TERMINATOR {
			out.push(ESCAPE);
		}
	}
}

/// Append a signed 64-bit integer element onto a packed key.
pub fn append_i64(out: &mut Vec<u8>, val: i64) {
	if val == 0 {
		out.push(INT_ZERO);
	} else if val > 0 {
		let len = byte_len(val.unsigned_abs());
		out.push(INT_ZERO + len as u8);
		out.extend_from_slice(&val.to_be_bytes()[8 - len..]);
	} else {
		let len = byte_len(val.unsigned_abs());
		// Offsetting by 2^(8·len) − 1 maps the value into [0, 2^(8·len) − 2]
		// while preserving order within the length class.
		let offset = ((val as i128) + (1i128 << (8 * len)) - 1) as u64;
		out.push(INT_ZERO - len as u8);
		out.extend_from_slice(&offset.to_be_bytes()[8 - len..]);
	}
}

/// The minimal number of big-endian bytes needed for a non-zero magnitude.
fn byte_len(mag: u64) -> usize {
	(64 - mag.leading_zeros() as usize).div_ceil(8)
}

/// Decode a signed 64-bit integer element from the front of `input`,
/// returning the value and the remaining bytes.
pub fn take_i64(input: &[u8]) -> Result<(i64, &[u8]), Error> {
	let (&code, rest) = input.split_first().ok_or_else(truncated)?;
	match code {
		INT_ZERO => Ok((0, rest)),
		0x15..=0x1c => {
			let len = (code - INT_ZERO) as usize;
			let (payload, rest) = split_payload(rest, len)?;
			let val = u64::from_be_bytes(payload);
			if val > i64::MAX as u64 {
				return Err(Error::CorruptKey("integer element out of range".to_owned()));
			}
			Ok((val as i64, rest))
		}
		0x0c..=0x13 => {
			let len = (INT_ZERO - code) as usize;
			let (payload, rest) = split_payload(rest, len)?;
			let val = u64::from_be_bytes(payload) as i128 - ((1i128 << (8 * len)) - 1);
			if val < i64::MIN as i128 || val >= 0 {
				return Err(Error::CorruptKey("integer element out of range".to_owned()));
			}
			Ok((val as i64, rest))
		}
		_ => Err(Error::CorruptKey("unexpected element type code".to_owned())),
	}
}

fn split_payload(input: &[u8], len: usize) -> Result<([u8; 8], &[u8]), Error> {
	if input.len() < len {
		return Err(truncated());
	}
	let (num, rest) = input.split_at(len);
	let mut payload = [0u8; 8];
	payload[8 - len..].copy_from_slice(num);
	Ok((payload, rest))
}

/// Decode a UTF-8 string element from the front of `input`, returning the
/// unescaped value and the remaining bytes.
pub fn take_str(input: &[u8]) -> Result<(String, &[u8]), Error> {
	let (&code, _) = input.split_first().ok_or_else(truncated)?;
	if code != STRING {
		return Err(Error::CorruptKey("unexpected element type code".to_owned()));
	}
	let (raw, rest) = unescape(&input[1..])?;
	let val = String::from_utf8(raw)
		.map_err(|_| Error::CorruptKey("string element is not valid UTF-8".to_owned()))?;
	Ok((val, rest))
}

/// Decode a raw byte-string element from the front of `input`.
pub fn take_bytes(input: &[u8]) -> Result<(Vec<u8>, &[u8]), Error> {
	let (&code, _) = input.split_first().ok_or_else(truncated)?;
	if code != BYTES {
		return Err(Error::CorruptKey("unexpected element type code".to_owned()));
	}
	unescape(&input[1..])
}

fn unescape(input: &[u8]) -> Result<(Vec<u8>, &[u8]), Error> {
	let mut out = Vec::with_capacity(input.len());
	let mut pos = 0;
	loop {
		match input.get(pos) {
			None => return Err(truncated()),
			Some(&TERMINATOR) => {
				if input.get(pos + 1) == Some(&ESCAPE) {
					out.push(TERMINATOR);
					pos += 2;
				} else {
					pos += 1;
					break;
				}
			}
			Some(&byte) => {
				out.push(byte);
				pos += 1;
			}
		}
	}
	Ok((out, &input[pos..]))
}

fn truncated() -> Error {
	Error::CorruptKey("truncated element".to_owned())
}

#[cfg(test)]
mod tests {

	use super::*;

	fn int(val: i64) -> Vec<u8> {
		let mut out = Vec::new();
		append_i64(&mut out, val);
		out
	}

	fn string(val: &str) -> Vec<u8> {
		let mut out = Vec::new();
		append_str(&mut out, val);
		out
	}

	#[test]
	fn int_encodings() {
		assert_eq!(int(0), b"\x14");
		assert_eq!(int(1), b"\x15\x01");
		assert_eq!(int(255), b"\x15\xff");
		assert_eq!(int(256), b"\x16\x01\x00");
		assert_eq!(int(65535), b"\x16\xff\xff");
		assert_eq!(int(-1), b"\x13\xfe");
		assert_eq!(int(-255), b"\x13\x00");
		assert_eq!(int(-256), b"\x12\xfe\xff");
		assert_eq!(int(i64::MAX), b"\x1c\x7f\xff\xff\xff\xff\xff\xff\xff");
		assert_eq!(int(i64::MIN), b"\x0c\x7f\xff\xff\xff\xff\xff\xff\xff");
	}

	#[test]
	fn string_encodings() {
		assert_eq!(string("alice"), b"\x02alice\x00");
		assert_eq!(string(""), b"\x02\x00");
		// An embedded NUL is escaped so that it still sorts before 0x01
		assert_eq!(string("a\0b"), b"\x02a\x00\xffb\x00");
	}

	#[test]
	fn bytes_encoding() {
		let mut out = Vec::new();
		append_bytes(&mut out, &[0x01, 0x00, 0x02]);
		assert_eq!(out, b"\x01\x01\x00\xff\x02\x00");
		let (val, rest) = take_bytes(&out).unwrap();
		assert_eq!(val, vec![0x01, 0x00, 0x02]);
		assert!(rest.is_empty());
	}

	#[test]
	fn int_round_trips() {
		for val in [
			i64::MIN,
			i64::MIN + 1,
			-65536,
			-256,
			-255,
			-2,
			-1,
			0,
			1,
			2,
			255,
			256,
			65535,
			65536,
			i64::MAX - 1,
			i64::MAX,
		] {
			let enc = int(val);
			let (dec, rest) = take_i64(&enc).unwrap();
			assert_eq!(dec, val);
			assert!(rest.is_empty());
		}
	}

	#[test]
	fn string_round_trips() {
		for val in ["", "a", "alice", "a\0b", "\0", "héllo", "日本語"] {
			let enc = string(val);
			let (dec, rest) = take_str(&enc).unwrap();
			assert_eq!(dec, val);
			assert!(rest.is_empty());
		}
	}

	#[test]
	fn int_order_matches_value_order() {
		let vals = [
			i64::MIN,
			i64::MIN + 1,
			-65536,
			-256,
			-255,
			-1,
			0,
			1,
			255,
			256,
			65535,
			65536,
			i64::MAX,
		];
		let encs: Vec<_> = vals.iter().map(|&v| int(v)).collect();
		for pair in encs.windows(2) {
			assert!(pair[0] < pair[1], "{:?} should sort below {:?}", pair[0], pair[1]);
		}
	}

	#[test]
	fn string_order_matches_byte_order() {
		let vals = ["", "a", "a\0", "a\x01", "ab", "b"];
		let encs: Vec<_> = vals.iter().map(|v| string(v)).collect();
		for pair in encs.windows(2) {
			assert!(pair[0] < pair[1], "{:?} should sort below {:?}", pair[0], pair[1]);
		}
	}

	#[test]
	fn mixed_sequence_decodes_in_order() {
		let mut key = Vec::new();
		append_str(&mut key, "store");
		append_str(&mut key, "idx");
		append_i64(&mut key, 42);
		append_i64(&mut key, -7);
		let (a, rest) = take_str(&key).unwrap();
		let (b, rest) = take_str(rest).unwrap();
		let (c, rest) = take_i64(rest).unwrap();
		let (d, rest) = take_i64(rest).unwrap();
		assert_eq!((a.as_str(), b.as_str(), c, d), ("store", "idx", 42, -7));
		assert!(rest.is_empty());
	}

	#[test]
	fn corrupt_elements_are_rejected() {
		assert!(take_i64(b"").is_err());
		assert!(take_i64(b"\x16\x01").is_err());
		assert!(take_i64(b"\x02abc\x00").is_err());
		assert!(take_str(b"\x02abc").is_err());
		assert!(take_str(b"\x15\x01").is_err());
		// A full 8-byte positive payload above i64::MAX cannot round-trip
		assert!(take_i64(b"\x1c\xff\xff\xff\xff\xff\xff\xff\xff").is_err());
	}
}
