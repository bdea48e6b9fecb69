//! Index selection for query patterns.

use crate::key::index::IndexTag;

/// A scan plan: the chosen covering index, the bound leading IDs in that
/// index's key order, and an optional object post-filter.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct Plan {
	pub tag: IndexTag,
	pub prefix: Vec<i64>,
	pub filter: Option<i64>,
}

/// Choose the covering index for a pattern of bound component IDs.
///
/// Every pattern maps onto a pure prefix scan of one index, except
/// (s, ·, o) which scans the subject prefix of SPO and filters on the
/// object; that pattern is rare enough not to justify a fifth index.
pub(crate) fn plan(s: Option<i64>, p: Option<i64>, o: Option<i64>) -> Plan {
	match (s, p, o) {
		(Some(s), Some(p), Some(o)) => Plan {
			tag: IndexTag::Spo,
			prefix: vec![s, p, o],
			filter: None,
		},
		(Some(s), Some(p), None) => Plan {
			tag: IndexTag::Spo,
			prefix: vec![s, p],
			filter: None,
		},
		(Some(s), None, Some(o)) => Plan {
			tag: IndexTag::Spo,
			prefix: vec![s],
			filter: Some(o),
		},
		(Some(s), None, None) => Plan {
			tag: IndexTag::Spo,
			prefix: vec![s],
			filter: None,
		},
		(None, Some(p), Some(o)) => Plan {
			tag: IndexTag::Pos,
			prefix: vec![p, o],
			filter: None,
		},
		(None, Some(p), None) => Plan {
			tag: IndexTag::Pso,
			prefix: vec![p],
			filter: None,
		},
		(None, None, Some(o)) => Plan {
			tag: IndexTag::Osp,
			prefix: vec![o],
			filter: None,
		},
		(None, None, None) => Plan {
			tag: IndexTag::Spo,
			prefix: vec![],
			filter: None,
		},
	}
}
