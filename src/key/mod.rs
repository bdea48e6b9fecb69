//! How the keys are structured in the key value store
///
/// crate::key::dict::u2i            (root, "dict", "u2i", uri)          -> 8-byte little-endian ID
/// crate::key::dict::i2u            (root, "dict", "i2u", id)           -> UTF-8 bytes of the URI
/// crate::key::dict::cnt            (root, "dict", "cnt")               -> 8-byte little-endian ID counter
/// crate::key::index                (root, "idx", tag, k1, k2, k3)      -> empty
/// crate::key::meta::cnt            (root, "meta", "cnt")               -> 8-byte little-endian triple count
///
/// `tag` is one of "spo", "pso", "pos", "osp" and `(k1, k2, k3)` is the
/// matching permutation of the triple's (subject, predicate, object) IDs.
/// All elements are packed with the tuple encoding in [`crate::tup`], so the
/// byte order of keys equals the lexicographic order of their tuples.
pub mod debug;
pub mod dict;
pub mod index;
pub mod meta;
