//! Store logic layered over the key value transactions.
pub(crate) mod dict;
pub(crate) mod index;
pub(crate) mod plan;
pub mod stream;
