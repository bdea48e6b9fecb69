//! The module defining the key value store.
//!
//! The [`Datastore`] owns one of the compiled storage engines and exposes
//! the public triple operations; every operation runs inside a single
//! [`Transactor`], which dispatches the low-level reads and writes to the
//! engine. These engines are available:
//! - `mem`: [echodb](https://github.com/surrealdb/echodb) an embedded, in-memory, transactional database
//! - `fdb`: [FoundationDB](https://github.com/apple/foundationdb/) a distributed database designed to handle large volumes of structured data across clusters of commodity servers
mod api;
mod ds;
mod fdb;
mod mem;
pub(crate) mod stash;
mod tr;

#[cfg(test)]
mod tests;

pub use self::ds::*;
pub use self::tr::*;

/// The key part of a key-value pair. An alias for [`Vec<u8>`].
pub type Key = Vec<u8>;

/// The value part of a key-value pair. An alias for [`Vec<u8>`].
pub type Val = Vec<u8>;
