//! An RDF triple store layered on ordered transactional key-value storage.
//!
//! tripledb maps (subject, predicate, object) URI triples onto four covering
//! indexes of lexicographically ordered byte keys, interning every URI into a
//! fixed-width 64-bit ID through a bidirectional dictionary. Every public
//! operation runs as a single key-value transaction, retried automatically on
//! transient conflicts, so concurrent writers never observe partial state.
//!
//! ```rust,no_run
//! use futures::TryStreamExt;
//! use tripledb::{Datastore, Triple};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tripledb::Error> {
//!     let db = Datastore::new("memory", "demo").await?;
//!     db.insert(&Triple::new("alice", "knows", "bob")).await?;
//!     assert_eq!(db.count().await?, 1);
//!     let mut results = db.query(Some("alice"), None, None).await?;
//!     while let Some(triple) = results.try_next().await? {
//!         println!("{triple}");
//!     }
//!     Ok(())
//! }
//! ```

#[macro_use]
extern crate tracing;

#[macro_use]
mod mac;

mod dbs;

#[doc(hidden)]
pub mod cnf;
pub mod err;
#[doc(hidden)]
pub mod key;
pub mod kvs;
pub mod rdf;
#[doc(hidden)]
pub mod tup;

pub use self::dbs::stream::Triples;
pub use self::err::Error;
pub use self::kvs::Datastore;
pub use self::rdf::Triple;
