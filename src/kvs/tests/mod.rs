#![cfg(feature = "kv-mem")]

#[cfg(feature = "kv-mem")]
mod mem {

	use futures::TryStreamExt;

	use crate::err::Error;
	use crate::kvs::Datastore;
	use crate::kvs::LockType::*;
	use crate::kvs::TransactionType::*;
	use crate::rdf::Triple;

	async fn new_ds() -> Datastore {
		Datastore::new("memory", "test").await.unwrap()
	}

	async fn collect(stream: crate::Triples) -> Vec<Triple> {
		stream.try_collect().await.unwrap()
	}

	include!("raw.rs");
	include!("store.rs");
	include!("dict.rs");
	include!("query.rs");
}
