#[tokio::test]
async fn ids_allocate_monotonically() {
	let ds = new_ds().await;
	ds.insert(&Triple::new("alice", "knows", "bob")).await.unwrap();
	ds.insert(&Triple::new("charlie", "knows", "dave")).await.unwrap();
	// URIs intern in first-encounter order: subject, predicate, object
	let mut tx = ds.transaction(Read, Optimistic).await.unwrap();
	let mut ids = vec![];
	for uri in ["alice", "knows", "bob", "charlie", "dave"] {
		let val = tx
			.get(crate::key::dict::U2i::new("test", uri).encode())
			.await
			.unwrap()
			.unwrap();
		ids.push(u64::from_le_bytes(val.try_into().unwrap()));
	}
	tx.cancel().await.unwrap();
	assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn dictionary_is_symmetric() {
	let ds = new_ds().await;
	ds.insert(&Triple::new("alice", "knows", "bob")).await.unwrap();
	// Every u2i entry has the matching i2u entry
	let mut tx = ds.transaction(Read, Optimistic).await.unwrap();
	for uri in ["alice", "knows", "bob"] {
		let id = tx
			.get(crate::key::dict::U2i::new("test", uri).encode())
			.await
			.unwrap()
			.unwrap();
		let id = u64::from_le_bytes(id.try_into().unwrap());
		let back = tx
			.get(crate::key::dict::I2u::new("test", id as i64).encode())
			.await
			.unwrap()
			.unwrap();
		assert_eq!(back, uri.as_bytes());
	}
	tx.cancel().await.unwrap();
}

#[tokio::test]
async fn interning_is_stable_across_operations() {
	let ds = new_ds().await;
	ds.insert(&Triple::new("alice", "knows", "bob")).await.unwrap();
	ds.delete(&Triple::new("alice", "knows", "bob")).await.unwrap();
	ds.insert(&Triple::new("alice", "knows", "bob")).await.unwrap();
	// Dictionary entries persist through deletion, so re-inserting the
	// same URIs allocates nothing new
	let mut tx = ds.transaction(Read, Optimistic).await.unwrap();
	let cnt = tx.get(crate::key::dict::Cnt::new("test").encode()).await.unwrap().unwrap();
	tx.cancel().await.unwrap();
	assert_eq!(u64::from_le_bytes(cnt.try_into().unwrap()), 3);
}

#[tokio::test]
async fn indexes_cover_uniformly() {
	let ds = new_ds().await;
	ds.insert(&Triple::new("alice", "knows", "bob")).await.unwrap();
	ds.insert(&Triple::new("alice", "knows", "charlie")).await.unwrap();
	ds.insert(&Triple::new("bob", "knows", "alice")).await.unwrap();
	ds.delete(&Triple::new("alice", "knows", "charlie")).await.unwrap();
	// All four indexes agree on the set of logical triples
	let mut tx = ds.transaction(Read, Optimistic).await.unwrap();
	let mut sets = vec![];
	for tag in crate::key::index::IndexTag::ALL {
		let rng = crate::key::index::range("test", tag, &[]);
		let keys = tx.keys(rng, 1_000).await.unwrap();
		let mut triples: Vec<(i64, i64, i64)> = keys
			.iter()
			.map(|k| crate::key::index::Entry::decode("test", tag, k).unwrap())
			.collect();
		triples.sort();
		sets.push(triples);
	}
	tx.cancel().await.unwrap();
	assert!(sets.windows(2).all(|pair| pair[0] == pair[1]));
	// The counter agrees with the index cardinality
	assert_eq!(sets[0].len() as u64, ds.count().await.unwrap());
}
