#[tokio::test]
async fn initialise() {
	let ds = new_ds().await;
	let mut tx = ds.transaction(Write, Optimistic).await.unwrap();
	assert!(tx.set("test", "ok").await.is_ok());
	tx.commit().await.unwrap();
}

#[tokio::test]
async fn exists() {
	// Create a new datastore
	let ds = new_ds().await;
	// Create a writeable transaction
	let mut tx = ds.transaction(Write, Optimistic).await.unwrap();
	assert!(tx.set("test", "ok").await.is_ok());
	tx.commit().await.unwrap();
	// Create a readonly transaction
	let mut tx = ds.transaction(Read, Optimistic).await.unwrap();
	let val = tx.exists("test").await.unwrap();
	assert!(val);
	let val = tx.exists("none").await.unwrap();
	assert!(!val);
	tx.cancel().await.unwrap();
}

#[tokio::test]
async fn get() {
	// Create a new datastore
	let ds = new_ds().await;
	// Create a writeable transaction
	let mut tx = ds.transaction(Write, Optimistic).await.unwrap();
	assert!(tx.set("test", "ok").await.is_ok());
	tx.commit().await.unwrap();
	// Create a readonly transaction
	let mut tx = ds.transaction(Read, Optimistic).await.unwrap();
	let val = tx.get("test").await.unwrap();
	assert!(matches!(val.as_deref(), Some(b"ok")));
	let val = tx.get("none").await.unwrap();
	assert!(val.as_deref().is_none());
	tx.cancel().await.unwrap();
}

#[tokio::test]
async fn set() {
	// Create a new datastore
	let ds = new_ds().await;
	// Create a writeable transaction
	let mut tx = ds.transaction(Write, Optimistic).await.unwrap();
	assert!(tx.set("test", "one").await.is_ok());
	tx.commit().await.unwrap();
	// Create a readonly transaction
	let mut tx = ds.transaction(Read, Optimistic).await.unwrap();
	let val = tx.get("test").await.unwrap();
	assert!(matches!(val.as_deref(), Some(b"one")));
	tx.cancel().await.unwrap();
	// Create a writeable transaction
	let mut tx = ds.transaction(Write, Optimistic).await.unwrap();
	assert!(tx.set("test", "two").await.is_ok());
	tx.commit().await.unwrap();
	// Create a readonly transaction
	let mut tx = ds.transaction(Read, Optimistic).await.unwrap();
	let val = tx.get("test").await.unwrap();
	assert!(matches!(val.as_deref(), Some(b"two")));
	tx.cancel().await.unwrap();
}

#[tokio::test]
async fn del() {
	// Create a new datastore
	let ds = new_ds().await;
	// Create a writeable transaction
	let mut tx = ds.transaction(Write, Optimistic).await.unwrap();
	assert!(tx.set("test", "ok").await.is_ok());
	tx.commit().await.unwrap();
	// Create a writeable transaction
	let mut tx = ds.transaction(Write, Optimistic).await.unwrap();
	assert!(tx.del("test").await.is_ok());
	tx.commit().await.unwrap();
	// Create a readonly transaction
	let mut tx = ds.transaction(Read, Optimistic).await.unwrap();
	let val = tx.get("test").await.unwrap();
	assert!(val.as_deref().is_none());
	tx.cancel().await.unwrap();
}

#[tokio::test]
async fn add() {
	// Create a new datastore
	let ds = new_ds().await;
	// Increment a missing key twice within one transaction
	let mut tx = ds.transaction(Write, Optimistic).await.unwrap();
	tx.add("cnt", 1).await.unwrap();
	tx.add("cnt", 1).await.unwrap();
	// The post-increment value is observable before the commit
	let val = tx.get("cnt").await.unwrap().unwrap();
	assert_eq!(val, 2i64.to_le_bytes().to_vec());
	tx.commit().await.unwrap();
	// A negative operand decrements
	let mut tx = ds.transaction(Write, Optimistic).await.unwrap();
	tx.add("cnt", -1).await.unwrap();
	tx.commit().await.unwrap();
	// Create a readonly transaction
	let mut tx = ds.transaction(Read, Optimistic).await.unwrap();
	let val = tx.get("cnt").await.unwrap().unwrap();
	assert_eq!(val, 1i64.to_le_bytes().to_vec());
	tx.cancel().await.unwrap();
}

#[tokio::test]
async fn keys_and_scan() {
	// Create a new datastore
	let ds = new_ds().await;
	// Create a writeable transaction
	let mut tx = ds.transaction(Write, Optimistic).await.unwrap();
	tx.set("k1", "v1").await.unwrap();
	tx.set("k2", "v2").await.unwrap();
	tx.set("k3", "v3").await.unwrap();
	tx.set("x1", "v4").await.unwrap();
	tx.commit().await.unwrap();
	// Create a readonly transaction
	let mut tx = ds.transaction(Read, Optimistic).await.unwrap();
	// Keys come back in order, without values
	let keys = tx.keys("k".."l", 100).await.unwrap();
	assert_eq!(keys, vec![b"k1".to_vec(), b"k2".to_vec(), b"k3".to_vec()]);
	// The limit bounds the number of results
	let keys = tx.keys("k".."l", 2).await.unwrap();
	assert_eq!(keys, vec![b"k1".to_vec(), b"k2".to_vec()]);
	// A full scan returns the pairs
	let pairs = tx.scan("k".."l", 100).await.unwrap();
	assert_eq!(
		pairs,
		vec![
			(b"k1".to_vec(), b"v1".to_vec()),
			(b"k2".to_vec(), b"v2".to_vec()),
			(b"k3".to_vec(), b"v3".to_vec()),
		]
	);
	tx.cancel().await.unwrap();
}

#[tokio::test]
async fn readonly_transactions_reject_writes() {
	// Create a new datastore
	let ds = new_ds().await;
	// Create a readonly transaction
	let mut tx = ds.transaction(Read, Optimistic).await.unwrap();
	let res = tx.set("test", "ok").await;
	assert!(matches!(res, Err(Error::TxReadonly)));
	let res = tx.del("test").await;
	assert!(matches!(res, Err(Error::TxReadonly)));
	let res = tx.add("test", 1).await;
	assert!(matches!(res, Err(Error::TxReadonly)));
	tx.cancel().await.unwrap();
}

#[tokio::test]
async fn finished_transactions_reject_operations() {
	// Create a new datastore
	let ds = new_ds().await;
	// Create a writeable transaction
	let mut tx = ds.transaction(Write, Optimistic).await.unwrap();
	tx.set("test", "ok").await.unwrap();
	tx.commit().await.unwrap();
	// Any further operation errors
	assert!(matches!(tx.get("test").await, Err(Error::TxFinished)));
	assert!(matches!(tx.commit().await, Err(Error::TxFinished)));
	assert!(matches!(tx.cancel().await, Err(Error::TxFinished)));
}

#[tokio::test]
async fn multireader() {
	// Create a new datastore
	let ds = new_ds().await;
	// Insert an initial key
	let mut tx = ds.transaction(Write, Optimistic).await.unwrap();
	tx.set("test", "some text").await.unwrap();
	tx.commit().await.unwrap();
	// Create three readonly transactions
	let mut tx1 = ds.transaction(Read, Optimistic).await.unwrap();
	let val = tx1.get("test").await.unwrap().unwrap();
	assert_eq!(val, b"some text");
	let mut tx2 = ds.transaction(Read, Optimistic).await.unwrap();
	let val = tx2.get("test").await.unwrap().unwrap();
	assert_eq!(val, b"some text");
	let mut tx3 = ds.transaction(Read, Optimistic).await.unwrap();
	let val = tx3.get("test").await.unwrap().unwrap();
	assert_eq!(val, b"some text");
	tx1.cancel().await.unwrap();
	tx2.cancel().await.unwrap();
	tx3.cancel().await.unwrap();
}
