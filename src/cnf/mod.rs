use once_cell::sync::Lazy;

/// Specifies how many times a public operation is re-run after a retriable
/// transaction error before it fails with
/// [`crate::err::Error::TxRetryLimitExceeded`].
pub static TRANSACTION_RETRY_LIMIT: Lazy<u32> =
	lazy_env_parse!("TRIPLEDB_TRANSACTION_RETRY_LIMIT", u32, 100);

/// Specifies how many triples are written per transaction when batch
/// inserting, keeping each transaction inside the payload and time budgets
/// of the underlying key-value store.
pub static INSERT_BATCH_SIZE: Lazy<usize> =
	lazy_env_parse!("TRIPLEDB_INSERT_BATCH_SIZE", usize, 1_000);

/// Specifies how many index keys are fetched per request when streaming a
/// range scan.
pub static SCAN_BATCH_SIZE: Lazy<u32> = lazy_env_parse!("TRIPLEDB_SCAN_BATCH_SIZE", u32, 1_000);
