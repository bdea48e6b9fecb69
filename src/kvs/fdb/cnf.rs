use once_cell::sync::Lazy;

/// The maximum wall-clock time a single transaction may run, in
/// milliseconds, before failing with a timeout.
pub static FOUNDATIONDB_TRANSACTION_TIMEOUT: Lazy<i32> =
	lazy_env_parse!("TRIPLEDB_FOUNDATIONDB_TRANSACTION_TIMEOUT", i32, 5_000);

/// The number of times the client itself retries a transaction before the
/// error reaches the retry envelope.
pub static FOUNDATIONDB_TRANSACTION_RETRY_LIMIT: Lazy<i32> =
	lazy_env_parse!("TRIPLEDB_FOUNDATIONDB_TRANSACTION_RETRY_LIMIT", i32, 5);

/// The maximum client-side backoff between retries, in milliseconds.
pub static FOUNDATIONDB_TRANSACTION_MAX_RETRY_DELAY: Lazy<i32> =
	lazy_env_parse!("TRIPLEDB_FOUNDATIONDB_TRANSACTION_MAX_RETRY_DELAY", i32, 500);
