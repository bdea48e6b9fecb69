use thiserror::Error;

/// The error type for every fallible operation in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// There was a problem setting up the underlying datastore
	#[error("Couldn't setup connection to underlying datastore: {0}")]
	Ds(String),

	/// There was a problem with a datastore transaction
	#[error("There was a problem with a datastore transaction: {0}")]
	Tx(String),

	/// The transaction was already committed or cancelled
	#[error("Couldn't update a finished transaction")]
	TxFinished,

	/// The current transaction was created as read-only
	#[error("Couldn't write to a read only transaction")]
	TxReadonly,

	/// The underlying transaction hit a transient conflict. This variant is
	/// consumed by the retry envelope and never surfaces to callers.
	#[error("Failed to commit this transaction due to a retriable error: {0}")]
	TxRetryable(String),

	/// The transaction retry budget was exhausted
	#[error("Failed to commit this transaction within the retry limit")]
	TxRetryLimitExceeded,

	/// The transaction exceeded the wall-clock budget of the key-value store
	#[error("The transaction exceeded the allowed time budget")]
	TxTooLong,

	/// The transaction exceeded the payload ceiling of the key-value store
	#[error("The transaction exceeded the allowed payload size")]
	TxTooLarge,

	/// A subject, predicate, or object was passed in as an empty string
	#[error("URIs cannot be empty")]
	InvalidUri,

	/// An index entry referenced an ID which has no dictionary entry
	#[error("The ID {0} has no URI entry in the dictionary")]
	DanglingId(u64),

	/// An index key could not be decoded back into a triple
	#[error("Couldn't decode the index key `{0}`")]
	CorruptKey(String),

	/// A non-retriable error was returned by the key-value store
	#[error("The underlying key-value store errored: {0}")]
	Kv(String),

	/// An internal invariant was violated
	#[error("Internal invariant violated: {0}")]
	Internal(String),
}

impl Error {
	/// Whether the retry envelope may run the failed operation again.
	pub(crate) fn is_retryable(&self) -> bool {
		matches!(self, Error::TxRetryable(_))
	}
}

#[cfg(feature = "kv-mem")]
impl From<echodb::err::Error> for Error {
	fn from(e: echodb::err::Error) -> Error {
		Error::Tx(e.to_string())
	}
}

#[cfg(feature = "kv-fdb")]
impl From<foundationdb::FdbError> for Error {
	fn from(e: foundationdb::FdbError) -> Error {
		match e.code() {
			// transaction_timed_out
			1031 => Error::TxTooLong,
			// transaction_too_large
			2101 => Error::TxTooLarge,
			_ if e.is_retryable() => Error::TxRetryable(e.to_string()),
			_ => Error::Kv(e.to_string()),
		}
	}
}

#[cfg(feature = "kv-fdb")]
impl From<foundationdb::TransactionCommitError> for Error {
	fn from(e: foundationdb::TransactionCommitError) -> Error {
		Error::from(*e)
	}
}
