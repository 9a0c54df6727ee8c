pub mod candidate;
pub mod engine;
pub mod models;
pub mod mongo;
pub mod query;
pub mod scan;

mod error;

pub use error::Error;

use std::{future::Future, pin::Pin};

use mongodb::bson::Document;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read-only document-store surface the lookup engine drives. The seam
/// exists so tests can run the engine against an in-memory double.
pub trait SessionStore
where
	Self: Send + Sync,
{
	fn collection_names(&self) -> BoxFuture<'_, Result<Vec<String>>>;

	/// Structured equality/`$or` query against one collection.
	fn find_matching<'a>(
		&'a self,
		collection: &'a str,
		filter: Document,
	) -> BoxFuture<'a, Result<Vec<Document>>>;

	/// Unindexed read of up to `limit` documents, in natural order.
	fn scan_documents<'a>(
		&'a self,
		collection: &'a str,
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<Document>>>;

	/// Full read of a collection, used only for zero-match diagnostics.
	fn sample_documents<'a>(&'a self, collection: &'a str)
	-> BoxFuture<'a, Result<Vec<Document>>>;

	fn estimated_count<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<u64>>;

	fn ping(&self) -> BoxFuture<'_, Result<()>>;
}
