//! In-memory [`SessionStore`] double. Collections keep insertion order, the
//! filter evaluator understands the equality/`$or` shape the query builder
//! emits (including dotted paths), and every surface has a failure switch so
//! isolation behavior can be exercised without a running database.

use std::{
	collections::HashSet,
	sync::atomic::{AtomicU64, Ordering},
};

use mongodb::bson::{Bson, Document};

use loupe_store::{BoxFuture, Error, Result, SessionStore};

#[derive(Default)]
pub struct MemoryStore {
	collections: Vec<(String, Vec<Document>)>,
	fail_listing: bool,
	fail_ping: bool,
	fail_find: HashSet<String>,
	fail_scan: HashSet<String>,
	scan_calls: AtomicU64,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_collection(mut self, name: &str, documents: Vec<Document>) -> Self {
		self.collections.push((name.to_string(), documents));

		self
	}

	pub fn failing_listing(mut self) -> Self {
		self.fail_listing = true;

		self
	}

	pub fn failing_ping(mut self) -> Self {
		self.fail_ping = true;

		self
	}

	pub fn failing_find(mut self, collection: &str) -> Self {
		self.fail_find.insert(collection.to_string());

		self
	}

	pub fn failing_scan(mut self, collection: &str) -> Self {
		self.fail_scan.insert(collection.to_string());

		self
	}

	pub fn scan_calls(&self) -> u64 {
		self.scan_calls.load(Ordering::SeqCst)
	}

	fn documents(&self, collection: &str) -> Vec<Document> {
		self.collections
			.iter()
			.find(|(name, _)| name == collection)
			.map(|(_, documents)| documents.clone())
			.unwrap_or_default()
	}

	fn unavailable(what: &str, collection: &str) -> Error {
		Error::Unavailable { message: format!("{what} unavailable for {collection}.") }
	}
}

impl SessionStore for MemoryStore {
	fn collection_names(&self) -> BoxFuture<'_, Result<Vec<String>>> {
		Box::pin(async move {
			if self.fail_listing {
				return Err(Error::Unavailable { message: "Listing unavailable.".to_string() });
			}

			Ok(self.collections.iter().map(|(name, _)| name.clone()).collect())
		})
	}

	fn find_matching<'a>(
		&'a self,
		collection: &'a str,
		filter: Document,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move {
			if self.fail_find.contains(collection) {
				return Err(Self::unavailable("Query", collection));
			}

			Ok(self
				.documents(collection)
				.into_iter()
				.filter(|document| matches_filter(document, &filter))
				.collect())
		})
	}

	fn scan_documents<'a>(
		&'a self,
		collection: &'a str,
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move {
			self.scan_calls.fetch_add(1, Ordering::SeqCst);

			if self.fail_scan.contains(collection) {
				return Err(Self::unavailable("Scan", collection));
			}

			Ok(self.documents(collection).into_iter().take(limit as usize).collect())
		})
	}

	fn sample_documents<'a>(
		&'a self,
		collection: &'a str,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move { Ok(self.documents(collection)) })
	}

	fn estimated_count<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move { Ok(self.documents(collection).len() as u64) })
	}

	fn ping(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			if self.fail_ping {
				return Err(Error::Unavailable { message: "Ping unavailable.".to_string() });
			}

			Ok(())
		})
	}
}

fn matches_filter(document: &Document, filter: &Document) -> bool {
	filter.iter().all(|(key, expected)| match (key.as_str(), expected) {
		("$or", Bson::Array(clauses)) => clauses.iter().any(|clause| match clause {
			Bson::Document(clause) => matches_filter(document, clause),
			_ => false,
		}),
		(path, expected) => lookup_path(document, path) == Some(expected),
	})
}

fn lookup_path<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
	let mut current = document;
	let mut segments = path.split('.').peekable();

	while let Some(segment) = segments.next() {
		let value = current.get(segment)?;

		if segments.peek().is_none() {
			return Some(value);
		}

		current = value.as_document()?;
	}

	None
}

#[cfg(test)]
mod tests {
	use mongodb::bson::doc;

	use super::*;

	#[test]
	fn equality_and_or_filters_match_like_the_query_builder_expects() {
		let document = doc! { "sessionId": "s-1", "metadata": { "id": "m-1" } };

		assert!(matches_filter(&document, &doc! { "sessionId": "s-1" }));
		assert!(matches_filter(&document, &doc! { "metadata.id": "m-1" }));
		assert!(matches_filter(
			&document,
			&doc! { "$or": [{ "sessionId": "other" }, { "metadata.id": "m-1" }] },
		));
		assert!(!matches_filter(&document, &doc! { "sessionId": "other" }));
	}
}
