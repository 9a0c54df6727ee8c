use mongodb::{
	Client, Cursor, Database,
	bson::{Document, doc},
	options::{ClientOptions, FindOptions},
};

use crate::{BoxFuture, Result, SessionStore};

/// [`SessionStore`] backed by a MongoDB database.
pub struct MongoSessionStore {
	db: Database,
}
impl MongoSessionStore {
	/// Connecting is the one fatal step of a lookup's lifecycle: without a
	/// parseable connection target nothing downstream can proceed.
	pub async fn connect(cfg: &loupe_config::Mongo) -> Result<Self> {
		let options = ClientOptions::parse(&cfg.uri).await?;
		let client = Client::with_options(options)?;

		Ok(Self { db: client.database(&cfg.database) })
	}

	async fn collect(mut cursor: Cursor<Document>) -> Result<Vec<Document>> {
		let mut documents = Vec::new();

		while cursor.advance().await? {
			documents.push(cursor.deserialize_current()?);
		}

		Ok(documents)
	}
}

impl SessionStore for MongoSessionStore {
	fn collection_names(&self) -> BoxFuture<'_, Result<Vec<String>>> {
		Box::pin(async move { Ok(self.db.list_collection_names().await?) })
	}

	fn find_matching<'a>(
		&'a self,
		collection: &'a str,
		filter: Document,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move {
			let cursor = self.db.collection::<Document>(collection).find(filter).await?;

			Self::collect(cursor).await
		})
	}

	fn scan_documents<'a>(
		&'a self,
		collection: &'a str,
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move {
			let options = FindOptions::builder().limit(limit as i64).build();
			let cursor = self
				.db
				.collection::<Document>(collection)
				.find(doc! {})
				.with_options(options)
				.await?;

			Self::collect(cursor).await
		})
	}

	fn sample_documents<'a>(
		&'a self,
		collection: &'a str,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move {
			let cursor = self.db.collection::<Document>(collection).find(doc! {}).await?;

			Self::collect(cursor).await
		})
	}

	fn estimated_count<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			Ok(self.db.collection::<Document>(collection).estimated_document_count().await?)
		})
	}

	fn ping(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			self.db.run_command(doc! { "ping": 1 }).await?;

			Ok(())
		})
	}
}
