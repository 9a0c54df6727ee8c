#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Mongo(#[from] Box<mongodb::error::Error>),
	#[error("{message}")]
	Unavailable { message: String },
}
impl From<mongodb::error::Error> for Error {
	fn from(err: mongodb::error::Error) -> Self {
		Self::Mongo(Box::new(err))
	}
}
