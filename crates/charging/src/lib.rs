use std::error::Error;

pub mod client;
pub mod database;
pub mod enrich;
pub mod filter;

#[derive(Debug)]
pub enum RequestError {
    NotFound,
    /// The item to create already exists.
    Conflict,
    Other(Box<dyn Error + Send + Sync>),
}

impl RequestError {
    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound,
            database::DatabaseError::Conflict => Self::Conflict,
            database::DatabaseError::Other(why) => Self::Other(why),
        }
    }
}

pub type RequestResult<O> = Result<O, RequestError>;

/// Turns a not-found result into `None`, leaving other errors untouched.
/// Used where a missing record is acceptable, e.g. an unknown vehicle id on
/// a nearby query.
pub fn not_found_to_none<O>(result: RequestResult<O>) -> RequestResult<Option<O>> {
    if let Err(RequestError::NotFound) = result {
        Ok(None)
    } else {
        result.map(Some)
    }
}
