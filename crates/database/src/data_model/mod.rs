use std::fmt::Debug;

use model::WithId;
use serde::Serialize;
use utility::id::{HasId, Id};

pub mod amenities;
pub mod connector;
pub mod pricing;
pub mod report;
pub mod review;
pub mod station;
pub mod user_vehicle;
pub mod vehicle;

pub type Result<O> = core::result::Result<O, sqlx::Error>;

/// Conversion from a fetched row to its domain model. Fallible because enum
/// columns are stored as their wire names.
pub trait DatabaseRow {
    type Model: Serialize + HasId;

    fn get_id(&self) -> Id<Self::Model>;
    fn to_model(self) -> Result<Self::Model>;
}

pub fn with_ids<R: DatabaseRow>(rows: Vec<R>) -> Result<Vec<WithId<R::Model>>>
where
    <R::Model as HasId>::IdType: Debug + Clone + Serialize,
{
    rows.into_iter().map(|row| with_id(row)).collect()
}

pub fn with_id<R: DatabaseRow>(row: R) -> Result<WithId<R::Model>>
where
    <R::Model as HasId>::IdType: Debug + Clone + Serialize,
{
    let id = row.get_id();
    Ok(WithId::new(id, row.to_model()?))
}

/// An unknown wire value in an enum column.
pub(crate) fn decode_error(column: &str, value: &str) -> sqlx::Error {
    sqlx::Error::Decode(format!("unknown {column} value '{value}'").into())
}
