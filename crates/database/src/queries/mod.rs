use charging::database::DatabaseError;

pub mod amenities;
pub mod connector;
pub mod pricing;
pub mod report;
pub mod review;
pub mod station;
pub mod user_vehicle;
pub mod vehicle;

pub(crate) fn convert_error(why: sqlx::Error) -> DatabaseError {
    match why {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DatabaseError::Conflict
        }
        _ => DatabaseError::Other(Box::new(why)),
    }
}
