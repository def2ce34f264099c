use std::{error, future::Future, result};

use async_trait::async_trait;
use model::{
    amenities::StationAmenities,
    connector::StationConnector,
    pricing::StationPricing,
    report::{ReportType, StationReport},
    review::{ReviewRating, StationReview},
    station::Station,
    vehicle::{UserVehicle, Vehicle, VehicleType},
    WithDistance, WithId,
};
use utility::id::Id;

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    /// A uniqueness constraint rejected the write.
    Conflict,
    Other(Box<dyn error::Error + Send + Sync>),
}

pub type Result<T> = result::Result<T, DatabaseError>;

/// Station reads. `find_nearby` is the candidate source: it must return
/// stations ordered ascending by distance, capped at `limit`, with the
/// distance already computed. The `*_for` bulk lookups take a station id set
/// and return every matching row without further filtering.
#[async_trait]
pub trait StationRepo {
    async fn find_nearby(
        &mut self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        limit: u32,
    ) -> Result<Vec<WithDistance<WithId<Station>>>>;

    async fn station(&mut self, id: Id<Station>) -> Result<WithId<Station>>;

    async fn stations_by_city(&mut self, city: &str) -> Result<Vec<WithId<Station>>>;

    async fn connectors_for(
        &mut self,
        station_ids: &[Id<Station>],
    ) -> Result<Vec<WithId<StationConnector>>>;

    async fn pricing_for(
        &mut self,
        station_ids: &[Id<Station>],
    ) -> Result<Vec<WithId<StationPricing>>>;

    async fn amenities_for(
        &mut self,
        station_ids: &[Id<Station>],
    ) -> Result<Vec<StationAmenities>>;

    async fn review_ratings_for(
        &mut self,
        station_ids: &[Id<Station>],
    ) -> Result<Vec<ReviewRating>>;
}

#[async_trait]
pub trait VehicleRepo {
    /// The whole catalog, ordered by brand then model.
    async fn vehicles(&mut self) -> Result<Vec<WithId<Vehicle>>>;

    async fn vehicle(&mut self, id: Id<Vehicle>) -> Result<WithId<Vehicle>>;

    async fn vehicles_by_type(
        &mut self,
        vehicle_type: VehicleType,
    ) -> Result<Vec<WithId<Vehicle>>>;
}

#[async_trait]
pub trait ReviewRepo {
    /// All reviews of a station, newest first.
    async fn reviews_for_station(
        &mut self,
        station_id: &Id<Station>,
    ) -> Result<Vec<WithId<StationReview>>>;

    async fn insert_review(
        &mut self,
        station_id: &Id<Station>,
        user_id: &str,
        rating: u8,
        comment: Option<String>,
    ) -> Result<WithId<StationReview>>;
}

#[async_trait]
pub trait ReportRepo {
    async fn insert_report(
        &mut self,
        station_id: &Id<Station>,
        user_id: &str,
        report_type: ReportType,
        value: Option<String>,
    ) -> Result<WithId<StationReport>>;
}

#[async_trait]
pub trait UserVehicleRepo {
    /// The user's garage, default vehicle first, then newest first.
    async fn user_vehicles(&mut self, user_id: &str)
        -> Result<Vec<WithId<UserVehicle>>>;

    async fn insert_user_vehicle(
        &mut self,
        user_id: &str,
        vehicle_id: &Id<Vehicle>,
        nickname: Option<String>,
        is_default: bool,
    ) -> Result<WithId<UserVehicle>>;

    async fn update_user_vehicle(
        &mut self,
        id: &Id<UserVehicle>,
        user_id: &str,
        nickname: Option<String>,
        is_default: Option<bool>,
    ) -> Result<WithId<UserVehicle>>;

    async fn delete_user_vehicle(
        &mut self,
        id: &Id<UserVehicle>,
        user_id: &str,
    ) -> Result<()>;

    /// Unsets `is_default` on every garage entry of the user.
    async fn clear_default_vehicle(&mut self, user_id: &str) -> Result<()>;
}

pub trait DatabaseOperations:
    StationRepo + VehicleRepo + ReviewRepo + ReportRepo + UserVehicleRepo
{
}

#[async_trait]
pub trait DatabaseTransaction: DatabaseOperations {
    async fn commit(self) -> Result<()>;
}

pub trait DatabaseAutocommit: DatabaseOperations {}

/// Trait to implement a station database. Multiple concurrent accesses should
/// be possible by e.g. cloning the database object.
#[async_trait]
pub trait Database: Clone + Send + Sync + Sized {
    type Transaction: DatabaseTransaction + Send;
    type Autocommit: DatabaseAutocommit + Send;

    fn auto(&self) -> Self::Autocommit;

    async fn transaction(&self) -> Result<Self::Transaction>;

    async fn perform_transaction<T, F, Fut>(&self, action: F) -> Result<T>
    where
        T: Send,
        F: Send + FnOnce(&mut Self::Transaction) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send;
}
