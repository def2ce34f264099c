use async_trait::async_trait;
use charging::database::{Result, StationRepo};
use chrono::{DateTime, Local};
use model::{
    amenities::StationAmenities,
    connector::StationConnector,
    pricing::StationPricing,
    review::ReviewRating,
    station::{DataSource, Location, Station},
    WithDistance, WithId,
};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::{decode_error, DatabaseRow};
use crate::{
    queries::{amenities, connector, pricing, review, station},
    PgDatabaseAutocommit, PgDatabaseTransaction,
};

#[derive(Debug, Clone, FromRow)]
pub struct StationRow {
    pub id: String,
    pub name: String,
    pub network: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: Option<String>,
    pub is_24x7: bool,
    pub parking_type: Option<String>,
    pub source: String,
    pub trust_level: Option<i16>,
    pub last_verified_at: Option<DateTime<Local>>,
}

impl DatabaseRow for StationRow {
    type Model = Station;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> super::Result<Self::Model> {
        let source = DataSource::from_wire(&self.source)
            .ok_or_else(|| decode_error("source", &self.source))?;
        Ok(Station {
            name: self.name,
            network: self.network,
            location: Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            address: self.address,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            is_24x7: self.is_24x7,
            parking_type: self.parking_type,
            source,
            trust_level: self.trust_level,
            last_verified_at: self.last_verified_at,
        })
    }
}

/// A candidate row from the nearby query, distance already computed.
#[derive(Debug, Clone, FromRow)]
pub struct NearbyStationRow {
    #[sqlx(flatten)]
    pub station: StationRow,
    pub distance_km: f64,
}

#[async_trait]
impl StationRepo for PgDatabaseAutocommit {
    async fn find_nearby(
        &mut self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        limit: u32,
    ) -> Result<Vec<WithDistance<WithId<Station>>>> {
        station::get_nearby(&self.pool, latitude, longitude, radius_km, limit).await
    }

    async fn station(&mut self, id: Id<Station>) -> Result<WithId<Station>> {
        station::get(&self.pool, id).await
    }

    async fn stations_by_city(&mut self, city: &str) -> Result<Vec<WithId<Station>>> {
        station::get_by_city(&self.pool, city).await
    }

    async fn connectors_for(
        &mut self,
        station_ids: &[Id<Station>],
    ) -> Result<Vec<WithId<StationConnector>>> {
        connector::for_stations(&self.pool, station_ids).await
    }

    async fn pricing_for(
        &mut self,
        station_ids: &[Id<Station>],
    ) -> Result<Vec<WithId<StationPricing>>> {
        pricing::for_stations(&self.pool, station_ids).await
    }

    async fn amenities_for(
        &mut self,
        station_ids: &[Id<Station>],
    ) -> Result<Vec<StationAmenities>> {
        amenities::for_stations(&self.pool, station_ids).await
    }

    async fn review_ratings_for(
        &mut self,
        station_ids: &[Id<Station>],
    ) -> Result<Vec<ReviewRating>> {
        review::ratings_for_stations(&self.pool, station_ids).await
    }
}

#[async_trait]
impl<'a> StationRepo for PgDatabaseTransaction<'a> {
    async fn find_nearby(
        &mut self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        limit: u32,
    ) -> Result<Vec<WithDistance<WithId<Station>>>> {
        station::get_nearby(&mut *self.tx, latitude, longitude, radius_km, limit)
            .await
    }

    async fn station(&mut self, id: Id<Station>) -> Result<WithId<Station>> {
        station::get(&mut *self.tx, id).await
    }

    async fn stations_by_city(&mut self, city: &str) -> Result<Vec<WithId<Station>>> {
        station::get_by_city(&mut *self.tx, city).await
    }

    async fn connectors_for(
        &mut self,
        station_ids: &[Id<Station>],
    ) -> Result<Vec<WithId<StationConnector>>> {
        connector::for_stations(&mut *self.tx, station_ids).await
    }

    async fn pricing_for(
        &mut self,
        station_ids: &[Id<Station>],
    ) -> Result<Vec<WithId<StationPricing>>> {
        pricing::for_stations(&mut *self.tx, station_ids).await
    }

    async fn amenities_for(
        &mut self,
        station_ids: &[Id<Station>],
    ) -> Result<Vec<StationAmenities>> {
        amenities::for_stations(&mut *self.tx, station_ids).await
    }

    async fn review_ratings_for(
        &mut self,
        station_ids: &[Id<Station>],
    ) -> Result<Vec<ReviewRating>> {
        review::ratings_for_stations(&mut *self.tx, station_ids).await
    }
}
