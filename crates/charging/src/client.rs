use model::{
    enriched::EnrichedStation,
    report::{ReportType, StationReport},
    review::{ReviewRating, StationReview},
    station::Station,
    vehicle::{UserVehicle, Vehicle, VehicleType},
    WithDistance, WithId,
};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    database::{
        Database, DatabaseTransaction, ReportRepo, ReviewRepo, StationRepo, UserVehicleRepo,
        VehicleRepo,
    },
    enrich::{enrich_station, enrich_stations, RelatedRecords},
    filter::{filter_stations, sort_stations, SortKey, StationFilters},
    not_found_to_none, RequestError, RequestResult,
};

/// A validated nearby-station query. Range checks happen at the transport
/// layer; this struct only carries values already known to be in range.
#[derive(Debug, Clone)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub limit: u32,
    pub vehicle_id: Option<Id<Vehicle>>,
    pub filters: StationFilters,
    pub sort_key: SortKey,
}

#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database + Send + Sync + Sized + 'static,
{
    pub database: D,
}

impl<D> Client<D>
where
    D: Database,
{
    pub fn new(database: D) -> Self {
        Self { database }
    }
}

/// stations
impl<D> Client<D>
where
    D: Database,
{
    /// The full pipeline: candidates, bulk enrichment, filter, sort.
    pub async fn find_nearby_stations(
        &self,
        query: NearbyQuery,
    ) -> RequestResult<Vec<WithDistance<EnrichedStation>>> {
        let candidates = self
            .database
            .auto()
            .find_nearby(query.latitude, query.longitude, query.radius_km, query.limit)
            .await?;
        if candidates.is_empty() {
            return Ok(vec![]);
        }

        let station_ids = candidates
            .iter()
            .map(|candidate| candidate.content.id.clone())
            .collect::<Vec<_>>();

        // The four bulk lookups run concurrently; any failure fails the
        // whole request, partial enrichment is never returned.
        let mut connectors_db = self.database.auto();
        let mut pricing_db = self.database.auto();
        let mut amenities_db = self.database.auto();
        let mut ratings_db = self.database.auto();
        let (connectors, pricing, amenities, review_ratings) = futures::try_join!(
            connectors_db.connectors_for(&station_ids),
            pricing_db.pricing_for(&station_ids),
            amenities_db.amenities_for(&station_ids),
            ratings_db.review_ratings_for(&station_ids),
        )?;

        // An unknown vehicle id degrades to an un-personalized response
        // instead of failing the whole query.
        let vehicle = match &query.vehicle_id {
            Some(id) => {
                let found = self
                    .database
                    .auto()
                    .vehicle(id.clone())
                    .await
                    .map_err(RequestError::from)
                    .let_owned(not_found_to_none)?;
                if found.is_none() {
                    log::warn!("unknown vehicle id '{id}', skipping personalization");
                }
                found.map(|vehicle| vehicle.content)
            }
            None => None,
        };

        let enriched = enrich_stations(
            candidates,
            RelatedRecords {
                connectors,
                pricing,
                amenities,
                review_ratings,
            },
            vehicle.as_ref(),
        );

        let mut stations = filter_stations(enriched, &query.filters);
        sort_stations(&mut stations, query.sort_key, query.radius_km);
        Ok(stations)
    }

    /// The detail view: one station with all related records and its full
    /// review list, no vehicle personalization.
    pub async fn get_station_details(
        &self,
        id: Id<Station>,
    ) -> RequestResult<EnrichedStation> {
        let station = self.database.auto().station(id.clone()).await?;
        let station_ids = [station.id.clone()];

        let mut connectors_db = self.database.auto();
        let mut pricing_db = self.database.auto();
        let mut amenities_db = self.database.auto();
        let mut reviews_db = self.database.auto();
        let (connectors, pricing, amenities, reviews) = futures::try_join!(
            connectors_db.connectors_for(&station_ids),
            pricing_db.pricing_for(&station_ids),
            amenities_db.amenities_for(&station_ids),
            reviews_db.reviews_for_station(&id),
        )?;

        let review_ratings = reviews
            .iter()
            .map(|review| ReviewRating {
                station_id: review.content.station_id.clone(),
                rating: review.content.rating,
            })
            .collect::<Vec<_>>();

        let mut enriched = enrich_station(
            station,
            RelatedRecords {
                connectors,
                pricing,
                amenities,
                review_ratings,
            },
            None,
        );
        enriched.reviews = Some(reviews);
        Ok(enriched)
    }

    pub async fn get_stations_by_city(
        &self,
        city: &str,
    ) -> RequestResult<Vec<WithId<Station>>> {
        self.database
            .auto()
            .stations_by_city(city)
            .await?
            .let_owned(Ok)
    }
}

/// vehicle catalog
impl<D> Client<D>
where
    D: Database,
{
    pub async fn get_vehicles(&self) -> RequestResult<Vec<WithId<Vehicle>>> {
        self.database.auto().vehicles().await?.let_owned(Ok)
    }

    pub async fn get_vehicle(
        &self,
        id: Id<Vehicle>,
    ) -> RequestResult<WithId<Vehicle>> {
        self.database.auto().vehicle(id).await?.let_owned(Ok)
    }

    pub async fn get_vehicles_by_type(
        &self,
        vehicle_type: VehicleType,
    ) -> RequestResult<Vec<WithId<Vehicle>>> {
        self.database
            .auto()
            .vehicles_by_type(vehicle_type)
            .await?
            .let_owned(Ok)
    }
}

/// reviews and crowdsourced reports
impl<D> Client<D>
where
    D: Database,
{
    pub async fn get_station_reviews(
        &self,
        station_id: Id<Station>,
    ) -> RequestResult<Vec<WithId<StationReview>>> {
        let mut database = self.database.auto();
        database.station(station_id.clone()).await?;
        database
            .reviews_for_station(&station_id)
            .await?
            .let_owned(Ok)
    }

    pub async fn push_review(
        &self,
        station_id: Id<Station>,
        user_id: &str,
        rating: u8,
        comment: Option<String>,
    ) -> RequestResult<WithId<StationReview>> {
        let mut database = self.database.auto();
        // unknown station surfaces as not-found, not as a broken insert
        database.station(station_id.clone()).await?;
        database
            .insert_review(&station_id, user_id, rating, comment)
            .await?
            .let_owned(Ok)
    }

    pub async fn push_report(
        &self,
        station_id: Id<Station>,
        user_id: &str,
        report_type: ReportType,
        value: Option<String>,
    ) -> RequestResult<WithId<StationReport>> {
        let mut database = self.database.auto();
        database.station(station_id.clone()).await?;
        database
            .insert_report(&station_id, user_id, report_type, value)
            .await?
            .let_owned(Ok)
    }
}

/// the user's garage
impl<D> Client<D>
where
    D: Database,
{
    pub async fn get_user_vehicles(
        &self,
        user_id: &str,
    ) -> RequestResult<Vec<WithId<UserVehicle>>> {
        self.database
            .auto()
            .user_vehicles(user_id)
            .await?
            .let_owned(Ok)
    }

    /// At most one garage entry per user is the default, so setting the flag
    /// clears it everywhere else within the same transaction.
    pub async fn add_user_vehicle(
        &self,
        user_id: &str,
        vehicle_id: Id<Vehicle>,
        nickname: Option<String>,
        is_default: bool,
    ) -> RequestResult<WithId<UserVehicle>> {
        let mut tx = self.database.transaction().await?;
        // the catalog entry must exist
        tx.vehicle(vehicle_id.clone()).await?;
        if is_default {
            tx.clear_default_vehicle(user_id).await?;
        }
        let result = tx
            .insert_user_vehicle(user_id, &vehicle_id, nickname, is_default)
            .await?;
        tx.commit().await?;
        Ok(result)
    }

    pub async fn update_user_vehicle(
        &self,
        id: Id<UserVehicle>,
        user_id: &str,
        nickname: Option<String>,
        is_default: Option<bool>,
    ) -> RequestResult<WithId<UserVehicle>> {
        let mut tx = self.database.transaction().await?;
        if is_default == Some(true) {
            tx.clear_default_vehicle(user_id).await?;
        }
        let result = tx
            .update_user_vehicle(&id, user_id, nickname, is_default)
            .await?;
        tx.commit().await?;
        Ok(result)
    }

    pub async fn remove_user_vehicle(
        &self,
        id: Id<UserVehicle>,
        user_id: &str,
    ) -> RequestResult<()> {
        self.database
            .auto()
            .delete_user_vehicle(&id, user_id)
            .await?
            .let_owned(Ok)
    }
}
