use async_trait::async_trait;
use charging::database::{Result, ReviewRepo};
use chrono::{DateTime, Local};
use model::{
    review::{ReviewRating, StationReview},
    station::Station,
    WithId,
};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;
use crate::{queries::review, PgDatabaseAutocommit, PgDatabaseTransaction};

#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: String,
    pub station_id: String,
    pub user_id: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Local>,
}

impl DatabaseRow for ReviewRow {
    type Model = StationReview;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> super::Result<Self::Model> {
        Ok(StationReview {
            station_id: Id::new(self.station_id),
            user_id: self.user_id,
            rating: self.rating.clamp(1, 5) as u8,
            comment: self.comment,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ReviewRatingRow {
    pub station_id: String,
    pub rating: i16,
}

impl ReviewRatingRow {
    pub fn to_model(self) -> ReviewRating {
        ReviewRating {
            station_id: Id::new(self.station_id),
            rating: self.rating.clamp(1, 5) as u8,
        }
    }
}

#[async_trait]
impl ReviewRepo for PgDatabaseAutocommit {
    async fn reviews_for_station(
        &mut self,
        station_id: &Id<Station>,
    ) -> Result<Vec<WithId<StationReview>>> {
        review::for_station(&self.pool, station_id).await
    }

    async fn insert_review(
        &mut self,
        station_id: &Id<Station>,
        user_id: &str,
        rating: u8,
        comment: Option<String>,
    ) -> Result<WithId<StationReview>> {
        review::insert(&self.pool, station_id, user_id, rating, comment).await
    }
}

#[async_trait]
impl<'a> ReviewRepo for PgDatabaseTransaction<'a> {
    async fn reviews_for_station(
        &mut self,
        station_id: &Id<Station>,
    ) -> Result<Vec<WithId<StationReview>>> {
        review::for_station(&mut *self.tx, station_id).await
    }

    async fn insert_review(
        &mut self,
        station_id: &Id<Station>,
        user_id: &str,
        rating: u8,
        comment: Option<String>,
    ) -> Result<WithId<StationReview>> {
        review::insert(&mut *self.tx, station_id, user_id, rating, comment).await
    }
}
