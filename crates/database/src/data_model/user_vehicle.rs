use async_trait::async_trait;
use charging::database::{Result, UserVehicleRepo};
use model::{
    vehicle::{UserVehicle, Vehicle},
    WithId,
};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::{vehicle::VehicleRow, with_id, DatabaseRow};
use crate::{queries::user_vehicle, PgDatabaseAutocommit, PgDatabaseTransaction};

/// A garage entry with the catalog vehicle joined in under aliased columns.
#[derive(Debug, Clone, FromRow)]
pub struct UserVehicleRow {
    pub id: String,
    pub user_id: String,
    pub vehicle_id: String,
    pub nickname: Option<String>,
    pub is_default: bool,
    pub vehicle_brand: String,
    pub vehicle_model: String,
    pub vehicle_variant: Option<String>,
    pub vehicle_vehicle_type: String,
    pub vehicle_battery_capacity_kwh: f64,
    pub vehicle_ac_connector_type: Option<String>,
    pub vehicle_ac_max_power_kw: Option<f64>,
    pub vehicle_dc_connector_type: Option<String>,
    pub vehicle_dc_max_power_kw: Option<f64>,
    pub vehicle_efficiency_wh_per_km: f64,
    pub vehicle_image_url: Option<String>,
}

impl DatabaseRow for UserVehicleRow {
    type Model = UserVehicle;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> super::Result<Self::Model> {
        let vehicle_id: Id<Vehicle> = Id::new(self.vehicle_id.clone());
        let vehicle = with_id(VehicleRow {
            id: self.vehicle_id,
            brand: self.vehicle_brand,
            model: self.vehicle_model,
            variant: self.vehicle_variant,
            vehicle_type: self.vehicle_vehicle_type,
            battery_capacity_kwh: self.vehicle_battery_capacity_kwh,
            ac_connector_type: self.vehicle_ac_connector_type,
            ac_max_power_kw: self.vehicle_ac_max_power_kw,
            dc_connector_type: self.vehicle_dc_connector_type,
            dc_max_power_kw: self.vehicle_dc_max_power_kw,
            efficiency_wh_per_km: self.vehicle_efficiency_wh_per_km,
            image_url: self.vehicle_image_url,
        })?;
        Ok(UserVehicle {
            user_id: self.user_id,
            vehicle_id,
            nickname: self.nickname,
            is_default: self.is_default,
            vehicle: Some(vehicle),
        })
    }
}

#[async_trait]
impl UserVehicleRepo for PgDatabaseAutocommit {
    async fn user_vehicles(
        &mut self,
        user_id: &str,
    ) -> Result<Vec<WithId<UserVehicle>>> {
        user_vehicle::get_for_user(&self.pool, user_id).await
    }

    async fn insert_user_vehicle(
        &mut self,
        user_id: &str,
        vehicle_id: &Id<Vehicle>,
        nickname: Option<String>,
        is_default: bool,
    ) -> Result<WithId<UserVehicle>> {
        let id = user_vehicle::insert(
            &self.pool,
            user_id,
            vehicle_id,
            nickname,
            is_default,
        )
        .await?;
        user_vehicle::get(&self.pool, &id).await
    }

    async fn update_user_vehicle(
        &mut self,
        id: &Id<UserVehicle>,
        user_id: &str,
        nickname: Option<String>,
        is_default: Option<bool>,
    ) -> Result<WithId<UserVehicle>> {
        let id =
            user_vehicle::update(&self.pool, id, user_id, nickname, is_default)
                .await?;
        user_vehicle::get(&self.pool, &id).await
    }

    async fn delete_user_vehicle(
        &mut self,
        id: &Id<UserVehicle>,
        user_id: &str,
    ) -> Result<()> {
        user_vehicle::delete(&self.pool, id, user_id).await
    }

    async fn clear_default_vehicle(&mut self, user_id: &str) -> Result<()> {
        user_vehicle::clear_default(&self.pool, user_id).await
    }
}

#[async_trait]
impl<'a> UserVehicleRepo for PgDatabaseTransaction<'a> {
    async fn user_vehicles(
        &mut self,
        user_id: &str,
    ) -> Result<Vec<WithId<UserVehicle>>> {
        user_vehicle::get_for_user(&mut *self.tx, user_id).await
    }

    async fn insert_user_vehicle(
        &mut self,
        user_id: &str,
        vehicle_id: &Id<Vehicle>,
        nickname: Option<String>,
        is_default: bool,
    ) -> Result<WithId<UserVehicle>> {
        let id = user_vehicle::insert(
            &mut *self.tx,
            user_id,
            vehicle_id,
            nickname,
            is_default,
        )
        .await?;
        user_vehicle::get(&mut *self.tx, &id).await
    }

    async fn update_user_vehicle(
        &mut self,
        id: &Id<UserVehicle>,
        user_id: &str,
        nickname: Option<String>,
        is_default: Option<bool>,
    ) -> Result<WithId<UserVehicle>> {
        let id =
            user_vehicle::update(&mut *self.tx, id, user_id, nickname, is_default)
                .await?;
        user_vehicle::get(&mut *self.tx, &id).await
    }

    async fn delete_user_vehicle(
        &mut self,
        id: &Id<UserVehicle>,
        user_id: &str,
    ) -> Result<()> {
        user_vehicle::delete(&mut *self.tx, id, user_id).await
    }

    async fn clear_default_vehicle(&mut self, user_id: &str) -> Result<()> {
        user_vehicle::clear_default(&mut *self.tx, user_id).await
    }
}
