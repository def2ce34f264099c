use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode},
    routing::{get, on},
    Extension, Router,
};
use charging::RequestError;
use model::{
    vehicle::{Vehicle, VehicleType},
    WithId,
};
use utility::id::Id;

use crate::{
    common::{
        route_not_found, schema, HateoasResult, RouteErrorResponse, VecResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/vehicles{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Vehicle>))
        .route("/", get(get_vehicles))
        .route("/type/:vehicle_type", get(get_vehicles_by_type))
        .route("/:id", get(get_vehicle))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_vehicles(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { charging_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<Vehicle>>> {
    charging_client
        .get_vehicles()
        .await
        .map(|vehicles| {
            let total = vehicles.len();
            let data = vehicles
                .into_iter()
                .map(|vehicle| vehicle_hateoas(vehicle, base_url.clone()))
                .collect::<Vec<_>>();
            hateoas::Response::builder(
                VecResponse::non_paginated(data),
                base_url.clone(),
            )
            .meta("total", total)
            .build()
            .json()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_code("VEHICLES_FETCH_ERROR")
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_vehicle(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { charging_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<Vehicle> {
    charging_client
        .get_vehicle(Id::new(id))
        .await
        .map(|vehicle| vehicle_hateoas(vehicle, base_url.clone()).json())
        .map_err(|why| {
            let code = match &why {
                RequestError::NotFound => "VEHICLE_NOT_FOUND",
                _ => "VEHICLE_FETCH_ERROR",
            };
            RouteErrorResponse::from(why)
                .with_code(code)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_vehicles_by_type(
    OriginalUri(original_uri): OriginalUri,
    Path(vehicle_type): Path<String>,
    State(WebState { charging_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<Vehicle>>> {
    let vehicle_type =
        VehicleType::from_wire(&vehicle_type).ok_or_else(|| {
            RouteErrorResponse::new(StatusCode::BAD_REQUEST)
                .with_code("INVALID_VEHICLE_TYPE")
                .with_message("Vehicle type must be 2W or 4W.")
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })?;

    charging_client
        .get_vehicles_by_type(vehicle_type)
        .await
        .map(|vehicles| {
            let total = vehicles.len();
            let data = vehicles
                .into_iter()
                .map(|vehicle| vehicle_hateoas(vehicle, base_url.clone()))
                .collect::<Vec<_>>();
            hateoas::Response::builder(
                VecResponse::non_paginated(data),
                base_url.clone(),
            )
            .meta("total", total)
            .meta("vehicleType", vehicle_type.as_wire())
            .build()
            .json()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_code("VEHICLES_FETCH_ERROR")
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

fn vehicle_hateoas(
    vehicle: WithId<Vehicle>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<Vehicle> {
    let vehicle_type = vehicle.content.vehicle_type;
    hateoas::Response::builder(vehicle.content, base_url)
        .link("self", resource!("/{}", vehicle.id.raw()))
        .link("sameType", resource!("/type/{}", vehicle_type.as_wire()))
        .build()
}
