use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, State},
    http::{HeaderMap, Method, StatusCode},
    routing::{get, on, patch},
    Extension, Json, Router,
};
use charging::RequestError;
use model::{
    vehicle::{UserVehicle, Vehicle},
    WithId,
};
use serde::Deserialize;
use utility::id::Id;

use crate::{
    common::{
        require_user_id, route_not_found, HateoasResult, RouteErrorResponse,
        RouteResult, VecResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/user{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/vehicles", get(get_garage).post(add_to_garage))
        .route(
            "/vehicles/:id",
            patch(update_garage_entry).delete(remove_garage_entry),
        )
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_garage(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { charging_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    headers: HeaderMap,
) -> HateoasResult<VecResponse<hateoas::Response<UserVehicle>>> {
    let user_id = require_user_id(&headers).map_err(|why| {
        why.with_method(&Method::GET).with_uri(original_uri.path())
    })?;

    charging_client
        .get_user_vehicles(&user_id)
        .await
        .map(|entries| {
            let total = entries.len();
            let data = entries
                .into_iter()
                .map(|entry| garage_entry_hateoas(entry, base_url.clone()))
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
                .with_code("USER_VEHICLES_FETCH_ERROR")
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddVehicleBody {
    vehicle_id: String,
    nickname: Option<String>,
    #[serde(default)]
    is_default: bool,
}

async fn add_to_garage(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { charging_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    headers: HeaderMap,
    body: Result<Json<AddVehicleBody>, JsonRejection>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<UserVehicle>>)> {
    let user_id = require_user_id(&headers).map_err(|why| {
        why.with_method(&Method::POST).with_uri(original_uri.path())
    })?;
    let Json(body) = body.map_err(|why| {
        invalid_body(why, &Method::POST, original_uri.path())
    })?;

    let vehicle_id: Id<Vehicle> = Id::new(body.vehicle_id);
    charging_client
        .add_user_vehicle(&user_id, vehicle_id, body.nickname, body.is_default)
        .await
        .map(|entry| {
            let response = garage_entry_hateoas(entry, base_url);
            (StatusCode::CREATED, Json(response))
        })
        .map_err(|why| {
            let code = match &why {
                RequestError::NotFound => "VEHICLE_NOT_FOUND",
                RequestError::Conflict => "VEHICLE_ALREADY_ADDED",
                _ => "ADD_VEHICLE_ERROR",
            };
            RouteErrorResponse::from(why)
                .with_code(code)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateVehicleBody {
    nickname: Option<String>,
    is_default: Option<bool>,
}

async fn update_garage_entry(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { charging_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    headers: HeaderMap,
    body: Result<Json<UpdateVehicleBody>, JsonRejection>,
) -> HateoasResult<UserVehicle> {
    let user_id = require_user_id(&headers).map_err(|why| {
        why.with_method(&Method::PATCH)
            .with_uri(original_uri.path())
    })?;
    let Json(body) = body.map_err(|why| {
        invalid_body(why, &Method::PATCH, original_uri.path())
    })?;

    charging_client
        .update_user_vehicle(Id::new(id), &user_id, body.nickname, body.is_default)
        .await
        .map(|entry| garage_entry_hateoas(entry, base_url).json())
        .map_err(|why| {
            let code = match &why {
                RequestError::NotFound => "VEHICLE_NOT_FOUND",
                _ => "UPDATE_VEHICLE_ERROR",
            };
            RouteErrorResponse::from(why)
                .with_code(code)
                .with_method(&Method::PATCH)
                .with_uri(original_uri.path())
        })
}

async fn remove_garage_entry(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { charging_client, .. }): State<WebState>,
    headers: HeaderMap,
) -> RouteResult<StatusCode> {
    let user_id = require_user_id(&headers).map_err(|why| {
        why.with_method(&Method::DELETE)
            .with_uri(original_uri.path())
    })?;

    charging_client
        .remove_user_vehicle(Id::new(id), &user_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|why| {
            let code = match &why {
                RequestError::NotFound => "VEHICLE_NOT_FOUND",
                _ => "REMOVE_VEHICLE_ERROR",
            };
            RouteErrorResponse::from(why)
                .with_code(code)
                .with_method(&Method::DELETE)
                .with_uri(original_uri.path())
        })
}

fn invalid_body(
    why: JsonRejection,
    method: &Method,
    uri: &str,
) -> RouteErrorResponse {
    RouteErrorResponse::new(StatusCode::BAD_REQUEST)
        .with_code("INVALID_REQUEST")
        .with_message("Invalid request body.")
        .with_detailed_information(why.to_string())
        .with_method(method)
        .with_uri(uri)
}

fn garage_entry_hateoas(
    entry: WithId<UserVehicle>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<UserVehicle> {
    let vehicle_id = entry.content.vehicle_id.clone();
    hateoas::Response::builder(entry.content, base_url)
        .link("self", resource!("/vehicles/{}", entry.id.raw()))
        .link(
            "vehicle",
            super::vehicles::resource!("/{}", vehicle_id.raw()),
        )
        .build()
}
