use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::{HeaderMap, Method, StatusCode},
    routing::{get, on, post},
    Extension, Json, Router,
};
use charging::{
    client::NearbyQuery,
    filter::{SortKey, StationFilters},
    RequestError,
};
use model::{
    amenities::AmenityTag,
    connector::ConnectorType,
    enriched::EnrichedStation,
    report::{ReportType, StationReport},
    review::StationReview,
    station::Station,
    WithDistance, WithId,
};
use serde::Deserialize;
use utility::id::Id;

use crate::{
    common::{
        require_user_id, route_not_found, schema, schema_no_example,
        HateoasResult, RouteErrorResponse, RouteResult, VecResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/stations{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Station>))
        .route("/nearby", get(nearby))
        .route("/nearby/schema", get(schema_no_example::<EnrichedStation>))
        .route("/city/:city", get(get_stations_by_city))
        .route("/:id", get(get_station))
        .route("/:id/reviews", get(get_reviews).post(post_review))
        .route("/:id/reports", post(post_report))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NearbyParams {
    latitude: f64,
    longitude: f64,
    radius_km: Option<f64>,
    limit: Option<u32>,
    vehicle_id: Option<String>,
    connector_type: Option<String>,
    dc_fast: Option<bool>,
    network: Option<String>,
    open_24x7: Option<bool>,
    min_power_kw: Option<f64>,
    /// Comma-separated amenity tags.
    amenities: Option<String>,
    query: Option<String>,
    sort_by: Option<String>,
}

/// Range-checks the raw parameters and assembles the domain query. All
/// violations surface as `INVALID_QUERY`, never as partial results.
fn validate_nearby(params: NearbyParams) -> Result<NearbyQuery, String> {
    if !(-90.0..=90.0).contains(&params.latitude) {
        return Err("latitude must be within [-90, 90]".to_string());
    }
    if !(-180.0..=180.0).contains(&params.longitude) {
        return Err("longitude must be within [-180, 180]".to_string());
    }
    let radius_km = params.radius_km.unwrap_or(10.0);
    if !(1.0..=100.0).contains(&radius_km) {
        return Err("radiusKm must be within [1, 100]".to_string());
    }
    let limit = params.limit.unwrap_or(50);
    if !(1..=100).contains(&limit) {
        return Err("limit must be within [1, 100]".to_string());
    }
    let sort_key = match params.sort_by.as_deref() {
        Some(value) => SortKey::from_wire(value)
            .ok_or_else(|| format!("unknown sortBy '{value}'"))?,
        None => SortKey::default(),
    };
    let connector_type = match params.connector_type.as_deref() {
        Some(value) => Some(
            ConnectorType::from_wire(value)
                .ok_or_else(|| format!("unknown connectorType '{value}'"))?,
        ),
        None => None,
    };
    let amenities = match params.amenities.as_deref() {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(|tag| {
                AmenityTag::from_wire(tag)
                    .ok_or_else(|| format!("unknown amenity '{tag}'"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => vec![],
    };
    Ok(NearbyQuery {
        latitude: params.latitude,
        longitude: params.longitude,
        radius_km,
        limit,
        vehicle_id: params.vehicle_id.map(Id::new),
        filters: StationFilters {
            query: params.query,
            connector_type,
            dc_fast: params.dc_fast,
            network: params.network,
            open_24x7: params.open_24x7,
            min_power_kw: params.min_power_kw,
            amenities,
        },
        sort_key,
    })
}

fn invalid_query(detail: impl Into<String>, uri: &str) -> RouteErrorResponse {
    RouteErrorResponse::new(StatusCode::BAD_REQUEST)
        .with_code("INVALID_QUERY")
        .with_message("Invalid query parameters.")
        .with_detailed_information(detail)
        .with_method(&Method::GET)
        .with_uri(uri)
}

async fn nearby(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { charging_client, .. }): State<WebState>,
    params: Result<Query<NearbyParams>, QueryRejection>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithDistance<EnrichedStation>>>> {
    let Query(params) = params
        .map_err(|why| invalid_query(why.to_string(), original_uri.path()))?;
    let query = validate_nearby(params)
        .map_err(|why| invalid_query(why, original_uri.path()))?;

    let latitude = query.latitude;
    let longitude = query.longitude;
    let radius_km = query.radius_km;
    let sort_key = query.sort_key;
    let vehicle_id = query.vehicle_id.clone();

    charging_client
        .find_nearby_stations(query)
        .await
        .map(|stations| {
            let total = stations.len();
            let data = stations
                .into_iter()
                .map(|station| nearby_station_hateoas(station, base_url.clone()))
                .collect::<Vec<_>>();
            hateoas::Response::builder(
                VecResponse::non_paginated(data),
                base_url.clone(),
            )
            .meta("total", total)
            .meta(
                "queryLocation",
                serde_json::json!({
                    "latitude": latitude,
                    "longitude": longitude,
                }),
            )
            .meta("radiusKm", radius_km)
            .meta("sortBy", sort_key.as_wire())
            .meta_option("vehicleId", vehicle_id.map(|id| id.raw()))
            .build()
            .json()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_code("STATIONS_FETCH_ERROR")
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_station(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { charging_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<EnrichedStation> {
    charging_client
        .get_station_details(Id::new(id))
        .await
        .map(|station| station_details_hateoas(station, base_url.clone()).json())
        .map_err(|why| {
            let code = match &why {
                RequestError::NotFound => "STATION_NOT_FOUND",
                _ => "STATION_DETAILS_ERROR",
            };
            RouteErrorResponse::from(why)
                .with_code(code)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_stations_by_city(
    OriginalUri(original_uri): OriginalUri,
    Path(city): Path<String>,
    State(WebState { charging_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<Station>>> {
    charging_client
        .get_stations_by_city(&city)
        .await
        .map(|stations| {
            let total = stations.len();
            let data = stations
                .into_iter()
                .map(|station| station_hateoas(station, base_url.clone()))
                .collect::<Vec<_>>();
            hateoas::Response::builder(
                VecResponse::non_paginated(data),
                base_url.clone(),
            )
            .meta("total", total)
            .meta("city", &city)
            .build()
            .json()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_code("STATIONS_FETCH_ERROR")
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_reviews(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { charging_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<WithId<StationReview>>> {
    charging_client
        .get_station_reviews(Id::new(id.clone()))
        .await
        .map(|reviews| {
            let total = reviews.len();
            hateoas::Response::builder(
                VecResponse::non_paginated(reviews),
                base_url,
            )
            .meta("total", total)
            .link("station", resource!("/{}", id))
            .build()
            .json()
        })
        .map_err(|why| {
            let code = match &why {
                RequestError::NotFound => "STATION_NOT_FOUND",
                _ => "STATIONS_FETCH_ERROR",
            };
            RouteErrorResponse::from(why)
                .with_code(code)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewBody {
    rating: u8,
    comment: Option<String>,
}

async fn post_review(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { charging_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    headers: HeaderMap,
    body: Result<Json<ReviewBody>, JsonRejection>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<WithId<StationReview>>>)> {
    let user_id = require_user_id(&headers).map_err(|why| {
        why.with_method(&Method::POST).with_uri(original_uri.path())
    })?;
    let Json(body) = body.map_err(|why| invalid_body(why, original_uri.path()))?;
    if !(1..=5).contains(&body.rating) {
        return Err(RouteErrorResponse::new(StatusCode::BAD_REQUEST)
            .with_code("INVALID_REQUEST")
            .with_message("rating must be within [1, 5].")
            .with_method(&Method::POST)
            .with_uri(original_uri.path()));
    }

    charging_client
        .push_review(Id::new(id.clone()), &user_id, body.rating, body.comment)
        .await
        .map(|review| {
            let response = hateoas::Response::builder(review, base_url)
                .link("station", resource!("/{}", id))
                .build();
            (StatusCode::CREATED, Json(response))
        })
        .map_err(|why| {
            let code = match &why {
                RequestError::NotFound => "STATION_NOT_FOUND",
                _ => "REVIEW_CREATE_ERROR",
            };
            RouteErrorResponse::from(why)
                .with_code(code)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportBody {
    report_type: String,
    value: Option<String>,
}

async fn post_report(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { charging_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    headers: HeaderMap,
    body: Result<Json<ReportBody>, JsonRejection>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<WithId<StationReport>>>)> {
    let user_id = require_user_id(&headers).map_err(|why| {
        why.with_method(&Method::POST).with_uri(original_uri.path())
    })?;
    let Json(body) = body.map_err(|why| invalid_body(why, original_uri.path()))?;
    let report_type =
        ReportType::from_wire(&body.report_type).ok_or_else(|| {
            RouteErrorResponse::new(StatusCode::BAD_REQUEST)
                .with_code("INVALID_REQUEST")
                .with_message(format!(
                    "unknown reportType '{}'",
                    body.report_type
                ))
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })?;

    charging_client
        .push_report(Id::new(id.clone()), &user_id, report_type, body.value)
        .await
        .map(|report| {
            let response = hateoas::Response::builder(report, base_url)
                .link("station", resource!("/{}", id))
                .build();
            (StatusCode::CREATED, Json(response))
        })
        .map_err(|why| {
            let code = match &why {
                RequestError::NotFound => "STATION_NOT_FOUND",
                _ => "REPORT_CREATE_ERROR",
            };
            RouteErrorResponse::from(why)
                .with_code(code)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

fn invalid_body(why: JsonRejection, uri: &str) -> RouteErrorResponse {
    RouteErrorResponse::new(StatusCode::BAD_REQUEST)
        .with_code("INVALID_REQUEST")
        .with_message("Invalid request body.")
        .with_detailed_information(why.to_string())
        .with_method(&Method::POST)
        .with_uri(uri)
}

fn nearby_station_hateoas(
    station: WithDistance<EnrichedStation>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithDistance<EnrichedStation>> {
    let id = station.content.station.id.clone();
    hateoas::Response::builder(station, base_url)
        .link("self", resource!("/{}", id.raw()))
        .link("reviews", resource!("/{}/reviews", id.raw()))
        .build()
}

fn station_details_hateoas(
    station: EnrichedStation,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<EnrichedStation> {
    let id = station.station.id.clone();
    let location = station.station.content.location.clone();
    hateoas::Response::builder(station, base_url)
        .link("self", resource!("/{}", id.raw()))
        .link("reviews", resource!("/{}/reviews", id.raw()))
        .link(
            "nearby",
            resource!(
                "/nearby?latitude={}&longitude={}",
                location.latitude,
                location.longitude
            ),
        )
        .build()
}

fn station_hateoas(
    station: WithId<Station>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<Station> {
    hateoas::Response::builder(station.content, base_url)
        .link("self", resource!("/{}", station.id.raw()))
        .link("reviews", resource!("/{}/reviews", station.id.raw()))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_params() -> NearbyParams {
        NearbyParams {
            latitude: 12.97,
            longitude: 77.59,
            radius_km: None,
            limit: None,
            vehicle_id: None,
            connector_type: None,
            dc_fast: None,
            network: None,
            open_24x7: None,
            min_power_kw: None,
            amenities: None,
            query: None,
            sort_by: None,
        }
    }

    #[test]
    fn defaults_are_applied() {
        let query = validate_nearby(base_params()).unwrap();
        assert_eq!(query.radius_km, 10.0);
        assert_eq!(query.limit, 50);
        assert_eq!(query.sort_key, SortKey::Distance);
        assert!(query.vehicle_id.is_none());
    }

    #[test]
    fn latitude_out_of_range_is_rejected() {
        let mut params = base_params();
        params.latitude = 91.0;
        assert!(validate_nearby(params).is_err());
    }

    #[test]
    fn longitude_out_of_range_is_rejected() {
        let mut params = base_params();
        params.longitude = -180.5;
        assert!(validate_nearby(params).is_err());
    }

    #[test]
    fn radius_bounds_are_enforced() {
        let mut params = base_params();
        params.radius_km = Some(0.5);
        assert!(validate_nearby(params).is_err());

        let mut params = base_params();
        params.radius_km = Some(100.1);
        assert!(validate_nearby(params).is_err());
    }

    #[test]
    fn limit_bounds_are_enforced() {
        let mut params = base_params();
        params.limit = Some(0);
        assert!(validate_nearby(params).is_err());

        let mut params = base_params();
        params.limit = Some(101);
        assert!(validate_nearby(params).is_err());
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        let mut params = base_params();
        params.sort_by = Some("cheapest".to_string());
        assert!(validate_nearby(params).is_err());

        let mut params = base_params();
        params.sort_by = Some("best".to_string());
        let query = validate_nearby(params).unwrap();
        assert_eq!(query.sort_key, SortKey::Best);
    }

    #[test]
    fn connector_type_uses_wire_names() {
        let mut params = base_params();
        params.connector_type = Some("CCS2".to_string());
        let query = validate_nearby(params).unwrap();
        assert_eq!(query.filters.connector_type, Some(ConnectorType::Ccs2));

        let mut params = base_params();
        params.connector_type = Some("CCS-2".to_string());
        assert!(validate_nearby(params).is_err());
    }

    #[test]
    fn amenity_list_is_parsed() {
        let mut params = base_params();
        params.amenities = Some("washroom, wifi".to_string());
        let query = validate_nearby(params).unwrap();
        assert_eq!(
            query.filters.amenities,
            vec![AmenityTag::Washroom, AmenityTag::Wifi]
        );

        let mut params = base_params();
        params.amenities = Some("washroom,swimming_pool".to_string());
        assert!(validate_nearby(params).is_err());
    }
}
