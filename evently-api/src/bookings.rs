use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use evently_core::pii::MaskedEmail;
use evently_core::query::{
    self, CreateBookingRequest, EmailSearchParams, EventFilterParams, UpdateBookingRequest,
};
use evently_core::{Booking, BookingError};
use tracing::{debug, info};

use crate::envelope::Envelope;
use crate::error::AppError;
use crate::state::AppState;

type ApiResult<T> = Result<(StatusCode, Json<Envelope<T>>), AppError>;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/search", get(search_by_email))
        .route("/bookings/filter", get(filter_by_event))
        .route(
            "/bookings/{id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
        .method_not_allowed_fallback(crate::method_not_allowed)
}

/// GET /api/bookings
async fn list_bookings(State(state): State<AppState>) -> ApiResult<Vec<Booking>> {
    let bookings = state.bookings.list_all().await?;
    debug!(count = bookings.len(), "Listed bookings");

    Ok((StatusCode::OK, Json(Envelope::list(bookings))))
}

/// POST /api/bookings
async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> ApiResult<Booking> {
    let Json(req) = payload?;
    let new = query::new_booking(req)?;
    let booking = state.bookings.create(new).await?;

    info!(id = %booking.id, email = %MaskedEmail(&booking.email), "Booking created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(booking).with_message("Booking created successfully")),
    ))
}

/// GET /api/bookings/{id}
async fn get_booking(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Booking> {
    let Path(id) = id?;
    let booking = state
        .bookings
        .get_by_id(&id)
        .await?
        .ok_or(BookingError::NotFound(id))?;

    Ok((StatusCode::OK, Json(Envelope::data(booking))))
}

/// PUT /api/bookings/{id}
async fn update_booking(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateBookingRequest>, JsonRejection>,
) -> ApiResult<Booking> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let patch = query::booking_patch(req);
    let booking = state.bookings.update(&id, patch).await?;

    info!(id = %booking.id, "Booking updated");
    Ok((
        StatusCode::OK,
        Json(Envelope::data(booking).with_message("Booking updated successfully")),
    ))
}

/// DELETE /api/bookings/{id}
async fn delete_booking(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Booking> {
    let Path(id) = id?;
    let booking = state.bookings.delete(&id).await?;

    info!(id = %booking.id, "Booking deleted");
    Ok((
        StatusCode::OK,
        Json(Envelope::data(booking).with_message("Booking deleted successfully")),
    ))
}

/// GET /api/bookings/search?email=
async fn search_by_email(
    State(state): State<AppState>,
    params: Result<Query<EmailSearchParams>, QueryRejection>,
) -> ApiResult<Vec<Booking>> {
    let Query(params) = params?;
    let needle = query::email_needle(params)?;
    let matches = state.bookings.find_by_email_contains(&needle).await?;

    debug!(email = %MaskedEmail(&needle), count = matches.len(), "Searched bookings by email");
    Ok((StatusCode::OK, Json(Envelope::list(matches))))
}

/// GET /api/bookings/filter?event=
async fn filter_by_event(
    State(state): State<AppState>,
    params: Result<Query<EventFilterParams>, QueryRejection>,
) -> ApiResult<Vec<Booking>> {
    let Query(params) = params?;
    let needle = query::event_needle(params)?;
    let matches = state.bookings.find_by_event_contains(&needle).await?;

    debug!(event = %needle, count = matches.len(), "Filtered bookings by event");
    Ok((StatusCode::OK, Json(Envelope::list(matches))))
}
