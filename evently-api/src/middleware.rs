use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// Refuses to run a handler until the store answers a ping, so an
/// unreachable database is reported apart from query failures.
pub async fn require_store(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    state
        .bookings
        .ping()
        .await
        .map_err(|e| AppError::ConnectionError(e.to_string()))?;

    Ok(next.run(req).await)
}
