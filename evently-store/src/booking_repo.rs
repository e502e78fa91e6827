use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use evently_core::{
    Booking, BookingError, BookingId, BookingPatch, BookingRepository, BookingResult, NewBooking,
};

const BOOKING_COLUMNS: &str = "id, name, email, event, ticket_type, created_at, updated_at";

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    name: String,
    email: String,
    event: String,
    ticket_type: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: BookingId::from(row.id),
            name: row.name,
            email: row.email,
            event: row.event,
            ticket_type: row.ticket_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn store_error(err: sqlx::Error) -> BookingError {
    if let sqlx::Error::Database(db_err) = &err {
        // check_violation / not_null_violation
        if matches!(db_err.code().as_deref(), Some("23514") | Some("23502")) {
            return BookingError::Validation(db_err.message().to_string());
        }
    }
    BookingError::persistence(err)
}

impl PostgresBookingRepository {
    async fn find_contains(&self, column: &str, needle: &str) -> BookingResult<Vec<Booking>> {
        // strpos keeps `%` and `_` in the needle literal
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE strpos(lower({column}), lower($1)) > 0 \
             ORDER BY created_at, id"
        );

        let rows: Vec<BookingRow> = sqlx::query_as(&sql)
            .bind(needle)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn list_all(&self) -> BookingResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn create(&self, booking: NewBooking) -> BookingResult<Booking> {
        booking.validate()?;
        let booking = booking.into_booking(BookingId::new());

        let row: BookingRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO bookings (id, name, email, event, ticket_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking.id.as_uuid())
        .bind(&booking.name)
        .bind(&booking.email)
        .bind(&booking.event)
        .bind(&booking.ticket_type)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        debug!("Inserted booking {}", row.id);
        Ok(row.into())
    }

    async fn get_by_id(&self, id: &str) -> BookingResult<Option<Booking>> {
        let id = BookingId::parse(id)?;

        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(Booking::from))
    }

    async fn update(&self, id: &str, patch: BookingPatch) -> BookingResult<Booking> {
        if patch.is_empty() {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| BookingError::NotFound(id.to_string()));
        }

        let booking_id = BookingId::parse(id)?;

        let row: Option<BookingRow> = sqlx::query_as(&format!(
            r#"
            UPDATE bookings
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                event = COALESCE($4, event),
                ticket_type = COALESCE($5, ticket_type),
                updated_at = $6
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking_id.as_uuid())
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.event)
        .bind(patch.ticket_type)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Booking::from)
            .ok_or_else(|| BookingError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> BookingResult<Booking> {
        let booking_id = BookingId::parse(id)?;

        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "DELETE FROM bookings WHERE id = $1 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Booking::from)
            .ok_or_else(|| BookingError::NotFound(id.to_string()))
    }

    async fn find_by_email_contains(&self, needle: &str) -> BookingResult<Vec<Booking>> {
        self.find_contains("email", needle).await
    }

    async fn find_by_event_contains(&self, needle: &str) -> BookingResult<Vec<Booking>> {
        self.find_contains("event", needle).await
    }

    async fn ping(&self) -> BookingResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(BookingError::persistence)
    }
}
