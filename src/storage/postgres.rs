//! Cafe store backed by a PostgreSQL table.

use crate::domain::cafe::{Cafe, CafeField, FieldKind, NewCafe};
use crate::storage::{CafeStore, StoreError};
use async_trait::async_trait;
use sqlx::error::ErrorKind as DbErrorKind;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS cafe (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    map_url TEXT NOT NULL,
    img_url TEXT NOT NULL,
    location TEXT NOT NULL,
    seats TEXT NOT NULL,
    has_toilet BOOLEAN NOT NULL,
    has_wifi BOOLEAN NOT NULL,
    has_sockets BOOLEAN NOT NULL,
    can_take_calls BOOLEAN NOT NULL,
    coffee_price TEXT NOT NULL
)";

const SELECT_COLUMNS: &str = "id, name, map_url, img_url, location, seats, has_toilet, has_wifi, \
                              has_sockets, can_take_calls, coffee_price";

#[derive(Clone)]
pub struct PostgresCafeStore {
    pool: PgPool,
}

impl PostgresCafeStore {
    /// Connects to the database and makes sure the `cafe` table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::query(CREATE_TABLE_SQL).execute(&pool).await?;

        Ok(Self { pool })
    }
}

fn row_to_cafe(row: &PgRow) -> Result<Cafe, sqlx::Error> {
    Ok(Cafe {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        map_url: row.try_get("map_url")?,
        img_url: row.try_get("img_url")?,
        location: row.try_get("location")?,
        seats: row.try_get("seats")?,
        has_toilet: row.try_get("has_toilet")?,
        has_wifi: row.try_get("has_wifi")?,
        has_sockets: row.try_get("has_sockets")?,
        can_take_calls: row.try_get("can_take_calls")?,
        coffee_price: row.try_get("coffee_price")?,
    })
}

/// SQLSTATE raised when a value does not fit its column (`string_data_right_truncation`).
const VALUE_TOO_LONG: &str = "22001";

/// Re-expresses constraint violations so callers never have to inspect raw driver errors.
fn map_write_error(err: sqlx::Error) -> StoreError {
    let violation = err.as_database_error().and_then(|db_err| {
        classify_violation(
            db_err.kind(),
            db_err.code().as_deref(),
            db_err.constraint(),
            db_err.message(),
        )
    });
    violation.unwrap_or(StoreError::Backend(err))
}

fn classify_violation(
    kind: DbErrorKind,
    code: Option<&str>,
    constraint: Option<&str>,
    message: &str,
) -> Option<StoreError> {
    match kind {
        DbErrorKind::UniqueViolation => {
            // Postgres names single-column unique constraints `<table>_<column>_key`.
            let column = constraint
                .map(|c| c.trim_start_matches("cafe_").trim_end_matches("_key"))
                .unwrap_or("name");
            Some(StoreError::UniqueViolation(column.to_string()))
        }
        DbErrorKind::NotNullViolation | DbErrorKind::CheckViolation => {
            Some(StoreError::Integrity(message.to_string()))
        }
        _ if code == Some(VALUE_TOO_LONG) => Some(StoreError::ValueTooLong(message.to_string())),
        _ => None,
    }
}

#[async_trait]
impl CafeStore for PostgresCafeStore {
    async fn insert(&self, cafe: NewCafe) -> Result<Cafe, StoreError> {
        let sql = format!(
            "INSERT INTO cafe (name, map_url, img_url, location, seats, has_toilet, has_wifi, \
             has_sockets, can_take_calls, coffee_price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
            SELECT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&cafe.name)
            .bind(&cafe.map_url)
            .bind(&cafe.img_url)
            .bind(&cafe.location)
            .bind(&cafe.seats)
            .bind(cafe.has_toilet)
            .bind(cafe.has_wifi)
            .bind(cafe.has_sockets)
            .bind(cafe.can_take_calls)
            .bind(&cafe.coffee_price)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(row_to_cafe(&row)?)
    }

    async fn update(&self, cafe: &Cafe) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE cafe SET name = $2, map_url = $3, img_url = $4, location = $5, seats = $6, \
             has_toilet = $7, has_wifi = $8, has_sockets = $9, can_take_calls = $10, \
             coffee_price = $11 WHERE id = $1",
        )
        .bind(cafe.id)
        .bind(&cafe.name)
        .bind(&cafe.map_url)
        .bind(&cafe.img_url)
        .bind(&cafe.location)
        .bind(&cafe.seats)
        .bind(cafe.has_toilet)
        .bind(cafe.has_wifi)
        .bind(cafe.has_sockets)
        .bind(cafe.can_take_calls)
        .bind(&cafe.coffee_price)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM cafe WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Cafe>, StoreError> {
        let sql = format!("SELECT {} FROM cafe WHERE id = $1", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_cafe).transpose()?)
    }

    async fn query_by_field(&self, field: CafeField, value: &str) -> Result<Vec<Cafe>, StoreError> {
        if !matches!(field.kind(), FieldKind::Text | FieldKind::Url | FieldKind::Price) {
            return Err(StoreError::UnsupportedFilter(field));
        }
        // Column names come from the closed `CafeField` set, never from request input.
        let sql = format!(
            "SELECT {} FROM cafe WHERE {} = $1 ORDER BY id",
            SELECT_COLUMNS,
            field.as_str()
        );
        let rows = sqlx::query(&sql).bind(value).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_cafe).collect::<Result<_, _>>()?)
    }

    async fn list_all(&self) -> Result<Vec<Cafe>, StoreError> {
        let sql = format!("SELECT {} FROM cafe ORDER BY id", SELECT_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_cafe).collect::<Result<_, _>>()?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_names_the_constrained_column() {
        let err = classify_violation(
            DbErrorKind::UniqueViolation,
            Some("23505"),
            Some("cafe_name_key"),
            "duplicate key value violates unique constraint \"cafe_name_key\"",
        );
        assert!(matches!(err, Some(StoreError::UniqueViolation(column)) if column == "name"));

        let err = classify_violation(DbErrorKind::UniqueViolation, Some("23505"), None, "dup");
        assert!(matches!(err, Some(StoreError::UniqueViolation(column)) if column == "name"));
    }

    #[test]
    fn not_null_and_check_violations_are_integrity_errors() {
        for kind in [DbErrorKind::NotNullViolation, DbErrorKind::CheckViolation] {
            let err = classify_violation(kind, None, None, "null value in column \"seats\"");
            assert!(matches!(err, Some(StoreError::Integrity(detail)) if detail.contains("seats")));
        }
    }

    #[test]
    fn oversized_values_are_reported_separately() {
        let err = classify_violation(
            DbErrorKind::Other,
            Some(VALUE_TOO_LONG),
            None,
            "value too long for type character varying(250)",
        );
        assert!(matches!(err, Some(StoreError::ValueTooLong(_))));
    }

    #[test]
    fn other_database_errors_stay_backend_errors() {
        assert!(classify_violation(DbErrorKind::Other, Some("40001"), None, "serialization").is_none());
        assert!(classify_violation(DbErrorKind::ForeignKeyViolation, None, None, "fk").is_none());
        assert!(matches!(
            map_write_error(sqlx::Error::RowNotFound),
            StoreError::Backend(sqlx::Error::RowNotFound)
        ));
    }
}
