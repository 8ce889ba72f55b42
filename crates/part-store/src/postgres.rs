use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    Part, PartId, Result, StoreError, Version,
    store::PartStore,
};

const PART_COLUMNS: &str = "material_number, serial_number, supplier_number, quantity, version";

/// PostgreSQL-backed part store implementation.
#[derive(Clone)]
pub struct PostgresPartStore {
    pool: PgPool,
}

impl PostgresPartStore {
    /// Creates a new PostgreSQL part store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_part(row: PgRow) -> Result<Part> {
        Ok(Part {
            id: PartId::new(
                row.try_get::<String, _>("material_number")?,
                row.try_get::<String, _>("serial_number")?,
                row.try_get::<String, _>("supplier_number")?,
            ),
            quantity: row.try_get("quantity")?,
            version: Version::new(row.try_get("version")?),
        })
    }

    /// Explains why a guarded write touched no rows: either the part is
    /// gone or its version moved on.
    async fn missed_write(&self, id: &PartId, expected: Version) -> StoreError {
        let current: std::result::Result<Option<i64>, sqlx::Error> = sqlx::query_scalar(
            "SELECT version FROM parts WHERE material_number = $1 AND serial_number = $2 AND supplier_number = $3",
        )
        .bind(id.material_number())
        .bind(id.serial_number())
        .bind(id.supplier_number())
        .fetch_optional(&self.pool)
        .await;

        match current {
            Ok(Some(actual)) => StoreError::VersionConflict {
                id: id.clone(),
                expected,
                actual: Version::new(actual),
            },
            Ok(None) => StoreError::NotFound(id.clone()),
            Err(e) => StoreError::Database(e),
        }
    }
}

#[async_trait]
impl PartStore for PostgresPartStore {
    async fn find(&self, id: &PartId) -> Result<Option<Part>> {
        let row = sqlx::query(&format!(
            "SELECT {PART_COLUMNS} FROM parts WHERE material_number = $1 AND serial_number = $2 AND supplier_number = $3"
        ))
        .bind(id.material_number())
        .bind(id.serial_number())
        .bind(id.supplier_number())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_part).transpose()
    }

    async fn list(&self) -> Result<Vec<Part>> {
        let rows = sqlx::query(&format!(
            "SELECT {PART_COLUMNS} FROM parts ORDER BY material_number, serial_number, supplier_number"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_part).collect()
    }

    async fn insert(&self, part: Part) -> Result<Part> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO parts (material_number, serial_number, supplier_number, quantity, version)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PART_COLUMNS}
            "#
        ))
        .bind(part.id.material_number())
        .bind(part.id.serial_number())
        .bind(part.id.supplier_number())
        .bind(part.quantity)
        .bind(Version::initial().as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Primary key violation means another writer inserted first
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::DuplicateKey(part.id.clone());
            }
            StoreError::Database(e)
        })?;

        Self::row_to_part(row)
    }

    async fn update(&self, part: Part, expected: Version) -> Result<Part> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE parts
            SET quantity = $4, version = version + 1
            WHERE material_number = $1 AND serial_number = $2 AND supplier_number = $3
              AND version = $5
            RETURNING {PART_COLUMNS}
            "#
        ))
        .bind(part.id.material_number())
        .bind(part.id.serial_number())
        .bind(part.id.supplier_number())
        .bind(part.quantity)
        .bind(expected.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_part(row),
            None => {
                let err = self.missed_write(&part.id, expected).await;
                tracing::debug!(id = %part.id, %expected, error = %err, "guarded update missed");
                Err(err)
            }
        }
    }

    async fn delete(&self, id: &PartId, expected: Version) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM parts
            WHERE material_number = $1 AND serial_number = $2 AND supplier_number = $3
              AND version = $4
            "#,
        )
        .bind(id.material_number())
        .bind(id.serial_number())
        .bind(id.supplier_number())
        .bind(expected.as_i64())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let err = self.missed_write(id, expected).await;
            tracing::debug!(%id, %expected, error = %err, "guarded delete missed");
            return Err(err);
        }

        Ok(())
    }
}
