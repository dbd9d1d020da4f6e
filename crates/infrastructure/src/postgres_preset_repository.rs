use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use vodokanal_application::PresetRepository;
use vodokanal_core::{AppError, AppResult};
use vodokanal_domain::{Preset, PresetId};

/// PostgreSQL-backed repository for stored presets.
#[derive(Clone)]
pub struct PostgresPresetRepository {
    pool: PgPool,
}

impl PostgresPresetRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PresetRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    target: String,
    query_string: String,
}

impl PresetRow {
    fn into_preset(self) -> AppResult<Preset> {
        Preset::new(
            PresetId::from_uuid(self.id),
            self.name,
            self.description,
            self.target,
            self.query_string,
        )
    }
}

#[async_trait]
impl PresetRepository for PostgresPresetRepository {
    async fn save(&self, preset: Preset) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO presets (id, name, description, target, query_string)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(preset.id().as_uuid())
        .bind(preset.name().as_str())
        .bind(preset.description())
        .bind(preset.target().as_str())
        .bind(preset.query_string())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return Err(AppError::Conflict(format!(
                        "preset '{}' already exists",
                        preset.id()
                    )));
                }

                Err(AppError::Internal(format!(
                    "failed to save preset '{}': {error}",
                    preset.id()
                )))
            }
        }
    }

    async fn list(&self, target: Option<&str>) -> AppResult<Vec<Preset>> {
        let rows = sqlx::query_as::<_, PresetRow>(
            r#"
            SELECT id, name, description, target, query_string
            FROM presets
            WHERE $1::text IS NULL OR target = $1
            ORDER BY name, id
            "#,
        )
        .bind(target)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list presets: {error}")))?;

        rows.into_iter().map(PresetRow::into_preset).collect()
    }

    async fn find(&self, id: PresetId) -> AppResult<Option<Preset>> {
        let row = sqlx::query_as::<_, PresetRow>(
            r#"
            SELECT id, name, description, target, query_string
            FROM presets
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find preset '{id}': {error}")))?;

        row.map(PresetRow::into_preset).transpose()
    }

    async fn update(&self, preset: Preset) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE presets
            SET name = $2, description = $3, target = $4, query_string = $5
            WHERE id = $1
            "#,
        )
        .bind(preset.id().as_uuid())
        .bind(preset.name().as_str())
        .bind(preset.description())
        .bind(preset.target().as_str())
        .bind(preset.query_string())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update preset '{}': {error}",
                preset.id()
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "preset '{}' does not exist",
                preset.id()
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: PresetId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM presets WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete preset '{id}': {error}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("preset '{id}' does not exist")));
        }

        Ok(())
    }
}
