use sqlx::PgPool;
use uuid::Uuid;

use crate::models::package::{Package, PackageDraft};
use crate::utils::errors::{map_unique_violation, AppError};

const DUPLICATE_NAME: &str = "A package with this name already exists";

const PACKAGE_COLUMNS: &str = r#"
    id, user_id, name, description, priority, destination_address,
    latitude, longitude, delivered, deleted, created_at
"#;

pub struct PackageRepository {
    pool: PgPool,
}

impl PackageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, draft: &PackageDraft) -> Result<Package, AppError> {
        let query = format!(
            r#"
            INSERT INTO packages (
                id, user_id, name, description, priority, destination_address, latitude, longitude
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            PACKAGE_COLUMNS
        );

        sqlx::query_as::<_, Package>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.priority)
            .bind(&draft.destination_address)
            .bind(draft.latitude)
            .bind(draft.longitude)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, DUPLICATE_NAME))
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Package>, AppError> {
        let query = format!(
            r#"
            SELECT {} FROM packages
            WHERE user_id = $1 AND deleted = FALSE
            ORDER BY priority DESC, created_at DESC
            "#,
            PACKAGE_COLUMNS
        );

        let packages = sqlx::query_as::<_, Package>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(packages)
    }

    pub async fn list_all(&self) -> Result<Vec<Package>, AppError> {
        let query = format!(
            "SELECT {} FROM packages WHERE deleted = FALSE ORDER BY created_at DESC",
            PACKAGE_COLUMNS
        );

        let packages = sqlx::query_as::<_, Package>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(packages)
    }

    /// Busca un package activo; `owner` restringe al usuario asignado
    pub async fn find(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Package>, AppError> {
        let query = format!(
            r#"
            SELECT {} FROM packages
            WHERE id = $1 AND deleted = FALSE AND ($2::uuid IS NULL OR user_id = $2)
            "#,
            PACKAGE_COLUMNS
        );

        let package = sqlx::query_as::<_, Package>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;

        Ok(package)
    }

    /// Actualiza los datos editables; `owner` restringe al usuario asignado
    /// y `reassign_to` cambia el usuario asignado. Al reasignar se quita el
    /// package de las rutas que no son del nuevo usuario.
    pub async fn update(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        draft: &PackageDraft,
        reassign_to: Option<Uuid>,
    ) -> Result<Option<Package>, AppError> {
        let query = format!(
            r#"
            UPDATE packages
            SET name = $3, description = $4, priority = $5, destination_address = $6,
                latitude = $7, longitude = $8, user_id = COALESCE($9::uuid, user_id)
            WHERE id = $1 AND deleted = FALSE AND ($2::uuid IS NULL OR user_id = $2)
            RETURNING {}
            "#,
            PACKAGE_COLUMNS
        );

        let mut tx = self.pool.begin().await?;

        let package = sqlx::query_as::<_, Package>(&query)
            .bind(id)
            .bind(owner)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.priority)
            .bind(&draft.destination_address)
            .bind(draft.latitude)
            .bind(draft.longitude)
            .bind(reassign_to)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, DUPLICATE_NAME))?;

        if let (Some(package), Some(_)) = (&package, reassign_to) {
            sqlx::query(
                r#"
                DELETE FROM route_packages rp
                USING routes r
                WHERE rp.route_id = r.id AND rp.package_id = $1 AND r.user_id <> $2
                "#,
            )
            .bind(package.id)
            .bind(package.user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(package)
    }

    /// Marcar/desmarcar como entregado. Idempotente.
    pub async fn set_delivered(
        &self,
        id: Uuid,
        user_id: Uuid,
        delivered: bool,
    ) -> Result<Option<Package>, AppError> {
        let query = format!(
            r#"
            UPDATE packages SET delivered = $3
            WHERE id = $1 AND user_id = $2 AND deleted = FALSE
            RETURNING {}
            "#,
            PACKAGE_COLUMNS
        );

        let package = sqlx::query_as::<_, Package>(&query)
            .bind(id)
            .bind(user_id)
            .bind(delivered)
            .fetch_optional(&self.pool)
            .await?;

        Ok(package)
    }

    /// Borrado lógico; las filas de route_packages se conservan
    pub async fn soft_delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE packages SET deleted = TRUE
            WHERE id = $1 AND deleted = FALSE AND ($2::uuid IS NULL OR user_id = $2)
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
