use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::route::{Route, RoutePackage, RouteStatus, RouteWithUser};
use crate::utils::errors::AppError;

const ROUTE_COLUMNS: &str = "id, user_id, name, status, deleted, created_at";

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crea la ruta y sus filas de route_packages en una sola transacción
    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        status: RouteStatus,
        package_ids: &[Uuid],
    ) -> Result<Route, AppError> {
        let mut tx = self.pool.begin().await?;

        ensure_packages_belong_to(&mut tx, user_id, package_ids).await?;

        let query = format!(
            r#"
            INSERT INTO routes (id, user_id, name, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ROUTE_COLUMNS
        );

        let route = sqlx::query_as::<_, Route>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(name)
            .bind(status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        insert_route_packages(&mut tx, route.id, package_ids).await?;

        tx.commit().await?;
        Ok(route)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Route>, AppError> {
        let query = format!(
            r#"
            SELECT {} FROM routes
            WHERE user_id = $1 AND deleted = FALSE
            ORDER BY created_at DESC
            "#,
            ROUTE_COLUMNS
        );

        let routes = sqlx::query_as::<_, Route>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(routes)
    }

    pub async fn list_all_with_user(&self) -> Result<Vec<RouteWithUser>, AppError> {
        let routes = sqlx::query_as::<_, RouteWithUser>(
            r#"
            SELECT r.id, r.user_id, r.name, r.status, r.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM routes r
            JOIN users u ON u.id = r.user_id
            WHERE r.deleted = FALSE
            ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    /// Busca una ruta activa; `owner` restringe al usuario asignado
    pub async fn find(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Route>, AppError> {
        let query = format!(
            r#"
            SELECT {} FROM routes
            WHERE id = $1 AND deleted = FALSE AND ($2::uuid IS NULL OR user_id = $2)
            "#,
            ROUTE_COLUMNS
        );

        let route = sqlx::query_as::<_, Route>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    /// Actualiza nombre/estado y reemplaza por completo los packages de la ruta.
    /// Todo o nada: si algún id no es válido no se modifica nada.
    pub async fn update(
        &self,
        route: &Route,
        name: &str,
        status: Option<RouteStatus>,
        package_ids: &[Uuid],
    ) -> Result<Route, AppError> {
        let mut tx = self.pool.begin().await?;

        ensure_packages_belong_to(&mut tx, route.user_id, package_ids).await?;

        let query = format!(
            r#"
            UPDATE routes
            SET name = $2, status = COALESCE($3, status)
            WHERE id = $1 AND deleted = FALSE
            RETURNING {}
            "#,
            ROUTE_COLUMNS
        );

        let updated = sqlx::query_as::<_, Route>(&query)
            .bind(route.id)
            .bind(name)
            .bind(status.map(|s| s.as_str()))
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

        sqlx::query("DELETE FROM route_packages WHERE route_id = $1")
            .bind(route.id)
            .execute(&mut *tx)
            .await?;

        insert_route_packages(&mut tx, route.id, package_ids).await?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        status: RouteStatus,
    ) -> Result<Option<Route>, AppError> {
        let query = format!(
            r#"
            UPDATE routes SET status = $3
            WHERE id = $1 AND deleted = FALSE AND ($2::uuid IS NULL OR user_id = $2)
            RETURNING {}
            "#,
            ROUTE_COLUMNS
        );

        let route = sqlx::query_as::<_, Route>(&query)
            .bind(id)
            .bind(owner)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    /// Borrado lógico; las filas de route_packages se conservan
    pub async fn soft_delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE routes SET deleted = TRUE
            WHERE id = $1 AND deleted = FALSE AND ($2::uuid IS NULL OR user_id = $2)
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Packages activos de la ruta
    pub async fn packages(&self, route_id: Uuid) -> Result<Vec<RoutePackage>, AppError> {
        let packages = sqlx::query_as::<_, RoutePackage>(
            r#"
            SELECT p.id, p.name, p.description, p.priority, p.destination_address,
                   p.latitude, p.longitude, p.delivered
            FROM route_packages rp
            JOIN routes r ON r.id = rp.route_id
            JOIN packages p ON p.id = rp.package_id
            WHERE rp.route_id = $1 AND r.deleted = FALSE AND p.deleted = FALSE
            ORDER BY p.priority DESC, p.name
            "#,
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(packages)
    }
}

/// Todos los ids deben ser packages activos asignados al usuario de la ruta
async fn ensure_packages_belong_to(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    package_ids: &[Uuid],
) -> Result<(), AppError> {
    if package_ids.is_empty() {
        return Ok(());
    }

    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM packages
        WHERE id = ANY($1) AND user_id = $2 AND deleted = FALSE
        "#,
    )
    .bind(package_ids)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    if count as usize != package_ids.len() {
        return Err(AppError::BadRequest(
            "Some packages do not exist or are not assigned to the route's user".to_string(),
        ));
    }

    Ok(())
}

async fn insert_route_packages(
    tx: &mut Transaction<'_, Postgres>,
    route_id: Uuid,
    package_ids: &[Uuid],
) -> Result<(), AppError> {
    if package_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO route_packages (route_id, package_id)
        SELECT $1, UNNEST($2::uuid[])
        "#,
    )
    .bind(route_id)
    .bind(package_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
