use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub struct NewCar {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

/// The owner is always the authenticated caller; there is no code path that
/// accepts an owner from the client.
pub async fn create(db: &PgPool, user_id: Uuid, car: NewCar) -> sqlx::Result<Car> {
    sqlx::query_as::<_, Car>(
        r#"
        INSERT INTO cars (user_id, title, description, tags, images)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, title, description, tags, images, created_at
        "#,
    )
    .bind(user_id)
    .bind(car.title)
    .bind(car.description)
    .bind(&car.tags)
    .bind(&car.images)
    .fetch_one(db)
    .await
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Car>> {
    sqlx::query_as::<_, Car>(
        r#"
        SELECT id, user_id, title, description, tags, images, created_at
        FROM cars
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Owner-scoped lookup shared by get, update and delete. Filtering on both
/// id and owner in one query makes a foreign car indistinguishable from a
/// nonexistent one.
pub async fn find_owned(db: &PgPool, user_id: Uuid, car_id: Uuid) -> sqlx::Result<Option<Car>> {
    sqlx::query_as::<_, Car>(
        r#"
        SELECT id, user_id, title, description, tags, images, created_at
        FROM cars
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(car_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// Persist the mutable fields of an already-merged record. Concurrent
/// updates to the same car are last-write-wins.
pub async fn save(db: &PgPool, car: &Car) -> sqlx::Result<Car> {
    sqlx::query_as::<_, Car>(
        r#"
        UPDATE cars
        SET title = $3, description = $4, tags = $5, images = $6
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, title, description, tags, images, created_at
        "#,
    )
    .bind(car.id)
    .bind(car.user_id)
    .bind(&car.title)
    .bind(&car.description)
    .bind(&car.tags)
    .bind(&car.images)
    .fetch_one(db)
    .await
}

/// Returns false when nothing matched, i.e. absent or not owned by the
/// caller. Deletion is permanent; there is no soft delete.
pub async fn delete_owned(db: &PgPool, user_id: Uuid, car_id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM cars
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(car_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}
