use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::properties::repo::{PropertyStatus, PropertyType};

#[derive(Debug, Clone, FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub added_at: OffsetDateTime,
}

/// Favorite joined with the summary columns of its listing.
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteWithListing {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub added_at: OffsetDateTime,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[sqlx(rename = "type")]
    pub kind: PropertyType,
    pub status: PropertyStatus,
}

impl Favorite {
    pub async fn exists(
        db: &PgPool,
        user_id: Uuid,
        property_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND property_id = $2)",
        )
        .bind(user_id)
        .bind(property_id)
        .fetch_one(db)
        .await
    }

    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        property_id: Uuid,
    ) -> Result<Favorite, sqlx::Error> {
        sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (user_id, property_id)
            VALUES ($1, $2)
            RETURNING id, user_id, property_id, added_at
            "#,
        )
        .bind(user_id)
        .bind(property_id)
        .fetch_one(db)
        .await
    }

    pub async fn remove(db: &PgPool, user_id: Uuid, property_id: Uuid) -> Result<u64, sqlx::Error> {
        let res = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND property_id = $2")
            .bind(user_id)
            .bind(property_id)
            .execute(db)
            .await?;
        Ok(res.rows_affected())
    }

    pub async fn list_for_user(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<FavoriteWithListing>, sqlx::Error> {
        sqlx::query_as::<_, FavoriteWithListing>(
            r#"
            SELECT f.id, f.user_id, f.property_id, f.added_at,
                   p.title, p.description, p.price, p.type, p.status
            FROM favorites f
            JOIN properties p ON p.id = f.property_id
            WHERE f.user_id = $1
            ORDER BY f.added_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Just the listing ids, for the frontend to mark hearts in bulk.
    pub async fn property_ids(db: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>("SELECT property_id FROM favorites WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(db)
            .await
    }
}
