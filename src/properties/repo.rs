use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

const PROPERTY_COLUMNS: &str = "id, title, description, price, type, status, surface, bedrooms, \
     bathrooms, rooms, year_built, address, city, postal_code, country, has_parking, has_garden, \
     has_pool, has_balcony, has_elevator, has_air_conditioning, has_heating, additional_features, \
     owner_id, created_at, updated_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyType {
    Apartment,
    House,
    Villa,
    Office,
    Commercial,
    Land,
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "APARTMENT" => Ok(Self::Apartment),
            "HOUSE" => Ok(Self::House),
            "VILLA" => Ok(Self::Villa),
            "OFFICE" => Ok(Self::Office),
            "COMMERCIAL" => Ok(Self::Commercial),
            "LAND" => Ok(Self::Land),
            other => Err(format!("unknown property type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyStatus {
    Available,
    Pending,
    Rented,
    Sold,
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(Self::Available),
            "PENDING" => Ok(Self::Pending),
            "RENTED" => Ok(Self::Rented),
            "SOLD" => Ok(Self::Sold),
            other => Err(format!("unknown property status: {other}")),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Property {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[sqlx(rename = "type")]
    pub kind: PropertyType,
    pub status: PropertyStatus,
    pub surface: f64,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub rooms: Option<i32>,
    pub year_built: Option<i32>,
    pub address: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub has_parking: bool,
    pub has_garden: bool,
    pub has_pool: bool,
    pub has_balcony: bool,
    pub has_elevator: bool,
    pub has_air_conditioning: bool,
    pub has_heating: bool,
    pub additional_features: Option<String>,
    pub owner_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Image {
    pub id: Uuid,
    pub url: String,
    pub is_main: bool,
    pub alt_text: Option<String>,
    pub property_id: Uuid,
    pub position: i32,
}

/// Payload for inserting a listing together with its gallery in one
/// transaction.
#[derive(Debug)]
pub struct NewProperty {
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub kind: PropertyType,
    pub status: PropertyStatus,
    pub surface: f64,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub rooms: Option<i32>,
    pub year_built: Option<i32>,
    pub address: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub has_parking: bool,
    pub has_garden: bool,
    pub has_pool: bool,
    pub has_balcony: bool,
    pub has_elevator: bool,
    pub has_air_conditioning: bool,
    pub has_heating: bool,
    pub additional_features: Option<String>,
    pub owner_id: Uuid,
    pub images: Vec<NewImage>,
}

#[derive(Debug)]
pub struct NewImage {
    pub url: String,
    pub is_main: bool,
    pub alt_text: Option<String>,
}

/// Optional, conjunctive search criteria; an absent field does not
/// constrain the result.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListingFilter {
    pub kind: Option<PropertyType>,
    pub status: Option<PropertyStatus>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

fn filter_query(filter: &ListingFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT {PROPERTY_COLUMNS} FROM properties WHERE 1=1"
    ));
    if let Some(kind) = filter.kind {
        builder.push(" AND type = ");
        builder.push_bind(kind);
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }
    if let Some(min) = filter.min_price {
        builder.push(" AND price >= ");
        builder.push_bind(min);
    }
    if let Some(max) = filter.max_price {
        builder.push(" AND price <= ");
        builder.push_bind(max);
    }
    builder
}

impl Property {
    pub async fn list_all(db: &PgPool) -> Result<Vec<Property>, sqlx::Error> {
        let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties");
        sqlx::query_as::<_, Property>(&sql).fetch_all(db).await
    }

    pub async fn filter(db: &PgPool, filter: &ListingFilter) -> Result<Vec<Property>, sqlx::Error> {
        let mut query = filter_query(filter);
        query.build_query_as::<Property>().fetch_all(db).await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Property>, sqlx::Error> {
        let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn count(db: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM properties")
            .fetch_one(db)
            .await
    }

    /// Inserts the listing and its images atomically; image order follows
    /// the payload order.
    pub async fn create_with_images(db: &PgPool, new: NewProperty) -> Result<Property, sqlx::Error> {
        let mut tx = db.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO properties (
                title, description, price, type, status, surface, bedrooms, bathrooms,
                rooms, year_built, address, city, postal_code, country, has_parking,
                has_garden, has_pool, has_balcony, has_elevator, has_air_conditioning,
                has_heating, additional_features, owner_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23)
            RETURNING {PROPERTY_COLUMNS}
            "#
        );
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(&new.title)
            .bind(&new.description)
            .bind(new.price)
            .bind(new.kind)
            .bind(new.status)
            .bind(new.surface)
            .bind(new.bedrooms)
            .bind(new.bathrooms)
            .bind(new.rooms)
            .bind(new.year_built)
            .bind(&new.address)
            .bind(&new.city)
            .bind(&new.postal_code)
            .bind(&new.country)
            .bind(new.has_parking)
            .bind(new.has_garden)
            .bind(new.has_pool)
            .bind(new.has_balcony)
            .bind(new.has_elevator)
            .bind(new.has_air_conditioning)
            .bind(new.has_heating)
            .bind(&new.additional_features)
            .bind(new.owner_id)
            .fetch_one(&mut *tx)
            .await?;

        for (position, image) in new.images.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO images (url, is_main, alt_text, property_id, position)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&image.url)
            .bind(image.is_main)
            .bind(&image.alt_text)
            .bind(property.id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(property)
    }

    /// Persist the mutable columns of this listing.
    pub async fn update(&self, db: &PgPool) -> Result<Property, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE properties
            SET title = $2, description = $3, price = $4, type = $5, status = $6,
                surface = $7, bedrooms = $8, bathrooms = $9, rooms = $10, year_built = $11,
                address = $12, city = $13, postal_code = $14, country = $15,
                has_parking = $16, has_garden = $17, has_pool = $18, has_balcony = $19,
                has_elevator = $20, has_air_conditioning = $21, has_heating = $22,
                additional_features = $23, updated_at = now()
            WHERE id = $1
            RETURNING {PROPERTY_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Property>(&sql)
            .bind(self.id)
            .bind(&self.title)
            .bind(&self.description)
            .bind(self.price)
            .bind(self.kind)
            .bind(self.status)
            .bind(self.surface)
            .bind(self.bedrooms)
            .bind(self.bathrooms)
            .bind(self.rooms)
            .bind(self.year_built)
            .bind(&self.address)
            .bind(&self.city)
            .bind(&self.postal_code)
            .bind(&self.country)
            .bind(self.has_parking)
            .bind(self.has_garden)
            .bind(self.has_pool)
            .bind(self.has_balcony)
            .bind(self.has_elevator)
            .bind(self.has_air_conditioning)
            .bind(self.has_heating)
            .bind(&self.additional_features)
            .fetch_one(db)
            .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
        let res = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected())
    }
}

impl Image {
    /// Galleries for a batch of listings, ordered so each listing keeps its
    /// upload order.
    pub async fn for_properties(db: &PgPool, ids: &[Uuid]) -> Result<Vec<Image>, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            r#"
            SELECT id, url, is_main, alt_text, property_id, position
            FROM images
            WHERE property_id = ANY($1)
            ORDER BY position
            "#,
        )
        .bind(ids)
        .fetch_all(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_query_without_criteria_selects_everything() {
        let sql = filter_query(&ListingFilter::default()).into_sql();
        assert!(sql.ends_with("WHERE 1=1"));
        assert!(!sql.contains("AND"));
    }

    #[test]
    fn filter_query_binds_only_min_price() {
        let filter = ListingFilter {
            min_price: Some(Decimal::new(400_000, 0)),
            ..Default::default()
        };
        let sql = filter_query(&filter).into_sql();
        assert!(sql.contains("price >= $1"));
        assert!(!sql.contains("price <="));
        assert!(!sql.contains("type ="));
        assert!(!sql.contains("status ="));
    }

    #[test]
    fn filter_query_combines_all_criteria() {
        let filter = ListingFilter {
            kind: Some(PropertyType::Villa),
            status: Some(PropertyStatus::Available),
            min_price: Some(Decimal::new(100_000, 0)),
            max_price: Some(Decimal::new(900_000, 0)),
        };
        let sql = filter_query(&filter).into_sql();
        assert!(sql.contains("type = $1"));
        assert!(sql.contains("status = $2"));
        assert!(sql.contains("price >= $3"));
        assert!(sql.contains("price <= $4"));
    }

    #[test]
    fn property_type_parses_wire_values() {
        assert_eq!("APARTMENT".parse::<PropertyType>(), Ok(PropertyType::Apartment));
        assert_eq!("villa".parse::<PropertyType>(), Ok(PropertyType::Villa));
        assert!("CASTLE".parse::<PropertyType>().is_err());
    }

    #[test]
    fn property_status_parses_wire_values() {
        assert_eq!("SOLD".parse::<PropertyStatus>(), Ok(PropertyStatus::Sold));
        assert!("UNKNOWN".parse::<PropertyStatus>().is_err());
    }

    #[test]
    fn enums_serialize_uppercase() {
        assert_eq!(serde_json::to_value(PropertyType::Apartment).unwrap(), "APARTMENT");
        assert_eq!(serde_json::to_value(PropertyStatus::Available).unwrap(), "AVAILABLE");
    }
}
