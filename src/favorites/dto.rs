use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::favorites::repo::{Favorite, FavoriteWithListing};
use crate::properties::repo::{Property, PropertyStatus, PropertyType};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub property_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub id: Uuid,
    pub property_id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
    pub property: ListingSummary,
}

/// Trimmed-down listing embedded in a favorite, enough for a result card.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub status: PropertyStatus,
}

impl FavoriteResponse {
    pub fn new(favorite: Favorite, property: Property) -> Self {
        Self {
            id: favorite.id,
            property_id: favorite.property_id,
            user_id: favorite.user_id,
            added_at: favorite.added_at,
            property: ListingSummary {
                id: property.id,
                title: property.title,
                description: property.description,
                price: property.price,
                kind: property.kind,
                status: property.status,
            },
        }
    }
}

impl From<FavoriteWithListing> for FavoriteResponse {
    fn from(row: FavoriteWithListing) -> Self {
        Self {
            id: row.id,
            property_id: row.property_id,
            user_id: row.user_id,
            added_at: row.added_at,
            property: ListingSummary {
                id: row.property_id,
                title: row.title,
                description: row.description,
                price: row.price,
                kind: row.kind,
                status: row.status,
            },
        }
    }
}
