use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::properties::repo::{
    Image, ListingFilter, NewImage, NewProperty, Property, PropertyStatus, PropertyType,
};
use crate::users::repo::User;

/// Full listing shape returned to clients, gallery and owner included.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(rename = "type")]
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
    pub owner: Option<OwnerSummary>,
    pub images: Vec<ImageResponse>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PropertyResponse {
    pub fn assemble(property: Property, owner: Option<User>, images: Vec<Image>) -> Self {
        Self {
            id: property.id,
            title: property.title,
            description: property.description,
            price: property.price,
            kind: property.kind,
            status: property.status,
            surface: property.surface,
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            rooms: property.rooms,
            year_built: property.year_built,
            address: property.address,
            city: property.city,
            postal_code: property.postal_code,
            country: property.country,
            has_parking: property.has_parking,
            has_garden: property.has_garden,
            has_pool: property.has_pool,
            has_balcony: property.has_balcony,
            has_elevator: property.has_elevator,
            has_air_conditioning: property.has_air_conditioning,
            has_heating: property.has_heating,
            additional_features: property.additional_features,
            owner: owner.map(OwnerSummary::from),
            images: images.into_iter().map(ImageResponse::from).collect(),
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}

/// Owner contact details embedded in a listing; never the full account.
#[derive(Debug, Serialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    #[serde(rename = "nom")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telephone")]
    pub phone: Option<String>,
}

impl From<User> for OwnerSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: Uuid,
    pub url: String,
    pub is_main: bool,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        Self {
            id: image.id,
            url: image.url,
            is_main: image.is_main,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default)]
    pub status: Option<PropertyStatus>,
    pub surface: f64,
    #[serde(default)]
    pub bedrooms: Option<i32>,
    #[serde(default)]
    pub bathrooms: Option<i32>,
    #[serde(default)]
    pub rooms: Option<i32>,
    #[serde(default)]
    pub year_built: Option<i32>,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub has_parking: bool,
    #[serde(default)]
    pub has_garden: bool,
    #[serde(default)]
    pub has_pool: bool,
    #[serde(default)]
    pub has_balcony: bool,
    #[serde(default)]
    pub has_elevator: bool,
    #[serde(default)]
    pub has_air_conditioning: bool,
    #[serde(default)]
    pub has_heating: bool,
    #[serde(default)]
    pub additional_features: Option<String>,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub url: String,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub alt_text: Option<String>,
}

impl CreatePropertyRequest {
    /// Attach the caller as owner and fill in defaults for the insert.
    pub fn into_new(self, owner_id: Uuid) -> NewProperty {
        NewProperty {
            title: self.title,
            description: self.description,
            price: self.price,
            kind: self.kind,
            status: self.status.unwrap_or(PropertyStatus::Available),
            surface: self.surface,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            rooms: self.rooms,
            year_built: self.year_built,
            address: self.address,
            city: self.city,
            postal_code: self.postal_code,
            country: self.country,
            has_parking: self.has_parking,
            has_garden: self.has_garden,
            has_pool: self.has_pool,
            has_balcony: self.has_balcony,
            has_elevator: self.has_elevator,
            has_air_conditioning: self.has_air_conditioning,
            has_heating: self.has_heating,
            additional_features: self.additional_features,
            owner_id,
            images: self
                .images
                .into_iter()
                .map(|image| NewImage {
                    url: image.url,
                    is_main: image.is_main,
                    alt_text: image.alt_text,
                })
                .collect(),
        }
    }
}

/// Listing patch; a missing field leaves the stored value untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(rename = "type", default)]
    pub kind: Option<PropertyType>,
    #[serde(default)]
    pub status: Option<PropertyStatus>,
    #[serde(default)]
    pub surface: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<i32>,
    #[serde(default)]
    pub bathrooms: Option<i32>,
    #[serde(default)]
    pub rooms: Option<i32>,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub has_parking: Option<bool>,
    #[serde(default)]
    pub has_garden: Option<bool>,
    #[serde(default)]
    pub has_pool: Option<bool>,
    #[serde(default)]
    pub has_balcony: Option<bool>,
    #[serde(default)]
    pub has_elevator: Option<bool>,
    #[serde(default)]
    pub has_air_conditioning: Option<bool>,
    #[serde(default)]
    pub has_heating: Option<bool>,
    #[serde(default)]
    pub additional_features: Option<String>,
}

impl UpdatePropertyRequest {
    pub fn apply(self, property: &mut Property) {
        if let Some(title) = self.title {
            property.title = title;
        }
        if let Some(description) = self.description {
            property.description = Some(description);
        }
        if let Some(price) = self.price {
            property.price = price;
        }
        if let Some(kind) = self.kind {
            property.kind = kind;
        }
        if let Some(status) = self.status {
            property.status = status;
        }
        if let Some(surface) = self.surface {
            property.surface = surface;
        }
        if let Some(bedrooms) = self.bedrooms {
            property.bedrooms = Some(bedrooms);
        }
        if let Some(bathrooms) = self.bathrooms {
            property.bathrooms = Some(bathrooms);
        }
        if let Some(rooms) = self.rooms {
            property.rooms = Some(rooms);
        }
        if let Some(year_built) = self.year_built {
            property.year_built = Some(year_built);
        }
        if let Some(address) = self.address {
            property.address = address;
        }
        if let Some(city) = self.city {
            property.city = Some(city);
        }
        if let Some(postal_code) = self.postal_code {
            property.postal_code = Some(postal_code);
        }
        if let Some(country) = self.country {
            property.country = Some(country);
        }
        if let Some(has_parking) = self.has_parking {
            property.has_parking = has_parking;
        }
        if let Some(has_garden) = self.has_garden {
            property.has_garden = has_garden;
        }
        if let Some(has_pool) = self.has_pool {
            property.has_pool = has_pool;
        }
        if let Some(has_balcony) = self.has_balcony {
            property.has_balcony = has_balcony;
        }
        if let Some(has_elevator) = self.has_elevator {
            property.has_elevator = has_elevator;
        }
        if let Some(has_air_conditioning) = self.has_air_conditioning {
            property.has_air_conditioning = has_air_conditioning;
        }
        if let Some(has_heating) = self.has_heating {
            property.has_heating = has_heating;
        }
        if let Some(additional_features) = self.additional_features {
            property.additional_features = Some(additional_features);
        }
    }
}

/// Browse criteria taken from the query string. Empty values arrive as ""
/// from the frontend and count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    #[serde(rename = "type", default, deserialize_with = "empty_string_as_none")]
    pub kind: Option<PropertyType>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<PropertyStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_price: Option<Decimal>,
}

impl From<FilterParams> for ListingFilter {
    fn from(params: FilterParams) -> Self {
        Self {
            kind: params.kind,
            status: params.status,
            min_price: params.min_price,
            max_price: params.max_price,
        }
    }
}

fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s)
            .map_err(serde::de::Error::custom)
            .map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn sample_property() -> Property {
        Property {
            id: Uuid::new_v4(),
            title: "Villa Moderne avec Piscine".into(),
            description: Some("Magnifique villa contemporaine".into()),
            price: Decimal::new(750_000, 0),
            kind: PropertyType::Villa,
            status: PropertyStatus::Available,
            surface: 180.0,
            bedrooms: Some(4),
            bathrooms: Some(3),
            rooms: Some(6),
            year_built: Some(2018),
            address: "123 Avenue des Champs-Élysées".into(),
            city: Some("Paris".into()),
            postal_code: Some("75008".into()),
            country: Some("France".into()),
            has_parking: true,
            has_garden: true,
            has_pool: true,
            has_balcony: true,
            has_elevator: false,
            has_air_conditioning: true,
            has_heating: true,
            additional_features: Some("Cuisine équipée".into()),
            owner_id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn filter_params(uri: &str) -> FilterParams {
        let uri = uri.parse::<Uri>().unwrap();
        Query::<FilterParams>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn price_only_patch_leaves_everything_else() {
        let mut property = sample_property();
        let before = property.clone();

        let patch: UpdatePropertyRequest = serde_json::from_str(r#"{"price":500000}"#).unwrap();
        patch.apply(&mut property);

        assert_eq!(property.price, Decimal::new(500_000, 0));
        assert_eq!(property.title, before.title);
        assert_eq!(property.address, before.address);
        assert_eq!(property.kind, before.kind);
        assert_eq!(property.status, before.status);
        assert_eq!(property.has_pool, before.has_pool);
        assert_eq!(property.additional_features, before.additional_features);
    }

    #[test]
    fn patch_merges_supplied_fields() {
        let mut property = sample_property();
        let patch: UpdatePropertyRequest = serde_json::from_str(
            r#"{"status":"SOLD","hasPool":false,"yearBuilt":2021,"city":"Nice"}"#,
        )
        .unwrap();
        patch.apply(&mut property);

        assert_eq!(property.status, PropertyStatus::Sold);
        assert!(!property.has_pool);
        assert_eq!(property.year_built, Some(2021));
        assert_eq!(property.city.as_deref(), Some("Nice"));
        assert_eq!(property.title, "Villa Moderne avec Piscine");
    }

    #[test]
    fn filter_params_treat_empty_values_as_absent() {
        let params = filter_params("/api/properties/filter?type=&status=&minPrice=400000");
        assert!(params.kind.is_none());
        assert!(params.status.is_none());
        assert_eq!(params.min_price, Some(Decimal::new(400_000, 0)));
        assert!(params.max_price.is_none());
    }

    #[test]
    fn filter_params_parse_full_criteria() {
        let params =
            filter_params("/api/properties/filter?type=VILLA&status=AVAILABLE&minPrice=100000&maxPrice=900000");
        assert_eq!(params.kind, Some(PropertyType::Villa));
        assert_eq!(params.status, Some(PropertyStatus::Available));
        assert_eq!(params.min_price, Some(Decimal::new(100_000, 0)));
        assert_eq!(params.max_price, Some(Decimal::new(900_000, 0)));
    }

    #[test]
    fn filter_params_reject_unknown_type() {
        let uri = "/api/properties/filter?type=CASTLE".parse::<Uri>().unwrap();
        assert!(Query::<FilterParams>::try_from_uri(&uri).is_err());
    }

    #[test]
    fn response_wire_shape() {
        let property = sample_property();
        let owner = User {
            id: property.owner_id,
            name: "Client1 test".into(),
            email: "client1@example.com".into(),
            password_hash: "hash".into(),
            phone: Some("+0987654321".into()),
            role: crate::users::repo::Role::User,
            enabled: true,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let images = vec![Image {
            id: Uuid::new_v4(),
            url: "https://images.example.com/villa.jpg".into(),
            is_main: true,
            alt_text: Some("Vue extérieure".into()),
            property_id: property.id,
            position: 0,
        }];

        let json =
            serde_json::to_value(PropertyResponse::assemble(property, Some(owner), images)).unwrap();
        assert_eq!(json["type"], "VILLA");
        assert_eq!(json["price"], "750000");
        assert_eq!(json["yearBuilt"], 2018);
        assert_eq!(json["postalCode"], "75008");
        assert_eq!(json["hasAirConditioning"], true);
        assert_eq!(json["owner"]["nom"], "Client1 test");
        assert_eq!(json["owner"]["telephone"], "+0987654321");
        assert_eq!(json["images"][0]["isMain"], true);
        assert!(json["images"][0].get("altText").is_none());
        assert!(json["createdAt"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn create_request_fills_defaults() {
        let request: CreatePropertyRequest = serde_json::from_str(
            r#"{"title":"Studio","price":180000,"type":"APARTMENT","surface":25.0,"address":"12 Rue Victor Hugo","images":[{"url":"https://img/1.jpg"}]}"#,
        )
        .unwrap();
        let new = request.into_new(Uuid::new_v4());

        assert_eq!(new.status, PropertyStatus::Available);
        assert_eq!(new.surface, 25.0);
        assert_eq!(new.address, "12 Rue Victor Hugo");
        assert!(!new.has_parking);
        assert!(!new.has_heating);
        assert_eq!(new.images.len(), 1);
        assert!(!new.images[0].is_main);
        assert!(new.images[0].alt_text.is_none());
    }

    #[test]
    fn create_request_requires_surface_and_address() {
        let missing: Result<CreatePropertyRequest, _> =
            serde_json::from_str(r#"{"title":"Studio","price":180000,"type":"APARTMENT"}"#);
        assert!(missing.is_err());
    }
}
