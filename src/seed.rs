//! Demo accounts and listings so a fresh environment has something to
//! browse. Each table is checked on its own, so only the missing half
//! gets filled in.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::properties::repo::{NewImage, NewProperty, Property, PropertyStatus, PropertyType};
use crate::state::AppState;
use crate::users::repo::{Role, User};

const DEMO_PASSWORD: &str = "123456";

struct DemoAccount {
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    role: Role,
}

struct DemoImage {
    url: &'static str,
    is_main: bool,
    alt_text: &'static str,
}

struct DemoListing {
    owner_email: &'static str,
    title: &'static str,
    description: &'static str,
    price: i64,
    kind: PropertyType,
    status: PropertyStatus,
    surface: f64,
    bedrooms: i32,
    bathrooms: i32,
    rooms: i32,
    year_built: i32,
    address: &'static str,
    city: &'static str,
    postal_code: &'static str,
    country: &'static str,
    has_parking: bool,
    has_garden: bool,
    has_pool: bool,
    has_balcony: bool,
    has_elevator: bool,
    has_air_conditioning: bool,
    has_heating: bool,
    additional_features: &'static str,
    images: Vec<DemoImage>,
}

impl DemoListing {
    fn into_new(self, owner_id: Uuid) -> NewProperty {
        NewProperty {
            title: self.title.to_string(),
            description: Some(self.description.to_string()),
            price: Decimal::new(self.price, 0),
            kind: self.kind,
            status: self.status,
            surface: self.surface,
            bedrooms: Some(self.bedrooms),
            bathrooms: Some(self.bathrooms),
            rooms: Some(self.rooms),
            year_built: Some(self.year_built),
            address: self.address.to_string(),
            city: Some(self.city.to_string()),
            postal_code: Some(self.postal_code.to_string()),
            country: Some(self.country.to_string()),
            has_parking: self.has_parking,
            has_garden: self.has_garden,
            has_pool: self.has_pool,
            has_balcony: self.has_balcony,
            has_elevator: self.has_elevator,
            has_air_conditioning: self.has_air_conditioning,
            has_heating: self.has_heating,
            additional_features: Some(self.additional_features.to_string()),
            owner_id,
            images: self
                .images
                .into_iter()
                .map(|image| NewImage {
                    url: image.url.to_string(),
                    is_main: image.is_main,
                    alt_text: Some(image.alt_text.to_string()),
                })
                .collect(),
        }
    }
}

/// The seeding phases a database still needs. Accounts and listings are
/// checked independently; surviving accounts never block listing seeding.
struct SeedPlan {
    accounts: bool,
    listings: bool,
}

impl SeedPlan {
    fn new(user_count: i64, property_count: i64) -> Self {
        SeedPlan {
            accounts: user_count == 0,
            listings: property_count == 0,
        }
    }
}

/// Seeds whatever demo data the database is missing.
pub async fn run(state: &AppState) -> Result<()> {
    let plan = SeedPlan::new(
        User::count(&state.db).await.context("count users")?,
        Property::count(&state.db).await.context("count properties")?,
    );

    if plan.accounts {
        seed_accounts(state).await?;
    } else {
        info!("accounts already present");
    }
    if plan.listings {
        seed_listings(state).await?;
    }

    Ok(())
}

async fn seed_accounts(state: &AppState) -> Result<()> {
    let password_hash = hash_password(DEMO_PASSWORD)?;
    let accounts = demo_accounts();
    let account_count = accounts.len();
    for account in accounts {
        User::create(
            &state.db,
            account.name,
            account.email,
            &password_hash,
            Some(account.phone),
            account.role,
        )
        .await
        .with_context(|| format!("seed account {}", account.email))?;
    }
    info!(count = account_count, "demo accounts created");
    Ok(())
}

async fn seed_listings(state: &AppState) -> Result<()> {
    let listings = demo_listings();
    let listing_count = listings.len();
    for listing in listings {
        let owner = User::find_by_email(&state.db, listing.owner_email)
            .await?
            .with_context(|| format!("demo owner {} missing", listing.owner_email))?;
        let title = listing.title;
        Property::create_with_images(&state.db, listing.into_new(owner.id))
            .await
            .with_context(|| format!("seed listing {title}"))?;
    }
    info!(count = listing_count, "demo listings created");
    Ok(())
}

fn demo_accounts() -> Vec<DemoAccount> {
    vec![
        DemoAccount {
            name: "Admin User",
            email: "admin@example.com",
            phone: "+1234567890",
            role: Role::Admin,
        },
        DemoAccount {
            name: "Client1 test",
            email: "client1@example.com",
            phone: "+0987654321",
            role: Role::User,
        },
        DemoAccount {
            name: "Client2 test",
            email: "client2@example.com",
            phone: "+0987654321",
            role: Role::User,
        },
        DemoAccount {
            name: "Client3 test",
            email: "client3@example.com",
            phone: "+0987654321",
            role: Role::User,
        },
        DemoAccount {
            name: "Client4 test",
            email: "client4@example.com",
            phone: "+0987654321",
            role: Role::User,
        },
        DemoAccount {
            name: "Client5 test",
            email: "client5@example.com",
            phone: "+0987654321",
            role: Role::User,
        },
    ]
}

fn demo_listings() -> Vec<DemoListing> {
    vec![
        DemoListing {
            owner_email: "client1@example.com",
            title: "Villa Moderne avec Piscine",
            description: "Magnifique villa contemporaine avec piscine privative et jardin paysager. Située dans un quartier résidentiel calme.",
            price: 750_000,
            kind: PropertyType::Villa,
            status: PropertyStatus::Available,
            surface: 180.0,
            bedrooms: 4,
            bathrooms: 3,
            rooms: 6,
            year_built: 2018,
            address: "123 Avenue des Champs-Élysées",
            city: "Paris",
            postal_code: "75008",
            country: "France",
            has_parking: true,
            has_garden: true,
            has_pool: true,
            has_balcony: true,
            has_elevator: false,
            has_air_conditioning: true,
            has_heating: true,
            additional_features: "Cuisine équipée, dressing, cave à vin",
            images: vec![
                DemoImage {
                    url: "https://images.unsplash.com/photo-1580587771525-78b9dba3b914?w=800",
                    is_main: true,
                    alt_text: "Vue extérieure de la villa moderne",
                },
                DemoImage {
                    url: "https://images.unsplash.com/photo-1570129477492-45c003edd2be?w=800",
                    is_main: false,
                    alt_text: "Piscine privative et jardin paysager",
                },
                DemoImage {
                    url: "https://images.unsplash.com/photo-1600585154340-be6161a56a0c?w=800",
                    is_main: false,
                    alt_text: "Intérieur salon spacieux",
                },
            ],
        },
        DemoListing {
            owner_email: "client2@example.com",
            title: "Appartement Centre-Ville Lumineux",
            description: "Bel appartement lumineux au cœur de la ville, proche de tous les commerces et transports.",
            price: 350_000,
            kind: PropertyType::Apartment,
            status: PropertyStatus::Available,
            surface: 75.0,
            bedrooms: 2,
            bathrooms: 1,
            rooms: 3,
            year_built: 2015,
            address: "45 Rue de la République",
            city: "Lyon",
            postal_code: "69001",
            country: "France",
            has_parking: false,
            has_garden: false,
            has_pool: false,
            has_balcony: true,
            has_elevator: true,
            has_air_conditioning: true,
            has_heating: true,
            additional_features: "Double vitrage, parquet, cuisine aménagée",
            images: vec![
                DemoImage {
                    url: "https://images.unsplash.com/photo-1501183638710-841dd1904471?w=800",
                    is_main: true,
                    alt_text: "Vue d'ensemble de l'appartement lumineux",
                },
                DemoImage {
                    url: "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800",
                    is_main: false,
                    alt_text: "Chambre avec lumière naturelle",
                },
                DemoImage {
                    url: "https://images.unsplash.com/photo-1527030280862-64139fba04ca?w=800",
                    is_main: false,
                    alt_text: "Cuisine aménagée moderne",
                },
            ],
        },
        DemoListing {
            owner_email: "client3@example.com",
            title: "Maison de Famille Spacieuse",
            description: "Parfaite pour une famille, cette maison offre 4 chambres et un grand jardin arboré.",
            price: 520_000,
            kind: PropertyType::House,
            status: PropertyStatus::Pending,
            surface: 140.0,
            bedrooms: 4,
            bathrooms: 2,
            rooms: 5,
            year_built: 2005,
            address: "78 Rue du Général Leclerc",
            city: "Marseille",
            postal_code: "13001",
            country: "France",
            has_parking: true,
            has_garden: true,
            has_pool: false,
            has_balcony: false,
            has_elevator: false,
            has_air_conditioning: false,
            has_heating: true,
            additional_features: "Garage, cave, buanderie",
            images: vec![
                DemoImage {
                    url: "https://images.unsplash.com/photo-1572120360610-d971b9d7767c?w=800",
                    is_main: true,
                    alt_text: "Façade de la maison familiale spacieuse",
                },
                DemoImage {
                    url: "https://images.unsplash.com/photo-1600210492493-0946911123ea?w=800",
                    is_main: false,
                    alt_text: "Grand jardin arboré",
                },
                DemoImage {
                    url: "https://www.silencecapousse-chezvous.fr/media/images/15392/rectangle/w900/1587397108/BaseCreerJardin2.jpg",
                    is_main: false,
                    alt_text: "Chambre pour enfants",
                },
                DemoImage {
                    url: "https://images.unsplash.com/photo-1600607687938-2a115d8e9f69?w=800",
                    is_main: false,
                    alt_text: "Cuisine familiale fonctionnelle",
                },
            ],
        },
        DemoListing {
            owner_email: "client4@example.com",
            title: "Duplex avec Terrasse Panoramique",
            description: "Superbe duplex avec grande terrasse offrant une vue panoramique sur la ville.",
            price: 420_000,
            kind: PropertyType::Apartment,
            status: PropertyStatus::Available,
            surface: 95.0,
            bedrooms: 3,
            bathrooms: 2,
            rooms: 4,
            year_built: 2020,
            address: "22 Boulevard Saint-Germain",
            city: "Paris",
            postal_code: "75005",
            country: "France",
            has_parking: true,
            has_garden: false,
            has_pool: false,
            has_balcony: true,
            has_elevator: true,
            has_air_conditioning: true,
            has_heating: true,
            additional_features: "Terrasse 25m², vue panoramique, domotique",
            images: vec![
                DemoImage {
                    url: "https://images.unsplash.com/photo-1600585154526-990dced4db0d?w=800",
                    is_main: true,
                    alt_text: "Terrasse panoramique avec vue sur la ville",
                },
                DemoImage {
                    url: "https://images.unsplash.com/photo-1600566752355-35792c689b4b?w=800",
                    is_main: false,
                    alt_text: "Vue imprenable depuis la terrasse",
                },
                DemoImage {
                    url: "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=800",
                    is_main: false,
                    alt_text: "Intérieur moderne du duplex",
                },
            ],
        },
        DemoListing {
            owner_email: "client5@example.com",
            title: "Studio Étudiant Proche Université",
            description: "Studio fonctionnel idéal pour étudiant, proche des universités et commodités.",
            price: 180_000,
            kind: PropertyType::Apartment,
            status: PropertyStatus::Sold,
            surface: 25.0,
            bedrooms: 1,
            bathrooms: 1,
            rooms: 1,
            year_built: 2010,
            address: "15 Rue de l'Université",
            city: "Toulouse",
            postal_code: "31000",
            country: "France",
            has_parking: false,
            has_garden: false,
            has_pool: false,
            has_balcony: false,
            has_elevator: true,
            has_air_conditioning: false,
            has_heating: true,
            additional_features: "Mezzanine, internet fibre inclus",
            images: vec![
                DemoImage {
                    url: "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800",
                    is_main: true,
                    alt_text: "Studio compact et fonctionnel",
                },
                DemoImage {
                    url: "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=800",
                    is_main: false,
                    alt_text: "Mezzanine pour espace supplémentaire",
                },
            ],
        },
    ]
}
