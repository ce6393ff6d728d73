use sqlx::types::chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::BigDecimal, FromRow};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "ad_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdCategory {
    Property,
    Vehicles,
    Electronics,
    Furniture,
    Clothing,
    Services,
    Jobs,
    Education,
    Pets,
    Other,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "ad_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    Sell,
    Buy,
    Rent,
    Service,
    Job,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Advertisement {
    pub id: Uuid,

    // Basic information
    pub title: String,
    pub description: String,
    pub category: AdCategory,
    pub ad_type: AdType,
    pub price: Option<BigDecimal>,

    // Contact information
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,

    // Location
    pub location: String,
    pub address: Option<String>,

    // Additional details
    pub condition: Option<String>,
    pub brand: Option<String>,

    // Poster reference, optional (no user accounts in this service)
    pub posted_by: Option<Uuid>,

    pub is_active: bool,
    pub is_featured: bool,
    pub views_count: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AdImage {
    pub id: Uuid,
    pub advertisement_id: Uuid,
    pub image_url: String,
    pub caption: String,
    pub is_main: bool,
    pub display_order: i32,
}
