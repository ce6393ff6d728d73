use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::addb::AdSearchFilters,
    models::admodel::{AdCategory, AdImage, AdType, Advertisement},
    utils::decimal::{parse_decimal_filter, parse_int_filter},
};

fn text_filter(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

/// Raw query parameters for the advertisement list view. Every field is
/// optional; numeric values that fail to parse behave as if they were
/// omitted, while category and ad_type pass through verbatim so an
/// unrecognized label selects nothing rather than everything.
#[derive(Debug, Default, Deserialize)]
pub struct AdListQueryDto {
    pub category: Option<String>,
    pub ad_type: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
}

impl AdListQueryDto {
    pub fn to_filters(&self) -> AdSearchFilters {
        AdSearchFilters {
            category: text_filter(self.category.as_deref()),
            ad_type: text_filter(self.ad_type.as_deref()),
            location: text_filter(self.location.as_deref()),
            min_price: parse_decimal_filter(self.min_price.as_deref()),
            max_price: parse_decimal_filter(self.max_price.as_deref()),
            search: text_filter(self.q.as_deref()),
        }
    }

    pub fn parse_page(&self) -> Option<u64> {
        parse_int_filter(self.page.as_deref()).and_then(|p| u64::try_from(p).ok())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewAdImageDto {
    #[validate(length(min = 1, max = 500, message = "Image URL is required"))]
    pub image_url: String,
    #[validate(length(max = 200, message = "Caption must be at most 200 characters"))]
    pub caption: Option<String>,
    pub is_main: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub category: AdCategory,
    pub ad_type: AdType,
    pub price: Option<BigDecimal>,

    #[validate(length(min = 1, max = 100, message = "Contact name is required"))]
    pub contact_name: String,

    #[validate(length(min = 1, max = 20, message = "Contact phone is required"))]
    pub contact_phone: String,

    #[validate(email(message = "Contact email is invalid"))]
    pub contact_email: String,

    #[validate(length(min = 1, max = 200, message = "Location is required"))]
    pub location: String,

    #[validate(length(max = 300, message = "Address must be at most 300 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 50, message = "Condition must be at most 50 characters"))]
    pub condition: Option<String>,

    #[validate(length(max = 100, message = "Brand must be at most 100 characters"))]
    pub brand: Option<String>,

    pub posted_by: Option<Uuid>,
    pub is_featured: Option<bool>,

    #[validate]
    #[serde(default)]
    pub images: Vec<NewAdImageDto>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAdDto {
    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,

    pub category: Option<AdCategory>,
    pub ad_type: Option<AdType>,
    pub price: Option<BigDecimal>,

    #[validate(length(min = 1, max = 100, message = "Contact name must not be empty"))]
    pub contact_name: Option<String>,

    #[validate(length(min = 1, max = 20, message = "Contact phone must not be empty"))]
    pub contact_phone: Option<String>,

    #[validate(email(message = "Contact email is invalid"))]
    pub contact_email: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Location must not be empty"))]
    pub location: Option<String>,

    pub address: Option<String>,
    pub condition: Option<String>,
    pub brand: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct FilterAdDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: AdCategory,
    pub ad_type: AdType,
    pub price: Option<BigDecimal>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub location: String,
    pub address: Option<String>,
    pub condition: Option<String>,
    pub brand: Option<String>,
    pub is_featured: bool,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FilterAdDto {
    pub fn from_ad(ad: &Advertisement) -> Self {
        Self {
            id: ad.id,
            title: ad.title.clone(),
            description: ad.description.clone(),
            category: ad.category,
            ad_type: ad.ad_type,
            price: ad.price.clone(),
            contact_name: ad.contact_name.clone(),
            contact_phone: ad.contact_phone.clone(),
            contact_email: ad.contact_email.clone(),
            location: ad.location.clone(),
            address: ad.address.clone(),
            condition: ad.condition.clone(),
            brand: ad.brand.clone(),
            is_featured: ad.is_featured,
            views_count: ad.views_count,
            created_at: ad.created_at,
            updated_at: ad.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdImageDto {
    pub id: Uuid,
    pub image_url: String,
    pub caption: String,
    pub is_main: bool,
    pub display_order: i32,
}

impl AdImageDto {
    pub fn from_image(image: &AdImage) -> Self {
        Self {
            id: image.id,
            image_url: image.image_url.clone(),
            caption: image.caption.clone(),
            is_main: image.is_main,
            display_order: image.display_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn empty_query_imposes_no_constraints() {
        let filters = AdListQueryDto::default().to_filters();
        assert!(filters.category.is_none());
        assert!(filters.ad_type.is_none());
        assert!(filters.location.is_none());
        assert!(filters.min_price.is_none());
        assert!(filters.max_price.is_none());
        assert!(filters.search.is_none());
    }

    #[test]
    fn provided_values_become_filters() {
        let query = AdListQueryDto {
            category: Some("jobs".to_string()),
            ad_type: Some("rent".to_string()),
            location: Some("Austin".to_string()),
            min_price: Some("100".to_string()),
            max_price: Some("250.50".to_string()),
            q: Some("bicycle".to_string()),
            page: Some("2".to_string()),
        };

        let filters = query.to_filters();
        assert_eq!(filters.category.as_deref(), Some("jobs"));
        assert_eq!(filters.ad_type.as_deref(), Some("rent"));
        assert_eq!(filters.location.as_deref(), Some("Austin"));
        assert_eq!(filters.min_price, Some(BigDecimal::from(100)));
        assert_eq!(filters.max_price, BigDecimal::from_str("250.50").ok());
        assert_eq!(filters.search.as_deref(), Some("bicycle"));
        assert_eq!(query.parse_page(), Some(2));
    }

    #[test]
    fn malformed_numerics_behave_like_absent_ones() {
        let query = AdListQueryDto {
            ad_type: Some("".to_string()),
            min_price: Some("free".to_string()),
            max_price: Some("1,000".to_string()),
            page: Some("last".to_string()),
            ..Default::default()
        };

        let filters = query.to_filters();
        assert!(filters.ad_type.is_none());
        assert!(filters.min_price.is_none());
        assert!(filters.max_price.is_none());
        assert_eq!(query.parse_page(), None);
    }

    #[test]
    fn unrecognized_category_stays_a_filter() {
        // "spaceships" is not a category label; the value must survive to
        // the query so it selects zero rows instead of all of them.
        let query = AdListQueryDto {
            category: Some("spaceships".to_string()),
            ..Default::default()
        };

        let filters = query.to_filters();
        assert_eq!(filters.category.as_deref(), Some("spaceships"));
    }

    #[test]
    fn inverted_price_range_is_preserved() {
        // min above max stays as-is; the conjunction of both bounds then
        // matches nothing, which is what the request asked for.
        let query = AdListQueryDto {
            min_price: Some("500".to_string()),
            max_price: Some("100".to_string()),
            ..Default::default()
        };

        let filters = query.to_filters();
        assert_eq!(filters.min_price, Some(BigDecimal::from(500)));
        assert_eq!(filters.max_price, Some(BigDecimal::from(100)));
    }

    #[test]
    fn blank_strings_are_not_filters() {
        let query = AdListQueryDto {
            location: Some("   ".to_string()),
            q: Some("".to_string()),
            ..Default::default()
        };

        let filters = query.to_filters();
        assert!(filters.location.is_none());
        assert!(filters.search.is_none());
    }
}
