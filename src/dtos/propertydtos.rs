use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::propertydb::PropertySearchFilters,
    models::propertymodel::{ListingType, Property, PropertyImage, PropertyType},
    utils::decimal::{parse_decimal_filter, parse_int_filter},
};

fn text_filter(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

/// Enum-valued parameters pass through verbatim; an unrecognized label
/// selects nothing rather than everything.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyListQueryDto {
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub city: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub bedrooms: Option<String>,
    pub page: Option<String>,
}

impl PropertyListQueryDto {
    pub fn to_filters(&self) -> PropertySearchFilters {
        PropertySearchFilters {
            property_type: text_filter(self.property_type.as_deref()),
            listing_type: text_filter(self.listing_type.as_deref()),
            city: text_filter(self.city.as_deref()),
            min_price: parse_decimal_filter(self.min_price.as_deref()),
            max_price: parse_decimal_filter(self.max_price.as_deref()),
            bedrooms: parse_int_filter(self.bedrooms.as_deref())
                .and_then(|b| i32::try_from(b).ok()),
            search: None,
        }
    }

    pub fn parse_page(&self) -> Option<u64> {
        parse_int_filter(self.page.as_deref()).and_then(|p| u64::try_from(p).ok())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQueryDto {
    pub q: Option<String>,
    pub page: Option<String>,
}

impl SearchQueryDto {
    pub fn query(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(String::from)
    }

    pub fn parse_page(&self) -> Option<u64> {
        parse_int_filter(self.page.as_deref()).and_then(|p| u64::try_from(p).ok())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewPropertyImageDto {
    #[validate(length(min = 1, max = 500, message = "Image URL is required"))]
    pub image_url: String,
    #[validate(length(max = 200, message = "Caption must be at most 200 characters"))]
    pub caption: Option<String>,
    pub is_main: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePropertyDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub property_type: PropertyType,
    pub listing_type: ListingType,
    pub price: BigDecimal,

    #[validate(length(min = 1, max = 300, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,

    #[validate(length(min = 1, max = 100, message = "State is required"))]
    pub state: String,

    #[validate(length(min = 1, max = 20, message = "Zip code is required"))]
    pub zip_code: String,

    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,

    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_sqft: i32,

    #[validate(length(min = 1, max = 100, message = "Contact name is required"))]
    pub contact_name: String,

    #[validate(length(min = 1, max = 20, message = "Contact phone is required"))]
    pub contact_phone: String,

    #[validate(email(message = "Contact email is invalid"))]
    pub contact_email: String,

    pub is_featured: Option<bool>,

    #[validate]
    #[serde(default)]
    pub images: Vec<NewPropertyImageDto>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePropertyDto {
    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,

    pub property_type: Option<PropertyType>,
    pub listing_type: Option<ListingType>,
    pub price: Option<BigDecimal>,

    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,

    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_sqft: Option<i32>,

    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,

    #[validate(email(message = "Contact email is invalid"))]
    pub contact_email: Option<String>,

    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct FilterPropertyDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub listing_type: ListingType,
    pub price: BigDecimal,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area_sqft: i32,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FilterPropertyDto {
    pub fn from_property(property: &Property) -> Self {
        Self {
            id: property.id,
            title: property.title.clone(),
            description: property.description.clone(),
            property_type: property.property_type,
            listing_type: property.listing_type,
            price: property.price.clone(),
            address: property.address.clone(),
            city: property.city.clone(),
            state: property.state.clone(),
            zip_code: property.zip_code.clone(),
            latitude: property.latitude.clone(),
            longitude: property.longitude.clone(),
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            area_sqft: property.area_sqft,
            contact_name: property.contact_name.clone(),
            contact_phone: property.contact_phone.clone(),
            contact_email: property.contact_email.clone(),
            is_featured: property.is_featured,
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PropertyImageDto {
    pub id: Uuid,
    pub image_url: String,
    pub caption: String,
    pub is_main: bool,
    pub display_order: i32,
}

impl PropertyImageDto {
    pub fn from_image(image: &PropertyImage) -> Self {
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

    #[test]
    fn bedrooms_is_a_lower_bound_filter() {
        let query = PropertyListQueryDto {
            bedrooms: Some("3".to_string()),
            ..Default::default()
        };
        assert_eq!(query.to_filters().bedrooms, Some(3));
    }

    #[test]
    fn malformed_bedrooms_and_prices_are_ignored() {
        let query = PropertyListQueryDto {
            bedrooms: Some("many".to_string()),
            min_price: Some("1e".to_string()),
            max_price: Some("$500".to_string()),
            ..Default::default()
        };

        let filters = query.to_filters();
        assert!(filters.bedrooms.is_none());
        assert!(filters.min_price.is_none());
        assert!(filters.max_price.is_none());
    }

    #[test]
    fn enum_labels_pass_through_verbatim() {
        let query = PropertyListQueryDto {
            property_type: Some(" condo ".to_string()),
            listing_type: Some("rent".to_string()),
            ..Default::default()
        };

        let filters = query.to_filters();
        assert_eq!(filters.property_type.as_deref(), Some("condo"));
        assert_eq!(filters.listing_type.as_deref(), Some("rent"));
    }

    #[test]
    fn unrecognized_property_type_stays_a_filter() {
        let query = PropertyListQueryDto {
            property_type: Some("castle".to_string()),
            ..Default::default()
        };
        assert_eq!(query.to_filters().property_type.as_deref(), Some("castle"));
    }

    #[test]
    fn blank_search_query_is_absent() {
        let query = SearchQueryDto {
            q: Some("  ".to_string()),
            page: None,
        };
        assert!(query.query().is_none());
    }
}
