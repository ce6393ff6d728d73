use async_trait::async_trait;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    dtos::propertydtos::{CreatePropertyDto, UpdatePropertyDto},
    error::ListingError,
    models::propertymodel::{ListingType, Property, PropertyImage, PropertyType},
};

/// Enum filters hold the raw label so an unrecognized value is an
/// exact-match predicate that matches nothing, not an absent filter.
#[derive(Debug, Default, Clone)]
pub struct PropertySearchFilters {
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub city: Option<String>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub bedrooms: Option<i32>,
    pub search: Option<String>,
}

impl PropertySearchFilters {
    /// Filter set for the free-text search view: only the `q` predicate.
    pub fn for_search(query: Option<String>) -> Self {
        PropertySearchFilters {
            search: query,
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait PropertyExt {
    async fn get_active_properties(
        &self,
        filters: &PropertySearchFilters,
        limit: usize,
        offset: u64,
    ) -> Result<Vec<Property>, sqlx::Error>;

    async fn count_active_properties(
        &self,
        filters: &PropertySearchFilters,
    ) -> Result<i64, sqlx::Error>;

    async fn get_active_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn get_related_properties(
        &self,
        city: &str,
        property_type: PropertyType,
        exclude_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Property>, sqlx::Error>;

    async fn get_featured_properties(&self, limit: usize) -> Result<Vec<Property>, sqlx::Error>;

    async fn get_recent_properties(&self, limit: usize) -> Result<Vec<Property>, sqlx::Error>;

    async fn get_distinct_cities(&self) -> Result<Vec<String>, sqlx::Error>;

    async fn get_property_images(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<PropertyImage>, sqlx::Error>;

    async fn create_property(
        &self,
        property_data: CreatePropertyDto,
    ) -> Result<Property, ListingError>;

    async fn update_property(
        &self,
        property_id: Uuid,
        property_data: UpdatePropertyDto,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn deactivate_property(&self, property_id: Uuid) -> Result<bool, sqlx::Error>;
}

const PROPERTY_COLUMNS: &str = r#"
    id, title, description, property_type, listing_type, price,
    address, city, state, zip_code, latitude, longitude,
    bedrooms, bathrooms, area_sqft,
    contact_name, contact_phone, contact_email,
    is_active, is_featured, created_at, updated_at
"#;

// Enum columns compare as text so an unknown label matches zero rows.
const PROPERTY_FILTER_CLAUSE: &str = r#"
    is_active = TRUE
    AND ($1::text IS NULL OR property_type::text = $1)
    AND ($2::text IS NULL OR listing_type::text = $2)
    AND ($3::text IS NULL OR city ILIKE $3)
    AND ($4::numeric IS NULL OR price >= $4::numeric)
    AND ($5::numeric IS NULL OR price <= $5::numeric)
    AND ($6::int IS NULL OR bedrooms >= $6)
    AND ($7::text IS NULL OR title ILIKE $7 OR description ILIKE $7
         OR address ILIKE $7 OR city ILIKE $7 OR state ILIKE $7)
"#;

fn enum_param<T: std::fmt::Debug>(value: Option<T>) -> Option<String> {
    value.map(|v| format!("{:?}", v).to_lowercase())
}

// ILIKE treats \, % and _ as metacharacters; the filter means a literal
// substring, so escape them before wrapping.
fn like_param(value: Option<&String>) -> Option<String> {
    value.map(|v| {
        let escaped = v
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{}%", escaped)
    })
}

#[async_trait]
impl PropertyExt for DBClient {
    async fn get_active_properties(
        &self,
        filters: &PropertySearchFilters,
        limit: usize,
        offset: u64,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE {PROPERTY_FILTER_CLAUSE} \
             ORDER BY created_at DESC LIMIT $8 OFFSET $9"
        );

        let properties = sqlx::query_as::<_, Property>(&sql)
            .bind(filters.property_type.clone())
            .bind(filters.listing_type.clone())
            .bind(like_param(filters.city.as_ref()))
            .bind(filters.min_price.clone())
            .bind(filters.max_price.clone())
            .bind(filters.bedrooms)
            .bind(like_param(filters.search.as_ref()))
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(properties)
    }

    async fn count_active_properties(
        &self,
        filters: &PropertySearchFilters,
    ) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM properties WHERE {PROPERTY_FILTER_CLAUSE}");

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(filters.property_type.clone())
            .bind(filters.listing_type.clone())
            .bind(like_param(filters.city.as_ref()))
            .bind(filters.min_price.clone())
            .bind(filters.max_price.clone())
            .bind(filters.bedrooms)
            .bind(like_param(filters.search.as_ref()))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn get_active_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        let sql =
            format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1 AND is_active = TRUE");

        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(property)
    }

    // Related listings share both the city and the property type.
    async fn get_related_properties(
        &self,
        city: &str,
        property_type: PropertyType,
        exclude_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties \
             WHERE is_active = TRUE AND city = $1 AND property_type = $2 AND id <> $3 \
             ORDER BY created_at DESC LIMIT $4"
        );

        let properties = sqlx::query_as::<_, Property>(&sql)
            .bind(city)
            .bind(property_type)
            .bind(exclude_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(properties)
    }

    async fn get_featured_properties(&self, limit: usize) -> Result<Vec<Property>, sqlx::Error> {
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties \
             WHERE is_active = TRUE AND is_featured = TRUE \
             ORDER BY created_at DESC LIMIT $1"
        );

        let properties = sqlx::query_as::<_, Property>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(properties)
    }

    async fn get_recent_properties(&self, limit: usize) -> Result<Vec<Property>, sqlx::Error> {
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE is_active = TRUE \
             ORDER BY created_at DESC LIMIT $1"
        );

        let properties = sqlx::query_as::<_, Property>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(properties)
    }

    async fn get_distinct_cities(&self) -> Result<Vec<String>, sqlx::Error> {
        let cities = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT city FROM properties WHERE is_active = TRUE ORDER BY city",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(cities)
    }

    async fn get_property_images(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<PropertyImage>, sqlx::Error> {
        let images = sqlx::query_as::<_, PropertyImage>(
            "SELECT id, property_id, image_url, caption, is_main, display_order \
             FROM property_images WHERE property_id = $1 ORDER BY display_order, id",
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn create_property(
        &self,
        property_data: CreatePropertyDto,
    ) -> Result<Property, ListingError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO properties ( \
                title, description, property_type, listing_type, price, \
                address, city, state, zip_code, latitude, longitude, \
                bedrooms, bathrooms, area_sqft, \
                contact_name, contact_phone, contact_email, is_featured \
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                       $15, $16, $17, $18) \
             RETURNING {PROPERTY_COLUMNS}"
        );

        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(&property_data.title)
            .bind(&property_data.description)
            .bind(property_data.property_type)
            .bind(property_data.listing_type)
            .bind(property_data.price.clone())
            .bind(&property_data.address)
            .bind(&property_data.city)
            .bind(&property_data.state)
            .bind(&property_data.zip_code)
            .bind(property_data.latitude.clone())
            .bind(property_data.longitude.clone())
            .bind(property_data.bedrooms.unwrap_or(0))
            .bind(property_data.bathrooms.unwrap_or(0))
            .bind(property_data.area_sqft)
            .bind(&property_data.contact_name)
            .bind(&property_data.contact_phone)
            .bind(&property_data.contact_email)
            .bind(property_data.is_featured.unwrap_or(false))
            .fetch_one(&mut *tx)
            .await?;

        for (index, image) in property_data.images.iter().enumerate() {
            sqlx::query(
                "INSERT INTO property_images (property_id, image_url, caption, is_main, display_order) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(property.id)
            .bind(&image.image_url)
            .bind(image.caption.clone().unwrap_or_default())
            .bind(image.is_main.unwrap_or(false))
            .bind(index as i32)
            .execute(&mut *tx)
            .await
            .map_err(ListingError::from_db)?;
        }

        tx.commit().await?;

        Ok(property)
    }

    async fn update_property(
        &self,
        property_id: Uuid,
        property_data: UpdatePropertyDto,
    ) -> Result<Option<Property>, sqlx::Error> {
        let sql = format!(
            "UPDATE properties SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                property_type = COALESCE($4::property_type, property_type), \
                listing_type = COALESCE($5::listing_type, listing_type), \
                price = COALESCE($6, price), \
                address = COALESCE($7, address), \
                city = COALESCE($8, city), \
                state = COALESCE($9, state), \
                zip_code = COALESCE($10, zip_code), \
                latitude = COALESCE($11, latitude), \
                longitude = COALESCE($12, longitude), \
                bedrooms = COALESCE($13, bedrooms), \
                bathrooms = COALESCE($14, bathrooms), \
                area_sqft = COALESCE($15, area_sqft), \
                contact_name = COALESCE($16, contact_name), \
                contact_phone = COALESCE($17, contact_phone), \
                contact_email = COALESCE($18, contact_email), \
                is_active = COALESCE($19, is_active), \
                is_featured = COALESCE($20, is_featured), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PROPERTY_COLUMNS}"
        );

        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(property_id)
            .bind(property_data.title.as_deref())
            .bind(property_data.description.as_deref())
            .bind(enum_param(property_data.property_type))
            .bind(enum_param(property_data.listing_type))
            .bind(property_data.price.clone())
            .bind(property_data.address.as_deref())
            .bind(property_data.city.as_deref())
            .bind(property_data.state.as_deref())
            .bind(property_data.zip_code.as_deref())
            .bind(property_data.latitude.clone())
            .bind(property_data.longitude.clone())
            .bind(property_data.bedrooms)
            .bind(property_data.bathrooms)
            .bind(property_data.area_sqft)
            .bind(property_data.contact_name.as_deref())
            .bind(property_data.contact_phone.as_deref())
            .bind(property_data.contact_email.as_deref())
            .bind(property_data.is_active)
            .bind(property_data.is_featured)
            .fetch_optional(&self.pool)
            .await?;

        Ok(property)
    }

    async fn deactivate_property(&self, property_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE properties SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(property_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_filters_carry_only_the_query() {
        let filters = PropertySearchFilters::for_search(Some("lake view".to_string()));
        assert_eq!(filters.search.as_deref(), Some("lake view"));
        assert!(filters.property_type.is_none());
        assert!(filters.city.is_none());
        assert!(filters.min_price.is_none());
    }

    #[test]
    fn enum_params_bind_as_lowercase_labels() {
        assert_eq!(
            enum_param(Some(PropertyType::Condo)),
            Some("condo".to_string())
        );
        assert_eq!(enum_param(None::<ListingType>), None);
    }

    #[test]
    fn like_params_escape_pattern_metacharacters() {
        assert_eq!(
            like_param(Some(&"Austin".to_string())),
            Some("%Austin%".to_string())
        );
        assert_eq!(
            like_param(Some(&"a_b".to_string())),
            Some("%a\\_b%".to_string())
        );
        assert_eq!(
            like_param(Some(&"50%".to_string())),
            Some("%50\\%%".to_string())
        );
    }
}
