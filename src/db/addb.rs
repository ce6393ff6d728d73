use async_trait::async_trait;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    dtos::addtos::{CreateAdDto, UpdateAdDto},
    error::ListingError,
    models::admodel::{AdCategory, AdImage, AdType, Advertisement},
};

/// Optional predicates for the advertisement list view. Absent fields
/// impose no constraint; all present fields are ANDed together.
///
/// Enum filters hold the raw label so an unrecognized value is an
/// exact-match predicate that matches nothing, not an absent filter.
#[derive(Debug, Default, Clone)]
pub struct AdSearchFilters {
    pub category: Option<String>,
    pub ad_type: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub search: Option<String>,
}

#[async_trait]
pub trait AdExt {
    async fn get_active_ads(
        &self,
        filters: &AdSearchFilters,
        limit: usize,
        offset: u64,
    ) -> Result<Vec<Advertisement>, sqlx::Error>;

    async fn count_active_ads(&self, filters: &AdSearchFilters) -> Result<i64, sqlx::Error>;

    async fn get_active_ad_by_id(&self, ad_id: Uuid)
        -> Result<Option<Advertisement>, sqlx::Error>;

    async fn increment_ad_views(&self, ad_id: Uuid) -> Result<Option<i32>, sqlx::Error>;

    async fn get_related_ads(
        &self,
        category: AdCategory,
        exclude_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Advertisement>, sqlx::Error>;

    async fn get_featured_ads(&self, limit: usize) -> Result<Vec<Advertisement>, sqlx::Error>;

    async fn get_recent_ads(&self, limit: usize) -> Result<Vec<Advertisement>, sqlx::Error>;

    async fn get_distinct_ad_locations(&self) -> Result<Vec<String>, sqlx::Error>;

    async fn get_ad_images(&self, ad_id: Uuid) -> Result<Vec<AdImage>, sqlx::Error>;

    async fn create_ad(&self, ad_data: CreateAdDto) -> Result<Advertisement, ListingError>;

    async fn update_ad(
        &self,
        ad_id: Uuid,
        ad_data: UpdateAdDto,
    ) -> Result<Option<Advertisement>, sqlx::Error>;

    async fn deactivate_ad(&self, ad_id: Uuid) -> Result<bool, sqlx::Error>;
}

const AD_COLUMNS: &str = r#"
    id, title, description, category, ad_type, price,
    contact_name, contact_phone, contact_email,
    location, address, condition, brand, posted_by,
    is_active, is_featured, views_count, created_at, updated_at
"#;

// All present filters AND together; a NULL bind leaves the predicate open.
// Enum columns compare as text so an unknown label matches zero rows.
const AD_FILTER_CLAUSE: &str = r#"
    is_active = TRUE
    AND ($1::text IS NULL OR category::text = $1)
    AND ($2::text IS NULL OR ad_type::text = $2)
    AND ($3::text IS NULL OR location ILIKE $3)
    AND ($4::numeric IS NULL OR price >= $4::numeric)
    AND ($5::numeric IS NULL OR price <= $5::numeric)
    AND ($6::text IS NULL OR title ILIKE $6 OR description ILIKE $6
         OR address ILIKE $6 OR location ILIKE $6)
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
impl AdExt for DBClient {
    async fn get_active_ads(
        &self,
        filters: &AdSearchFilters,
        limit: usize,
        offset: u64,
    ) -> Result<Vec<Advertisement>, sqlx::Error> {
        let sql = format!(
            "SELECT {AD_COLUMNS} FROM advertisements WHERE {AD_FILTER_CLAUSE} \
             ORDER BY created_at DESC LIMIT $7 OFFSET $8"
        );

        let ads = sqlx::query_as::<_, Advertisement>(&sql)
            .bind(filters.category.clone())
            .bind(filters.ad_type.clone())
            .bind(like_param(filters.location.as_ref()))
            .bind(filters.min_price.clone())
            .bind(filters.max_price.clone())
            .bind(like_param(filters.search.as_ref()))
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(ads)
    }

    async fn count_active_ads(&self, filters: &AdSearchFilters) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM advertisements WHERE {AD_FILTER_CLAUSE}");

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(filters.category.clone())
            .bind(filters.ad_type.clone())
            .bind(like_param(filters.location.as_ref()))
            .bind(filters.min_price.clone())
            .bind(filters.max_price.clone())
            .bind(like_param(filters.search.as_ref()))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn get_active_ad_by_id(
        &self,
        ad_id: Uuid,
    ) -> Result<Option<Advertisement>, sqlx::Error> {
        let sql = format!(
            "SELECT {AD_COLUMNS} FROM advertisements WHERE id = $1 AND is_active = TRUE"
        );

        let ad = sqlx::query_as::<_, Advertisement>(&sql)
            .bind(ad_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ad)
    }

    // Single atomic update so concurrent detail views never lose counts.
    async fn increment_ad_views(&self, ad_id: Uuid) -> Result<Option<i32>, sqlx::Error> {
        let views = sqlx::query_scalar::<_, i32>(
            "UPDATE advertisements SET views_count = views_count + 1 \
             WHERE id = $1 AND is_active = TRUE RETURNING views_count",
        )
        .bind(ad_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(views)
    }

    async fn get_related_ads(
        &self,
        category: AdCategory,
        exclude_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Advertisement>, sqlx::Error> {
        let sql = format!(
            "SELECT {AD_COLUMNS} FROM advertisements \
             WHERE is_active = TRUE AND category = $1 AND id <> $2 \
             ORDER BY created_at DESC LIMIT $3"
        );

        let ads = sqlx::query_as::<_, Advertisement>(&sql)
            .bind(category)
            .bind(exclude_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(ads)
    }

    async fn get_featured_ads(&self, limit: usize) -> Result<Vec<Advertisement>, sqlx::Error> {
        let sql = format!(
            "SELECT {AD_COLUMNS} FROM advertisements \
             WHERE is_active = TRUE AND is_featured = TRUE \
             ORDER BY created_at DESC LIMIT $1"
        );

        let ads = sqlx::query_as::<_, Advertisement>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(ads)
    }

    async fn get_recent_ads(&self, limit: usize) -> Result<Vec<Advertisement>, sqlx::Error> {
        let sql = format!(
            "SELECT {AD_COLUMNS} FROM advertisements WHERE is_active = TRUE \
             ORDER BY created_at DESC LIMIT $1"
        );

        let ads = sqlx::query_as::<_, Advertisement>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(ads)
    }

    async fn get_distinct_ad_locations(&self) -> Result<Vec<String>, sqlx::Error> {
        let locations = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT location FROM advertisements WHERE is_active = TRUE \
             ORDER BY location",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(locations)
    }

    async fn get_ad_images(&self, ad_id: Uuid) -> Result<Vec<AdImage>, sqlx::Error> {
        let images = sqlx::query_as::<_, AdImage>(
            "SELECT id, advertisement_id, image_url, caption, is_main, display_order \
             FROM ad_images WHERE advertisement_id = $1 ORDER BY display_order, id",
        )
        .bind(ad_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn create_ad(&self, ad_data: CreateAdDto) -> Result<Advertisement, ListingError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO advertisements ( \
                title, description, category, ad_type, price, \
                contact_name, contact_phone, contact_email, \
                location, address, condition, brand, posted_by, is_featured \
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {AD_COLUMNS}"
        );

        let ad = sqlx::query_as::<_, Advertisement>(&sql)
            .bind(&ad_data.title)
            .bind(&ad_data.description)
            .bind(ad_data.category)
            .bind(ad_data.ad_type)
            .bind(ad_data.price.clone())
            .bind(&ad_data.contact_name)
            .bind(&ad_data.contact_phone)
            .bind(&ad_data.contact_email)
            .bind(&ad_data.location)
            .bind(ad_data.address.as_deref())
            .bind(ad_data.condition.as_deref())
            .bind(ad_data.brand.as_deref())
            .bind(ad_data.posted_by)
            .bind(ad_data.is_featured.unwrap_or(false))
            .fetch_one(&mut *tx)
            .await?;

        for (index, image) in ad_data.images.iter().enumerate() {
            sqlx::query(
                "INSERT INTO ad_images (advertisement_id, image_url, caption, is_main, display_order) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(ad.id)
            .bind(&image.image_url)
            .bind(image.caption.clone().unwrap_or_default())
            .bind(image.is_main.unwrap_or(false))
            .bind(index as i32)
            .execute(&mut *tx)
            .await
            .map_err(ListingError::from_db)?;
        }

        tx.commit().await?;

        Ok(ad)
    }

    async fn update_ad(
        &self,
        ad_id: Uuid,
        ad_data: UpdateAdDto,
    ) -> Result<Option<Advertisement>, sqlx::Error> {
        let sql = format!(
            "UPDATE advertisements SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                category = COALESCE($4::ad_category, category), \
                ad_type = COALESCE($5::ad_type, ad_type), \
                price = COALESCE($6, price), \
                contact_name = COALESCE($7, contact_name), \
                contact_phone = COALESCE($8, contact_phone), \
                contact_email = COALESCE($9, contact_email), \
                location = COALESCE($10, location), \
                address = COALESCE($11, address), \
                condition = COALESCE($12, condition), \
                brand = COALESCE($13, brand), \
                is_active = COALESCE($14, is_active), \
                is_featured = COALESCE($15, is_featured), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {AD_COLUMNS}"
        );

        let ad = sqlx::query_as::<_, Advertisement>(&sql)
            .bind(ad_id)
            .bind(ad_data.title.as_deref())
            .bind(ad_data.description.as_deref())
            .bind(enum_param(ad_data.category))
            .bind(enum_param(ad_data.ad_type))
            .bind(ad_data.price.clone())
            .bind(ad_data.contact_name.as_deref())
            .bind(ad_data.contact_phone.as_deref())
            .bind(ad_data.contact_email.as_deref())
            .bind(ad_data.location.as_deref())
            .bind(ad_data.address.as_deref())
            .bind(ad_data.condition.as_deref())
            .bind(ad_data.brand.as_deref())
            .bind(ad_data.is_active)
            .bind(ad_data.is_featured)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ad)
    }

    async fn deactivate_ad(&self, ad_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE advertisements SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(ad_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_params_bind_as_lowercase_labels() {
        assert_eq!(
            enum_param(Some(AdCategory::Vehicles)),
            Some("vehicles".to_string())
        );
        assert_eq!(enum_param(Some(AdType::Sell)), Some("sell".to_string()));
        assert_eq!(enum_param(None::<AdCategory>), None);
    }

    #[test]
    fn like_params_wrap_substrings() {
        assert_eq!(
            like_param(Some(&"Austin".to_string())),
            Some("%Austin%".to_string())
        );
        assert_eq!(like_param(None), None);
    }

    #[test]
    fn like_params_escape_pattern_metacharacters() {
        assert_eq!(
            like_param(Some(&"100%".to_string())),
            Some("%100\\%%".to_string())
        );
        assert_eq!(
            like_param(Some(&"a_b".to_string())),
            Some("%a\\_b%".to_string())
        );
        assert_eq!(
            like_param(Some(&"c:\\temp".to_string())),
            Some("%c:\\\\temp%".to_string())
        );
    }
}
