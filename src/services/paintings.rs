use crate::{
    db::DbPool,
    entities::{
        artist::{self, Entity as ArtistEntity},
        painting::{self, Entity as PaintingEntity, Model as Painting, Season},
        types::{Comment, Dimensions, StringList},
        user::{self, Entity as UserEntity},
    },
    errors::ServiceError,
    services::pricing,
    validation::non_blank,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, str::FromStr, sync::Arc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

const DEFAULT_THEME: &str = "General";
const DEFAULT_STOCK: i32 = 1;

/// Body of an add-painting request. Everything is optional on the wire so
/// that absent fields surface as a single "missing field" error.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewPainting {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "imageURLs")]
    pub image_urls: Option<Vec<String>>,
    pub category: Option<String>,
    pub theme: Option<String>,
    pub price: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub season_or_festival: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub materials: Option<Vec<String>>,
    pub stock: Option<i32>,
    pub artist_id: Option<String>,
}

/// Partial update. Any provided field overwrites the stored one.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatePainting {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "imageURLs")]
    pub image_urls: Option<Vec<String>>,
    pub category: Option<String>,
    pub theme: Option<String>,
    pub price: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub season_or_festival: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub materials: Option<Vec<String>>,
    pub stock: Option<i32>,
    pub rating: Option<Decimal>,
    pub artist_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewComment {
    pub user_id: Option<String>,
    pub text: Option<String>,
}

/// Owning artist as shown next to a painting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArtistSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A painting with its artist resolved. `artist` is `null` if the artist
/// record no longer exists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaintingWithArtist {
    #[serde(flatten)]
    pub painting: Painting,
    pub artist: Option<ArtistSummary>,
}

fn parse_season(raw: &str) -> Result<Season, ServiceError> {
    Season::from_str(raw.trim())
        .map_err(|_| ServiceError::ValidationError(format!("Invalid seasonOrFestival: {}", raw)))
}

fn parse_artist_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ServiceError::ValidationError("Invalid artistId".to_string()))
}

fn check_price(price: Decimal) -> Result<(), ServiceError> {
    if price <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Price must be greater than 0".to_string(),
        ));
    }
    if !pricing::is_valid_price(price) {
        return Err(ServiceError::ValidationError(format!(
            "Price must have at most {} decimal places and not exceed {}",
            pricing::MONEY_SCALE,
            pricing::MAX_PRICE
        )));
    }
    Ok(())
}

fn check_rating(rating: Decimal) -> Result<(), ServiceError> {
    if pricing::is_valid_rating(rating) {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(format!(
            "Rating must be between 0 and {} with one decimal place",
            pricing::MAX_RATING
        )))
    }
}

fn check_discount(discount: Decimal) -> Result<(), ServiceError> {
    if pricing::is_valid_discount(discount) {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(
            "Discount must be between 0 and 100 with at most 2 decimal places".to_string(),
        ))
    }
}

fn check_stock(stock: i32) -> Result<(), ServiceError> {
    if stock >= 0 {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(
            "Stock cannot be negative".to_string(),
        ))
    }
}

/// Drops blank entries, keeping order.
fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| non_blank(Some(item)))
        .collect()
}

#[derive(Clone)]
pub struct PaintingService {
    db: Arc<DbPool>,
}

impl PaintingService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request))]
    pub async fn add(&self, request: NewPainting) -> Result<Painting, ServiceError> {
        let title = non_blank(request.title).ok_or(ServiceError::MissingField)?;
        let description = non_blank(request.description).ok_or(ServiceError::MissingField)?;
        let image_urls = request
            .image_urls
            .map(clean_list)
            .filter(|urls| !urls.is_empty())
            .ok_or(ServiceError::MissingField)?;
        let price = request
            .price
            .filter(|p| !p.is_zero())
            .ok_or(ServiceError::MissingField)?;
        let season = non_blank(request.season_or_festival).ok_or(ServiceError::MissingField)?;
        let artist_id = non_blank(request.artist_id).ok_or(ServiceError::MissingField)?;

        check_price(price)?;
        let discount = request.discount.unwrap_or(Decimal::ZERO);
        check_discount(discount)?;
        let stock = request.stock.unwrap_or(DEFAULT_STOCK);
        check_stock(stock)?;
        let season = parse_season(&season)?;
        let artist_id = parse_artist_id(&artist_id)?;

        let model = painting::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title),
            description: Set(description),
            image_urls: Set(StringList(image_urls)),
            category: Set(non_blank(request.category)),
            theme: Set(non_blank(request.theme).unwrap_or_else(|| DEFAULT_THEME.to_string())),
            price: Set(price),
            discount: Set(discount),
            final_price: Set(pricing::final_price(price, discount)),
            season_or_festival: Set(season),
            dimensions: Set(request.dimensions.unwrap_or_default()),
            materials: Set(StringList(
                request.materials.map(clean_list).unwrap_or_default(),
            )),
            stock: Set(stock),
            rating: Set(Decimal::ZERO),
            comments: Set(Default::default()),
            likes: Set(Default::default()),
            artist_id: Set(artist_id),
            deleted: Set(false),
            ..Default::default()
        };

        let created = model.insert(&*self.db).await?;
        info!(painting_id = %created.id, artist_id = %artist_id, "Painting added");
        Ok(created)
    }

    /// All active paintings with their artists resolved.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<PaintingWithArtist>, ServiceError> {
        let paintings = PaintingEntity::find()
            .filter(painting::Column::Deleted.eq(false))
            .order_by_asc(painting::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let artist_ids: Vec<Uuid> = paintings.iter().map(|p| p.artist_id).collect();
        let artists = self.artist_summaries(artist_ids).await?;

        Ok(paintings
            .into_iter()
            .map(|painting| {
                let artist = artists.get(&painting.artist_id).cloned();
                PaintingWithArtist { painting, artist }
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<PaintingWithArtist, ServiceError> {
        let painting = self.find_active(id).await?;
        let artist = self
            .artist_summaries(vec![painting.artist_id])
            .await?
            .remove(&painting.artist_id);
        Ok(PaintingWithArtist { painting, artist })
    }

    /// Overwrites provided fields. `finalPrice` is recomputed on save.
    #[instrument(skip(self, changes))]
    pub async fn update_by_id(
        &self,
        id: Uuid,
        changes: UpdatePainting,
    ) -> Result<Painting, ServiceError> {
        let existing = self.find_any(id).await?;
        let mut model: painting::ActiveModel = existing.into();

        if let Some(title) = non_blank(changes.title) {
            model.title = Set(title);
        }
        if let Some(description) = non_blank(changes.description) {
            model.description = Set(description);
        }
        if let Some(urls) = changes.image_urls {
            let urls = clean_list(urls);
            if urls.is_empty() {
                return Err(ServiceError::ValidationError(
                    "imageURLs cannot be empty".to_string(),
                ));
            }
            model.image_urls = Set(StringList(urls));
        }
        if let Some(category) = changes.category {
            model.category = Set(non_blank(Some(category)));
        }
        if let Some(theme) = non_blank(changes.theme) {
            model.theme = Set(theme);
        }
        if let Some(price) = changes.price {
            check_price(price)?;
            model.price = Set(price);
        }
        if let Some(discount) = changes.discount {
            check_discount(discount)?;
            model.discount = Set(discount);
        }
        if let Some(season) = non_blank(changes.season_or_festival) {
            model.season_or_festival = Set(parse_season(&season)?);
        }
        if let Some(dimensions) = changes.dimensions {
            model.dimensions = Set(dimensions);
        }
        if let Some(materials) = changes.materials {
            model.materials = Set(StringList(clean_list(materials)));
        }
        if let Some(stock) = changes.stock {
            check_stock(stock)?;
            model.stock = Set(stock);
        }
        if let Some(rating) = changes.rating {
            check_rating(rating)?;
            model.rating = Set(rating);
        }
        if let Some(artist_id) = non_blank(changes.artist_id) {
            model.artist_id = Set(parse_artist_id(&artist_id)?);
        }

        let updated = model.update(&*self.db).await?;
        info!(painting_id = %id, final_price = %updated.final_price, "Painting updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.find_any(id).await?;
        let mut model: painting::ActiveModel = existing.into();
        model.deleted = Set(true);
        model.update(&*self.db).await?;
        info!(painting_id = %id, "Painting soft-deleted");
        Ok(())
    }

    /// Appends a comment by an active user.
    #[instrument(skip(self, request))]
    pub async fn add_comment(
        &self,
        id: Uuid,
        request: NewComment,
    ) -> Result<Painting, ServiceError> {
        let user_id = non_blank(request.user_id).ok_or(ServiceError::MissingField)?;
        let text = non_blank(request.text).ok_or(ServiceError::MissingField)?;
        let user_id = self.active_user(&user_id).await?;

        let existing = self.find_active(id).await?;
        let mut comments = existing.comments.clone();
        comments.0.push(Comment {
            user_id,
            text,
            created_at: Utc::now(),
        });

        let mut model: painting::ActiveModel = existing.into();
        model.comments = Set(comments);
        let updated = model.update(&*self.db).await?;
        info!(painting_id = %id, user_id = %user_id, "Comment added");
        Ok(updated)
    }

    /// Records a like. Liking twice has no further effect.
    #[instrument(skip(self))]
    pub async fn like(&self, id: Uuid, user_id: &str) -> Result<Painting, ServiceError> {
        let user_id = self.active_user(user_id).await?;
        let existing = self.find_active(id).await?;

        let mut likes = existing.likes.clone();
        if !likes.insert(user_id) {
            return Ok(existing);
        }

        let mut model: painting::ActiveModel = existing.into();
        model.likes = Set(likes);
        Ok(model.update(&*self.db).await?)
    }

    /// Withdraws a like. Unliking a painting that was not liked is a no-op.
    #[instrument(skip(self))]
    pub async fn unlike(&self, id: Uuid, user_id: &str) -> Result<Painting, ServiceError> {
        let user_id = Uuid::parse_str(user_id).map_err(|_| ServiceError::not_found("User"))?;
        let existing = self.find_active(id).await?;

        let mut likes = existing.likes.clone();
        if !likes.remove(&user_id) {
            return Ok(existing);
        }

        let mut model: painting::ActiveModel = existing.into();
        model.likes = Set(likes);
        Ok(model.update(&*self.db).await?)
    }

    /// Active paintings by id, keyed by id. Missing or deleted ids are absent.
    pub async fn find_active_many(
        &self,
        ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, Painting>, ServiceError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(PaintingEntity::find()
            .filter(painting::Column::Id.is_in(ids))
            .filter(painting::Column::Deleted.eq(false))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect())
    }

    async fn find_active(&self, id: Uuid) -> Result<Painting, ServiceError> {
        PaintingEntity::find_by_id(id)
            .filter(painting::Column::Deleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Painting"))
    }

    async fn find_any(&self, id: Uuid) -> Result<Painting, ServiceError> {
        PaintingEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Painting"))
    }

    async fn active_user(&self, raw_id: &str) -> Result<Uuid, ServiceError> {
        let id = Uuid::parse_str(raw_id.trim()).map_err(|_| ServiceError::not_found("User"))?;
        let exists = UserEntity::find_by_id(id)
            .filter(user::Column::Deleted.eq(false))
            .one(&*self.db)
            .await?
            .is_some();
        if exists {
            Ok(id)
        } else {
            warn!(user_id = %id, "Unknown user interacting with painting");
            Err(ServiceError::not_found("User"))
        }
    }

    async fn artist_summaries(
        &self,
        mut ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, ArtistSummary>, ServiceError> {
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, String, String)> = ArtistEntity::find()
            .select_only()
            .column(artist::Column::Id)
            .column(artist::Column::Name)
            .column(artist::Column::Email)
            .filter(artist::Column::Id.is_in(ids))
            .into_tuple()
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, email)| (id, ArtistSummary { id, name, email }))
            .collect())
    }
}
