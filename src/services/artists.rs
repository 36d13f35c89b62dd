use super::accounts::{
    check_email, updated_address, LoginOutcome, LoginRequest, PhoneRule, RegisterAccount,
};
use crate::{
    auth::{hash_password_blocking, verify_password_blocking, TokenIssuer},
    db::DbPool,
    entities::{
        artist::{self, Entity as ArtistEntity, Model as Artist},
        types::{Address, AddressInput},
    },
    errors::ServiceError,
    validation::non_blank,
};
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

const PHONE_RULE: PhoneRule = PhoneRule::Mobile;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateArtist {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub address: Option<AddressInput>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Public profile returned on login.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArtistProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub bio: Option<String>,
    pub address: Address,
}

impl From<Artist> for ArtistProfile {
    fn from(artist: Artist) -> Self {
        Self {
            name: artist.name,
            email: artist.email,
            phone: artist.phone,
            bio: artist.bio,
            address: artist.address,
        }
    }
}

/// Seller accounts.
#[derive(Clone)]
pub struct ArtistService {
    db: Arc<DbPool>,
    tokens: TokenIssuer,
}

impl ArtistService {
    pub fn new(db: Arc<DbPool>, tokens: TokenIssuer) -> Self {
        Self { db, tokens }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterAccount) -> Result<Artist, ServiceError> {
        let account = request.validate(PHONE_RULE)?;
        self.ensure_contact_free(Some(&account.email), Some(&account.phone), None)
            .await?;

        let password = hash_password_blocking(account.password).await?;
        let model = artist::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(account.name),
            email: Set(account.email),
            phone: Set(account.phone),
            password: Set(password),
            bio: Set(account.bio),
            profile_image: Set(account.profile_image),
            address: Set(account.address),
            deleted: Set(false),
            ..Default::default()
        };

        let created = model.insert(&*self.db).await.map_err(|e| {
            let err = ServiceError::from(e);
            if err.is_server_error() {
                error!("Failed to insert artist: {}", err);
            } else {
                warn!("Artist registration lost a uniqueness race");
            }
            err
        })?;

        counter!("artmart.accounts.registered", 1, "kind" => "artist");
        info!(artist_id = %created.id, "Artist registered");
        Ok(created)
    }

    /// Logs in by email or phone. Soft-deleted accounts cannot log in.
    #[instrument(skip(self, request))]
    pub async fn login(
        &self,
        request: LoginRequest,
    ) -> Result<LoginOutcome<ArtistProfile>, ServiceError> {
        let (identifier, password) = request.into_parts()?;

        let artist = ArtistEntity::find()
            .filter(
                Condition::any()
                    .add(artist::Column::Email.eq(identifier.as_str()))
                    .add(artist::Column::Phone.eq(identifier.as_str())),
            )
            .filter(artist::Column::Deleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                warn!("Login attempt for unknown artist");
                ServiceError::not_found("Artist")
            })?;

        if !verify_password_blocking(password, artist.password.clone()).await? {
            warn!(artist_id = %artist.id, "Invalid password");
            counter!("artmart.accounts.login_failed", 1, "kind" => "artist");
            return Err(ServiceError::InvalidPassword);
        }

        let token = self.tokens.issue(artist.id, &artist.email, None)?;
        counter!("artmart.accounts.logged_in", 1, "kind" => "artist");
        info!(artist_id = %artist.id, "Artist logged in");

        Ok(LoginOutcome {
            token,
            profile: artist.into(),
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Artist, ServiceError> {
        ArtistEntity::find_by_id(id)
            .filter(artist::Column::Deleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Artist"))
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Artist>, ServiceError> {
        Ok(ArtistEntity::find()
            .filter(artist::Column::Deleted.eq(false))
            .order_by_asc(artist::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Applies the provided fields. The soft-delete flag is not consulted.
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: Uuid, changes: UpdateArtist) -> Result<Artist, ServiceError> {
        let existing = self.find_any(id).await?;

        let email = non_blank(changes.email);
        if let Some(email) = &email {
            check_email(email)?;
        }
        let phone = non_blank(changes.phone);
        if let Some(phone) = &phone {
            PHONE_RULE.check(phone)?;
        }
        if email.is_some() || phone.is_some() {
            self.ensure_contact_free(email.as_deref(), phone.as_deref(), Some(id))
                .await?;
        }
        let address = updated_address(changes.address)?;

        let mut model: artist::ActiveModel = existing.into();
        if let Some(name) = non_blank(changes.name) {
            model.name = Set(name);
        }
        if let Some(bio) = changes.bio {
            model.bio = Set(non_blank(Some(bio)));
        }
        if let Some(email) = email {
            model.email = Set(email);
        }
        if let Some(phone) = phone {
            model.phone = Set(phone);
        }
        if let Some(address) = address {
            model.address = Set(address);
        }

        let updated = model.update(&*self.db).await?;
        info!(artist_id = %id, "Artist updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.find_any(id).await?;
        let mut model: artist::ActiveModel = existing.into();
        model.deleted = Set(true);
        model.update(&*self.db).await?;
        info!(artist_id = %id, "Artist soft-deleted");
        Ok(())
    }

    /// Finds an artist regardless of soft-delete status.
    async fn find_any(&self, id: Uuid) -> Result<Artist, ServiceError> {
        ArtistEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Artist"))
    }

    /// Early exit before insert/update; the unique indexes remain authoritative.
    async fn ensure_contact_free(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut contact = Condition::any();
        if let Some(email) = email {
            contact = contact.add(artist::Column::Email.eq(email));
        }
        if let Some(phone) = phone {
            contact = contact.add(artist::Column::Phone.eq(phone));
        }

        let mut query = ArtistEntity::find().filter(contact);
        if let Some(id) = exclude {
            query = query.filter(artist::Column::Id.ne(id));
        }

        if query.count(&*self.db).await? > 0 {
            warn!("Email or phone already registered");
            return Err(ServiceError::DuplicateContact);
        }
        Ok(())
    }
}
