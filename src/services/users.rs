use super::accounts::{
    updated_address, LoginOutcome, LoginRequest, PhoneRule, RegisterAccount,
};
use crate::{
    auth::{hash_password_blocking, verify_password_blocking, TokenIssuer},
    db::DbPool,
    entities::{
        types::{Address, AddressInput},
        user::{self, Entity as UserEntity, Model as User},
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

const PHONE_RULE: PhoneRule = PhoneRule::TenDigits;

/// Fields a buyer may change about themselves.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUser {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<AddressInput>,
}

/// What a buyer sees about themselves after logging in.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
        }
    }
}

/// Buyer accounts.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
    tokens: TokenIssuer,
}

impl UserService {
    pub fn new(db: Arc<DbPool>, tokens: TokenIssuer) -> Self {
        Self { db, tokens }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterAccount) -> Result<User, ServiceError> {
        let account = request.validate(PHONE_RULE)?;
        self.ensure_contact_free(Some(&account.email), Some(&account.phone), None)
            .await?;

        let password = hash_password_blocking(account.password).await?;
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(account.name),
            email: Set(account.email),
            phone: Set(account.phone),
            password: Set(password),
            profile_image: Set(account.profile_image),
            address: Set(account.address),
            deleted: Set(false),
            ..Default::default()
        };

        let created = model.insert(&*self.db).await.map_err(|e| {
            let err = ServiceError::from(e);
            if err.is_server_error() {
                error!("Failed to insert user: {}", err);
            } else {
                warn!("User registration lost a uniqueness race");
            }
            err
        })?;

        counter!("artmart.accounts.registered", 1, "kind" => "user");
        info!(user_id = %created.id, "User registered");
        Ok(created)
    }

    /// Logs in by email or phone. Soft-deleted accounts cannot log in.
    #[instrument(skip(self, request))]
    pub async fn login(
        &self,
        request: LoginRequest,
    ) -> Result<LoginOutcome<UserProfile>, ServiceError> {
        let (identifier, password) = request.into_parts()?;

        let user = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(identifier.as_str()))
                    .add(user::Column::Phone.eq(identifier.as_str())),
            )
            .filter(user::Column::Deleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                warn!("Login attempt for unknown user");
                ServiceError::not_found("User")
            })?;

        if !verify_password_blocking(password, user.password.clone()).await? {
            warn!(user_id = %user.id, "Invalid password");
            counter!("artmart.accounts.login_failed", 1, "kind" => "user");
            return Err(ServiceError::InvalidPassword);
        }

        let token = self.tokens.issue(user.id, &user.email, Some(user.id))?;
        counter!("artmart.accounts.logged_in", 1, "kind" => "user");
        info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            token,
            profile: user.into(),
        })
    }

    /// Gets an active user by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<User, ServiceError> {
        UserEntity::find_by_id(id)
            .filter(user::Column::Deleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))
    }

    /// Lists every user that has not been soft-deleted.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(UserEntity::find()
            .filter(user::Column::Deleted.eq(false))
            .order_by_asc(user::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Applies the provided fields. The soft-delete flag is not consulted.
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: Uuid, changes: UpdateUser) -> Result<User, ServiceError> {
        let existing = self.find_any(id).await?;

        let phone = non_blank(changes.phone);
        if let Some(phone) = &phone {
            PHONE_RULE.check(phone)?;
            self.ensure_contact_free(None, Some(phone), Some(id)).await?;
        }
        let address = updated_address(changes.address)?;

        let mut model: user::ActiveModel = existing.into();
        if let Some(name) = non_blank(changes.name) {
            model.name = Set(name);
        }
        if let Some(phone) = phone {
            model.phone = Set(phone);
        }
        if let Some(address) = address {
            model.address = Set(address);
        }

        let updated = model.update(&*self.db).await?;
        info!(user_id = %id, "User updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.set_deleted(id, true).await?;
        info!(user_id = %id, "User soft-deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn restore(&self, id: Uuid) -> Result<(), ServiceError> {
        self.set_deleted(id, false).await?;
        info!(user_id = %id, "User restored");
        Ok(())
    }

    async fn set_deleted(&self, id: Uuid, deleted: bool) -> Result<(), ServiceError> {
        let existing = self.find_any(id).await?;
        let mut model: user::ActiveModel = existing.into();
        model.deleted = Set(deleted);
        model.update(&*self.db).await?;
        Ok(())
    }

    /// Finds a user regardless of soft-delete status.
    async fn find_any(&self, id: Uuid) -> Result<User, ServiceError> {
        UserEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))
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
            contact = contact.add(user::Column::Email.eq(email));
        }
        if let Some(phone) = phone {
            contact = contact.add(user::Column::Phone.eq(phone));
        }

        let mut query = UserEntity::find().filter(contact);
        if let Some(id) = exclude {
            query = query.filter(user::Column::Id.ne(id));
        }

        if query.count(&*self.db).await? > 0 {
            warn!("Email or phone already registered");
            return Err(ServiceError::DuplicateContact);
        }
        Ok(())
    }
}
