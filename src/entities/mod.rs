pub mod artist;
pub mod order;
pub mod painting;
pub mod types;
pub mod user;

/// Stamps `created_at`/`updated_at` on the active model being saved.
///
/// Shared by every entity's `before_save`.
macro_rules! stamp_timestamps {
    ($model:ident, $insert:expr) => {{
        let now = chrono::Utc::now();
        if $insert && $model.created_at.is_not_set() {
            $model.created_at = sea_orm::ActiveValue::Set(now);
        }
        $model.updated_at = sea_orm::ActiveValue::Set(now);
    }};
}

pub(crate) use stamp_timestamps;
