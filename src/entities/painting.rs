use super::{
    stamp_timestamps,
    types::{Comments, Dimensions, IdList, StringList},
};
use crate::services::pricing;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, ActiveValue};
use serde::{Deserialize, Serialize};

/// Season or festival a painting is themed around.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Season {
    #[sea_orm(string_value = "Summer")]
    Summer,
    #[sea_orm(string_value = "Winter")]
    Winter,
    #[sea_orm(string_value = "Spring")]
    Spring,
    #[sea_orm(string_value = "Autumn")]
    Autumn,
    #[sea_orm(string_value = "Holi")]
    Holi,
    #[sea_orm(string_value = "Diwali")]
    Diwali,
    #[sea_orm(string_value = "Navratri")]
    Navratri,
    #[sea_orm(string_value = "Christmas")]
    Christmas,
    #[sea_orm(string_value = "Eid")]
    Eid,
    #[sea_orm(string_value = "Pongal")]
    Pongal,
    #[sea_orm(string_value = "Other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "paintings")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Json")]
    #[serde(rename = "imageURLs")]
    pub image_urls: StringList,
    pub category: Option<String>,
    pub theme: String,
    pub price: Decimal,
    pub discount: Decimal,
    /// Always `price * (1 - discount / 100)`; maintained by `before_save`.
    pub final_price: Decimal,
    pub season_or_festival: Season,
    #[sea_orm(column_type = "Json")]
    pub dimensions: Dimensions,
    #[sea_orm(column_type = "Json")]
    pub materials: StringList,
    pub stock: i32,
    pub rating: Decimal,
    #[sea_orm(column_type = "Json")]
    pub comments: Comments,
    #[sea_orm(column_type = "Json")]
    pub likes: IdList,
    pub artist_id: Uuid,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

fn current<V>(value: &ActiveValue<V>) -> Option<&V>
where
    V: Into<sea_orm::Value>,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v),
        ActiveValue::NotSet => None,
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let (Some(price), Some(discount)) = (current(&self.price), current(&self.discount)) {
            self.final_price = ActiveValue::Set(pricing::final_price(*price, *discount));
        }
        stamp_timestamps!(self, insert);
        Ok(self)
    }
}
