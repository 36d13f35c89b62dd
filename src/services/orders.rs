use crate::{
    db::DbPool,
    entities::{
        artist::{self, Entity as ArtistEntity},
        order::{self, Entity as OrderEntity, Model as Order, OrderStatus, PaymentMethod, PaymentStatus},
        painting::{self, Entity as PaintingEntity},
        types::{LineItem, LineItems, ShippingAddress, StringList},
        user::{self, Entity as UserEntity},
    },
    errors::ServiceError,
    services::{
        order_status::{can_cancel, TransitionPolicy},
        paintings::PaintingService,
        pricing,
    },
    validation::non_blank,
};
use chrono::Utc;
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, str::FromStr, sync::Arc};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub painting_id: Option<String>,
    pub quantity: Option<u32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShippingAddressInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

impl ShippingAddressInput {
    fn into_address(self) -> Option<ShippingAddress> {
        let address = ShippingAddress {
            name: non_blank(self.name)?,
            phone: non_blank(self.phone)?,
            address: non_blank(self.address)?,
            city: non_blank(self.city)?,
            state: non_blank(self.state)?,
            pincode: non_blank(self.pincode)?,
        };
        address.is_complete().then_some(address)
    }
}

/// Body of a place-order request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: Option<String>,
    pub artist_id: Option<String>,
    pub paintings: Option<Vec<OrderItemRequest>>,
    pub payment_method: Option<String>,
    pub shipping_address: Option<ShippingAddressInput>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetStatus {
    pub order_status: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CancelOrder {
    pub cancel_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuyerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SellerSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaintingSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "imageURLs")]
    pub image_urls: StringList,
}

/// A line item next to the painting it was taken from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LineItemView {
    #[serde(flatten)]
    pub item: LineItem,
    pub painting: Option<PaintingSummary>,
}

/// An order with whichever related records the read resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<BuyerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<SellerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItemView>>,
}

impl OrderView {
    fn bare(order: Order) -> Self {
        Self {
            order,
            user: None,
            artist: None,
            items: None,
        }
    }
}

fn parse_ref(raw: &str, field: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ServiceError::ValidationError(format!("Invalid {}", field)))
}

#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    paintings: PaintingService,
    policy: TransitionPolicy,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>, policy: TransitionPolicy) -> Self {
        Self {
            paintings: PaintingService::new(db.clone()),
            db,
            policy,
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Places an order, snapshotting each painting's price at this moment.
    #[instrument(skip(self, request))]
    pub async fn create(&self, request: NewOrder) -> Result<Order, ServiceError> {
        let user_id = non_blank(request.user_id).ok_or(ServiceError::MissingField)?;
        let artist_id = non_blank(request.artist_id).ok_or(ServiceError::MissingField)?;
        let items = request
            .paintings
            .filter(|items| !items.is_empty())
            .ok_or(ServiceError::MissingField)?;
        let payment_method =
            non_blank(request.payment_method).ok_or(ServiceError::MissingField)?;
        let shipping_address = request
            .shipping_address
            .and_then(ShippingAddressInput::into_address)
            .ok_or(ServiceError::MissingField)?;

        let user_id = parse_ref(&user_id, "userId")?;
        let artist_id = parse_ref(&artist_id, "artistId")?;
        let payment_method = PaymentMethod::from_str(&payment_method).map_err(|_| {
            ServiceError::ValidationError(format!("Invalid paymentMethod: {}", payment_method))
        })?;

        // (raw id, parsed id, quantity); an unparseable id can never match a painting.
        let mut requested = Vec::with_capacity(items.len());
        for item in items {
            let raw = non_blank(item.painting_id).ok_or(ServiceError::MissingField)?;
            let quantity = item.quantity.unwrap_or(1);
            if quantity == 0 {
                return Err(ServiceError::ValidationError(
                    "Quantity must be at least 1".to_string(),
                ));
            }
            let id = Uuid::parse_str(raw.trim()).ok();
            requested.push((raw, id, quantity));
        }

        let found = self
            .paintings
            .find_active_many(requested.iter().filter_map(|(_, id, _)| *id).collect())
            .await?;

        let mut line_items = Vec::with_capacity(requested.len());
        let mut pricings = Vec::with_capacity(requested.len());
        for (raw, id, quantity) in requested {
            let painting = id.and_then(|id| found.get(&id)).ok_or_else(|| {
                warn!(painting_id = %raw, "Order references unknown painting");
                ServiceError::PaintingNotFound(raw.clone())
            })?;
            let pricing = pricing::compute_line_item(painting, quantity).ok_or_else(|| {
                ServiceError::ValidationError("Order total is out of range".to_string())
            })?;
            line_items.push(LineItem {
                painting_id: painting.id,
                title: painting.title.clone(),
                price: painting.price,
                discount: painting.discount,
                final_price: pricing.final_price,
                quantity,
            });
            pricings.push(pricing);
        }

        let total_amount = pricing::compute_order_total(&pricings).ok_or_else(|| {
            ServiceError::ValidationError("Order total is out of range".to_string())
        })?;

        let model = order::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            artist_id: Set(artist_id),
            paintings: Set(LineItems(line_items)),
            total_amount: Set(total_amount),
            payment_status: Set(PaymentStatus::Pending),
            payment_method: Set(payment_method),
            transaction_id: Set(None),
            shipping_address: Set(shipping_address),
            order_status: Set(OrderStatus::Pending),
            delivery_date: Set(None),
            cancel_reason: Set(None),
            deleted: Set(false),
            ..Default::default()
        };

        let created = model.insert(&*self.db).await.map_err(|e| {
            error!("Failed to insert order: {}", e);
            ServiceError::from(e)
        })?;

        counter!("artmart.orders.created", 1);
        info!(
            order_id = %created.id,
            total_amount = %created.total_amount,
            "Order placed"
        );
        Ok(created)
    }

    /// Every active order with buyer name/email and artist name.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<OrderView>, ServiceError> {
        let orders = self.active_orders(None).await?;
        let buyers = self
            .buyer_summaries(orders.iter().map(|o| o.user_id).collect())
            .await?;
        let sellers = self
            .seller_summaries(orders.iter().map(|o| o.artist_id).collect())
            .await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let mut view = OrderView::bare(order);
                view.user = buyers.get(&view.order.user_id).cloned();
                view.artist = sellers.get(&view.order.artist_id).cloned();
                view
            })
            .collect())
    }

    /// A buyer's orders with each line's painting title and images.
    #[instrument(skip(self))]
    pub async fn list_by_buyer(&self, user_id: Uuid) -> Result<Vec<OrderView>, ServiceError> {
        let orders = self
            .active_orders(Some(order::Column::UserId.eq(user_id)))
            .await?;
        let painting_ids = orders
            .iter()
            .flat_map(|o| o.paintings.0.iter().map(|item| item.painting_id))
            .collect();
        let paintings = self.painting_summaries(painting_ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = order
                    .paintings
                    .0
                    .iter()
                    .map(|item| LineItemView {
                        item: item.clone(),
                        painting: paintings.get(&item.painting_id).cloned(),
                    })
                    .collect();
                let mut view = OrderView::bare(order);
                view.items = Some(items);
                view
            })
            .collect())
    }

    /// An artist's incoming orders with buyer name/email.
    #[instrument(skip(self))]
    pub async fn list_by_artist(&self, artist_id: Uuid) -> Result<Vec<OrderView>, ServiceError> {
        let orders = self
            .active_orders(Some(order::Column::ArtistId.eq(artist_id)))
            .await?;
        let buyers = self
            .buyer_summaries(orders.iter().map(|o| o.user_id).collect())
            .await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let mut view = OrderView::bare(order);
                view.user = buyers.get(&view.order.user_id).cloned();
                view
            })
            .collect())
    }

    /// Moves an order to `orderStatus` if the transition policy allows it.
    /// Delivery stamps the delivery date.
    #[instrument(skip(self, request))]
    pub async fn set_status(&self, id: Uuid, request: SetStatus) -> Result<Order, ServiceError> {
        let raw = non_blank(request.order_status).ok_or(ServiceError::MissingField)?;
        let next = OrderStatus::from_str(&raw).map_err(|_| {
            ServiceError::ValidationError(format!("Invalid orderStatus: {}", raw))
        })?;

        let existing = self.find_active(id).await?;
        let current = existing.order_status;
        if !self.policy.allows(current, next) {
            warn!(order_id = %id, from = %current, to = %next, "Rejected status change");
            return Err(ServiceError::InvalidTransition(format!(
                "Cannot change order status from {} to {}",
                current, next
            )));
        }

        let mut model: order::ActiveModel = existing.into();
        model.order_status = Set(next);
        if next == OrderStatus::Delivered {
            model.delivery_date = Set(Some(Utc::now()));
        }

        let updated = model.update(&*self.db).await?;
        counter!("artmart.orders.status_changed", 1, "status" => next.to_string());
        info!(order_id = %id, from = %current, to = %next, "Order status updated");
        Ok(updated)
    }

    /// Buyer cancellation; only a pending order can be cancelled.
    #[instrument(skip(self, request))]
    pub async fn cancel(&self, id: Uuid, request: CancelOrder) -> Result<Order, ServiceError> {
        let existing = self.find_active(id).await?;
        if !can_cancel(existing.order_status) {
            warn!(order_id = %id, status = %existing.order_status, "Rejected cancellation");
            return Err(ServiceError::InvalidTransition(
                "Only pending orders can be canceled".to_string(),
            ));
        }

        let mut model: order::ActiveModel = existing.into();
        model.order_status = Set(OrderStatus::Cancelled);
        model.cancel_reason = Set(non_blank(request.cancel_reason));

        let updated = model.update(&*self.db).await?;
        counter!("artmart.orders.status_changed", 1, "status" => "Cancelled");
        info!(order_id = %id, "Order cancelled");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = OrderEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order"))?;
        let mut model: order::ActiveModel = existing.into();
        model.deleted = Set(true);
        model.update(&*self.db).await?;
        info!(order_id = %id, "Order soft-deleted");
        Ok(())
    }

    async fn find_active(&self, id: Uuid) -> Result<Order, ServiceError> {
        OrderEntity::find_by_id(id)
            .filter(order::Column::Deleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order"))
    }

    async fn active_orders(
        &self,
        scope: Option<sea_orm::sea_query::SimpleExpr>,
    ) -> Result<Vec<Order>, ServiceError> {
        let mut query = OrderEntity::find().filter(order::Column::Deleted.eq(false));
        if let Some(scope) = scope {
            query = query.filter(scope);
        }
        Ok(query
            .order_by_desc(order::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    async fn buyer_summaries(
        &self,
        mut ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, BuyerSummary>, ServiceError> {
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Uuid, String, String)> = UserEntity::find()
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::Name)
            .column(user::Column::Email)
            .filter(user::Column::Id.is_in(ids))
            .into_tuple()
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name, email)| (id, BuyerSummary { id, name, email }))
            .collect())
    }

    async fn seller_summaries(
        &self,
        mut ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, SellerSummary>, ServiceError> {
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Uuid, String)> = ArtistEntity::find()
            .select_only()
            .column(artist::Column::Id)
            .column(artist::Column::Name)
            .filter(artist::Column::Id.is_in(ids))
            .into_tuple()
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| (id, SellerSummary { id, name }))
            .collect())
    }

    /// Includes soft-deleted paintings: an order keeps pointing at what was bought.
    async fn painting_summaries(
        &self,
        mut ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, PaintingSummary>, ServiceError> {
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(PaintingEntity::find()
            .filter(painting::Column::Id.is_in(ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| {
                (
                    p.id,
                    PaintingSummary {
                        id: p.id,
                        title: p.title,
                        image_urls: p.image_urls,
                    },
                )
            })
            .collect())
    }
}
