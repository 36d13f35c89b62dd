//! Nested documents stored as JSON columns.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Postal address attached to an account.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    pub state: String,
    pub pin: String,
    pub country: String,
}

impl Address {
    /// `state`, `pin` and `country` are mandatory.
    pub fn is_complete(&self) -> bool {
        [&self.state, &self.pin, &self.country]
            .iter()
            .all(|part| !part.trim().is_empty())
    }
}

/// Address fields as they arrive on the wire, before completeness is checked.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddressInput {
    pub street: Option<String>,
    pub state: Option<String>,
    pub pin: Option<String>,
    pub country: Option<String>,
}

impl AddressInput {
    pub fn into_address(self) -> Option<Address> {
        let address = Address {
            street: self.street.filter(|s| !s.trim().is_empty()),
            state: self.state?,
            pin: self.pin?,
            country: self.country?,
        };
        address.is_complete().then_some(address)
    }
}

/// Ordered list of strings: image URLs, materials.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

impl From<Vec<String>> for StringList {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

/// Set of record ids kept in insertion order, used for likes.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct IdList(pub Vec<Uuid>);

impl IdList {
    /// Adds `id` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, id: Uuid) -> bool {
        if self.0.contains(&id) {
            false
        } else {
            self.0.push(id);
            true
        }
    }

    pub fn remove(&mut self, id: &Uuid) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        before != self.0.len()
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Comments(pub Vec<Comment>);

/// Price snapshot of one painting taken when an order is placed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub painting_id: Uuid,
    pub title: String,
    pub price: Decimal,
    pub discount: Decimal,
    pub final_price: Decimal,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct LineItems(pub Vec<LineItem>);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl ShippingAddress {
    pub fn is_complete(&self) -> bool {
        [
            &self.name,
            &self.phone,
            &self.address,
            &self.city,
            &self.state,
            &self.pincode,
        ]
        .iter()
        .all(|part| !part.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_input_requires_state_pin_country() {
        let partial = AddressInput {
            street: Some("  ".into()),
            state: Some("Goa".into()),
            pin: Some("403001".into()),
            country: None,
        };
        assert!(partial.into_address().is_none());

        let full = AddressInput {
            street: Some("".into()),
            state: Some("Goa".into()),
            pin: Some("403001".into()),
            country: Some("India".into()),
        };
        let address = full.into_address().expect("complete address");
        assert_eq!(address.street, None);
        assert_eq!(address.country, "India");
    }

    #[test]
    fn id_list_ignores_duplicates() {
        let mut likes = IdList::default();
        let id = Uuid::new_v4();
        assert!(likes.insert(id));
        assert!(!likes.insert(id));
        assert_eq!(likes.0.len(), 1);
        assert!(likes.remove(&id));
        assert!(!likes.remove(&id));
    }

    #[test]
    fn line_items_serialize_camel_case() {
        let item = LineItem {
            painting_id: Uuid::nil(),
            title: "Dusk".into(),
            price: Decimal::new(1000, 0),
            discount: Decimal::new(10, 0),
            final_price: Decimal::new(900, 0),
            quantity: 2,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["finalPrice"], "900");
        assert_eq!(json["paintingId"], Uuid::nil().to_string());
    }

    #[test]
    fn blank_shipping_field_is_incomplete() {
        let address = ShippingAddress {
            name: "Ravi".into(),
            phone: "9123456789".into(),
            address: "12 Lake Rd".into(),
            city: "Pune".into(),
            state: "MH".into(),
            pincode: " ".into(),
        };
        assert!(!address.is_complete());
    }
}
