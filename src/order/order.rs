use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::OrderStatus;

/// How the order is settled at the door. No payment is processed here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
    CardOnDelivery,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::CashOnDelivery
    }
}

impl PaymentMethod {
    pub fn label_tr(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Kapıda nakit",
            PaymentMethod::CardOnDelivery => "Kapıda kart",
        }
    }
}

/// A single line of the basket. Prices are minor units (kuruş).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OrderItem {
    pub fn line_total_cents(&self) -> u32 {
        self.quantity * self.unit_price_cents
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub line: String,
    pub district: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DeliveryAddress {
    /// One-line form used in outbound notification messages.
    pub fn summary(&self) -> String {
        format!("{}, {}/{}", self.line, self.district, self.city)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub phone: String,
}

/// Input shape for placing an order. Totals are computed once at placement
/// and never recomputed afterwards.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub restaurant_id: String,
    pub customer: CustomerRef,
    pub items: Vec<OrderItem>,
    pub address: DeliveryAddress,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub delivery_fee_cents: u32,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// An accepted order. `status` mirrors the tracking side's latest status
/// update; everything else is immutable after placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub restaurant_id: String,
    pub customer: CustomerRef,
    pub items: Vec<OrderItem>,
    pub address: DeliveryAddress,
    pub payment_method: PaymentMethod,
    pub subtotal_cents: u32,
    pub delivery_fee_cents: u32,
    pub total_cents: u32,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Turn a draft into an order: compute the totals, start at `Pending`.
    pub fn place(id: String, draft: OrderDraft, now: DateTime<Utc>) -> Order {
        let subtotal_cents: u32 = draft.items.iter().map(OrderItem::line_total_cents).sum();
        Order {
            id,
            restaurant_id: draft.restaurant_id,
            customer: draft.customer,
            items: draft.items,
            address: draft.address,
            payment_method: draft.payment_method,
            subtotal_cents,
            delivery_fee_cents: draft.delivery_fee_cents,
            total_cents: subtotal_cents + draft.delivery_fee_cents,
            status: OrderStatus::Pending,
            estimated_delivery_at: None,
            special_instructions: draft.special_instructions,
            created_at: now,
            updated_at: now,
        }
    }
}
