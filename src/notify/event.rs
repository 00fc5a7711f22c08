use crate::order::{Order, OrderItem, OrderStatus, PaymentMethod};

/// Order fields every outbound message may need, detached from the full
/// aggregate so channels never reach back into the stores.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderContext {
    pub order_id: String,
    pub restaurant_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub payment_method: PaymentMethod,
    pub total_cents: u32,
    pub special_instructions: Option<String>,
}

impl OrderContext {
    pub fn from_order(order: &Order) -> OrderContext {
        OrderContext {
            order_id: order.id.clone(),
            restaurant_id: order.restaurant_id.clone(),
            customer_name: order.customer.name.clone(),
            customer_phone: order.customer.phone.clone(),
            address: order.address.summary(),
            payment_method: order.payment_method,
            total_cents: order.total_cents,
            special_instructions: order.special_instructions.clone(),
        }
    }
}

/// Semantic order event fanned out to every registered channel.
#[derive(Clone, Debug)]
pub enum OrderEvent {
    /// A new order arrived and the restaurant has to approve or reject it.
    NewOrder {
        context: OrderContext,
        items: Vec<OrderItem>,
    },
    /// The order moved to `status`.
    StatusChanged {
        context: OrderContext,
        status: OrderStatus,
    },
}

impl OrderEvent {
    pub fn context(&self) -> &OrderContext {
        match self {
            OrderEvent::NewOrder { context, .. } => context,
            OrderEvent::StatusChanged { context, .. } => context,
        }
    }

    /// Label recorded in the notification log, e.g. "status:confirmed".
    pub fn label(&self) -> String {
        match self {
            OrderEvent::NewOrder { .. } => "new_order".to_string(),
            OrderEvent::StatusChanged { status, .. } => format!("status:{status}"),
        }
    }
}
