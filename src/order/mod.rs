mod order;
mod status;

pub use order::{CustomerRef, DeliveryAddress, Order, OrderDraft, OrderItem, PaymentMethod};
pub use status::OrderStatus;
