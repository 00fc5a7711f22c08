//! Test doubles and builders for the fan-out tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use siparis::machine::OrderStatusMachine;
use siparis::notify::{message, ChannelError, NotificationChannel};
use siparis::order::{
    CustomerRef, DeliveryAddress, Order, OrderDraft, OrderItem, OrderStatus, PaymentMethod,
};
use siparis::store::{MemoryOrderStore, MemoryTrackingStore};
use siparis::telegram::{BotApi, InlineKeyboard};
use siparis::tracking::{MilestoneTimes, OrderTracking};

/// Channel that records every event label it is handed.
pub struct RecordingChannel {
    name: &'static str,
    pub sent: Mutex<Vec<String>>,
}

impl RecordingChannel {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(RecordingChannel {
            name,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn labels(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, event: &siparis::notify::OrderEvent) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(event.label());
        Ok(())
    }
}

/// Channel that refuses everything.
pub struct FailingChannel;

#[async_trait]
impl NotificationChannel for FailingChannel {
    fn name(&self) -> &'static str {
        "kırık"
    }

    async fn send(&self, _event: &siparis::notify::OrderEvent) -> Result<(), ChannelError> {
        Err(ChannelError::Rejected("gateway kapalı".into()))
    }
}

/// One captured `send_message` call.
#[derive(Clone, Debug)]
pub struct SentMessage {
    pub chat_id: String,
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
}

/// Bot API double that records sends and acks instead of talking HTTP.
#[derive(Default)]
pub struct RecordingBotApi {
    pub sent: Mutex<Vec<SentMessage>>,
    pub acks: Mutex<Vec<(String, String)>>,
}

impl RecordingBotApi {
    pub fn messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BotApi for RecordingBotApi {
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(SentMessage {
            chat_id: chat_id.into(),
            text: text.into(),
            keyboard,
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), ChannelError> {
        self.acks
            .lock()
            .unwrap()
            .push((callback_id.into(), text.into()));
        Ok(())
    }
}

pub fn order(id: &str) -> Order {
    Order::place(
        id.into(),
        OrderDraft {
            restaurant_id: "rest-3".into(),
            customer: CustomerRef {
                id: None,
                name: "Derya".into(),
                phone: "+905553334455".into(),
            },
            items: vec![OrderItem {
                product_id: "p-mantı".into(),
                name: "Mantı".into(),
                quantity: 1,
                unit_price_cents: 12_500,
                note: None,
            }],
            address: DeliveryAddress {
                line: "Alsancak Mah. 1453 Sok. 8".into(),
                district: "Konak".into(),
                city: "İzmir".into(),
                notes: None,
            },
            payment_method: PaymentMethod::CashOnDelivery,
            delivery_fee_cents: 800,
            special_instructions: None,
        },
        Utc::now(),
    )
}

/// Machine preloaded with one order.
pub async fn machine_with_order(id: &str) -> Arc<OrderStatusMachine> {
    let machine = Arc::new(OrderStatusMachine::new(
        Arc::new(MemoryOrderStore::new()),
        Arc::new(MemoryTrackingStore::new()),
    ));
    let order = order(id);
    let tracking = OrderTracking::start(
        &order,
        MilestoneTimes::default(),
        message::status_line(OrderStatus::Pending).to_string(),
        Utc::now(),
    );
    machine.register(order, tracking).await.unwrap();
    machine
}
