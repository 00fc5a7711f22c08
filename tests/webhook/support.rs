//! Doubles and builders for the webhook handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use siparis::machine::OrderStatusMachine;
use siparis::notify::{message, ChannelError, NotificationChannel, NotificationDispatcher};
use siparis::order::{
    CustomerRef, DeliveryAddress, Order, OrderDraft, OrderItem, OrderStatus, PaymentMethod,
};
use siparis::store::{MemoryOrderStore, MemoryTrackingStore};
use siparis::telegram::{BotApi, BotCommandProcessor, ChannelCommandHandler, InlineKeyboard};
use siparis::tracking::{MilestoneTimes, OrderTracking};

#[derive(Default)]
pub struct RecordingBotApi {
    pub sent: Mutex<Vec<(String, String)>>,
    pub acks: Mutex<Vec<(String, String)>>,
}

impl RecordingBotApi {
    pub fn ack_texts(&self) -> Vec<String> {
        self.acks.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }
}

#[async_trait]
impl BotApi for RecordingBotApi {
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        _keyboard: Option<InlineKeyboard>,
    ) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push((chat_id.into(), text.into()));
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

pub struct RecordingChannel {
    pub sent: Mutex<Vec<String>>,
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        "kayıt"
    }

    async fn send(&self, event: &siparis::notify::OrderEvent) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(event.label());
        Ok(())
    }
}

pub struct Fixture {
    pub handler: ChannelCommandHandler,
    pub machine: Arc<OrderStatusMachine>,
    pub api: Arc<RecordingBotApi>,
    pub channel: Arc<RecordingChannel>,
}

/// Handler over fresh in-memory stores with one registered order, a
/// recording bot API and a recording notification channel.
pub async fn fixture_with_order(order_id: &str) -> Fixture {
    let machine = Arc::new(OrderStatusMachine::new(
        Arc::new(MemoryOrderStore::new()),
        Arc::new(MemoryTrackingStore::new()),
    ));
    let order = Order::place(
        order_id.into(),
        OrderDraft {
            restaurant_id: "rest-5".into(),
            customer: CustomerRef {
                id: None,
                name: "Hakan".into(),
                phone: "+905556667788".into(),
            },
            items: vec![OrderItem {
                product_id: "p-köfte".into(),
                name: "Izgara köfte".into(),
                quantity: 1,
                unit_price_cents: 16_000,
                note: None,
            }],
            address: DeliveryAddress {
                line: "Cumhuriyet Mah. 17. Sok. 2".into(),
                district: "Muratpaşa".into(),
                city: "Antalya".into(),
                notes: None,
            },
            payment_method: PaymentMethod::CashOnDelivery,
            delivery_fee_cents: 900,
            special_instructions: None,
        },
        Utc::now(),
    );
    let tracking = OrderTracking::start(
        &order,
        MilestoneTimes::default(),
        message::status_line(OrderStatus::Pending).to_string(),
        Utc::now(),
    );
    machine.register(order, tracking).await.unwrap();

    let api = Arc::new(RecordingBotApi::default());
    let channel = Arc::new(RecordingChannel {
        sent: Mutex::new(Vec::new()),
    });
    let dispatcher = Arc::new(NotificationDispatcher::new(vec![channel.clone()]));
    let processor = Arc::new(BotCommandProcessor::new(machine.clone()));
    let handler = ChannelCommandHandler::new(
        machine.clone(),
        dispatcher,
        api.clone(),
        processor,
    );

    Fixture {
        handler,
        machine,
        api,
        channel,
    }
}
