//! Notification fan-out: channel isolation, the report, and the
//! notification log on the tracking aggregate.

mod support;

use std::sync::Arc;

use siparis::notify::{
    NotificationChannel, NotificationDispatcher, OrderContext, OrderEvent, TelegramChannel,
};
use siparis::order::OrderStatus;
use siparis::tracking::UpdateActor;

use support::{machine_with_order, order, FailingChannel, RecordingBotApi, RecordingChannel};

fn new_order_event(order_id: &str) -> OrderEvent {
    let order = order(order_id);
    OrderEvent::NewOrder {
        context: OrderContext::from_order(&order),
        items: order.items,
    }
}

#[tokio::test]
async fn every_channel_sees_the_event() {
    let first = RecordingChannel::new("telegram");
    let second = RecordingChannel::new("whatsapp");
    let third = RecordingChannel::new("email");
    let dispatcher = NotificationDispatcher::new(vec![
        first.clone(),
        second.clone(),
        third.clone(),
    ]);

    let report = dispatcher.dispatch(&new_order_event("ord-1")).await;

    assert!(report.all_ok());
    assert_eq!(first.labels(), vec!["new_order"]);
    assert_eq!(second.labels(), vec!["new_order"]);
    assert_eq!(third.labels(), vec!["new_order"]);

    let channels: Vec<_> = report.outcomes.iter().map(|o| o.channel).collect();
    assert_eq!(channels, vec!["telegram", "whatsapp", "email"]);
}

#[tokio::test]
async fn one_failing_channel_stops_nothing() {
    let first = RecordingChannel::new("telegram");
    let third = RecordingChannel::new("email");
    let dispatcher = NotificationDispatcher::new(vec![
        first.clone(),
        Arc::new(FailingChannel),
        third.clone(),
    ]);

    let report = dispatcher.dispatch(&new_order_event("ord-1")).await;

    assert!(!report.all_ok());
    assert_eq!(first.labels().len(), 1);
    assert_eq!(third.labels().len(), 1);

    let records = report.records();
    assert_eq!(records.len(), 3);
    assert!(records[0].ok);
    assert!(!records[1].ok);
    assert!(records[1].detail.as_deref().unwrap().contains("gateway kapalı"));
    assert!(records[2].ok);
}

#[tokio::test]
async fn machine_logs_the_dispatch_outcomes() {
    let machine = machine_with_order("ord-1").await;
    let recording = RecordingChannel::new("telegram");
    let dispatcher =
        NotificationDispatcher::new(vec![recording.clone(), Arc::new(FailingChannel)]);

    let outcome = machine
        .transition(
            "ord-1",
            OrderStatus::Confirmed,
            UpdateActor::Restaurant,
            None,
            None,
        )
        .await
        .unwrap();
    let siparis::machine::TransitionOutcome::Applied(change) = outcome else {
        panic!("expected an applied change");
    };
    machine.run_notification(&dispatcher, &change).await;

    let tracking = machine.tracking("ord-1").await.unwrap().unwrap();
    assert_eq!(tracking.notifications.len(), 2);
    assert_eq!(tracking.notifications[0].channel, "telegram");
    assert_eq!(tracking.notifications[0].event, "status:confirmed");
    assert!(tracking.notifications[0].ok);
    assert_eq!(tracking.notifications[1].channel, "kırık");
    assert!(!tracking.notifications[1].ok);

    assert_eq!(recording.labels(), vec!["status:confirmed"]);
}

#[tokio::test]
async fn telegram_renders_the_summary_with_approval_buttons() {
    let api = Arc::new(RecordingBotApi::default());
    let channel: Arc<dyn NotificationChannel> =
        Arc::new(TelegramChannel::new(api.clone(), "-1001234"));
    let dispatcher = NotificationDispatcher::new(vec![channel]);

    let report = dispatcher.dispatch(&new_order_event("ord-9")).await;
    assert!(report.all_ok());

    let messages = api.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].chat_id, "-1001234");
    assert!(messages[0].text.contains("🆕 Yeni sipariş! #ord-9"));
    assert!(messages[0].text.contains("• Mantı x1"));
    assert!(messages[0].text.contains("💰 Toplam: 133,00 ₺"));

    let keyboard = messages[0].keyboard.as_ref().unwrap();
    assert_eq!(keyboard[0][0].callback_data, "approve:ord-9");
    assert_eq!(keyboard[0][1].callback_data, "reject:ord-9");
}

#[tokio::test]
async fn status_message_offers_the_next_step() {
    let api = Arc::new(RecordingBotApi::default());
    let channel: Arc<dyn NotificationChannel> =
        Arc::new(TelegramChannel::new(api.clone(), "-1001234"));
    let dispatcher = NotificationDispatcher::new(vec![channel]);

    let event = OrderEvent::StatusChanged {
        context: OrderContext::from_order(&order("ord-9")),
        status: OrderStatus::Confirmed,
    };
    dispatcher.dispatch(&event).await;

    let messages = api.messages();
    assert!(messages[0].text.contains("✅ Sipariş onaylandı"));
    let keyboard = messages[0].keyboard.as_ref().unwrap();
    assert_eq!(keyboard[0][0].callback_data, "preparing:ord-9");
    assert_eq!(keyboard[0][0].text, "👨‍🍳 Hazırlanıyor");
}

#[tokio::test]
async fn terminal_status_message_carries_no_buttons() {
    let api = Arc::new(RecordingBotApi::default());
    let channel: Arc<dyn NotificationChannel> =
        Arc::new(TelegramChannel::new(api.clone(), "-1001234"));
    let dispatcher = NotificationDispatcher::new(vec![channel]);

    let event = OrderEvent::StatusChanged {
        context: OrderContext::from_order(&order("ord-9")),
        status: OrderStatus::Delivered,
    };
    dispatcher.dispatch(&event).await;

    let messages = api.messages();
    assert!(messages[0].text.contains("🎉 Sipariş teslim edildi"));
    assert!(messages[0].keyboard.is_none());
}
