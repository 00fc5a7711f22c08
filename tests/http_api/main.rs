//! HTTP contract tests. Starts the real router on an ephemeral port and
//! exercises it with reqwest.


use std::time::Duration;

use serde_json::{json, Value};
use siparis::order::OrderStatus;

use support::{order_payload, start_server};

#[tokio::test]
async fn health_answers() {
    let server = start_server().await;
    let resp = server
        .client
        .get(format!("{}/health", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn placing_an_order_opens_tracking_and_notifies() {
    let server = start_server().await;
    let order_id = server.place_order().await;
    assert!(!order_id.is_empty());

    let tracking = server.track(&order_id).await;
    assert_eq!(tracking["orderId"], order_id.as_str());
    assert_eq!(tracking["status"], "pending");
    assert_eq!(tracking["deliveryStatus"], "waiting");
    assert_eq!(tracking["statusUpdates"].as_array().unwrap().len(), 1);
    assert!(tracking["timestamps"]["createdAt"].is_string());
    assert!(tracking["estimatedTimes"]["delivered"].is_string());

    // The new-order alert went through the channel and into the log.
    assert_eq!(
        server.channel.sent.lock().unwrap().clone(),
        vec!["new_order"]
    );
    let log = tracking["notifications"].as_array().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["channel"], "kayıt");
    assert_eq!(log[0]["ok"], true);
}

#[tokio::test]
async fn an_empty_basket_is_refused() {
    let server = start_server().await;
    let mut payload = order_payload();
    payload["items"] = json!([]);

    let resp = server
        .client
        .post(format!("{}/orders", server.base))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Sepet boş olamaz");
}

#[tokio::test]
async fn missing_contact_details_are_refused() {
    let server = start_server().await;
    let mut payload = order_payload();
    payload["customer"] = json!({ "name": "Aylin", "phone": "  " });

    let resp = server
        .client
        .post(format!("{}/orders", server.base))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Müşteri adı ve telefonu gerekli");
}

#[tokio::test]
async fn an_order_can_be_fetched_back() {
    let server = start_server().await;
    let order_id = server.place_order().await;

    let resp = server
        .client
        .get(format!("{}/orders/{order_id}", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], order_id.as_str());
    assert_eq!(body["totalCents"], 19_000);
    assert_eq!(body["paymentMethod"], "card_on_delivery");

    let resp = server
        .client
        .get(format!("{}/orders/ghost", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Sipariş bulunamadı");
}

#[tokio::test]
async fn tracking_query_needs_an_order_id() {
    let server = start_server().await;
    let resp = server
        .client
        .get(format!("{}/orders/track", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "orderId gerekli");
}

#[tokio::test]
async fn update_status_moves_the_order() {
    let server = start_server().await;
    let order_id = server.place_order().await;

    let (status, body) = server
        .command(json!({
            "orderId": order_id,
            "action": "update_status",
            "data": { "status": "confirmed", "updatedBy": "restaurant" }
        }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let tracking = server.track(&order_id).await;
    assert_eq!(tracking["status"], "confirmed");
    assert!(tracking["timestamps"]["confirmedAt"].is_string());

    let order = server
        .machine
        .order(&order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn commands_validate_their_input() {
    let server = start_server().await;
    let order_id = server.place_order().await;

    let (status, body) = server
        .command(json!({
            "orderId": order_id,
            "action": "update_status",
            "data": { "status": "uçuyor" }
        }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Geçersiz durum: uçuyor");

    let (status, body) = server
        .command(json!({
            "orderId": order_id,
            "action": "teleport",
            "data": {}
        }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Bilinmeyen işlem: teleport");

    let (status, _) = server
        .command(json!({
            "orderId": "ghost",
            "action": "update_status",
            "data": { "status": "confirmed" }
        }))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn a_refused_transition_is_a_soft_failure() {
    let server = start_server().await;
    let order_id = server.place_order().await;

    server
        .command(json!({
            "orderId": order_id,
            "action": "update_status",
            "data": { "status": "delivered" }
        }))
        .await;

    let (status, body) = server
        .command(json!({
            "orderId": order_id,
            "action": "update_status",
            "data": { "status": "preparing" }
        }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Sipariş kapalı"));
}

#[tokio::test]
async fn driver_assignment_over_http() {
    let server = start_server().await;
    let order_id = server.place_order().await;
    server
        .command(json!({
            "orderId": order_id,
            "action": "update_status",
            "data": { "status": "confirmed" }
        }))
        .await;

    let (status, body) = server
        .command(json!({
            "orderId": order_id,
            "action": "assign_driver",
            "data": {
                "driver": {
                    "id": "d-1",
                    "name": "Emre",
                    "phone": "+905559876543",
                    "vehicle": { "kind": "motosiklet", "plate": "06 KR 907" },
                    "rating": 4.7,
                    "completedDeliveries": 412,
                    "online": true
                }
            }
        }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let tracking = server.track(&order_id).await;
    assert_eq!(tracking["deliveryStatus"], "assigned");
    assert_eq!(tracking["driver"]["name"], "Emre");
}

#[tokio::test]
async fn location_updates_and_interactions_land_in_the_view() {
    let server = start_server().await;
    let order_id = server.place_order().await;

    let (_, body) = server
        .command(json!({
            "orderId": order_id,
            "action": "update_location",
            "data": { "lat": 38.4237, "lng": 27.1428, "status": "delivering" }
        }))
        .await;
    assert_eq!(body["success"], true);

    let (_, body) = server
        .command(json!({
            "orderId": order_id,
            "action": "add_interaction",
            "data": { "type": "call_driver", "notes": "adres tarifi" }
        }))
        .await;
    assert_eq!(body["success"], true);

    let tracking = server.track(&order_id).await;
    assert_eq!(tracking["status"], "delivering");
    assert_eq!(tracking["locationHistory"].as_array().unwrap().len(), 1);
    assert_eq!(tracking["locationHistory"][0]["latitude"], 38.4237);
    let interactions = tracking["customerInteractions"].as_array().unwrap();
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0]["type"], "call_driver");
}

#[tokio::test]
async fn webhook_status_probe() {
    let server = start_server().await;
    let resp = server
        .client
        .get(format!("{}/telegram/webhook", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["service"], "siparis-telegram-webhook");
}

#[tokio::test]
async fn webhook_answers_200_to_anything() {
    let server = start_server().await;

    for body in ["bozuk veri {{{", "[1,2,3]", "{}"] {
        let resp = server
            .client
            .post(format!("{}/telegram/webhook", server.base))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let reply: Value = resp.json().await.unwrap();
        assert_eq!(reply["ok"], true);
    }
}

#[tokio::test]
async fn webhook_button_press_drives_the_machine() {
    let server = start_server().await;
    let order_id = server.place_order().await;

    let update = json!({
        "update_id": 7001,
        "callback_query": {
            "id": "cb-77",
            "from": { "id": 42, "first_name": "Ali" },
            "data": format!("approve:{order_id}")
        }
    });
    let resp = server
        .client
        .post(format!("{}/telegram/webhook", server.base))
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let reply: Value = resp.json().await.unwrap();
    assert_eq!(reply["ok"], true);

    let tracking = server.track(&order_id).await;
    assert_eq!(tracking["status"], "confirmed");

    let acks = server.api.acks.lock().unwrap().clone();
    assert_eq!(acks, vec![("cb-77".to_string(), "✅ Sipariş onaylandı".to_string())]);
}

#[tokio::test]
async fn direct_telegram_send_uses_the_channel() {
    let server = start_server().await;

    let resp = server
        .client
        .post(format!("{}/telegram/send", server.base))
        .json(&json!({
            "type": "status_update",
            "data": { "orderId": "ord-55", "status": "delivering", "customerName": "Aylin" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    let sent = server.api.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "-100500");
    assert!(sent[0].1.contains("🚚 Sipariş yolda"));

    let resp = server
        .client
        .post(format!("{}/telegram/send", server.base))
        .json(&json!({ "type": "selfie", "data": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Bilinmeyen mesaj türü: selfie");
}

#[tokio::test]
async fn unconfigured_whatsapp_is_a_soft_failure() {
    let server = start_server().await;

    let resp = server
        .client
        .post(format!("{}/whatsapp/send", server.base))
        .json(&json!({
            "type": "status_update",
            "data": { "orderId": "ord-55", "status": "ready" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "WhatsApp kanalı yapılandırılmamış");
}

#[tokio::test]
async fn tracking_stream_pushes_the_snapshot_and_updates() {
    let server = start_server().await;
    let order_id = server.place_order().await;

    let resp = server
        .client
        .get(format!(
            "{}/orders/track/stream?orderId={order_id}",
            server.base
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let mut resp = resp;
    let mut streamed = String::new();
    read_until(&mut resp, &mut streamed, "\"status\":\"pending\"").await;
    assert!(streamed.contains("data:"));
    assert!(streamed.contains(&order_id));

    server
        .command(json!({
            "orderId": order_id,
            "action": "update_status",
            "data": { "status": "confirmed" }
        }))
        .await;

    read_until(&mut resp, &mut streamed, "\"status\":\"confirmed\"").await;
}

/// Append stream chunks to `buffer` until `needle` shows up. Panics after
/// five seconds or when the stream closes first.
async fn read_until(resp: &mut reqwest::Response, buffer: &mut String, needle: &str) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !buffer.contains(needle) {
        let chunk = tokio::time::timeout_at(deadline, resp.chunk())
            .await
            .unwrap_or_else(|_| panic!("no {needle} within five seconds"))
            .unwrap()
            .expect("stream closed early");
        buffer.push_str(&String::from_utf8_lossy(&chunk));
    }
}

#[tokio::test]
async fn tracking_stream_for_an_unknown_order_is_404() {
    let server = start_server().await;
    let resp = server
        .client
        .get(format!("{}/orders/track/stream?orderId=ghost", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
