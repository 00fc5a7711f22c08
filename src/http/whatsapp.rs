use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::warn;

use crate::http::error::ApiError;
use crate::http::send::{parse_data, SendOrderData, SendReply, SendRequest};
use crate::http::state::AppState;
use crate::notify::WhatsAppChannel;

#[derive(Debug, Deserialize)]
struct EmergencyData {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CustomData {
    #[serde(default)]
    to: Option<String>,
    message: String,
}

/// POST /whatsapp/send: direct send for the five message types.
/// Customer-facing types go to the order's phone when given, otherwise to
/// the operations number.
pub async fn send(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Result<Json<SendReply>, ApiError> {
    let Some(channel) = &state.whatsapp else {
        return Ok(Json(SendReply::failed("WhatsApp kanalı yapılandırılmamış")));
    };

    let (to, body) = match request.kind.as_str() {
        "new_order" => {
            let data: SendOrderData = parse_data(request.data)?;
            let items = data.items.clone().unwrap_or_default();
            let body = WhatsAppChannel::new_order_message(&data.context(), &items);
            (channel.ops_number().to_string(), body)
        }
        "status_update" => {
            let data: SendOrderData = parse_data(request.data)?;
            let status = data.parsed_status()?;
            let context = data.context();
            let body = WhatsAppChannel::status_update_message(&context, status);
            (recipient_for(&data, channel), body)
        }
        "cancellation" => {
            let data: SendOrderData = parse_data(request.data)?;
            let context = data.context();
            let body = WhatsAppChannel::cancellation_message(&context);
            (recipient_for(&data, channel), body)
        }
        "emergency" => {
            let data: EmergencyData = parse_data(request.data)?;
            (
                channel.ops_number().to_string(),
                WhatsAppChannel::emergency_message(&data.message),
            )
        }
        "custom" => {
            let data: CustomData = parse_data(request.data)?;
            let to = data
                .to
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| channel.ops_number().to_string());
            (to, data.message)
        }
        other => {
            return Err(ApiError::Validation(format!("Bilinmeyen mesaj türü: {other}")));
        }
    };

    match channel.send_text(&to, &body).await {
        Ok(()) => Ok(Json(SendReply::sent("Mesaj gönderildi"))),
        Err(send_error) => {
            warn!(%send_error, "direct whatsapp send failed");
            Ok(Json(SendReply::failed(send_error.to_string())))
        }
    }
}

fn recipient_for(data: &SendOrderData, channel: &WhatsAppChannel) -> String {
    data.customer_phone
        .clone()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| channel.ops_number().to_string())
}
