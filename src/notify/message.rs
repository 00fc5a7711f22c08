use crate::order::{OrderItem, OrderStatus};

use super::event::OrderContext;

/// Fixed status line shown to customers and operators. Every channel
/// renders around this table so wording stays consistent.
pub fn status_line(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "⏳ Sipariş alındı, onay bekleniyor",
        OrderStatus::Confirmed => "✅ Sipariş onaylandı",
        OrderStatus::Preparing => "👨‍🍳 Sipariş hazırlanıyor",
        OrderStatus::Ready => "📦 Sipariş hazır, kurye bekleniyor",
        OrderStatus::Delivering => "🚚 Sipariş yolda",
        OrderStatus::Delivered => "🎉 Sipariş teslim edildi",
        OrderStatus::Cancelled => "❌ Sipariş iptal edildi",
    }
}

/// The forward action offered on a status message's buttons, as
/// `(callback action, button label)`. Terminal states offer none.
pub fn next_action(status: OrderStatus) -> Option<(&'static str, &'static str)> {
    match status {
        OrderStatus::Pending => Some(("approve", "✅ Onayla")),
        OrderStatus::Confirmed => Some(("preparing", "👨‍🍳 Hazırlanıyor")),
        OrderStatus::Preparing | OrderStatus::Ready => Some(("on_the_way", "🚚 Yola çıktı")),
        OrderStatus::Delivering => Some(("delivered", "✅ Teslim edildi")),
        OrderStatus::Delivered | OrderStatus::Cancelled => None,
    }
}

/// Minor units to a lira string with a comma separator, e.g. "184,50 ₺".
pub fn format_lira(cents: u32) -> String {
    format!("{},{:02} ₺", cents / 100, cents % 100)
}

/// Multi-line order summary used by the chat channels for a new order.
pub fn order_summary(context: &OrderContext, items: &[OrderItem]) -> String {
    let mut lines = vec![
        format!("🆕 Yeni sipariş! #{}", context.order_id),
        format!("👤 {}", context.customer_name),
        format!("📞 {}", context.customer_phone),
        format!("📍 {}", context.address),
        String::new(),
    ];
    for item in items {
        let mut line = format!("• {} x{}", item.name, item.quantity);
        if let Some(note) = &item.note {
            line.push_str(&format!(" ({note})"));
        }
        lines.push(line);
    }
    lines.push(String::new());
    lines.push(format!("💰 Toplam: {}", format_lira(context.total_cents)));
    lines.push(format!("💳 {}", context.payment_method.label_tr()));
    if let Some(note) = &context.special_instructions {
        lines.push(format!("📝 Not: {note}"));
    }
    lines.join("\n")
}

/// One-line status message with the order id attached.
pub fn status_message(context: &OrderContext, status: OrderStatus) -> String {
    format!("{}\nSipariş #{}", status_line(status), context.order_id)
}
