use thiserror::Error;

use crate::order::OrderStatus;

/// Actions wired to inline buttons. Five map to a status transition, two
/// are informational only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    Approve,
    Reject,
    Preparing,
    OnTheWay,
    Delivered,
    Call,
    StatusInfo,
}

impl CallbackAction {
    pub fn parse(value: &str) -> Option<CallbackAction> {
        match value {
            "approve" => Some(CallbackAction::Approve),
            "reject" => Some(CallbackAction::Reject),
            "preparing" => Some(CallbackAction::Preparing),
            "on_the_way" => Some(CallbackAction::OnTheWay),
            "delivered" => Some(CallbackAction::Delivered),
            "call" => Some(CallbackAction::Call),
            "status_info" => Some(CallbackAction::StatusInfo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackAction::Approve => "approve",
            CallbackAction::Reject => "reject",
            CallbackAction::Preparing => "preparing",
            CallbackAction::OnTheWay => "on_the_way",
            CallbackAction::Delivered => "delivered",
            CallbackAction::Call => "call",
            CallbackAction::StatusInfo => "status_info",
        }
    }

    /// The status this action drives the order to, if any.
    pub fn target_status(&self) -> Option<OrderStatus> {
        match self {
            CallbackAction::Approve => Some(OrderStatus::Confirmed),
            CallbackAction::Reject => Some(OrderStatus::Cancelled),
            CallbackAction::Preparing => Some(OrderStatus::Preparing),
            CallbackAction::OnTheWay => Some(OrderStatus::Delivering),
            CallbackAction::Delivered => Some(OrderStatus::Delivered),
            CallbackAction::Call | CallbackAction::StatusInfo => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallbackParseError {
    #[error("callback data has no action/order separator")]
    MissingSeparator,

    #[error("callback data has an empty order id")]
    EmptyOrderId,

    #[error("unknown callback action: {0:?}")]
    UnknownAction(String),
}

/// Split button payload `"<action>:<orderId>"` into its parts. The order
/// id may itself contain colons; only the first one separates.
pub fn parse_callback_data(data: &str) -> Result<(CallbackAction, &str), CallbackParseError> {
    let (action, order_id) = data
        .split_once(':')
        .ok_or(CallbackParseError::MissingSeparator)?;
    if order_id.is_empty() {
        return Err(CallbackParseError::EmptyOrderId);
    }
    let action = CallbackAction::parse(action)
        .ok_or_else(|| CallbackParseError::UnknownAction(action.to_string()))?;
    Ok((action, order_id))
}
