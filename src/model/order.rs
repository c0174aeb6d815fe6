use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Delivery,
    Pickup,
}

impl Default for DeliveryMethod {
    fn default() -> Self {
        DeliveryMethod::Delivery
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Placed,
    Accepted,
    Prepping,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Cancellation is only reachable before the kitchen starts prepping.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Placed | OrderStatus::Accepted)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Placed => "placed",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Prepping => "prepping",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    fn sequence_index(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Placed => Some(1),
            OrderStatus::Accepted => Some(2),
            OrderStatus::Prepping => Some(3),
            OrderStatus::Ready => Some(4),
            OrderStatus::Completed => Some(5),
            OrderStatus::Cancelled => None,
        }
    }

    /// Valid moves: forward along the fulfilment sequence, or to
    /// cancelled while still cancellable. No backwards moves, nothing
    /// out of a terminal state.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == OrderStatus::Cancelled {
            return self.can_cancel();
        }
        match (self.sequence_index(), next.sequence_index()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }

    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "placed" => Some(OrderStatus::Placed),
            "accepted" => Some(OrderStatus::Accepted),
            "prepping" => Some(OrderStatus::Prepping),
            "ready" => Some(OrderStatus::Ready),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Authorized,
    Paid,
    Refunded,
    Failed,
}

/// One snapshotted order line. Title, price and image are copied from the
/// menu item at checkout time so later menu edits never change the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub menu_item_id: ObjectId,
    pub title: String,
    pub price: f64,
    pub qty: u32,
    pub image_url: Option<String>,
}

/// Delivery address fields frozen into the order at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressSnapshot {
    pub label: String,
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub items: Vec<OrderItem>,

    pub method: DeliveryMethod,
    pub address: Option<AddressSnapshot>,
    pub address_id: Option<ObjectId>,
    pub schedule_at: Option<String>,

    pub subtotal: f64,
    pub delivery_fee: f64,
    pub service_fee: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,

    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method_id: Option<String>,

    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellable_set() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Placed.can_cancel());
        assert!(OrderStatus::Accepted.can_cancel());
        assert!(!OrderStatus::Prepping.can_cancel());
        assert!(!OrderStatus::Ready.can_cancel());
        assert!(!OrderStatus::Completed.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn test_status_round_trip() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Placed,
            OrderStatus::Accepted,
            OrderStatus::Prepping,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(OrderStatus::parse("shipped"), None);
    }

    #[test]
    fn test_transitions_only_move_forward() {
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Accepted));
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Accepted.can_transition_to(OrderStatus::Placed));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Placed));
        assert!(OrderStatus::Accepted.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Prepping.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_method_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DeliveryMethod::Pickup).unwrap(),
            "\"pickup\""
        );
    }
}
