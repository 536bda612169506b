//! Order status state machine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::OrderError;

/// The status of an order in its lifecycle.
///
/// Status transitions:
/// ```text
/// Pending ──┬──► Confirmed ──► Cancelled
///           │
///           └──► Cancelled
/// ```
///
/// `Cancelled` is terminal. `Confirmed` allows exactly one further
/// transition, to `Cancelled`. Re-requesting the current status is
/// rejected like any other disallowed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order has been placed; no stock has been consumed yet.
    #[default]
    Pending,

    /// Stock has been deducted for this order.
    Confirmed,

    /// Order was cancelled (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the transition table allows moving to `requested`.
    pub fn can_transition_to(self, requested: OrderStatus) -> bool {
        matches!(
            (self, requested),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Confirmed, OrderStatus::Cancelled)
        )
    }

    /// Returns true if line items and price can be edited in this status.
    pub fn can_modify(self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if the order record may be deleted in this status.
    ///
    /// A Confirmed order still carries a stock liability, so it must be
    /// cancelled (restoring stock) before deletion.
    pub fn can_delete(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Cancelled)
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    /// Parses a requested status string, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(OrderError::UnknownStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn default_status_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn transition_matrix_is_exhaustive() {
        for from in ALL {
            for to in ALL {
                let allowed = matches!(
                    (from, to),
                    (OrderStatus::Pending, OrderStatus::Confirmed)
                        | (OrderStatus::Pending, OrderStatus::Cancelled)
                        | (OrderStatus::Confirmed, OrderStatus::Cancelled)
                );
                assert_eq!(
                    from.can_transition_to(to),
                    allowed,
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn self_transitions_are_rejected() {
        for status in ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn cancelled_transitions_nowhere() {
        for to in ALL {
            assert!(!OrderStatus::Cancelled.can_transition_to(to));
        }
    }

    #[test]
    fn only_pending_can_modify() {
        assert!(OrderStatus::Pending.can_modify());
        assert!(!OrderStatus::Confirmed.can_modify());
        assert!(!OrderStatus::Cancelled.can_modify());
    }

    #[test]
    fn confirmed_cannot_be_deleted() {
        assert!(OrderStatus::Pending.can_delete());
        assert!(!OrderStatus::Confirmed.can_delete());
        assert!(OrderStatus::Cancelled.can_delete());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(
            "CONFIRMED".parse::<OrderStatus>().unwrap(),
            OrderStatus::Confirmed
        );
        assert_eq!(
            "pending".parse::<OrderStatus>().unwrap(),
            OrderStatus::Pending
        );
        assert_eq!(
            "Cancelled".parse::<OrderStatus>().unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn parse_unknown_status_fails() {
        let result = "Shipped".parse::<OrderStatus>();
        assert!(matches!(result, Err(OrderError::UnknownStatus(s)) if s == "Shipped"));
    }

    #[test]
    fn display_matches_as_str() {
        for status in ALL {
            assert_eq!(status.to_string(), status.as_str());
        }
    }

    #[test]
    fn serialization_roundtrip() {
        let status = OrderStatus::Confirmed;
        let json = serde_json::to_string(&status).unwrap();
        let deserialized: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, deserialized);
    }
}
