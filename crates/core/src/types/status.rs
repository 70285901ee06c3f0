//! Status enums for various entities.
//!
//! `OrderStatus` carries the static presentation table (label, badge colour,
//! icon) used by both the storefront order history and the admin order list.

use serde::{Deserialize, Serialize};

/// Lifecycle of a print order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation.
    #[default]
    Pending,
    /// Confirmed and being prepared (proofing, artwork checks).
    Processing,
    /// On the press.
    Printing,
    /// Handed to the courier.
    Shipped,
    /// Delivered.
    Completed,
    /// Cancelled by the shop or the customer.
    Cancelled,
}

/// Presentation data for an order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDisplay {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

const STATUS_TABLE: [(OrderStatus, StatusDisplay); 6] = [
    (
        OrderStatus::Pending,
        StatusDisplay {
            label: "Pending",
            color: "bg-yellow-100 text-yellow-800",
            icon: "clock",
        },
    ),
    (
        OrderStatus::Processing,
        StatusDisplay {
            label: "Processing",
            color: "bg-blue-100 text-blue-800",
            icon: "cog",
        },
    ),
    (
        OrderStatus::Printing,
        StatusDisplay {
            label: "Printing",
            color: "bg-indigo-100 text-indigo-800",
            icon: "printer",
        },
    ),
    (
        OrderStatus::Shipped,
        StatusDisplay {
            label: "Shipped",
            color: "bg-purple-100 text-purple-800",
            icon: "truck",
        },
    ),
    (
        OrderStatus::Completed,
        StatusDisplay {
            label: "Completed",
            color: "bg-green-100 text-green-800",
            icon: "check-circle",
        },
    ),
    (
        OrderStatus::Cancelled,
        StatusDisplay {
            label: "Cancelled",
            color: "bg-red-100 text-red-800",
            icon: "x-circle",
        },
    ),
];

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Processing,
        Self::Printing,
        Self::Shipped,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire/database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Printing => "printing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Label, colour and icon for this status.
    #[must_use]
    pub fn display(self) -> StatusDisplay {
        STATUS_TABLE
            .iter()
            .find(|(status, _)| *status == self)
            .map_or(
                StatusDisplay {
                    label: "Unknown",
                    color: "bg-gray-100 text-gray-800",
                    icon: "question",
                },
                |(_, display)| *display,
            )
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        self.display().label
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        self.display().color
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        self.display().icon
    }

    /// Completed and cancelled orders never change again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Processing => 1,
            Self::Printing => 2,
            Self::Shipped => 3,
            Self::Completed => 4,
            Self::Cancelled => 5,
        }
    }

    /// Whether an admin may move an order from `self` to `next`.
    ///
    /// Orders only move forward through the lifecycle (steps may be skipped).
    /// Cancellation is allowed until the order has shipped.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() || self.rank() == next.rank() {
            return false;
        }
        match next {
            Self::Cancelled => matches!(self, Self::Pending | Self::Processing | Self::Printing),
            _ => next.rank() > self.rank(),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "admin.admin_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access including admin user management.
    SuperAdmin,
    /// Full access to catalog, orders, promos and settings.
    Admin,
    /// Read-only access.
    Viewer,
}

impl AdminRole {
    /// Whether this role may modify shop data.
    #[must_use]
    pub const fn can_write(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

/// How a promo code reduces the order subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.promo_kind", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PromoKind {
    /// `value` is a percentage of the subtotal (0-100).
    Percentage,
    /// `value` is a fixed amount off.
    Fixed,
}

impl PromoKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl std::str::FromStr for PromoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            _ => Err(format!("invalid promo kind: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_every_status_has_a_display_entry() {
        for status in OrderStatus::ALL {
            assert_ne!(status.label(), "Unknown", "{status} missing from table");
            assert!(!status.icon().is_empty());
        }
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert_eq!(
            " Shipped ".parse::<OrderStatus>().unwrap(),
            OrderStatus::Shipped
        );
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_forward_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn test_backward_and_same_transitions_rejected() {
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Printing));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_cancellation_window() {
        assert!(OrderStatus::Printing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for next in OrderStatus::ALL {
            assert!(!OrderStatus::Completed.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_admin_role_permissions() {
        assert!(AdminRole::SuperAdmin.can_write());
        assert!(AdminRole::Admin.can_write());
        assert!(!AdminRole::Viewer.can_write());
        assert_eq!("viewer".parse::<AdminRole>().unwrap(), AdminRole::Viewer);
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }
}
