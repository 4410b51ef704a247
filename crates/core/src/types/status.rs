//! Status enums for various entities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delivery status shared by a shipment and its paired order.
///
/// ```text
/// Pending ──▶ Shipped ──▶ Delivered
///    │           │
///    └───────────┴──────▶ Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShipmentStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

/// Error returned when a status string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid shipment status: {0}")]
pub struct ParseStatusError(pub String);

impl ShipmentStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Statuses reachable in one step from `self`.
    #[must_use]
    pub const fn next_statuses(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Shipped, Self::Cancelled],
            Self::Shipped => &[Self::Delivered, Self::Cancelled],
            Self::Delivered | Self::Cancelled => &[],
        }
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// Re-applying the current status is accepted as a no-op.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || self.next_statuses().contains(&next)
    }

    /// Terminal statuses accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// The canonical string form, as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShipmentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Storefront colour theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!("invalid theme: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(ShipmentStatus::Pending.can_transition_to(ShipmentStatus::Shipped));
        assert!(ShipmentStatus::Shipped.can_transition_to(ShipmentStatus::Delivered));
        assert!(ShipmentStatus::Pending.can_transition_to(ShipmentStatus::Cancelled));
        assert!(ShipmentStatus::Shipped.can_transition_to(ShipmentStatus::Cancelled));
    }

    #[test]
    fn test_backward_and_skipping_transitions_rejected() {
        assert!(!ShipmentStatus::Shipped.can_transition_to(ShipmentStatus::Pending));
        assert!(!ShipmentStatus::Pending.can_transition_to(ShipmentStatus::Delivered));
        assert!(!ShipmentStatus::Delivered.can_transition_to(ShipmentStatus::Cancelled));
        assert!(!ShipmentStatus::Cancelled.can_transition_to(ShipmentStatus::Shipped));
    }

    #[test]
    fn test_same_status_is_noop() {
        for status in ShipmentStatus::ALL {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ShipmentStatus::Delivered.is_terminal());
        assert!(ShipmentStatus::Cancelled.is_terminal());
        assert!(!ShipmentStatus::Pending.is_terminal());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "shipped".parse::<ShipmentStatus>().unwrap(),
            ShipmentStatus::Shipped
        );
        assert_eq!(
            " DELIVERED ".parse::<ShipmentStatus>().unwrap(),
            ShipmentStatus::Delivered
        );
        assert!("lost".parse::<ShipmentStatus>().is_err());
    }

    #[test]
    fn test_serializes_as_persisted_string() {
        let json = serde_json::to_string(&ShipmentStatus::Cancelled).unwrap();
        assert_eq!(json, "\"Cancelled\"");
    }

    #[test]
    fn test_theme_roundtrip_display() {
        assert_eq!(Theme::Dark.to_string(), "dark");
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
    }
}
