//! User Snapshot
//!
//! The chat core never owns users; it reads an immutable snapshot from the
//! store whenever it needs role or subscription state.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Account role
///
/// `ShopOwner` is the provider role: it may only exchange messages while it
/// holds an active, non-expired subscription.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    ShopOwner,
    Customer,
}

impl UserRole {
    /// Whether messaging for this role requires an active subscription
    pub fn is_subscription_gated(self) -> bool {
        matches!(self, UserRole::ShopOwner)
    }

    /// Storage representation
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "SUPER_ADMIN",
            UserRole::Admin => "ADMIN",
            UserRole::ShopOwner => "SHOP_OWNER",
            UserRole::Customer => "CUSTOMER",
        }
    }
}

impl FromStr for UserRole {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(UserRole::SuperAdmin),
            "ADMIN" => Ok(UserRole::Admin),
            "SHOP_OWNER" => Ok(UserRole::ShopOwner),
            "CUSTOMER" => Ok(UserRole::Customer),
            other => Err(SharedError::unknown_variant("role", other)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status; only `Active` users may open a connection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Pending,
    Blocked,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Pending => "PENDING",
            UserStatus::Blocked => "BLOCKED",
        }
    }
}

impl FromStr for UserStatus {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(UserStatus::Active),
            "PENDING" => Ok(UserStatus::Pending),
            "BLOCKED" => Ok(UserStatus::Blocked),
            other => Err(SharedError::unknown_variant("status", other)),
        }
    }
}

/// Read-only view of a user as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSnapshot {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub image: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub is_subscribed: bool,
    pub subscription_end: Option<DateTime<Utc>>,
}

impl UserSnapshot {
    /// A non-gated, active user with no subscription
    pub fn new(id: Uuid, full_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            full_name: Some(full_name.into()),
            image: None,
            role,
            status: UserStatus::Active,
            is_subscribed: false,
            subscription_end: None,
        }
    }

    /// Set subscription state
    pub fn with_subscription(mut self, is_subscribed: bool, end: Option<DateTime<Utc>>) -> Self {
        self.is_subscribed = is_subscribed;
        self.subscription_end = end;
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// True when the subscription flag is set and the expiry lies after `now`.
    /// A missing expiry counts as expired.
    pub fn has_active_subscription(&self, now: DateTime<Utc>) -> bool {
        self.is_subscribed && self.subscription_end.is_some_and(|end| end > now)
    }

    /// Public fields shown to the other side of a conversation
    pub fn profile(&self) -> ParticipantProfile {
        ParticipantProfile {
            id: self.id,
            name: self.full_name.clone(),
            image: self.image.clone(),
            role: Some(self.role),
        }
    }
}

/// Public profile of a conversation participant
///
/// Only `id` is guaranteed: the other user may have been removed from the
/// store after the room was created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: Option<UserRole>,
}

impl ParticipantProfile {
    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            name: None,
            image: None,
            role: None,
        }
    }
}
