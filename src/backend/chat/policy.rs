/**
 * Access Policy
 *
 * Decides whether a sender may exchange messages with a receiver. The
 * check is pure: it only looks at the two snapshots and the clock passed
 * in, so callers must load fresh snapshots from the store before every
 * privileged operation (subscription state can change mid-connection).
 *
 * # Rules
 *
 * Evaluated in order, first match wins:
 *
 * 1. Sender and receiver are the same user → `SelfMessage`
 * 2. Sender's role is gated and has no active subscription →
 *    `SenderSubscriptionRequired`
 * 3. Receiver's role is gated and has no active subscription →
 *    `ReceiverSubscriptionRequired`
 * 4. Otherwise allowed
 *
 * A subscription is active when the flag is set and the expiry lies
 * strictly after `now`; a missing expiry counts as expired.
 */

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::messaging::UserSnapshot;

/// Why an exchange was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    SelfMessage,
    SenderSubscriptionRequired,
    ReceiverSubscriptionRequired,
}

impl DenyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::SelfMessage => "self-message",
            DenyReason::SenderSubscriptionRequired => "sender subscription required",
            DenyReason::ReceiverSubscriptionRequired => "receiver subscription required",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a policy check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }
}

fn lacks_subscription(user: &UserSnapshot, now: DateTime<Utc>) -> bool {
    user.role.is_subscription_gated() && !user.has_active_subscription(now)
}

/// Evaluate the access rules for one sender/receiver pair
pub fn can_exchange(
    sender: &UserSnapshot,
    receiver: &UserSnapshot,
    now: DateTime<Utc>,
) -> AccessDecision {
    if sender.id == receiver.id {
        return AccessDecision::Denied(DenyReason::SelfMessage);
    }
    if lacks_subscription(sender, now) {
        return AccessDecision::Denied(DenyReason::SenderSubscriptionRequired);
    }
    if lacks_subscription(receiver, now) {
        return AccessDecision::Denied(DenyReason::ReceiverSubscriptionRequired);
    }
    AccessDecision::Allowed
}
