//! Access policy, read tracking and conversation lists through the hub

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use xfchat::backend::chat::{DenyReason, HistoryOutcome};
use xfchat::backend::error::ChatError;
use xfchat::shared::ServerEvent;

use crate::common::*;

#[tokio::test]
async fn test_unsubscribed_shop_owner_cannot_send() {
    let owner = shop_owner("Owner", false);
    let buyer = customer("Buyer");
    let store = memory_store(&[owner.clone(), buyer.clone()]).await;
    let hub = hub_over(store.clone());

    assert_err!(
        hub.send(owner.id, buyer.id, "hello".to_string(), vec![]).await,
        ChatError::PolicyDenied(DenyReason::SenderSubscriptionRequired)
    );
    assert_err!(
        hub.send(buyer.id, owner.id, "hello".to_string(), vec![]).await,
        ChatError::PolicyDenied(DenyReason::ReceiverSubscriptionRequired)
    );
    assert_eq!(store.room_count().await, 0);
    assert_eq!(store.message_count().await, 0);
}

#[tokio::test]
async fn test_expired_subscription_is_denied() {
    let expired = shop_owner("Lapsed", true)
        .with_subscription(true, Some(chrono::Utc::now() - chrono::Duration::minutes(1)));
    let buyer = customer("Buyer");
    let store = memory_store(&[expired.clone(), buyer.clone()]).await;
    let hub = hub_over(store);

    assert_err!(
        hub.send(expired.id, buyer.id, "hi".to_string(), vec![]).await,
        ChatError::PolicyDenied(DenyReason::SenderSubscriptionRequired)
    );
}

#[tokio::test]
async fn test_subscribed_shop_owner_can_send() {
    let owner = shop_owner("Owner", true);
    let buyer = customer("Buyer");
    let store = memory_store(&[owner.clone(), buyer.clone()]).await;
    let hub = hub_over(store);

    let message = assert_ok!(hub.send(owner.id, buyer.id, "in stock".to_string(), vec![]).await);
    assert_eq!(message.receiver_id, buyer.id);
    assert!(!message.is_read);
}

#[tokio::test]
async fn test_read_tracking_across_history_fetches() {
    let a = customer("A");
    let b = customer("B");
    let store = memory_store(&[a.clone(), b.clone()]).await;
    let hub = hub_over(store);

    for body in ["one", "two", "three"] {
        assert_ok!(hub.send(a.id, b.id, body.to_string(), vec![]).await);
    }

    let for_b = assert_ok!(hub.list_conversations(b.id).await);
    assert_eq!(for_b.len(), 1);
    assert_eq!(for_b[0].unread_count, 3);
    assert_eq!(for_b[0].other_user.id, a.id);
    let for_a = assert_ok!(hub.list_conversations(a.id).await);
    assert_eq!(for_a[0].unread_count, 0);

    assert_eq!(assert_ok!(hub.unread_since(b.id, a.id).await).len(), 3);

    let outcome = assert_ok!(hub.fetch_history(b.id, a.id).await);
    assert_matches!(outcome, HistoryOutcome::Conversation { ref messages, marked_read: 3, .. } if messages.len() == 3);

    assert_eq!(assert_ok!(hub.list_conversations(b.id).await)[0].unread_count, 0);
    assert!(assert_ok!(hub.unread_since(b.id, a.id).await).is_empty());

    assert_ok!(hub.send(a.id, b.id, "four".to_string(), vec![]).await);
    let for_b = assert_ok!(hub.list_conversations(b.id).await);
    assert_eq!(for_b[0].unread_count, 1);
    assert_eq!(for_b[0].last_message.as_ref().map(|m| m.body.as_str()), Some("four"));
}

#[tokio::test]
async fn test_conversation_list_ordered_by_latest_activity() {
    let me = customer("Me");
    let x = customer("X");
    let y = customer("Y");
    let z = customer("Z");
    let store = memory_store(&[me.clone(), x.clone(), y.clone(), z.clone()]).await;
    let hub = hub_over(store);

    assert_ok!(hub.send(me.id, x.id, "to x".to_string(), vec![]).await);
    assert_ok!(hub.send(y.id, me.id, "from y".to_string(), vec![]).await);
    // Room with z exists but holds no message
    assert_ok!(hub.resolver().resolve_or_create(me.id, z.id).await);
    assert_ok!(hub.send(x.id, me.id, "from x".to_string(), vec![]).await);

    let list = assert_ok!(hub.list_conversations(me.id).await);
    let order: Vec<_> = list.iter().map(|s| s.other_user.id).collect();
    assert_eq!(order, vec![x.id, y.id, z.id]);
    assert_eq!(list[2].last_message, None);
    assert_eq!(list[2].last_message_at, None);
}

#[tokio::test]
async fn test_send_pushes_to_both_participants() {
    let a = customer("A");
    let b = customer("B");
    let store = memory_store(&[a.clone(), b.clone()]).await;
    let hub = hub_over(store);
    let (_ha, mut rx_a) = connect(&hub, a.id).await;
    let (_hb, mut rx_b) = connect(&hub, b.id).await;
    drain(&mut rx_a);
    drain(&mut rx_b);

    assert_ok!(hub.send(a.id, b.id, "ping".to_string(), vec!["file-1".to_string()]).await);

    let to_a = drain(&mut rx_a);
    let to_b = drain(&mut rx_b);
    assert_received!(to_a, ServerEvent::Message(m) if m.body == "ping");
    assert_received!(to_b, ServerEvent::Message(m) if m.attachments == vec!["file-1".to_string()]);
    assert_received!(to_b, ServerEvent::Conversations(list) if list.len() == 1 && list[0].unread_count == 1);
    assert_received!(to_a, ServerEvent::Conversations(list) if list.len() == 1 && list[0].unread_count == 0);
}

#[tokio::test]
async fn test_unread_query_without_conversation_is_not_found() {
    let a = customer("A");
    let b = customer("B");
    let hub = hub_over(memory_store(&[a.clone(), b.clone()]).await);

    assert_err!(hub.unread_since(a.id, b.id).await, ChatError::NotFound { .. });
    assert_matches!(
        assert_ok!(hub.fetch_history(a.id, b.id).await),
        HistoryOutcome::NoConversation { other_user } if other_user.id == b.id
    );
}
