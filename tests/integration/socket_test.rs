//! End-to-end tests over a real WebSocket connection

use chrono::{Duration, Utc};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Error as WsError;
use xfchat::backend::store::ChatStore;
use xfchat::shared::{ClientEvent, ServerEvent};

use crate::common::*;

async fn expect_handshake_status(url: String, status: u16) {
    match connect_async(url).await {
        Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), status),
        Err(e) => panic!("Expected HTTP {} rejection, got {:?}", status, e),
        Ok(_) => panic!("Expected HTTP {} rejection, handshake succeeded", status),
    }
}

#[tokio::test]
async fn test_handshake_requires_valid_credential() {
    let a = customer("A");
    let server = TestServer::start(&[a.clone()]).await;

    expect_handshake_status(server.socket_url(None), 401).await;
    expect_handshake_status(server.socket_url(Some("not-a-token")), 401).await;

    let stranger = customer("Stranger");
    expect_handshake_status(server.socket_url(Some(&server.token_for(&stranger))), 401).await;
}

#[tokio::test]
async fn test_two_users_exchange_messages() {
    let a = customer("Alice");
    let b = customer("Bob");
    let server = TestServer::start(&[a.clone(), b.clone()]).await;

    let mut alice = server.connect(&a).await;
    let mut bob = server.connect(&b).await;
    let bob_id = b.id;
    alice
        .wait_for(|e| matches!(e, ServerEvent::UserStatus { user_id, is_online: true } if *user_id == bob_id))
        .await;

    alice
        .send(&ClientEvent::SendMessage {
            receiver_id: Some(b.id),
            body: Some("hello bob".to_string()),
            attachments: vec![],
        })
        .await;

    let received = bob.wait_for(|e| matches!(e, ServerEvent::Message(_))).await;
    let ServerEvent::Message(message) = received else {
        unreachable!()
    };
    assert_eq!(message.sender_id, a.id);
    assert_eq!(message.body, "hello bob");

    // The sender sees its own message on the pair channel
    alice
        .wait_for(|e| matches!(e, ServerEvent::Message(m) if m.id == message.id))
        .await;

    bob.send(&ClientEvent::FetchHistory { other_user_id: Some(a.id) }).await;
    let history = bob.wait_for(|e| matches!(e, ServerEvent::History { .. })).await;
    let ServerEvent::History { messages, other_user } = history else {
        unreachable!()
    };
    assert_eq!(messages.len(), 1);
    assert_eq!(other_user.id, a.id);

    bob.send(&ClientEvent::ListConversations).await;
    bob.wait_for(|e| {
        matches!(e, ServerEvent::Conversations(list)
            if list.len() == 1 && list[0].unread_count == 0 && list[0].other_user.id == a.id)
    })
    .await;

    alice.close().await;
    bob.close().await;
}

#[tokio::test]
async fn test_errors_reach_only_the_sender() {
    let a = customer("A");
    let owner = shop_owner("Owner", false);
    let server = TestServer::start(&[a.clone(), owner.clone()]).await;
    let mut client = server.connect(&a).await;

    client.send_raw("not json").await;
    client
        .wait_for(|e| matches!(e, ServerEvent::Error { kind, .. } if kind == "validation"))
        .await;

    client
        .send(&ClientEvent::SendMessage {
            receiver_id: Some(owner.id),
            body: Some("hi".to_string()),
            attachments: vec![],
        })
        .await;
    client
        .wait_for(|e| {
            matches!(e, ServerEvent::Error { kind, retryable: false, .. } if kind == "policy_denied")
        })
        .await;
    assert_eq!(server.store.message_count().await, 0);

    client
        .send(&ClientEvent::UnreadQuery { other_user_id: Some(owner.id) })
        .await;
    client
        .wait_for(|e| matches!(e, ServerEvent::Error { kind, .. } if kind == "not_found"))
        .await;
}

#[tokio::test]
async fn test_fetch_history_with_lapsed_shop_owner_is_denied() {
    let a = customer("A");
    let owner = shop_owner("Owner", true);
    let server = TestServer::start(&[a.clone(), owner.clone()]).await;
    let mut alice = server.connect(&a).await;

    alice
        .send(&ClientEvent::SendMessage {
            receiver_id: Some(owner.id),
            body: Some("is this still available?".to_string()),
            attachments: vec![],
        })
        .await;
    let room_id = match alice.wait_for(|e| matches!(e, ServerEvent::Message(_))).await {
        ServerEvent::Message(message) => message.room_id,
        other => panic!("Expected message, got {:?}", other),
    };

    let lapsed = owner
        .clone()
        .with_subscription(true, Some(Utc::now() - Duration::minutes(1)));
    server.store.insert_user(lapsed).await;

    let mut shop = server.connect(&owner).await;
    shop.send(&ClientEvent::FetchHistory { other_user_id: Some(a.id) }).await;
    shop.wait_for(|e| {
        matches!(e, ServerEvent::Error { kind, retryable: false, .. } if kind == "policy_denied")
    })
    .await;
    assert_eq!(server.store.count_unread(room_id, owner.id).await.unwrap(), 1);

    alice.send(&ClientEvent::FetchHistory { other_user_id: Some(owner.id) }).await;
    alice
        .wait_for(|e| {
            matches!(e, ServerEvent::Error { kind, retryable: false, .. } if kind == "policy_denied")
        })
        .await;
    assert_eq!(server.store.count_unread(room_id, owner.id).await.unwrap(), 1);

    let stranger = shop_owner("Unsubscribed", false);
    server.store.insert_user(stranger.clone()).await;
    alice.send(&ClientEvent::FetchHistory { other_user_id: Some(stranger.id) }).await;
    alice
        .wait_for(|e| {
            matches!(e, ServerEvent::Error { kind, retryable: false, .. } if kind == "policy_denied")
        })
        .await;
    assert_eq!(server.store.room_count().await, 1);
}

#[tokio::test]
async fn test_disconnect_then_message_is_kept_for_history() {
    let a = customer("A");
    let b = customer("B");
    let server = TestServer::start(&[a.clone(), b.clone()]).await;

    let mut alice = server.connect(&a).await;
    let bob = server.connect(&b).await;
    bob.close().await;

    let bob_id = b.id;
    alice
        .wait_for(|e| matches!(e, ServerEvent::UserStatus { user_id, is_online: false } if *user_id == bob_id))
        .await;

    alice
        .send(&ClientEvent::SendMessage {
            receiver_id: Some(b.id),
            body: Some("are you there?".to_string()),
            attachments: vec![],
        })
        .await;
    alice.wait_for(|e| matches!(e, ServerEvent::Message(_))).await;
    assert_eq!(server.store.message_count().await, 1);

    let mut bob = server.connect(&b).await;
    bob.send(&ClientEvent::UnreadQuery { other_user_id: Some(a.id) }).await;
    bob.wait_for(|e| matches!(e, ServerEvent::Unread { count: 1, .. })).await;

    bob.send(&ClientEvent::FetchHistory { other_user_id: Some(a.id) }).await;
    bob.wait_for(|e| matches!(e, ServerEvent::History { messages, .. } if messages[0].body == "are you there?"))
        .await;

    bob.send(&ClientEvent::UnreadQuery { other_user_id: Some(a.id) }).await;
    bob.wait_for(|e| matches!(e, ServerEvent::NoUnread { .. })).await;
}

#[tokio::test]
async fn test_second_login_replaces_first_connection() {
    let a = customer("A");
    let server = TestServer::start(&[a.clone()]).await;

    let mut first = server.connect(&a).await;
    let mut second = server.connect(&a).await;

    first.wait_for(|e| matches!(e, ServerEvent::SessionReplaced)).await;
    first.wait_closed().await;

    // The newer connection still works
    second.send(&ClientEvent::ListConversations).await;
    second
        .wait_for(|e| matches!(e, ServerEvent::Conversations(list) if list.is_empty()))
        .await;
}
