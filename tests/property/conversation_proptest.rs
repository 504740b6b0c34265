//! Property-based tests for conversation list ordering

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;
use xfchat::shared::messaging::{sort_by_recency, ConversationSummary, ParticipantProfile};

fn summary(at: Option<i64>) -> ConversationSummary {
    ConversationSummary {
        room_id: Uuid::new_v4(),
        other_user: ParticipantProfile::unknown(Uuid::new_v4()),
        last_message: None,
        last_message_at: at.map(|secs| Utc.timestamp_opt(secs, 0).unwrap()),
        unread_count: 0,
    }
}

fn timestamps() -> impl Strategy<Value = Vec<Option<i64>>> {
    prop::collection::vec(prop::option::of(0i64..2_000_000_000), 0..24)
}

proptest! {
    #[test]
    fn test_sorted_list_is_non_increasing_with_empty_rooms_last(input in timestamps()) {
        let mut list: Vec<_> = input.iter().copied().map(summary).collect();
        sort_by_recency(&mut list);

        let stamps: Vec<Option<DateTime<Utc>>> = list.iter().map(|s| s.last_message_at).collect();
        let first_empty = stamps.iter().position(Option::is_none).unwrap_or(stamps.len());
        prop_assert!(stamps[first_empty..].iter().all(Option::is_none));

        let dated: Vec<_> = stamps[..first_empty].iter().flatten().collect();
        for pair in dated.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_sort_keeps_every_room(input in timestamps()) {
        let mut list: Vec<_> = input.iter().copied().map(summary).collect();
        let mut before: Vec<Uuid> = list.iter().map(|s| s.room_id).collect();
        sort_by_recency(&mut list);
        let mut after: Vec<Uuid> = list.iter().map(|s| s.room_id).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }
}
