//! Room key properties

use proptest::prelude::*;
use utasks_chat::shared::{RoomKey, RoomKind};
use uuid::Uuid;

fn any_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

proptest! {
    #[test]
    fn prop_private_key_is_symmetric(a in any_uuid(), b in any_uuid()) {
        prop_assert_eq!(RoomKey::private(a, b), RoomKey::private(b, a));
        prop_assert_eq!(RoomKey::private(a, b).to_string(), RoomKey::private(b, a).to_string());
    }

    #[test]
    fn prop_private_key_involves_both(a in any_uuid(), b in any_uuid()) {
        let room = RoomKey::private(a, b);
        prop_assert_eq!(room.kind(), RoomKind::Private);
        prop_assert!(room.involves(a));
        prop_assert!(room.involves(b));
        prop_assert_eq!(room.peer_of(a), Some(b));
    }

    #[test]
    fn prop_key_string_parses_back(a in any_uuid(), b in any_uuid(), group in any::<bool>()) {
        let room = if group { RoomKey::group(a) } else { RoomKey::private(a, b) };
        let parsed: RoomKey = room.to_string().parse().unwrap();
        prop_assert_eq!(parsed, room);
    }

    #[test]
    fn prop_unprefixed_strings_are_rejected(raw in "[a-z0-9:-]{0,40}") {
        prop_assume!(!raw.starts_with("private:") && !raw.starts_with("group:"));
        prop_assert!(raw.parse::<RoomKey>().is_err());
    }
}
