//! Presence registry properties
//!
//! Random connect/disconnect sequences over a few users: a user is online
//! exactly while they hold at least one connection, and each transition is
//! announced once.

use std::collections::HashMap;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use utasks_chat::backend::auth::Identity;
use utasks_chat::backend::realtime::broadcast::{outbox, Inbox};
use utasks_chat::backend::realtime::{ConnectionId, PresenceRegistry};
use utasks_chat::shared::ServerEvent;
use uuid::Uuid;

#[derive(Debug, Clone)]
enum Step {
    Connect(usize),
    Disconnect(usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..3).prop_map(Step::Connect),
        (0usize..8).prop_map(Step::Disconnect),
    ]
}

fn transitions(inbox: &mut Inbox) -> (usize, usize) {
    let (mut up, mut down) = (0, 0);
    while let Ok(event) = inbox.try_recv() {
        match event {
            ServerEvent::UserConnected(_) => up += 1,
            ServerEvent::UserDisconnected(_) => down += 1,
            _ => {}
        }
    }
    (up, down)
}

proptest! {
    #[test]
    fn prop_online_iff_connected(steps in prop::collection::vec(step(), 1..40)) {
        tokio_test::block_on(async {
            let registry = PresenceRegistry::default();
            let users: Vec<Identity> = ["alice", "bob", "carol"]
                .iter()
                .map(|name| Identity { user_id: Uuid::new_v4(), username: name.to_string() })
                .collect();

            // an observer that never disconnects sees every transition
            let (observer_tx, mut observer_rx) = outbox();
            let observer = Identity { user_id: Uuid::new_v4(), username: "observer".to_string() };
            registry.register(observer, observer_tx).await;
            transitions(&mut observer_rx);

            let mut open: Vec<(usize, ConnectionId, Inbox)> = Vec::new();
            let mut expected_up = 0;
            let mut expected_down = 0;

            for step in steps {
                match step {
                    Step::Connect(user) => {
                        let was_online = open.iter().any(|(u, _, _)| *u == user);
                        let (tx, rx) = outbox();
                        let id = registry.register(users[user].clone(), tx).await;
                        open.push((user, id, rx));
                        if !was_online {
                            expected_up += 1;
                        }
                    }
                    Step::Disconnect(index) => {
                        if open.is_empty() {
                            continue;
                        }
                        let (user, id, _) = open.remove(index % open.len());
                        prop_assert!(registry.unregister(id).await.is_some());
                        if !open.iter().any(|(u, _, _)| *u == user) {
                            expected_down += 1;
                        }
                    }
                }

                let mut counts: HashMap<usize, usize> = HashMap::new();
                for (user, _, _) in &open {
                    *counts.entry(*user).or_default() += 1;
                }
                for (index, identity) in users.iter().enumerate() {
                    let held = counts.get(&index).copied().unwrap_or(0);
                    prop_assert_eq!(registry.is_online(identity.user_id).await, held > 0);
                    prop_assert_eq!(registry.lookup(identity.user_id).await.len(), held);
                }
                prop_assert_eq!(registry.list_online().await.len(), counts.len() + 1);
            }

            prop_assert_eq!(transitions(&mut observer_rx), (expected_up, expected_down));
            Ok::<(), TestCaseError>(())
        })?;
    }
}
