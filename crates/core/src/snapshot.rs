//! Latest-state reduction over `UserHealth` event history.

use std::collections::HashMap;

use dorkfi_chain::UserHealthEvent;

/// Latest known event per user address. At most one entry per user.
pub type SnapshotMap = HashMap<String, UserHealthEvent>;

/// Collapse an event history into the latest snapshot per user.
///
/// Comparison is strict `>` on the event timestamp: among events with equal
/// timestamps the earliest-seen one wins. The round field is carried for
/// audit but does not participate in selection.
pub fn reduce_latest<I>(events: I) -> SnapshotMap
where
    I: IntoIterator<Item = UserHealthEvent>,
{
    let mut latest: SnapshotMap = HashMap::new();

    for event in events {
        match latest.get(&event.user_id) {
            Some(current) if event.timestamp <= current.timestamp => {}
            _ => {
                latest.insert(event.user_id.clone(), event);
            }
        }
    }

    latest
}
