// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge stage: fold a fresh derivation into the previously held set.
//!
//! Identity is the merge key (title, pet, category), never the generated id.
//! For each key, a previously read instance wins over the fresh one while its
//! acknowledgement is still on record; otherwise the fresh one wins. Previous
//! notifications with no fresh counterpart stay until they expire. Keys acknowledged as cleared are
//! dropped, keys acknowledged as read come back marked read.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use petsim_core::{AckState, MergeKey, Notification};

/// Merge `fresh` into `previous` at `now`.
///
/// `acks` maps read keys to their persisted acknowledgement. The result is
/// deduplicated by merge key, free of expired entries, and sorted by priority
/// (highest first) then creation time (newest first).
pub fn merge(
    previous: &[Notification],
    fresh: Vec<Notification>,
    acks: &HashMap<String, AckState>,
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let previous_by_key: HashMap<MergeKey, &Notification> =
        previous.iter().map(|n| (n.merge_key(), n)).collect();

    let mut seen: HashSet<MergeKey> = HashSet::new();
    let mut merged: Vec<Notification> = Vec::with_capacity(fresh.len() + previous.len());

    for mut notification in fresh {
        let key = notification.merge_key();
        if !seen.insert(key.clone()) {
            continue;
        }
        match previous_by_key.get(&key) {
            Some(prior) if prior.read && is_read(acks, prior) && !prior.is_expired(now) => {
                merged.push((*prior).clone());
            }
            _ => {
                notification.read = is_read(acks, &notification);
                merged.push(notification);
            }
        }
    }

    for prior in previous {
        if seen.insert(prior.merge_key()) {
            merged.push(prior.clone());
        }
    }

    merged.retain(|n| {
        !n.is_expired(now) && acks.get(&n.read_key()) != Some(&AckState::Cleared)
    });
    sort(&mut merged);
    merged
}

fn is_read(acks: &HashMap<String, AckState>, notification: &Notification) -> bool {
    acks.get(&notification.read_key()) == Some(&AckState::Read)
}

/// Priority descending, then newest first.
pub fn sort(notifications: &mut [Notification]) {
    notifications.sort_by_key(|n| (Reverse(n.priority), Reverse(n.created_at)));
}
