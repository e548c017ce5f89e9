// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed child-list reconciliation.
//!
//! Four cursors walk the old and new lists from both ends. Matching ends are
//! updated in place; an old head that now belongs at the tail (or the reverse)
//! is updated and moved. When no end matches, a key map over the remaining old
//! children is built once and used to find the new head's predecessor, which is
//! updated and moved in front of the old head. Whatever remains when one side
//! runs out is created or removed.
//!
//! Nodes are positioned by asking the backend for current indices, never by
//! tracking them here, so nodes still waiting on a deferred detach can sit in
//! the container without confusing the walk.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::backend::Backend;
use crate::create::create;
use crate::element::Element;
use crate::hooks;
use crate::key::Identity;
use crate::patch::update;

/// Reconcile the children of `parent` from `old` to `new`.
///
/// On return every element of `new` is materialized and the children of
/// `parent` are in `new` order. Old elements without a counterpart have been
/// retired.
pub(crate) fn reconcile_children<B: Backend>(
    backend: &mut B,
    parent: B::Node,
    old: Vec<Element<B>>,
    new: &mut [Element<B>],
) {
    let mut old: Vec<Option<Element<B>>> = old.into_iter().map(Some).collect();
    // Half-open ranges `[lo, hi)`.
    let (mut old_lo, mut old_hi) = (0, old.len());
    let (mut new_lo, mut new_hi) = (0, new.len());
    let mut by_identity: Option<HashMap<Identity, usize>> = None;

    while old_lo < old_hi && new_lo < new_hi {
        if old[old_lo].is_none() {
            old_lo += 1;
            continue;
        }
        if old[old_hi - 1].is_none() {
            old_hi -= 1;
            continue;
        }

        if let Some(o) = old[old_lo].take_if(|o| o.is_same(&new[new_lo])) {
            tracing::trace!(key = %o.key(), "children: head");
            update(backend, o, &mut new[new_lo]);
            old_lo += 1;
            new_lo += 1;
        } else if let Some(o) = old[old_hi - 1].take_if(|o| o.is_same(&new[new_hi - 1])) {
            tracing::trace!(key = %o.key(), "children: tail");
            update(backend, o, &mut new[new_hi - 1]);
            old_hi -= 1;
            new_hi -= 1;
        } else if let Some(o) = old[old_lo].take_if(|o| o.is_same(&new[new_hi - 1])) {
            tracing::trace!(key = %o.key(), "children: head moved to tail");
            update(backend, o, &mut new[new_hi - 1]);
            // Read after the update: a replace inside it may leave a node
            // waiting on its remove hook, shifting the old tail.
            let after = index_of(backend, parent, &old[old_hi - 1]).map(|i| i + 1);
            place(backend, parent, node_of(&new[new_hi - 1]), after);
            old_lo += 1;
            new_hi -= 1;
        } else if let Some(o) = old[old_hi - 1].take_if(|o| o.is_same(&new[new_lo])) {
            tracing::trace!(key = %o.key(), "children: tail moved to head");
            update(backend, o, &mut new[new_lo]);
            let before = index_of(backend, parent, &old[old_lo]);
            place(backend, parent, node_of(&new[new_lo]), before);
            old_hi -= 1;
            new_lo += 1;
        } else {
            let map = by_identity.get_or_insert_with(|| {
                let mut map = HashMap::with_capacity(old_hi - old_lo);
                for (i, slot) in old.iter().enumerate().take(old_hi).skip(old_lo) {
                    if let Some(o) = slot {
                        map.insert(o.identity(), i);
                    }
                }
                map
            });
            // Slots consumed since the map was built are empty; treat them as absent.
            let found = map
                .get(&new[new_lo].identity())
                .and_then(|&i| old[i].take());
            match found {
                Some(o) => {
                    tracing::trace!(key = %o.key(), "children: moved by key");
                    update(backend, o, &mut new[new_lo]);
                    let before = index_of(backend, parent, &old[old_lo]);
                    place(backend, parent, node_of(&new[new_lo]), before);
                }
                None => {
                    tracing::trace!(key = %new[new_lo].key(), "children: inserted");
                    let node = create(backend, &mut new[new_lo]);
                    let before = index_of(backend, parent, &old[old_lo]);
                    place(backend, parent, node, before);
                }
            }
            new_lo += 1;
        }
    }

    if new_lo < new_hi {
        // Old side ran out: everything left goes in front of the first
        // already-placed tail element, or at the end.
        let mut at = new
            .get(new_hi)
            .and_then(|next| next.node())
            .and_then(|next| backend.child_index(parent, next));
        for element in &mut new[new_lo..new_hi] {
            tracing::trace!(key = %element.key(), "children: appended");
            let node = create(backend, element);
            match at {
                Some(index) => {
                    backend.add_child_at(parent, node, index);
                    at = Some(index + 1);
                }
                None => backend.add_child(parent, node),
            }
        }
    } else {
        for o in old[old_lo..old_hi].iter_mut().filter_map(Option::take) {
            tracing::trace!(key = %o.key(), "children: removed");
            hooks::remove(backend, parent, o);
        }
    }
}

fn node_of<B: Backend>(element: &Element<B>) -> B::Node {
    element
        .node()
        .expect("reconciled description has a backing node")
}

fn index_of<B: Backend>(
    backend: &B,
    parent: B::Node,
    slot: &Option<Element<B>>,
) -> Option<usize> {
    let node = slot.as_ref()?.node()?;
    backend.child_index(parent, node)
}

/// Move `node` so it ends up right before the child currently at `target`,
/// or last for `None`.
fn place<B: Backend>(backend: &mut B, parent: B::Node, node: B::Node, target: Option<usize>) {
    let current = backend.child_index(parent, node);
    let Some(target) = target else {
        if current.is_none_or(|i| i + 1 != backend.child_count(parent)) {
            backend.add_child(parent, node);
        }
        return;
    };
    // `add_child_at` takes the node out first, shifting later indices down.
    let index = match current {
        Some(i) if i < target => target - 1,
        _ => target,
    };
    if current != Some(index) {
        backend.add_child_at(parent, node, index);
    }
}
