//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Dmx.
//! The Dmx project belongs to the Dunimd project team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Dmx Tree Traversal
//!
//! Pre-order depth-first walk over a [`DmTree`], shared by every compiler
//! stage. A stage implements [`DmTreeHandler`]; while handling a node it may
//! queue deferred closures on the [`DmPostTraverse`] queue for relationships
//! whose target may not have been visited yet (a rule naming its command, a
//! command naming its aggregation). The queue runs once, in registration
//! order, after the whole tree has been visited.
//!
//! Every node is checked for identifier integrity before its handler runs:
//! a node whose `properties.uuid` differs from its id aborts the walk with
//! [`crate::errors::DmError::IdentifierMismatch`] and the stage's partial state must be
//! discarded.

use std::collections::HashSet;

use log::debug;

use crate::errors::Result;
use crate::tree::{DmNode, DmTree};

/// A closure deferred until every node has been visited.
pub type DmDeferred<H> = Box<dyn FnOnce(&mut H) -> Result<()>>;

/// Queue of deferred closures owned by one traversal.
pub struct DmPostTraverse<H> {
    queue: Vec<DmDeferred<H>>,
}

impl<H> DmPostTraverse<H> {
    fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues `f` to run after the walk completes.
    pub fn add<F>(&mut self, f: F)
    where
        F: FnOnce(&mut H) -> Result<()> + 'static,
    {
        self.queue.push(Box::new(f));
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn drain(&mut self) -> Vec<DmDeferred<H>> {
        std::mem::take(&mut self.queue)
    }
}

/// Stage-specific node callback.
pub trait DmTreeHandler: Sized {
    fn handle(&mut self, node: &DmNode, tree: &DmTree, post: &mut DmPostTraverse<Self>) -> Result<()>;
}

/// Walks `tree` from its root, parent before children, then runs the
/// deferred closures.
///
/// A tree without its root node is treated as empty. A node reachable
/// twice (a malformed snapshot) is visited once.
pub fn traverse<H: DmTreeHandler>(handler: &mut H, tree: &DmTree) -> Result<()> {
    let mut post = DmPostTraverse::new();

    let Some(root) = tree.root() else {
        debug!("tree has no root '{}', nothing to traverse", tree.root_id());
        return Ok(());
    };

    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&DmNode> = vec![root];
    let mut count = 0usize;

    while let Some(node) = stack.pop() {
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        node.check_identity()?;
        handler.handle(node, tree, &mut post)?;
        count += 1;

        let children: Vec<&DmNode> = tree.children(node).collect();
        stack.extend(children.into_iter().rev());
    }

    let deferred = post.drain();
    debug!(
        "visited {} nodes, running {} deferred closures",
        count,
        deferred.len()
    );
    for f in deferred {
        f(handler)?;
    }

    Ok(())
}
