// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the Understory interaction demos.
//!
//! Run a demo with logging from the libraries:
//! - `RUST_LOG=debug cargo run -p understory_demos --example pointer_gestures`

use std::rc::Rc;

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber filtered by `RUST_LOG`, `info` by default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// A fixed element tree with named nodes. Ids are indices.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<(&'static str, Option<u32>)>,
}

impl Tree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` and return its id.
    pub fn add(&mut self, name: &'static str, parent: Option<u32>) -> u32 {
        let id = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.nodes.push((name, parent));
        id
    }

    /// Parent of `id`.
    pub fn parent(&self, id: u32) -> Option<u32> {
        self.nodes.get(id as usize).and_then(|(_, p)| *p)
    }

    /// Name of `id`, or `"?"`.
    pub fn name(&self, id: u32) -> &'static str {
        self.nodes.get(id as usize).map_or("?", |(n, _)| *n)
    }

    /// A parent lookup closure sharing `tree`.
    pub fn lookup(tree: &Rc<Self>) -> impl Fn(u32) -> Option<u32> + 'static {
        let tree = Rc::clone(tree);
        move |id| tree.parent(id)
    }
}
