//! Caller-owned node storage.

use std::fmt::Write as _;

use crate::foundation::error::{B2r2Error, B2r2Result};
use crate::node::types::Node;

/// Bytes occupied by one node descriptor in device memory.
pub const NODE_SIZE: u64 = 0x100;

/// A chain of nodes backed by contiguous device memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NodeList {
    nodes: Vec<Node>,
}

impl NodeList {
    /// `count` linked, unconfigured nodes starting at physical address `base_addr`.
    pub fn new(count: usize, base_addr: u64) -> Self {
        let mut nodes = vec![Node::default(); count];
        let mut addr = base_addr;
        for node in &mut nodes {
            node.phys_addr = addr;
            addr += NODE_SIZE;
        }
        let mut list = Self { nodes };
        list.relink();
        list
    }

    /// Number of nodes, configured or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` for a list without nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at storage index `index`.
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// All nodes in storage order.
    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    /// Physical address of the chain head, `0` for an empty list.
    pub fn first_address(&self) -> u64 {
        self.nodes.first().map_or(0, |n| n.phys_addr)
    }

    /// Configured nodes in execution order.
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            nodes: &self.nodes,
            next: if self.nodes.is_empty() { None } else { Some(0) },
        }
    }

    /// Clear every node and restore the sequential chain.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
        self.relink();
    }

    fn relink(&mut self) {
        let count = self.nodes.len();
        for i in 0..count {
            let next = (i + 1 < count).then_some(i + 1);
            let next_addr = next.map_or(0, |n| self.nodes[n].phys_addr);
            self.nodes[i].next = next;
            self.nodes[i].next_addr = next_addr;
        }
    }

    pub(crate) fn chain_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        // Chains are never reordered, only cut short.
        let used = self.chain().count();
        self.nodes.iter_mut().take(used)
    }

    pub(crate) fn cursor(&mut self) -> NodeCursor<'_> {
        let next = if self.nodes.is_empty() { None } else { Some(0) };
        NodeCursor {
            list: self,
            next,
            last: None,
            used: 0,
        }
    }

    /// Human-readable listing of the configured chain.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (i, node) in self.chain().enumerate() {
            let _ = write!(
                out,
                "node {i} @ {:#010x} -> {:#010x}: {:?}",
                node.phys_addr, node.next_addr, node.mode
            );
            if let Some(t) = &node.target {
                let w = t.window;
                let _ = write!(
                    out,
                    " dst {:?} {}x{}+{}+{} {:?}/{:?}",
                    t.plane, w.width, w.height, w.x, w.y, t.hso, t.vso
                );
            }
            for (slot, src) in node.sources.iter().enumerate() {
                if let Some(s) = src {
                    let w = s.window;
                    let _ = write!(
                        out,
                        " s{} {:?} {}x{}+{}+{}",
                        slot + 1,
                        s.plane,
                        w.width,
                        w.height,
                        w.x,
                        w.y
                    );
                }
            }
            if let Some(r) = &node.rescale {
                let _ = write!(out, " rsf {:#06x}/{:#06x}", r.h_sf, r.v_sf);
            }
            if node.rotate {
                out.push_str(" rot");
            }
            if let Some(m) = node.ivmx {
                let _ = write!(out, " {m:?}");
            }
            if node.blend.is_some() {
                out.push_str(" blend");
            }
            if node.clip.is_some() {
                out.push_str(" clip");
            }
            if node.dst_tmp_index != 0 {
                let _ = write!(out, " dst_tmp={}", node.dst_tmp_index);
            }
            if node.src_tmp_index != 0 {
                let _ = write!(out, " src_tmp={}@s{}", node.src_tmp_index, node.src_index);
            }
            out.push('\n');
        }
        out
    }
}

/// Iterator over the configured nodes of a [`NodeList`].
pub struct Chain<'a> {
    nodes: &'a [Node],
    next: Option<usize>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.next?)?;
        if !node.is_configured() {
            self.next = None;
            return None;
        }
        self.next = node.next;
        Some(node)
    }
}

/// Hands out the nodes of a list in chain order while configuring.
pub(crate) struct NodeCursor<'a> {
    list: &'a mut NodeList,
    next: Option<usize>,
    last: Option<usize>,
    used: usize,
}

impl NodeCursor<'_> {
    /// The next node in the chain, cleared.
    pub(crate) fn next_node(&mut self) -> B2r2Result<&mut Node> {
        let Some(idx) = self.next else {
            return Err(B2r2Error::internal(format!(
                "out of nodes after {} of {}",
                self.used,
                self.list.len()
            )));
        };
        let node = self
            .list
            .nodes
            .get_mut(idx)
            .ok_or_else(|| B2r2Error::internal(format!("broken node link to {idx}")))?;
        self.next = node.next;
        self.last = Some(idx);
        self.used += 1;
        node.reset();
        Ok(node)
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }

    /// End the chain after the last node handed out and return how many were used.
    pub(crate) fn finish(self) -> usize {
        if let Some(node) = self.last.and_then(|i| self.list.nodes.get_mut(i)) {
            node.next = None;
            node.next_addr = 0;
        }
        self.used
    }

    pub(crate) fn list(&self) -> &NodeList {
        self.list
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/list.rs"]
mod tests;
