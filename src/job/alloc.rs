//! Memory the compiler needs from its caller.

use crate::foundation::error::{B2r2Error, B2r2Result};
use crate::node::list::{NODE_SIZE, NodeList};
use crate::split::assign::WorkBuf;

/// Source of node storage.
pub trait NodeAllocator {
    /// A linked list of at least `count` nodes with stable physical addresses.
    fn alloc_nodes(&mut self, count: usize) -> B2r2Result<NodeList>;

    /// Return a list obtained from [`NodeAllocator::alloc_nodes`].
    fn free_nodes(&mut self, nodes: NodeList);
}

/// Source of physically contiguous temporary buffers.
pub trait WorkBufAllocator {
    /// A buffer of at least `size` bytes.
    fn alloc(&mut self, size: u32) -> B2r2Result<WorkBuf>;

    /// Return a buffer obtained from [`WorkBufAllocator::alloc`].
    fn free(&mut self, buf: WorkBuf);
}

const BUMP_ALIGN: u64 = 64;

/// Linear allocator over a physical address range.
///
/// Memory is only reclaimed once every outstanding allocation has been freed.
#[derive(Clone, Debug)]
pub struct BumpAllocator {
    base: u64,
    next: u64,
    end: u64,
    live: usize,
}

impl BumpAllocator {
    /// Allocator handing out `[base, base + size)`.
    pub fn new(base: u64, size: u64) -> Self {
        Self {
            base,
            next: base,
            end: base.saturating_add(size),
            live: 0,
        }
    }

    /// Outstanding allocations.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Bytes handed out since the range was last empty.
    pub fn used(&self) -> u64 {
        self.next - self.base
    }

    fn take(&mut self, bytes: u64) -> B2r2Result<u64> {
        let start = self.next.next_multiple_of(BUMP_ALIGN);
        let end = start
            .checked_add(bytes)
            .filter(|end| *end <= self.end)
            .ok_or_else(|| {
                B2r2Error::exhausted(format!(
                    "{bytes} bytes requested, {} left",
                    self.end.saturating_sub(start)
                ))
            })?;
        self.next = end;
        self.live += 1;
        Ok(start)
    }

    fn release(&mut self) {
        self.live = self.live.saturating_sub(1);
        if self.live == 0 {
            self.next = self.base;
        }
    }
}

impl NodeAllocator for BumpAllocator {
    fn alloc_nodes(&mut self, count: usize) -> B2r2Result<NodeList> {
        let bytes = u64::try_from(count)
            .ok()
            .and_then(|c| c.checked_mul(NODE_SIZE))
            .ok_or_else(|| B2r2Error::exhausted(format!("{count} nodes")))?;
        let base = self.take(bytes)?;
        Ok(NodeList::new(count, base))
    }

    fn free_nodes(&mut self, _nodes: NodeList) {
        self.release();
    }
}

impl WorkBufAllocator for BumpAllocator {
    fn alloc(&mut self, size: u32) -> B2r2Result<WorkBuf> {
        let phys_addr = self.take(u64::from(size))?;
        Ok(WorkBuf { phys_addr, size })
    }

    fn free(&mut self, _buf: WorkBuf) {
        self.release();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/alloc.rs"]
mod tests;
