//! Request to dispatchable job: analyze, allocate, configure, bind.

use crate::blit::request::BlitRequest;
use crate::foundation::error::B2r2Result;
use crate::job::alloc::{NodeAllocator, WorkBufAllocator};
use crate::node::list::NodeList;
use crate::split::analyze::analyze;
use crate::split::assign::{WorkBuf, assign_buffers};
use crate::split::configure::configure;
use crate::split::plan::Plan;

/// A compiled blit, ready for the job queue.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Job {
    /// The plan the nodes were built from.
    pub plan: Plan,
    /// Configured node chain.
    pub nodes: NodeList,
    /// Temporary buffers bound into the chain.
    pub work_bufs: Vec<WorkBuf>,
    /// Physical address of the first node.
    pub first_node_address: u64,
    /// Physical address of the last node.
    pub last_node_address: u64,
}

impl Job {
    /// Nodes in the chain.
    pub fn node_count(&self) -> usize {
        self.nodes.chain().count()
    }

    /// Return the job's memory to the allocators it came from.
    pub fn release<N, W>(self, node_alloc: &mut N, buf_alloc: &mut W)
    where
        N: NodeAllocator + ?Sized,
        W: WorkBufAllocator + ?Sized,
    {
        node_alloc.free_nodes(self.nodes);
        for buf in self.work_bufs {
            buf_alloc.free(buf);
        }
    }
}

/// Compile `req` into a node chain backed by memory from the given allocators.
///
/// On failure everything allocated so far is returned to the allocators.
#[tracing::instrument(skip(req, node_alloc, buf_alloc))]
pub fn compile_job<N, W>(
    req: &BlitRequest,
    max_buf_size: u32,
    node_alloc: &mut N,
    buf_alloc: &mut W,
) -> B2r2Result<Job>
where
    N: NodeAllocator + ?Sized,
    W: WorkBufAllocator + ?Sized,
{
    let plan = analyze(req, max_buf_size)?;

    let mut work_bufs = Vec::with_capacity(plan.work_bufs.len());
    for wanted in &plan.work_bufs {
        match buf_alloc.alloc(wanted.size) {
            Ok(buf) => work_bufs.push(buf),
            Err(err) => {
                free_bufs(buf_alloc, work_bufs);
                return Err(err);
            }
        }
    }

    let mut nodes = match node_alloc.alloc_nodes(plan.node_count as usize) {
        Ok(nodes) => nodes,
        Err(err) => {
            free_bufs(buf_alloc, work_bufs);
            return Err(err);
        }
    };

    let built = configure(&plan, &mut nodes)
        .and_then(|used| assign_buffers(&plan, &mut nodes, &work_bufs).map(|()| used));
    let used = match built {
        Ok(used) => used,
        Err(err) => {
            node_alloc.free_nodes(nodes);
            free_bufs(buf_alloc, work_bufs);
            return Err(err);
        }
    };

    let first_node_address = nodes.first_address();
    let last_node_address = used
        .checked_sub(1)
        .and_then(|i| nodes.get(i))
        .map_or(first_node_address, |n| n.phys_addr);
    tracing::debug!(
        nodes = used,
        first = first_node_address,
        last = last_node_address,
        "job compiled"
    );
    Ok(Job {
        plan,
        nodes,
        work_bufs,
        first_node_address,
        last_node_address,
    })
}

fn free_bufs<W: WorkBufAllocator + ?Sized>(buf_alloc: &mut W, bufs: Vec<WorkBuf>) {
    for buf in bufs {
        buf_alloc.free(buf);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/pipeline.rs"]
mod tests;
