//! Binding of allocated temporary buffers into configured nodes.

use crate::foundation::error::{B2r2Error, B2r2Result};
use crate::node::list::NodeList;
use crate::node::types::Node;
use crate::split::plan::Plan;

/// A temporary buffer allocated by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WorkBuf {
    /// Physical address.
    pub phys_addr: u64,
    /// Size in bytes.
    pub size: u32,
}

/// Patch the physical addresses of `bufs` into every node that refers to a temporary buffer.
///
/// `bufs[i]` backs temporary buffer `i + 1` of `plan`.
#[tracing::instrument(skip_all, fields(bufs = bufs.len(), expected = plan.buf_count))]
pub fn assign_buffers(plan: &Plan, nodes: &mut NodeList, bufs: &[WorkBuf]) -> B2r2Result<()> {
    for (req, buf) in plan.work_bufs.iter().zip(bufs) {
        if buf.size < req.size {
            return Err(B2r2Error::invalid(format!(
                "temporary buffer of {} bytes, {} required",
                buf.size, req.size
            )));
        }
    }

    for (i, node) in nodes.chain_mut().enumerate() {
        if let Err(err) = bind_node(node, bufs) {
            tracing::error!(node = i, error = %err, "temporary buffer binding failed");
            return Err(err);
        }
    }
    Ok(())
}

fn lookup(bufs: &[WorkBuf], index: u32) -> B2r2Result<&WorkBuf> {
    usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| bufs.get(i))
        .ok_or_else(|| {
            B2r2Error::internal(format!(
                "temporary buffer {index} referenced, {} allocated",
                bufs.len()
            ))
        })
}

fn bind_node(node: &mut Node, bufs: &[WorkBuf]) -> B2r2Result<()> {
    if node.dst_tmp_index != 0 {
        let addr = lookup(bufs, node.dst_tmp_index)?.phys_addr;
        let target = node
            .target
            .as_mut()
            .ok_or_else(|| B2r2Error::internal("temporary target on a node without target"))?;
        target.addr = addr;
    }
    if node.src_tmp_index != 0 {
        let addr = lookup(bufs, node.src_tmp_index)?.phys_addr;
        let slot = node.src_index;
        let source = node.source_mut(slot).ok_or_else(|| {
            B2r2Error::internal(format!("temporary source in empty slot {slot}"))
        })?;
        source.addr = addr;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/split/assign.rs"]
mod tests;
