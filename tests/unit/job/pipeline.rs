use super::*;
use crate::blit::request::{BlitImage, Transform};
use crate::foundation::core::Rect;
use crate::foundation::error::B2r2Error;
use crate::format::pixel::PixelFormat;
use crate::job::alloc::BumpAllocator;
use crate::node::list::NODE_SIZE;
use crate::split::analyze::DEFAULT_MAX_BUF_SIZE;

fn scale_rotate() -> BlitRequest {
    BlitRequest::copy(
        BlitImage::new(PixelFormat::Yuv420SemiPlanar, 0x10_0000, 64, 48),
        Rect::new(0, 0, 64, 48),
        BlitImage::new(PixelFormat::Argb8888, 0x80_0000, 96, 128),
        Rect::new(0, 0, 96, 128),
    )
    .with_transform(Transform::Rot270Ccw)
}

#[test]
fn job_spans_the_whole_chain() {
    let mut nodes = BumpAllocator::new(0x1_0000, 0x10_0000);
    let mut bufs = BumpAllocator::new(0x40_0000, 0x10_0000);
    let job = compile_job(&scale_rotate(), DEFAULT_MAX_BUF_SIZE, &mut nodes, &mut bufs).unwrap();

    assert_eq!(job.node_count(), job.plan.node_count as usize);
    assert_eq!(job.first_node_address, 0x1_0000);
    assert_eq!(
        job.last_node_address,
        0x1_0000 + (job.plan.node_count as u64 - 1) * NODE_SIZE
    );
    assert_eq!(job.work_bufs.len(), 1);
    let tmp_addr = job.work_bufs[0].phys_addr;
    assert!(job.nodes.chain().any(|n| n.target.is_some_and(|t| t.addr == tmp_addr)));

    job.release(&mut nodes, &mut bufs);
    assert_eq!(nodes.live(), 0);
    assert_eq!(bufs.live(), 0);
}

#[test]
fn allocation_failure_returns_everything() {
    let mut nodes = BumpAllocator::new(0, NODE_SIZE);
    let mut bufs = BumpAllocator::new(0x40_0000, 0x10_0000);
    let err =
        compile_job(&scale_rotate(), DEFAULT_MAX_BUF_SIZE, &mut nodes, &mut bufs).unwrap_err();
    assert!(matches!(err, B2r2Error::ResourceExhausted(_)));
    assert_eq!(bufs.live(), 0);
    assert_eq!(nodes.live(), 0);
}

#[test]
fn rejected_requests_allocate_nothing() {
    let mut req = scale_rotate();
    req.dst_rect = Rect::new(50, 0, 96, 128);
    let mut nodes = BumpAllocator::new(0, 0x10_0000);
    let mut bufs = BumpAllocator::new(0x40_0000, 0x10_0000);
    assert!(compile_job(&req, DEFAULT_MAX_BUF_SIZE, &mut nodes, &mut bufs).is_err());
    assert_eq!(nodes.used(), 0);
    assert_eq!(bufs.used(), 0);
}
