//! Exhaustive agreement check between node counting and node configuration.
//!
//! Every request in a grid of formats, transforms and sizes is analyzed and configured; a
//! configure failure or a chain that does not tile the destination is a mismatch.

use rayon::prelude::*;

use crate::blit::request::{BlitImage, BlitRequest, Transform};
use crate::foundation::core::Rect;
use crate::foundation::error::{B2r2Error, B2r2Result};
use crate::format::pixel::PixelFormat;
use crate::node::list::NodeList;
use crate::node::types::Plane;
use crate::split::analyze::{DEFAULT_MAX_BUF_SIZE, analyze};
use crate::split::configure::configure;
use crate::split::plan::Plan;

/// Grid swept by [`run_sweep`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SweepOpts {
    /// Source and destination formats.
    pub formats: Vec<(PixelFormat, PixelFormat)>,
    /// Extents used for every width and height.
    pub dims: Vec<i32>,
    /// Transforms to apply.
    pub transforms: Vec<Transform>,
    /// Also sweep with global-alpha blending.
    pub blend: bool,
    /// Temporary buffer budget.
    pub max_buf_size: u32,
    /// Worker threads, `None` for the rayon default.
    pub threads: Option<usize>,
}

impl Default for SweepOpts {
    fn default() -> Self {
        Self {
            formats: vec![
                (PixelFormat::Argb8888, PixelFormat::Argb8888),
                (PixelFormat::Argb8888, PixelFormat::Rgb565),
                (PixelFormat::Yuv420SemiPlanar, PixelFormat::Argb8888),
                (PixelFormat::Argb8888, PixelFormat::Yuv420Planar),
            ],
            dims: vec![1, 15, 16, 17, 33, 129],
            transforms: Transform::ALL.to_vec(),
            blend: true,
            max_buf_size: DEFAULT_MAX_BUF_SIZE,
            threads: None,
        }
    }
}

/// A request whose configured chain disagrees with its plan.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SweepMismatch {
    /// The offending request.
    pub request: BlitRequest,
    /// What went wrong.
    pub reason: String,
}

/// Outcome of a sweep.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct SweepReport {
    /// Requests configured and verified.
    pub checked: u64,
    /// Requests analyze refused.
    pub rejected: u64,
    /// Nodes configured over all checked requests.
    pub nodes: u64,
    /// Disagreements found.
    pub mismatches: Vec<SweepMismatch>,
}

enum Outcome {
    Checked(u64),
    Rejected,
    Mismatch(SweepMismatch),
}

/// Every request of the grid.
pub fn sweep_requests(opts: &SweepOpts) -> Vec<BlitRequest> {
    let mut out = Vec::new();
    let blends: &[bool] = if opts.blend { &[false, true] } else { &[false] };
    for &(src_fmt, dst_fmt) in &opts.formats {
        for &transform in &opts.transforms {
            for &blend in blends {
                for &sw in &opts.dims {
                    for &sh in &opts.dims {
                        for &dw in &opts.dims {
                            for &dh in &opts.dims {
                                let src = image(src_fmt, sw, sh);
                                let dst = image(dst_fmt, dw, dh);
                                let mut req = BlitRequest::copy(
                                    src,
                                    Rect::new(0, 0, sw, sh),
                                    dst,
                                    Rect::new(0, 0, dw, dh),
                                )
                                .with_transform(transform);
                                if blend {
                                    req = req.with_global_alpha(0x80);
                                }
                                out.push(req);
                            }
                        }
                    }
                }
            }
        }
    }
    out
}

fn image(fmt: PixelFormat, width: i32, height: i32) -> BlitImage {
    BlitImage::new(fmt, 0x1000_0000, width.unsigned_abs(), height.unsigned_abs())
}

/// Analyze, configure and verify every request of the grid in parallel.
#[tracing::instrument(skip_all, fields(threads = ?opts.threads))]
pub fn run_sweep(opts: &SweepOpts) -> B2r2Result<SweepReport> {
    let requests = sweep_requests(opts);
    let pool = build_thread_pool(opts.threads)?;
    let max_buf_size = opts.max_buf_size;
    let outcomes: Vec<Outcome> = pool.install(|| {
        requests
            .par_iter()
            .map(|req| check_request(req, max_buf_size))
            .collect()
    });

    let mut report = SweepReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Checked(nodes) => {
                report.checked += 1;
                report.nodes += nodes;
            }
            Outcome::Rejected => report.rejected += 1,
            Outcome::Mismatch(m) => report.mismatches.push(m),
        }
    }
    tracing::info!(
        checked = report.checked,
        rejected = report.rejected,
        mismatches = report.mismatches.len(),
        "sweep finished"
    );
    Ok(report)
}

fn check_request(req: &BlitRequest, max_buf_size: u32) -> Outcome {
    let mismatch = |reason: String| {
        Outcome::Mismatch(SweepMismatch {
            request: *req,
            reason,
        })
    };
    let plan = match analyze(req, max_buf_size) {
        Ok(plan) => plan,
        Err(B2r2Error::InternalConsistency(msg)) => return mismatch(msg),
        Err(_) => return Outcome::Rejected,
    };
    let mut nodes = NodeList::new(plan.node_count as usize, 0x100_0000);
    if let Err(err) = configure(&plan, &mut nodes) {
        return mismatch(err.to_string());
    }
    match verify_chain(&plan, &nodes) {
        Ok(()) => Outcome::Checked(u64::from(plan.node_count)),
        Err(reason) => mismatch(reason),
    }
}

/// Final-stage writes tile the destination exactly and temporary indices stay in range.
pub fn verify_chain(plan: &Plan, nodes: &NodeList) -> Result<(), String> {
    let dst = plan.dst.rect;
    let mut area = 0u64;
    for (i, node) in nodes.chain().enumerate() {
        if node.dst_tmp_index > plan.buf_count || node.src_tmp_index > plan.buf_count {
            return Err(format!("node {i} references a temporary buffer out of range"));
        }
        if node.dst_tmp_index != 0 {
            continue;
        }
        let Some(target) = node.target else {
            return Err(format!("node {i} has no target"));
        };
        if !matches!(target.plane, Plane::Full | Plane::Luma) {
            continue;
        }
        if !dst.contains_rect(target.window) {
            return Err(format!(
                "node {i} writes {:?} outside {dst:?}",
                target.window
            ));
        }
        area += target.window.area();
    }
    if area != dst.area() {
        return Err(format!("chain writes {area} pixels of {}", dst.area()));
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> B2r2Result<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(B2r2Error::invalid("sweep threads must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| B2r2Error::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/job/sweep.rs"]
mod tests;
