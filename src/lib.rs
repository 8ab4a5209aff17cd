//! Node-split compiler for a 2D blitter engine.
//!
//! A [`BlitRequest`] (copy, fill, scale, rotate, blend, format conversion) is analyzed into a
//! [`Plan`], then compiled into a linked [`NodeList`] of engine instructions, each of which stays
//! within the engine's per-node limits. [`compile_job`] runs the whole pipeline against caller
//! supplied allocators.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod blit;
pub mod format;
pub mod foundation;
pub mod job;
pub mod node;
pub mod split;

pub use blit::request::{BlitFlags, BlitImage, BlitRequest, Transform};
pub use format::filters::{FilterKind, FilterTables, tables as filter_tables};
pub use format::ivmx::Ivmx;
pub use format::pixel::{AlphaRange, FmtType, NativeFormat, PixelFormat};
pub use foundation::core::{Hso, Rect, Vso};
pub use foundation::error::{B2r2Error, B2r2Result};
pub use job::alloc::{BumpAllocator, NodeAllocator, WorkBufAllocator};
pub use job::pipeline::{Job, compile_job};
pub use job::sweep::{SweepOpts, SweepReport, run_sweep};
pub use node::list::{NODE_SIZE, NodeList};
pub use node::types::{Node, NodeMode, Plane};
pub use split::analyze::{DEFAULT_MAX_BUF_SIZE, analyze};
pub use split::assign::{WorkBuf, assign_buffers};
pub use split::configure::configure;
pub use split::plan::{OpKind, Plan};
