// SPDX-License-Identifier: MIT OR Apache-2.0
//! Automatic layout engine for `ShadeGraph` node graphs.
//!
//! Arranges a shader graph spatially for readability. The engine works
//! right-to-left: the material output sits rightmost and its inputs fan
//! out to the left, matching the direction data flows on the canvas.
//!
//! ## Pipeline
//!
//! 1. Build a dependency graph restricted to the nodes being arranged
//!    ([`dependency`])
//! 2. Split it into connected components, then each component into
//!    independent branches ([`partition`])
//! 3. Lay out each branch bottom-up from a detected root node
//!    ([`tree`], [`arrange`]); when no root can be identified, fall back
//!    to a classic layered Sugiyama-style pass ([`layered`])
//! 4. Stack branches and components, translate to the configured origin,
//!    and write positions back into the graph ([`engine`])
//!
//! The engine only ever mutates node positions. Everything else about the
//! graph is read-only to it. All traversal uses insertion-ordered maps,
//! so arranging the same graph twice produces identical coordinates.
//!
//! The [`stepper`] module records the layout process step by step for
//! interactive debugging; it never changes the final result.

pub mod arrange;
pub mod config;
pub mod dependency;
pub mod engine;
pub mod geometry;
pub mod layered;
pub mod partition;
pub mod stepper;
pub mod tree;

pub use arrange::{hierarchical_layout, BranchLayout};
pub use config::LayoutConfig;
pub use dependency::{DependencyEntry, DependencyGraph};
pub use engine::{AutoLayoutEngine, DebugOverlay, LayoutHost};
pub use geometry::Rect;
pub use layered::layered_layout;
pub use partition::{find_branches, find_components};
pub use stepper::{DebugKey, DebugSession, LayoutStep, StepRecorder};
pub use tree::{find_root, LayoutTree};
