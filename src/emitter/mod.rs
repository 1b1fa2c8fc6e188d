//! Router emission.
//!
//! The same simplified tree can be emitted two ways:
//!
//! - [`live`]: each leaf's handler is finalized with its path (and method), producing a router
//!   value for immediate use
//! - [`codegen`]: the tree is rendered as TypeScript source with one import per route module

pub mod codegen;
pub mod live;
