//! Shared types for the Decaf front-end: byte spans, line indexing, the
//! `Position` every AST node carries, and `NodeId`, the opaque identity
//! used to look up a node's scope in the side-tables built by
//! `decaf-semantic`.

pub mod node_id;
pub mod position;
pub mod span;

pub use node_id::{NodeId, NodeIdGen};
pub use position::Position;
pub use span::{LineIndex, Span};
