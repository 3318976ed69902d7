//! # Formwork core
//!
//! The substrate form cells run on. It stands in for the platform runtime a
//! form toolkit normally borrows from its host:
//!
//! - [`hierarchy`] — a responder tree with explicit parent links, typed node
//!   payloads, and first-responder tracking.
//! - [`notify`] — per-thread notifications (content size changes) with RAII
//!   subscriptions.
//! - [`locals`] — theme, text scale and the preferred content size.
//! - [`geometry`] / [`color`] — plain value types.
//!
//! Everything here is single-threaded. Handles are `Rc`-based and stay on the
//! UI thread; work produced elsewhere must be marshalled back before touching
//! them.
//!
//! ```rust
//! use formwork_core::*;
//!
//! let tree = Hierarchy::new();
//! let host = tree.insert("host");
//! tree.set_payload(host, "controller").unwrap();
//! let cell = tree.insert_child(host, "cell").unwrap();
//!
//! assert_eq!(tree.find_ancestor::<&str>(cell), Some("controller"));
//! tree.detach(cell).unwrap();
//! assert_eq!(tree.find_ancestor::<&str>(cell), None);
//! ```

pub mod color;
pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod locals;
pub mod notify;
pub mod prelude;
mod tests;

pub use color::*;
pub use error::*;
pub use geometry::*;
pub use hierarchy::*;
pub use locals::*;
pub use notify::*;
