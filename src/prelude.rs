//! Commonly used items for convenient importing.
//!
//! The prelude re-exports the types, functions, and macros that nearly every
//! user of the library touches, so one `use` statement is enough.
//!
//! # Usage
//!
//! ```rust
//! use tripwire::prelude::*;
//!
//! let mut result = invoke(|| -> u32 {
//!     throw!(10u32, "Demo application! Always throwing!")
//! });
//!
//! if result.failed() {
//!     result.handle(|value: &u32| *value == 10);
//!     assert!(result.handled());
//! }
//! ```
//!
//! # What's Included
//!
//! - **[`invoke`]**: the invocation entry point
//! - **[`InvocationResult`]**: the success-or-failure outcome of an
//!   invocation
//! - **[`CapturedException`]**: the intercepted condition with its payload
//!   and diagnostics
//! - **[`throw!`]**: the sanctioned raise macro
//! - **[`handlers`]**: built-in payload formatting handlers
//!
//! For more specialized needs, such as the [`hooks`](crate::hooks) module,
//! import directly from the crate root.

pub use crate::{CapturedException, InvocationResult, handlers, invoke, throw};
