#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`tripwire`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased data structures and unsafe
//! operations that power the [`tripwire`] invocation-capture library. It
//! provides the foundation for zero-cost type erasure of thrown payload
//! values through vtable-based dispatch.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`tripwire`] crate,
//! not this one.
//!
//! # Architecture
//!
//! The crate is organized around a single type hierarchy for thrown payloads:
//!
//! - **[`payload`]**: Type-erased payload storage
//!   - [`RawPayload`]: Owned payload with [`Box`]-based allocation
//!   - [`RawPayloadRef`]: Borrowed reference to a payload
//!   - [`PayloadData`]: `#[repr(C)]` wrapper enabling field access on erased
//!     types
//!   - [`PayloadVtable`]: Function pointers for type-erased dispatch
//!
//! - **[`handlers`]**: Trait definitions for formatting behavior
//!   - [`PayloadHandler`]: Defines how payload values are formatted
//!
//! # Safety Strategy
//!
//! Type erasure requires careful handling to maintain Rust's type safety
//! guarantees. When we erase a type like `PayloadData<MyPayload>` to
//! `PayloadData<Erased>`, we must ensure that the vtable function pointers
//! still match the actual concrete type stored in memory.
//!
//! This crate maintains safety through:
//!
//! - **Module-based encapsulation**: Safety-critical types keep fields
//!   module-private, making invariants locally verifiable within a single file
//! - **`#[repr(C)]` layout**: Enables safe field projection on type-erased
//!   pointers without constructing invalid references
//! - **Documented vtable contracts**: Each vtable method specifies exactly
//!   when it can be safely called
//! - **`Send` at the chokepoint**: [`RawPayload::new`] requires the concrete
//!   payload type to be [`Send`], which is what justifies the container
//!   crossing unwind and thread boundaries
//!
//! See the [`payload`] module documentation for detailed explanations of how
//! these patterns are applied.
//!
//! [`tripwire`]: https://docs.rs/tripwire/latest/tripwire/
//! [`PayloadData`]: payload::data::PayloadData
//! [`PayloadVtable`]: payload::vtable::PayloadVtable
//! [`PayloadHandler`]: handlers::PayloadHandler
//! [`Box`]: alloc::boxed::Box

extern crate alloc;

pub mod handlers;
mod payload;
mod util;

pub use payload::{RawPayload, RawPayloadRef};
