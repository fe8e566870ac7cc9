#![deny(
    missing_docs,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Invocation capture and typed exception dispatch.
//!
//! ## Overview
//!
//! This crate runs an arbitrary callable behind a single interception
//! boundary. A condition raised inside the callable through the sanctioned
//! [`throw!`] macro does not propagate to the caller; instead [`invoke`]
//! returns a uniform [`InvocationResult`] that is either the callable's
//! return value or a [`CapturedException`] owning the thrown payload plus
//! throw-site diagnostics (file, line, column, message).
//!
//! The thrown payload can be of **any** `Send + 'static` type; there is no
//! common base trait to implement and no fixed exception hierarchy. The
//! caller later attempts resolution by offering typed handlers in sequence,
//! and the result tracks whether any handler accepted the condition.
//!
//! ## Quick Example
//!
//! ```
//! use tripwire::prelude::*;
//!
//! let mut result = invoke(|| -> i32 {
//!     throw!(10u32, "Demo application! Always throwing!")
//! });
//!
//! assert!(result.failed());
//! assert_eq!(
//!     result.exception().what(),
//!     "Demo application! Always throwing!"
//! );
//!
//! // Handlers match the payload type exactly; this one is never invoked
//! result.handle(|_wrong: &i32| true);
//! assert!(!result.handled());
//!
//! // First matching handler that returns true resolves the condition
//! result.handle(|value: &u32| *value == 10);
//! assert!(result.handled());
//! ```
//!
//! ## Core Concepts
//!
//! On a mechanical level there are three pieces:
//!
//! - **The invocation boundary.** [`invoke`] executes the callable on the
//!   current thread and is the one place where interception happens.
//!   Everything above it works with plain result values.
//! - **The captured exception.** [`CapturedException`] is an immutable
//!   record: a type-erased payload, its exact type identity, and the
//!   diagnostics captured at the throw site. The payload is recovered with
//!   [`CapturedException::try_get`], which matches types exactly; `u32` and
//!   `i32` never cross-match.
//! - **The resolution protocol.** [`InvocationResult::handle`] tries one
//!   typed handler at a time. The first handler whose type matches *and*
//!   which returns `true` resolves the condition; afterwards every further
//!   `handle` call is a no-op. A result may also end up never resolved,
//!   which [`InvocationResult::handled`] reports.
//!
//! ## The Capture Contract
//!
//! Only conditions raised through [`throw!`] (or
//! [`CapturedException::raise`]) are guaranteed to be intercepted. Any other
//! unwind, such as an ordinary `panic!` from unrelated infrastructure, is
//! re-raised unchanged at the boundary. This is a deliberate line: the
//! mechanism is a control-flow tool for its own conditions, not a general
//! panic barrier.
//!
//! Because the raise path unwinds, the process-wide panic hook still prints
//! its usual message for every throw. See
//! [`hooks::silence_thrown_conditions`] for the opt-in quiet mode.
//!
//! ## Threads
//!
//! Everything here is single-threaded and synchronous: each invocation runs
//! to completion on the caller's thread, and each result is exclusively
//! owned by whoever holds it. Different threads can use their own [`invoke`]
//! calls freely; nothing is shared between independent invocations.
//!
//! For implementation details of the type-erased payload storage, see the
//! [`tripwire-internals`] crate.
//!
//! [`tripwire-internals`]: tripwire_internals

#[macro_use]
mod macros;

pub mod handlers;
pub mod hooks;
pub mod prelude;

mod exception;
mod invocation;

pub use self::{
    exception::CapturedException,
    invocation::{InvocationResult, invoke},
};

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub use core::format_args;

    #[doc(hidden)]
    pub mod kind {
        use std::fmt;

        use crate::{CapturedException, handlers, handlers::PayloadHandler};

        #[doc(hidden)]
        pub struct Wrap<'a, T>(pub &'a T);

        #[doc(hidden)]
        pub trait HandlerDisplayKind {
            #[inline(always)]
            fn handler(&self) -> handlers::Display {
                handlers::Display
            }
        }

        impl<P> HandlerDisplayKind for &&Wrap<'_, P> where handlers::Display: PayloadHandler<P> {}

        #[doc(hidden)]
        pub trait HandlerDebugKind {
            #[inline(always)]
            fn handler(&self) -> handlers::Debug {
                handlers::Debug
            }
        }

        impl<P> HandlerDebugKind for &Wrap<'_, P> where handlers::Debug: PayloadHandler<P> {}

        #[doc(hidden)]
        pub trait HandlerAnyKind {
            #[inline(always)]
            fn handler(&self) -> handlers::Any {
                handlers::Any
            }
        }

        impl<P> HandlerAnyKind for Wrap<'_, P> where handlers::Any: PayloadHandler<P> {}

        #[doc(hidden)]
        #[must_use]
        #[track_caller]
        pub fn macro_helper_new_exception<P, H>(
            _handler: H,
            payload: P,
            message: fmt::Arguments<'_>,
        ) -> CapturedException
        where
            P: Send + 'static,
            H: PayloadHandler<P>,
        {
            match message.as_str() {
                Some(message) => CapturedException::new_custom::<P, H>(payload, message),
                None => CapturedException::new_custom::<P, H>(payload, fmt::format(message)),
            }
        }
    }
}
