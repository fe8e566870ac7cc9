//! Handlers that control how thrown payloads are formatted and displayed.
//!
//! A payload thrown through [`throw!`](crate::throw) can be of any type,
//! including types that implement neither [`Display`](core::fmt::Display)
//! nor [`Debug`](core::fmt::Debug). Handlers carry the formatting strategy
//! into the type-erased storage of a
//! [`CapturedException`](crate::CapturedException), so diagnostics can still
//! be rendered after the concrete payload type has been forgotten.
//!
//! # Built-in Handlers
//!
//! ## [`Display`]
//!
//! For payloads implementing [`Display`](core::fmt::Display) and
//! [`Debug`](core::fmt::Debug). Delegates to the type's own implementations.
//!
//! ## [`struct@Debug`]
//!
//! For payloads implementing [`Debug`](core::fmt::Debug) only. Uses debug
//! formatting for the `debug` method and shows "Payload of type `TypeName`"
//! for the `display` method.
//!
//! ## [`Any`]
//!
//! For any payload. Shows "An object of type TypeName" for both `display`
//! and `debug`. Used when no other formatting is available.
//!
//! # When Handlers Are Selected
//!
//! Handlers are typically selected automatically by the
//! [`throw!`](crate::throw) macro based on the traits implemented by your
//! payload type. You can also specify a handler explicitly using
//! [`CapturedException::new_custom`](crate::CapturedException::new_custom).
//!
//! # Examples
//!
//! ```rust
//! use tripwire::prelude::*;
//!
//! // Display handler (automatic for Display + Debug payloads)
//! let result = invoke(|| -> () { throw!(404u32, "not found") });
//! assert_eq!(format!("{}", result.exception().format_payload()), "404");
//!
//! // Any handler (automatic for opaque payloads)
//! struct Opaque;
//! let result = invoke(|| -> () { throw!(Opaque, "opaque condition") });
//! assert!(
//!     format!("{}", result.exception().format_payload()).contains("Opaque")
//! );
//! ```

pub use tripwire_internals::handlers::PayloadHandler;

/// Handler for payloads implementing [`Display`](core::fmt::Display) and
/// [`Debug`](core::fmt::Debug).
///
/// This handler delegates to the payload's own `Display` and `Debug`
/// implementations. It is the handler the [`throw!`](crate::throw) macro
/// selects whenever the payload supports it.
///
/// # Example
///
/// ```rust
/// use tripwire::{CapturedException, handlers};
///
/// let exception = CapturedException::new_custom::<_, handlers::Display>(7i64, "odd count");
/// assert_eq!(format!("{}", exception.format_payload()), "7");
/// ```
#[derive(Copy, Clone)]
pub struct Display;

impl<P> PayloadHandler<P> for Display
where
    P: core::fmt::Display + core::fmt::Debug,
{
    fn display(value: &P, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(value, f)
    }

    fn debug(value: &P, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(value, f)
    }
}

/// Handler for payloads implementing [`Debug`](core::fmt::Debug).
///
/// This handler uses the payload's `Debug` implementation for the `debug`
/// method, but shows a generic message like "Payload of type `TypeName`" for
/// the `display` method. This is useful for payload types that carry debug
/// information but don't implement `Display`.
///
/// # Example
///
/// ```rust
/// use tripwire::{CapturedException, handlers};
///
/// #[derive(Debug)]
/// struct RetryBudget {
///     attempts: u32,
/// }
///
/// let exception = CapturedException::new_custom::<_, handlers::Debug>(
///     RetryBudget { attempts: 3 },
///     "retry budget exhausted",
/// );
///
/// let display = format!("{}", exception.format_payload());
/// assert!(display.contains("RetryBudget"));
/// assert!(!display.contains("attempts")); // Details only in debug output
/// ```
#[derive(Copy, Clone)]
pub struct Debug;

impl<P> PayloadHandler<P> for Debug
where
    P: core::fmt::Debug,
{
    fn display(_value: &P, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Payload of type `{}`", core::any::type_name::<P>())
    }

    fn debug(value: &P, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(value, f)
    }
}

/// Handler for any payload, regardless of implemented traits.
///
/// This is the most generic handler, working with any payload without
/// requiring `Display` or `Debug` implementations. Both outputs show
/// "An object of type TypeName" using [`type_name`](core::any::type_name).
///
/// The [`throw!`](crate::throw) macro falls back to this handler when the
/// payload implements no formatting traits at all; the payload then remains
/// fully usable through [`try_get`](crate::CapturedException::try_get) and
/// [`handle`](crate::InvocationResult::handle), it just renders opaquely.
#[derive(Copy, Clone)]
pub struct Any;

impl<P> PayloadHandler<P> for Any {
    fn display(_value: &P, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "An object of type {}", core::any::type_name::<P>())
    }

    fn debug(_value: &P, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "An object of type {}", core::any::type_name::<P>())
    }
}
