//! Handlers that define formatting behavior for thrown payloads.
//!
//! A payload captured at a throw site can be of any type, including types
//! that implement neither [`Display`] nor [`Debug`]. The handler chosen at
//! capture time carries the formatting strategy into the type-erased
//! storage, so diagnostics can still be rendered after the concrete type has
//! been forgotten.
//!
//! [`Display`]: core::fmt::Display
//! [`Debug`]: core::fmt::Debug

/// Trait for implementing custom formatting behavior for thrown payloads.
///
/// This trait defines how a payload value should be rendered when the
/// captured exception that owns it is displayed or debugged.
///
/// # When to Implement
///
/// You typically don't need to implement this trait directly. The tripwire
/// library provides built-in handlers (`Display`, `Debug`, `Any`) that cover
/// most use cases, and its `throw!` macro picks the most specific one
/// automatically.
///
/// Implement this trait when you need custom rendering that the built-in
/// handlers don't provide, such as redacting sensitive fields or summarizing
/// large payloads.
///
/// # Examples
///
/// ```
/// use tripwire_internals::handlers::PayloadHandler;
///
/// struct ApiKey(String);
///
/// struct RedactingHandler;
///
/// impl PayloadHandler<ApiKey> for RedactingHandler {
///     fn display(_value: &ApiKey, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
///         write!(f, "[REDACTED]")
///     }
///
///     fn debug(_value: &ApiKey, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
///         write!(f, "ApiKey([REDACTED])")
///     }
/// }
/// ```
pub trait PayloadHandler<P>: 'static {
    /// Formats the payload using display-style formatting.
    ///
    /// This method is called when the payload needs to be shown as part of a
    /// captured exception's diagnostics. It should produce human-readable
    /// output suitable for end users.
    fn display(value: &P, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result;

    /// Formats the payload using debug-style formatting.
    ///
    /// This method is called when the payload needs to be debug-formatted.
    /// It should produce detailed output suitable for developers.
    fn debug(value: &P, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result;
}
