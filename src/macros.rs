/// Raises a condition that [`invoke`](crate::invoke) is guaranteed to
/// intercept.
///
/// The first argument is the payload value; its type, chosen at the throw
/// site, is what typed handlers later match against. The remaining arguments
/// form the human-readable message and are interpreted the same way as the
/// [`format!()`] macro. The source file, line, and column of the `throw!`
/// invocation are recorded automatically.
///
/// The payload must be `Send + 'static`. No formatting traits are required:
/// the macro automatically picks the most specific built-in
/// [handler](crate::handlers) for the payload type (`Display`, then `Debug`,
/// then `Any`).
///
/// This macro diverges; it never returns, so it can stand in for a value of
/// any type.
///
/// [`format!()`]: std::format
///
/// # Examples
///
/// ```
/// use tripwire::prelude::*;
///
/// let result = invoke(|| -> i32 {
///     throw!(10u32, "Demo application! Always throwing!")
/// });
/// assert!(result.failed());
/// ```
///
/// With format arguments and a structured payload:
///
/// ```
/// use tripwire::prelude::*;
///
/// #[derive(Debug, PartialEq)]
/// struct Timeout {
///     millis: u64,
/// }
///
/// let result = invoke(|| -> () {
///     throw!(Timeout { millis: 250 }, "no response after {}ms", 250)
/// });
///
/// assert_eq!(result.exception().what(), "no response after 250ms");
/// assert_eq!(
///     result.exception().try_get::<Timeout>(),
///     Some(&Timeout { millis: 250 })
/// );
/// ```
#[macro_export]
macro_rules! throw {
    ($payload:expr, $($message:tt)+) => {{
        use $crate::__private::kind::*;
        let payload = $payload;
        let handler = (&&&Wrap(&payload)).handler();
        macro_helper_new_exception(
            handler,
            payload,
            $crate::__private::format_args!($($message)+),
        )
        .raise()
    }};
}
