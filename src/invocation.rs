use std::panic::{self, AssertUnwindSafe};

use crate::exception::CapturedException;

/// Internal discriminant of an [`InvocationResult`].
///
/// Exactly one variant is ever populated, decided once by [`invoke`]; the
/// only mutation the public API permits afterwards is flipping `resolved`
/// from `false` to `true`.
enum InvocationState<R> {
    /// The callable completed normally with this value
    Succeeded(R),
    /// The callable raised a condition that was intercepted
    Failed {
        /// The intercepted condition
        exception: CapturedException,
        /// Whether any handler has accepted the exception yet
        resolved: bool,
    },
}

/// The outcome of running a callable through [`invoke`].
///
/// An `InvocationResult` holds either the callable's return value or the
/// [`CapturedException`] that was intercepted at the invocation boundary,
/// never both. On the failure path it additionally tracks whether any typed
/// handler has accepted the exception yet (see
/// [`handle`](InvocationResult::handle)).
///
/// # Handling Protocol
///
/// Resolution is sequential and first-match-wins. Call
/// [`handle`](InvocationResult::handle) with candidate payload types in
/// order; the first handler whose type matches the payload *and* which
/// returns `true` marks the result resolved, and every later call becomes a
/// no-op. There is no required sequence of calls, and stopping while still
/// unresolved is fine; [`handled`](InvocationResult::handled) reports the
/// final state either way.
///
/// # Examples
///
/// ```
/// use tripwire::prelude::*;
///
/// let mut result = invoke(|| -> i32 {
///     throw!(10u32, "Demo application! Always throwing!")
/// });
///
/// assert!(result.failed());
///
/// // Wrong payload type: the handler is not even invoked
/// result.handle(|_value: &i32| true);
/// assert!(!result.handled());
///
/// // Matching payload type: the handler decides
/// result.handle(|value: &u32| *value == 10);
/// assert!(result.handled());
/// ```
#[must_use]
pub struct InvocationResult<R> {
    /// Success-or-failure state, populated exactly once
    state: InvocationState<R>,
}

impl<R> InvocationResult<R> {
    /// Wraps a normally returned value.
    ///
    /// Construction is reserved for [`invoke`]; it is the only place where
    /// the success/failure decision is made.
    pub(crate) fn from_value(value: R) -> Self {
        Self {
            state: InvocationState::Succeeded(value),
        }
    }

    /// Wraps an intercepted condition, initially unresolved.
    pub(crate) fn from_exception(exception: CapturedException) -> Self {
        Self {
            state: InvocationState::Failed {
                exception,
                resolved: false,
            },
        }
    }

    /// Returns `true` when the callable completed normally.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self.state, InvocationState::Succeeded(_))
    }

    /// Returns `true` when the callable raised a condition that was
    /// intercepted at the invocation boundary.
    #[must_use]
    pub fn failed(&self) -> bool {
        matches!(self.state, InvocationState::Failed { .. })
    }

    /// Consumes the result and returns the callable's return value.
    ///
    /// # Panics
    ///
    /// Panics when the invocation failed. Calling this on a failed result is
    /// a logic bug in the caller, not a runtime condition, so it is treated
    /// as fatal rather than reported as a recoverable error. Check
    /// [`failed`](InvocationResult::failed) first, or use
    /// [`into_result`](InvocationResult::into_result) to branch explicitly.
    #[must_use]
    #[track_caller]
    pub fn return_value(self) -> R {
        match self.state {
            InvocationState::Succeeded(value) => value,
            InvocationState::Failed { exception, .. } => panic!(
                "return_value() called on a failed invocation result: {exception}"
            ),
        }
    }

    /// Returns the intercepted exception.
    ///
    /// # Panics
    ///
    /// Panics when the invocation succeeded. As with
    /// [`return_value`](InvocationResult::return_value), this indicates a
    /// logic bug in the caller and is treated as fatal.
    #[must_use]
    #[track_caller]
    pub fn exception(&self) -> &CapturedException {
        match &self.state {
            InvocationState::Failed { exception, .. } => exception,
            InvocationState::Succeeded(_) => {
                panic!("exception() called on a successful invocation result")
            }
        }
    }

    /// Attempts to resolve the intercepted exception with a typed handler.
    ///
    /// This is one step of the sequential, first-match-wins resolution
    /// protocol:
    ///
    /// 1. When the invocation succeeded, or a previous handler has already
    ///    resolved the exception, this returns immediately; the handler is
    ///    not invoked and the payload type is not even inspected.
    /// 2. When the payload was not thrown as `U`, this is a silent no-op;
    ///    the handler is not invoked and the result stays unresolved.
    /// 3. When the payload type matches, the handler is invoked with a
    ///    reference to the typed payload. Returning `true` marks the result
    ///    resolved; returning `false` leaves it unresolved so a later
    ///    `handle` call may still attempt resolution.
    ///
    /// Matching is exact: a handler registered for `u32` never observes a
    /// payload thrown as `i32`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripwire::prelude::*;
    ///
    /// let mut result = invoke(|| -> () { throw!(404u16, "not found") });
    ///
    /// // A matching handler may still decline by returning false
    /// result.handle(|code: &u16| *code == 500);
    /// assert!(!result.handled());
    ///
    /// // A later attempt can accept
    /// result.handle(|code: &u16| *code == 404);
    /// assert!(result.handled());
    /// ```
    pub fn handle<U, F>(&mut self, handler: F)
    where
        U: 'static,
        F: FnOnce(&U) -> bool,
    {
        if let InvocationState::Failed {
            exception,
            resolved,
        } = &mut self.state
        {
            if *resolved {
                return;
            }
            if let Some(payload) = exception.try_get::<U>() {
                if handler(payload) {
                    *resolved = true;
                }
            }
        }
    }

    /// Returns `true` when a handler has accepted the intercepted exception.
    ///
    /// Always `false` for successful invocations. Inspection never changes
    /// state; only [`handle`](InvocationResult::handle) can move a failed
    /// result from unresolved to resolved, and nothing moves it back.
    #[must_use]
    pub fn handled(&self) -> bool {
        matches!(
            self.state,
            InvocationState::Failed { resolved: true, .. }
        )
    }

    /// Converts the invocation result into a plain [`Result`].
    ///
    /// This discards the resolution state and is mostly useful to hand a
    /// captured exception to `?`-based error plumbing.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripwire::{CapturedException, invoke, throw};
    ///
    /// fn parse_port(raw: &str) -> Result<u16, CapturedException> {
    ///     invoke(|| -> u16 {
    ///         match raw.parse() {
    ///             Ok(port) => port,
    ///             Err(_) => throw!(raw.to_owned(), "not a valid port number"),
    ///         }
    ///     })
    ///     .into_result()
    /// }
    ///
    /// assert_eq!(parse_port("8080").unwrap(), 8080);
    /// assert!(parse_port("eighty").is_err());
    /// ```
    pub fn into_result(self) -> Result<R, CapturedException> {
        match self.state {
            InvocationState::Succeeded(value) => Ok(value),
            InvocationState::Failed { exception, .. } => Err(exception),
        }
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for InvocationResult<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.state {
            InvocationState::Succeeded(value) => {
                f.debug_tuple("Succeeded").field(value).finish()
            }
            InvocationState::Failed {
                exception,
                resolved,
            } => f
                .debug_struct("Failed")
                .field("exception", exception)
                .field("resolved", resolved)
                .finish(),
        }
    }
}

/// Runs a callable and intercepts any condition it raises.
///
/// The callable executes to completion on the current thread. A normal
/// return yields a succeeded [`InvocationResult`]; a condition raised
/// through [`throw!`](crate::throw) (or
/// [`CapturedException::raise`]) unwinds to this boundary, is intercepted,
/// and yields a failed result owning the [`CapturedException`]. In both
/// cases `invoke` returns a well-formed result; intercepted conditions never
/// propagate past it.
///
/// Any other unwind, such as an ordinary `panic!` from unrelated
/// infrastructure, is **not** part of the capture contract and is re-raised
/// unchanged. This boundary is deliberate: only conditions produced by the
/// sanctioned raise path are guaranteed to be intercepted.
///
/// The callable is wrapped in [`AssertUnwindSafe`]. This is sound for the
/// intended usage because nothing observes state the callable may have
/// partially mutated: the caller receives either the finished return value
/// or the captured exception, and the raise path hands over its payload by
/// value before unwinding.
///
/// # Examples
///
/// ```
/// use tripwire::prelude::*;
///
/// let result = invoke(|| 21 * 2);
/// assert!(!result.failed());
/// assert_eq!(result.return_value(), 42);
/// ```
///
/// Interception of a thrown condition:
///
/// ```
/// use tripwire::prelude::*;
///
/// let result = invoke(|| -> i32 {
///     throw!(10u32, "Demo application! Always throwing!")
/// });
///
/// assert!(result.failed());
/// assert_eq!(
///     result.exception().what(),
///     "Demo application! Always throwing!"
/// );
/// ```
pub fn invoke<R, F>(callable: F) -> InvocationResult<R>
where
    F: FnOnce() -> R,
{
    match panic::catch_unwind(AssertUnwindSafe(callable)) {
        Ok(value) => InvocationResult::from_value(value),
        Err(condition) => match condition.downcast::<CapturedException>() {
            Ok(exception) => InvocationResult::from_exception(*exception),
            Err(condition) => panic::resume_unwind(condition),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::throw;

    #[test]
    fn test_result_send_assertions() {
        static_assertions::assert_impl_all!(InvocationResult<i32>: Send);
        static_assertions::assert_not_impl_any!(InvocationResult<i32>: Sync, Clone, Copy);
        static_assertions::assert_not_impl_any!(InvocationResult<Rc<i32>>: Send);
    }

    #[test]
    fn successful_invocation_returns_value() {
        let result = invoke(|| 21 * 2);
        assert!(result.succeeded());
        assert!(!result.failed());
        assert!(!result.handled());
        assert_eq!(result.return_value(), 42);
    }

    #[test]
    fn successful_invocation_with_owned_value() {
        let result = invoke(|| String::from("finished"));
        assert_eq!(result.return_value(), "finished");
    }

    #[test]
    fn thrown_condition_is_intercepted() {
        let result = invoke(|| -> i32 {
            throw!(10u32, "Demo application! Always throwing!")
        });

        assert!(result.failed());
        assert!(!result.succeeded());
        let exception = result.exception();
        assert_eq!(exception.what(), "Demo application! Always throwing!");
        assert_eq!(exception.try_get::<u32>(), Some(&10));
        assert_eq!(exception.file(), file!());
    }

    #[test]
    fn throw_propagates_through_call_layers() {
        fn innermost() -> u8 {
            throw!(String::from("deep failure"), "raised three frames down")
        }

        fn middle() -> u8 {
            innermost().wrapping_add(1)
        }

        let result = invoke(middle);
        assert!(result.failed());
        assert_eq!(
            result.exception().try_get::<String>().map(String::as_str),
            Some("deep failure")
        );
    }

    #[test]
    fn throw_supports_format_arguments() {
        let result = invoke(|| -> () { throw!(3u8, "attempt {} of {}", 3, 5) });
        assert_eq!(result.exception().what(), "attempt 3 of 5");
    }

    #[test]
    fn matching_handler_resolves() {
        let mut result = invoke(|| -> i32 {
            throw!(10u32, "Demo application! Always throwing!")
        });

        result.handle(|value: &u32| *value == 10);
        assert!(result.handled());
    }

    #[test]
    fn wrong_type_handler_is_never_invoked() {
        let mut result = invoke(|| -> i32 {
            throw!(10u32, "Demo application! Always throwing!")
        });

        let invoked = Cell::new(false);
        result.handle(|_value: &i32| {
            invoked.set(true);
            true
        });

        assert!(!invoked.get());
        assert!(!result.handled());
    }

    #[test]
    fn first_match_wins() {
        let mut result = invoke(|| -> () { throw!(7u32, "resolved once") });

        result.handle(|value: &u32| *value == 7);
        assert!(result.handled());

        // Once resolved, later handlers are not invoked, matching type or not
        let invoked = Cell::new(false);
        result.handle(|_value: &u32| {
            invoked.set(true);
            true
        });
        result.handle(|_value: &i32| {
            invoked.set(true);
            true
        });

        assert!(!invoked.get());
        assert!(result.handled());
    }

    #[test]
    fn declining_handler_leaves_result_unresolved() {
        let mut result = invoke(|| -> () { throw!(404u16, "not found") });

        result.handle(|code: &u16| *code == 500);
        assert!(!result.handled());

        // A later attempt, same type or different, may still resolve
        result.handle(|code: &u16| *code == 404);
        assert!(result.handled());
    }

    #[test]
    fn handle_is_a_noop_on_success() {
        let mut result = invoke(|| 5i32);

        let invoked = Cell::new(false);
        result.handle(|_value: &i32| {
            invoked.set(true);
            true
        });

        assert!(!invoked.get());
        assert!(!result.handled());
        assert_eq!(result.return_value(), 5);
    }

    #[test]
    fn inspection_is_idempotent() {
        let result = invoke(|| -> () { throw!(1u32, "inspect me") });

        for _ in 0..3 {
            assert!(result.failed());
            assert!(!result.handled());
            assert_eq!(result.exception().what(), "inspect me");
            assert_eq!(result.exception().try_get::<u32>(), Some(&1));
        }
    }

    #[test]
    fn nested_invocations_capture_at_the_inner_boundary() {
        let outer = invoke(|| {
            let inner = invoke(|| -> u8 { throw!(9u32, "inner condition") });
            assert!(inner.failed());
            "outer completed"
        });

        assert!(outer.succeeded());
        assert_eq!(outer.return_value(), "outer completed");
    }

    #[test]
    fn each_invocation_captures_independently() {
        let first = invoke(|| -> () { throw!(1u32, "first") });
        let second = invoke(|| -> () { throw!(2u32, "second") });

        assert_eq!(first.exception().try_get::<u32>(), Some(&1));
        assert_eq!(second.exception().try_get::<u32>(), Some(&2));
        assert_eq!(first.exception().what(), "first");
        assert_eq!(second.exception().what(), "second");
    }

    #[test]
    fn unrelated_panics_propagate_uncaught() {
        let escaped = panic::catch_unwind(|| {
            let _ = invoke(|| -> i32 { panic!("unrelated infrastructure fault") });
        });

        let condition = escaped.expect_err("the unrelated panic must escape invoke");
        assert_eq!(
            condition.downcast_ref::<&str>(),
            Some(&"unrelated infrastructure fault")
        );
    }

    #[test]
    fn explicit_raise_is_intercepted() {
        use crate::CapturedException;

        let result = invoke(|| -> u8 {
            CapturedException::new(11u32, "raised without the macro").raise()
        });

        assert!(result.failed());
        assert_eq!(result.exception().try_get::<u32>(), Some(&11));
    }

    #[test]
    fn error_shaped_payloads_round_trip() {
        #[derive(Debug, PartialEq, thiserror::Error)]
        #[error("connection refused by {peer}")]
        struct ConnectionRefused {
            peer: String,
        }

        let mut result = invoke(|| -> () {
            throw!(
                ConnectionRefused {
                    peer: "10.0.0.1:443".to_owned(),
                },
                "transport failure"
            )
        });

        assert_eq!(result.exception().what(), "transport failure");
        assert_eq!(
            format!("{}", result.exception().format_payload()),
            "connection refused by 10.0.0.1:443"
        );

        result.handle(|refused: &ConnectionRefused| refused.peer.ends_with(":443"));
        assert!(result.handled());
    }

    #[test]
    fn into_result_maps_both_states() {
        let ok = invoke(|| 5u8).into_result();
        assert_eq!(ok.unwrap(), 5);

        let err = invoke(|| -> u8 { throw!(5u8, "into_result") }).into_result();
        assert_eq!(err.unwrap_err().what(), "into_result");
    }

    #[test]
    #[should_panic(expected = "return_value() called on a failed invocation result")]
    fn return_value_on_failed_result_is_fatal() {
        let result = invoke(|| -> i32 { throw!(0u32, "contract violation") });
        let _ = result.return_value();
    }

    #[test]
    #[should_panic(expected = "exception() called on a successful invocation result")]
    fn exception_on_successful_result_is_fatal() {
        let result = invoke(|| 1i32);
        let _ = result.exception();
    }

    #[test]
    fn demo_scenario_end_to_end() {
        // The canonical always-throwing scenario
        let mut ir = invoke(|| -> i32 {
            throw!(10u32, "Demo application! Always throwing!")
        });

        assert!(ir.failed());
        assert_eq!(ir.exception().what(), "Demo application! Always throwing!");

        ir.handle(|value: &u32| *value == 10);
        assert!(ir.handled());
    }

    #[test]
    fn demo_scenario_wrong_type_stays_unhandled() {
        let mut ir = invoke(|| -> i32 {
            throw!(10u32, "Demo application! Always throwing!")
        });

        let invoked = Cell::new(false);
        ir.handle(|_value: &i32| {
            invoked.set(true);
            true
        });

        assert!(!invoked.get());
        assert!(!ir.handled());
    }
}
