use std::{any::TypeId, borrow::Cow, fmt, panic::Location};

use tripwire_internals::{RawPayload, RawPayloadRef, handlers::PayloadHandler};

use crate::handlers;

/// An immutable record of an intercepted condition.
///
/// A `CapturedException` owns a type-erased copy of the payload value chosen
/// at the throw site, together with the diagnostics needed to report the
/// condition: the source location of the throw site and a human-readable
/// message.
///
/// Instances are normally created by the [`throw!`](crate::throw) macro and
/// recovered from a failed [`InvocationResult`](crate::InvocationResult);
/// direct construction via [`new`](CapturedException::new) is mostly useful
/// in tests and custom raise paths.
///
/// # Payload Recovery
///
/// The payload can be viewed again through [`try_get`], which matches the
/// requested type against the stored one **exactly**: there is no numeric
/// widening and no subtype matching. A handler registered for `u32` will
/// never observe a payload thrown as `i32`. This is deliberate; trying
/// several candidate types in sequence is the expected usage pattern, so a
/// non-match is a silent `None` rather than an error.
///
/// [`try_get`]: CapturedException::try_get
///
/// # Examples
///
/// ```
/// use tripwire::CapturedException;
///
/// let exception = CapturedException::new(10u32, "Demo application! Always throwing!");
///
/// assert_eq!(exception.what(), "Demo application! Always throwing!");
/// assert_eq!(exception.try_get::<u32>(), Some(&10));
/// assert_eq!(exception.try_get::<i32>(), None);
/// assert!(exception.file().ends_with(".rs"));
/// ```
pub struct CapturedException {
    /// Type-erased storage of the payload value
    payload: RawPayload,
    /// Source location of the throw site
    location: &'static Location<'static>,
    /// Human-readable description of the condition
    message: Cow<'static, str>,
}

impl CapturedException {
    /// Creates a new `CapturedException` from a payload and a message,
    /// recording the caller's source location.
    ///
    /// The payload is moved into the exception; the throw site keeps no
    /// access to it and its original lifetime is irrelevant afterwards.
    ///
    /// The payload is formatted with the [`handlers::Display`] handler. See
    /// [`CapturedException::new_custom`] if the payload does not implement
    /// [`Display`](fmt::Display), or if you want to control the handler
    /// used.
    #[must_use]
    #[track_caller]
    pub fn new<P>(payload: P, message: impl Into<Cow<'static, str>>) -> Self
    where
        P: Send + fmt::Display + fmt::Debug + 'static,
    {
        Self::new_custom::<P, handlers::Display>(payload, message)
    }

    /// Creates a new `CapturedException` with an explicitly chosen payload
    /// handler.
    ///
    /// The payload only needs to be `Send + 'static`; the handler `H`
    /// decides how it is rendered in diagnostics. Use
    /// [`handlers::Any`] for payloads with no formatting traits at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripwire::{CapturedException, handlers};
    ///
    /// struct Opaque {
    ///     code: u16,
    /// }
    ///
    /// let exception =
    ///     CapturedException::new_custom::<_, handlers::Any>(Opaque { code: 7 }, "opaque failure");
    ///
    /// assert_eq!(exception.try_get::<Opaque>().map(|o| o.code), Some(7));
    /// ```
    #[must_use]
    #[track_caller]
    pub fn new_custom<P, H>(payload: P, message: impl Into<Cow<'static, str>>) -> Self
    where
        P: Send + 'static,
        H: PayloadHandler<P>,
    {
        Self {
            payload: RawPayload::new::<P, H>(payload),
            location: Location::caller(),
            message: message.into(),
        }
    }

    /// Raises this exception as an unwinding condition.
    ///
    /// The condition unwinds until it reaches the nearest enclosing
    /// [`invoke`](crate::invoke) boundary, which intercepts it and turns it
    /// back into a failed [`InvocationResult`](crate::InvocationResult).
    /// Raising without such a boundary on the stack aborts the program the
    /// same way any uncaught panic does.
    ///
    /// The [`throw!`](crate::throw) macro is the usual way to construct and
    /// raise in one step.
    #[cold]
    pub fn raise(self) -> ! {
        std::panic::panic_any(self)
    }

    /// Returns the source file of the throw site.
    #[must_use]
    pub fn file(&self) -> &'static str {
        self.location.file()
    }

    /// Returns the source line of the throw site.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.location.line()
    }

    /// Returns the source column of the throw site.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.location.column()
    }

    /// Returns the human-readable description of the condition.
    #[must_use]
    pub fn what(&self) -> &str {
        &self.message
    }

    /// Returns the [`TypeId`] of the stored payload.
    #[must_use]
    pub fn payload_type_id(&self) -> TypeId {
        self.payload.as_ref().payload_type_id()
    }

    /// Returns the [`core::any::type_name`] of the stored payload.
    ///
    /// This is a diagnostic aid only; use [`payload_type_id`] or
    /// [`try_get`] for actual type matching.
    ///
    /// [`payload_type_id`]: CapturedException::payload_type_id
    /// [`try_get`]: CapturedException::try_get
    #[must_use]
    pub fn payload_type_name(&self) -> &'static str {
        self.payload.as_ref().payload_type_name()
    }

    /// Attempts to view the payload as type `U`.
    ///
    /// Returns a reference to the payload when `U` is exactly the thrown
    /// type, and `None` otherwise. This never panics and never copies the
    /// payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripwire::CapturedException;
    ///
    /// let exception = CapturedException::new(10u32, "always throwing");
    ///
    /// assert_eq!(exception.try_get::<u32>(), Some(&10));
    /// // Exact matching: u32 and i32 never cross-match
    /// assert_eq!(exception.try_get::<i32>(), None);
    /// ```
    #[must_use]
    pub fn try_get<U: 'static>(&self) -> Option<&U> {
        self.payload.as_ref().payload_downcast::<U>()
    }

    /// Formats the payload using the handler chosen at capture time.
    ///
    /// The returned proxy implements both [`Display`](fmt::Display) and
    /// [`Debug`](fmt::Debug), so the payload can be rendered even though its
    /// concrete type is erased.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripwire::CapturedException;
    ///
    /// let exception = CapturedException::new(10u32, "always throwing");
    /// assert_eq!(format!("{}", exception.format_payload()), "10");
    /// ```
    #[must_use]
    pub fn format_payload(&self) -> impl fmt::Display + fmt::Debug + '_ {
        PayloadFormatter {
            raw: self.payload.as_ref(),
        }
    }
}

/// Formatting proxy driving the payload's vtable dispatch.
struct PayloadFormatter<'a> {
    /// Borrowed view of the type-erased payload
    raw: RawPayloadRef<'a>,
}

impl fmt::Display for PayloadFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.payload_display(f)
    }
}

impl fmt::Debug for PayloadFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.payload_debug(f)
    }
}

impl fmt::Display for CapturedException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}:{}",
            self.message,
            self.file(),
            self.line(),
            self.column()
        )
    }
}

impl fmt::Debug for CapturedException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedException")
            .field("payload", &self.format_payload())
            .field("payload_type", &self.payload_type_name())
            .field("file", &self.file())
            .field("line", &self.line())
            .field("column", &self.column())
            .field("message", &self.what())
            .finish()
    }
}

impl std::error::Error for CapturedException {}
