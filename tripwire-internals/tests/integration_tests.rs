//! Integration tests for the tripwire-internals crate functionality.
//!
//! This test suite exercises the type-erased payload storage through its
//! public API:
//!
//! - Payload creation, type checking, and checked/unchecked downcasting
//! - Display and debug formatting through the vtable, with both generic and
//!   custom handlers
//! - Mixed payload types coexisting with exact-match type identification
//! - Memory management: payload values are dropped exactly once, regardless
//!   of when the owning `RawPayload` is dropped

use std::{
    any::TypeId,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use tripwire_internals::{RawPayload, RawPayloadRef, handlers::PayloadHandler};

#[derive(Debug, Clone, PartialEq)]
struct TestPayload {
    name: String,
    value: i32,
}

impl TestPayload {
    fn new(name: &str, value: i32) -> Self {
        Self {
            name: name.to_owned(),
            value,
        }
    }
}

impl fmt::Display for TestPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

struct DefaultPayloadHandler;

impl<P> PayloadHandler<P> for DefaultPayloadHandler
where
    P: fmt::Display + fmt::Debug + 'static,
{
    fn display(value: &P, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(value, formatter)
    }

    fn debug(value: &P, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(value, formatter)
    }
}

struct CustomPayloadHandler;

impl PayloadHandler<TestPayload> for CustomPayloadHandler {
    fn display(value: &TestPayload, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[PAYLOAD] {} = {}", value.name, value.value)
    }

    fn debug(value: &TestPayload, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "CustomTestPayload {{ name: {:?}, value: {} }}",
            value.name, value.value
        )
    }
}

// Helper wrappers for driving the vtable Display and Debug paths
struct DisplayWrapper<'a>(RawPayloadRef<'a>);

impl fmt::Display for DisplayWrapper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.payload_display(f)
    }
}

struct DebugWrapper<'a>(RawPayloadRef<'a>);

impl fmt::Debug for DebugWrapper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.payload_debug(f)
    }
}

#[test]
fn test_payload_creation_and_basic_operations() {
    let payload = TestPayload::new("test", 42);
    let raw_payload = RawPayload::new::<_, DefaultPayloadHandler>(payload);

    let payload_ref = raw_payload.as_ref();

    assert_eq!(payload_ref.payload_type_id(), TypeId::of::<TestPayload>());
    assert!(payload_ref.payload_type_name().contains("TestPayload"));

    let downcast_ref = unsafe { payload_ref.payload_downcast_unchecked::<TestPayload>() };
    assert_eq!(downcast_ref.name, "test");
    assert_eq!(downcast_ref.value, 42);
}

#[test]
fn test_payload_checked_downcast() {
    let raw_payload = RawPayload::new::<_, DefaultPayloadHandler>(TestPayload::new("checked", 7));
    let payload_ref = raw_payload.as_ref();

    let downcast = payload_ref.payload_downcast::<TestPayload>();
    assert_eq!(downcast, Some(&TestPayload::new("checked", 7)));

    // Wrong requested types must report a non-match, never a miscast value
    assert!(payload_ref.payload_downcast::<String>().is_none());
    assert!(payload_ref.payload_downcast::<i32>().is_none());
    assert!(payload_ref.payload_downcast::<u32>().is_none());
}

#[test]
fn test_payload_display_and_debug() {
    let payload = TestPayload::new("display_test", 123);
    let raw_payload = RawPayload::new::<_, DefaultPayloadHandler>(payload);
    let payload_ref = raw_payload.as_ref();

    let display_result = format!("{}", DisplayWrapper(payload_ref));
    assert_eq!(display_result, "display_test: 123");

    let debug_result = format!("{:?}", DebugWrapper(payload_ref));
    assert!(debug_result.contains("display_test"));
    assert!(debug_result.contains("123"));
}

#[test]
fn test_payload_custom_handler() {
    let payload = TestPayload::new("custom", 999);
    let raw_payload = RawPayload::new::<_, CustomPayloadHandler>(payload);
    let payload_ref = raw_payload.as_ref();

    let display_result = format!("{}", DisplayWrapper(payload_ref));
    assert_eq!(display_result, "[PAYLOAD] custom = 999");

    let debug_result = format!("{:?}", DebugWrapper(payload_ref));
    assert_eq!(
        debug_result,
        "CustomTestPayload { name: \"custom\", value: 999 }"
    );
}

#[test]
fn test_multiple_payloads() {
    let payloads = [
        RawPayload::new::<_, DefaultPayloadHandler>(TestPayload::new("first", 1)),
        RawPayload::new::<_, DefaultPayloadHandler>(TestPayload::new("second", 2)),
        RawPayload::new::<_, DefaultPayloadHandler>(TestPayload::new("third", 3)),
    ];

    for (i, payload) in payloads.iter().enumerate() {
        let payload_ref = payload.as_ref();
        assert_eq!(payload_ref.payload_type_id(), TypeId::of::<TestPayload>());
        let downcast = unsafe { payload_ref.payload_downcast_unchecked::<TestPayload>() };
        assert_eq!(downcast.value, (i + 1) as i32);
    }
}

#[test]
fn test_different_payload_types() {
    let string_payload = RawPayload::new::<_, DefaultPayloadHandler>("test string".to_owned());
    let number_payload = RawPayload::new::<_, DefaultPayloadHandler>(42u32);
    let custom_payload = RawPayload::new::<_, DefaultPayloadHandler>(TestPayload::new("mixed", 3));

    assert_eq!(
        string_payload.as_ref().payload_type_id(),
        TypeId::of::<String>()
    );
    assert_eq!(
        number_payload.as_ref().payload_type_id(),
        TypeId::of::<u32>()
    );
    assert_eq!(
        custom_payload.as_ref().payload_type_id(),
        TypeId::of::<TestPayload>()
    );

    assert_eq!(
        string_payload
            .as_ref()
            .payload_downcast::<String>()
            .map(String::as_str),
        Some("test string")
    );
    assert_eq!(number_payload.as_ref().payload_downcast::<u32>(), Some(&42));

    // u32 and i32 have distinct identities, matching is exact
    assert!(number_payload.as_ref().payload_downcast::<i32>().is_none());
}

#[test]
fn test_type_id_consistency() {
    let payload = RawPayload::new::<_, DefaultPayloadHandler>(TestPayload::new("test", 42));
    let payload_ref = payload.as_ref();

    let type_id1 = payload_ref.payload_type_id();
    let type_id2 = payload_ref.payload_type_id();
    assert_eq!(type_id1, type_id2);

    assert_eq!(type_id1, TypeId::of::<TestPayload>());
}

#[test]
fn test_payload_dropped_exactly_once() {
    struct DropCounter {
        drops: Arc<AtomicUsize>,
    }

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl fmt::Display for DropCounter {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "DropCounter")
        }
    }

    impl fmt::Debug for DropCounter {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "DropCounter")
        }
    }

    let drops = Arc::new(AtomicUsize::new(0));

    {
        let payload = RawPayload::new::<_, DefaultPayloadHandler>(DropCounter {
            drops: drops.clone(),
        });

        // Taking references and formatting must not consume the value
        let payload_ref = payload.as_ref();
        let _ = format!("{}", DisplayWrapper(payload_ref));
        assert_eq!(drops.load(Ordering::SeqCst), 0);
    }

    assert_eq!(drops.load(Ordering::SeqCst), 1);
}
