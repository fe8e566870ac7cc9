//! Trying several candidate payload types in sequence.
//!
//! This example demonstrates the resolution protocol:
//! 1. Handlers whose type does not match are skipped without being invoked
//! 2. A matching handler may decline by returning `false`
//! 3. The first matching handler that returns `true` wins; later calls are
//!    no-ops
//! 4. A result can also end up unresolved, which `handled()` reports

use std::process::ExitCode;

use tripwire::prelude::*;

/// A structured payload carried by throttling conditions.
#[derive(Debug)]
struct Throttled {
    retry_after_secs: u64,
}

fn fetch_quota(user: &str) -> u32 {
    if user == "over-quota" {
        throw!(Throttled { retry_after_secs: 30 }, "quota exceeded for {user}");
    }
    250
}

fn main() -> ExitCode {
    tripwire::hooks::silence_thrown_conditions();

    println!("=== Handler Chain ===\n");

    let mut result = invoke(|| fetch_quota("over-quota"));

    if !result.failed() {
        println!("quota: {}", result.return_value());
        return ExitCode::SUCCESS;
    }

    println!("condition: {}", result.exception().what());

    // Candidate 1: wrong payload type, the closure is never invoked
    result.handle(|code: &u32| {
        println!("numeric condition: {code}");
        true
    });
    println!("after u32 candidate:    handled = {}", result.handled());

    // Candidate 2: matching type, but the handler declines long waits
    result.handle(|t: &Throttled| {
        println!("throttled, retry after {}s", t.retry_after_secs);
        t.retry_after_secs < 10
    });
    println!("after strict candidate: handled = {}", result.handled());

    // Candidate 3: matching type, accepts anything that names a retry delay
    result.handle(|t: &Throttled| t.retry_after_secs > 0);
    println!("after lenient candidate: handled = {}", result.handled());

    // Resolved now; this closure is a no-op even though the type matches
    result.handle(|_t: &Throttled| {
        unreachable!("the condition is already resolved");
    });

    if result.handled() {
        println!("\ncondition resolved");
        ExitCode::SUCCESS
    } else {
        println!("\ncondition NOT resolved");
        ExitCode::FAILURE
    }
}
