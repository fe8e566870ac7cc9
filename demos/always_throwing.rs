//! The canonical always-throwing demo.
//!
//! This example demonstrates the fundamental concepts:
//! 1. Running a callable through `invoke()`
//! 2. Raising a condition with `throw!()`
//! 3. Inspecting the captured diagnostics (file, line, message)
//! 4. Resolving the condition with a typed handler
//!
//! The process exits non-zero when the invocation failed, whether or not a
//! handler resolved the condition.

use std::process::ExitCode;

use tripwire::prelude::*;

fn main() -> ExitCode {
    // Keep the default panic hook quiet for conditions we intercept anyway
    tripwire::hooks::silence_thrown_conditions();

    // Invoke a callable of return type i32
    let mut ir = invoke(|| -> i32 {
        // Raise a condition with a u32 payload
        throw!(10u32, "Demo application! Always throwing!")
    });

    // Check if the invocation failed
    if ir.failed() {
        // Print generic exception details
        println!("Invocation failed!");
        println!("File: {}", ir.exception().file());
        println!("Line: {}", ir.exception().line());
        println!("Exception: {}", ir.exception().what());
        println!();

        // Handle all exceptions of type u32 with a closure
        ir.handle(|value: &u32| {
            println!("u32 exception: {value}");
            // The exception counts as handled if the value was 10
            *value == 10
        });

        // Check if the exception was handled
        if ir.handled() {
            println!("Exception handled!");
        } else {
            println!("Exception NOT handled!");
        }

        return ExitCode::FAILURE;
    }

    // If it did not fail, the return value decides the exit code
    ExitCode::from(ir.return_value() as u8)
}
