//! Rust standard-library crates and their public modules.

use modscout_core::{Category, StandardLibrary, StdlibEntry};
use once_cell::sync::Lazy;

use Category::{Build, Data, Network, Testing, Ui, Utility};

static RUST_MODULES: &[StdlibEntry] = &[
    StdlibEntry::new("std", "The Rust standard library", Utility),
    StdlibEntry::new("core", "Dependency-free foundation of the standard library", Utility),
    StdlibEntry::new("alloc", "Heap allocation and collections for no_std crates", Data),
    StdlibEntry::new("proc_macro", "Support library for procedural macro authors", Build),
    StdlibEntry::new("test", "Support code for the built-in test harness", Testing),
    StdlibEntry::new("std::alloc", "Memory allocation APIs", Utility),
    StdlibEntry::new("std::any", "Dynamic typing and type reflection", Utility),
    StdlibEntry::new("std::array", "Utilities for fixed-size arrays", Data),
    StdlibEntry::new("std::ascii", "Operations on ASCII strings and characters", Data),
    StdlibEntry::new("std::backtrace", "Capturing stack backtraces of threads", Testing),
    StdlibEntry::new("std::borrow", "Borrowed data and the Cow type", Utility),
    StdlibEntry::new("std::boxed", "The Box pointer type for heap allocation", Utility),
    StdlibEntry::new("std::cell", "Shareable mutable containers", Utility),
    StdlibEntry::new("std::char", "Utilities for the char primitive type", Data),
    StdlibEntry::new("std::cmp", "Utilities for comparing and ordering values", Utility),
    StdlibEntry::new("std::collections", "Collection types: HashMap, BTreeMap, VecDeque", Data),
    StdlibEntry::new("std::convert", "Traits for conversions between types", Utility),
    StdlibEntry::new("std::default", "The Default trait", Utility),
    StdlibEntry::new("std::env", "Inspection and manipulation of the process environment", Utility),
    StdlibEntry::new("std::error", "The Error trait", Utility),
    StdlibEntry::new("std::f32", "Constants for the f32 type", Data),
    StdlibEntry::new("std::f64", "Constants for the f64 type", Data),
    StdlibEntry::new("std::ffi", "Platform-specific types for foreign function interfaces", Build),
    StdlibEntry::new("std::fmt", "Formatting and printing strings", Ui),
    StdlibEntry::new("std::fs", "Filesystem manipulation operations", Utility),
    StdlibEntry::new("std::future", "Asynchronous basic functionality", Network),
    StdlibEntry::new("std::hash", "Generic hashing support", Data),
    StdlibEntry::new("std::hint", "Hints to the compiler", Build),
    StdlibEntry::new("std::io", "Core I/O traits and buffered readers and writers", Utility),
    StdlibEntry::new("std::iter", "Composable external iteration", Utility),
    StdlibEntry::new("std::marker", "Primitive traits and marker types", Utility),
    StdlibEntry::new("std::mem", "Basic functions for dealing with memory", Utility),
    StdlibEntry::new("std::net", "Networking primitives for TCP and UDP", Network),
    StdlibEntry::new("std::num", "Additional functionality for numerics", Data),
    StdlibEntry::new("std::ops", "Overloadable operators", Utility),
    StdlibEntry::new("std::option", "Optional values", Utility),
    StdlibEntry::new("std::os", "OS-specific functionality", Utility),
    StdlibEntry::new("std::panic", "Panic support in the standard library", Testing),
    StdlibEntry::new("std::path", "Cross-platform path manipulation", Utility),
    StdlibEntry::new("std::pin", "Types that pin data to a location in memory", Utility),
    StdlibEntry::new("std::prelude", "The list of symbols preloaded into every module", Utility),
    StdlibEntry::new("std::primitive", "Re-exports of primitive types", Utility),
    StdlibEntry::new("std::process", "Processes and process management", Utility),
    StdlibEntry::new("std::ptr", "Managing memory through raw pointers", Utility),
    StdlibEntry::new("std::rc", "Single-threaded reference-counting pointers", Utility),
    StdlibEntry::new("std::result", "Error handling with the Result type", Utility),
    StdlibEntry::new("std::slice", "Utilities for the slice primitive type", Data),
    StdlibEntry::new("std::str", "Utilities for the str primitive type", Data),
    StdlibEntry::new("std::string", "A UTF-8 encoded, growable string", Data),
    StdlibEntry::new("std::sync", "Synchronization primitives: Arc, Mutex, channels", Network),
    StdlibEntry::new("std::task", "Types and traits for working with asynchronous tasks", Network),
    StdlibEntry::new("std::thread", "Native threads", Utility),
    StdlibEntry::new("std::time", "Temporal quantification", Utility),
    StdlibEntry::new("std::vec", "A contiguous growable array type", Data),
    StdlibEntry::new("core::fmt", "Formatting machinery without allocation", Ui),
    StdlibEntry::new("core::future", "Asynchronous basic functionality", Network),
    StdlibEntry::new("core::mem", "Basic functions for dealing with memory", Utility),
    StdlibEntry::new("core::ptr", "Managing memory through raw pointers", Utility),
    StdlibEntry::new("alloc::collections", "Collection types for no_std crates", Data),
    StdlibEntry::new("alloc::string", "Growable strings for no_std crates", Data),
    StdlibEntry::new("alloc::vec", "Growable arrays for no_std crates", Data),
];

/// Crates shipped with the toolchain; `std::x::y` paths resolve to their
/// most specific listed module.
pub static RUST_STDLIB: Lazy<StandardLibrary> =
    Lazy::new(|| StandardLibrary::new(RUST_MODULES).with_separator("::"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolchain_crates() {
        for name in ["std", "core", "alloc", "proc_macro", "test"] {
            assert!(RUST_STDLIB.is_standard_library(name), "{name}");
        }
    }

    #[test]
    fn test_module_paths() {
        assert!(RUST_STDLIB.is_standard_library("std::collections::HashMap"));
        assert!(RUST_STDLIB.is_standard_library("core::mem::swap"));
        let info = RUST_STDLIB.describe("std::sync::Arc").unwrap();
        assert_eq!(info.category, Category::Network);
    }

    #[test]
    fn test_third_party_rejected() {
        for name in ["serde", "tokio", "stdx", "collections", "std_detect"] {
            assert!(!RUST_STDLIB.is_standard_library(name), "{name}");
        }
    }
}
