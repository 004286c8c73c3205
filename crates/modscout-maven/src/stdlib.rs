//! Java SE platform packages.
//!
//! The `java`, `javax` and `jdk` namespaces are claimed whole, so any
//! package below them is part of the platform.

use modscout_core::{Category, StandardLibrary, StdlibEntry};
use once_cell::sync::Lazy;

use Category::{Build, Data, Network, Testing, Ui, Utility};

static JAVA_PACKAGES: &[StdlibEntry] = &[
    StdlibEntry::new("java", "Java SE platform API", Utility),
    StdlibEntry::new("java.lang", "Fundamental classes of the Java language", Utility),
    StdlibEntry::new("java.lang.annotation", "Annotation facility", Build),
    StdlibEntry::new("java.lang.invoke", "Method handles and dynamic invocation", Build),
    StdlibEntry::new("java.lang.reflect", "Reflective access to classes and objects", Build),
    StdlibEntry::new("java.io", "Stream-based input and output", Utility),
    StdlibEntry::new("java.math", "Arbitrary-precision integer and decimal arithmetic", Data),
    StdlibEntry::new("java.net", "Networking with sockets and URLs", Network),
    StdlibEntry::new("java.net.http", "HTTP client for HTTP/1.1 and HTTP/2", Network),
    StdlibEntry::new("java.nio", "Buffers for non-blocking I/O", Utility),
    StdlibEntry::new("java.nio.channels", "Channels for I/O operations", Network),
    StdlibEntry::new("java.nio.charset", "Charsets, decoders and encoders", Data),
    StdlibEntry::new("java.nio.file", "Access to files and file systems", Utility),
    StdlibEntry::new("java.security", "Security framework", Utility),
    StdlibEntry::new("java.sql", "JDBC database access", Data),
    StdlibEntry::new("java.text", "Text, date and number formatting", Data),
    StdlibEntry::new("java.time", "Dates, times, instants and durations", Utility),
    StdlibEntry::new("java.time.format", "Date-time printing and parsing", Data),
    StdlibEntry::new("java.util", "Collections framework and utility classes", Data),
    StdlibEntry::new("java.util.concurrent", "Concurrent programming utilities", Utility),
    StdlibEntry::new("java.util.concurrent.atomic", "Lock-free thread-safe variables", Utility),
    StdlibEntry::new("java.util.concurrent.locks", "Locks and conditions", Utility),
    StdlibEntry::new("java.util.function", "Functional interfaces for lambdas", Utility),
    StdlibEntry::new("java.util.logging", "Core logging facilities", Utility),
    StdlibEntry::new("java.util.regex", "Regular expression matching", Data),
    StdlibEntry::new("java.util.stream", "Functional-style operations on streams", Data),
    StdlibEntry::new("java.util.zip", "ZIP and GZIP file formats", Data),
    StdlibEntry::new("java.awt", "Abstract Window Toolkit user interfaces", Ui),
    StdlibEntry::new("java.beans", "JavaBeans components", Ui),
    StdlibEntry::new("java.rmi", "Remote method invocation", Network),
    StdlibEntry::new("javax", "Java SE extension packages", Utility),
    StdlibEntry::new("javax.annotation.processing", "Annotation processor API", Build),
    StdlibEntry::new("javax.crypto", "Cryptographic operations", Utility),
    StdlibEntry::new("javax.net.ssl", "Secure socket layer", Network),
    StdlibEntry::new("javax.sql", "Server-side data source access", Data),
    StdlibEntry::new("javax.swing", "Lightweight GUI components", Ui),
    StdlibEntry::new("javax.tools", "Compiler and tool invocation", Build),
    StdlibEntry::new("javax.xml.parsers", "XML document parsing", Data),
    StdlibEntry::new("jdk", "JDK-specific API", Build),
    StdlibEntry::new("jdk.jfr", "Flight recorder events", Testing),
    StdlibEntry::new("org.w3c.dom", "W3C Document Object Model", Data),
    StdlibEntry::new("org.xml.sax", "Simple API for XML", Data),
];

/// Java SE platform packages.
pub static JAVA_STDLIB: Lazy<StandardLibrary> =
    Lazy::new(|| StandardLibrary::new(JAVA_PACKAGES).with_separator("."));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_packages() {
        for name in ["java.util", "java.util.concurrent", "javax.swing", "jdk.jfr", "org.w3c.dom"] {
            assert!(JAVA_STDLIB.is_standard_library(name), "{name}");
        }
    }

    #[test]
    fn test_namespace_prefixes() {
        assert!(JAVA_STDLIB.is_standard_library("java.util.random"));
        assert!(JAVA_STDLIB.is_standard_library("jdk.incubator.vector"));
        assert_eq!(
            JAVA_STDLIB.describe("java.util.concurrent.atomic").unwrap().category,
            Category::Utility
        );
        assert_eq!(
            JAVA_STDLIB.describe("java.net.http").unwrap().category,
            Category::Network
        );
    }

    #[test]
    fn test_third_party_rejected() {
        for name in ["com.google.common.collect", "org.slf4j", "javafx.scene", "org.w3c"] {
            assert!(!JAVA_STDLIB.is_standard_library(name), "{name}");
        }
    }
}
