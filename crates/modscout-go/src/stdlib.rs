//! Go standard-library packages.

use modscout_core::{Category, StandardLibrary, StdlibEntry};
use once_cell::sync::Lazy;

use Category::{Build, Data, Network, Testing, Ui, Utility};

static GO_PACKAGES: &[StdlibEntry] = &[
    StdlibEntry::new("archive/tar", "Access to tar archives", Data),
    StdlibEntry::new("archive/zip", "Reading and writing ZIP archives", Data),
    StdlibEntry::new("bufio", "Buffered I/O", Utility),
    StdlibEntry::new("bytes", "Functions for the manipulation of byte slices", Data),
    StdlibEntry::new("cmp", "Comparing ordered values", Utility),
    StdlibEntry::new("compress/bzip2", "bzip2 decompression", Data),
    StdlibEntry::new("compress/flate", "DEFLATE compressed data format", Data),
    StdlibEntry::new("compress/gzip", "Reading and writing gzip compressed files", Data),
    StdlibEntry::new("compress/zlib", "Reading and writing zlib format compressed data", Data),
    StdlibEntry::new("container/heap", "Heap operations for any type implementing heap.Interface", Data),
    StdlibEntry::new("container/list", "Doubly linked list", Data),
    StdlibEntry::new("container/ring", "Operations on circular lists", Data),
    StdlibEntry::new("context", "Deadlines, cancellation signals and request-scoped values", Network),
    StdlibEntry::new("crypto", "Common cryptographic constants", Utility),
    StdlibEntry::new("crypto/aes", "AES encryption", Utility),
    StdlibEntry::new("crypto/ecdsa", "Elliptic Curve Digital Signature Algorithm", Utility),
    StdlibEntry::new("crypto/ed25519", "Ed25519 signature algorithm", Utility),
    StdlibEntry::new("crypto/hmac", "Keyed-Hash Message Authentication Code", Utility),
    StdlibEntry::new("crypto/md5", "MD5 hash algorithm", Utility),
    StdlibEntry::new("crypto/rand", "Cryptographically secure random number generator", Utility),
    StdlibEntry::new("crypto/rsa", "RSA encryption", Utility),
    StdlibEntry::new("crypto/sha1", "SHA-1 hash algorithm", Utility),
    StdlibEntry::new("crypto/sha256", "SHA224 and SHA256 hash algorithms", Utility),
    StdlibEntry::new("crypto/sha512", "SHA-384 and SHA-512 hash algorithms", Utility),
    StdlibEntry::new("crypto/tls", "TLS 1.2 and TLS 1.3", Network),
    StdlibEntry::new("crypto/x509", "X.509 certificates and keys", Network),
    StdlibEntry::new("database/sql", "Generic interface around SQL databases", Data),
    StdlibEntry::new("debug/elf", "Access to ELF object files", Build),
    StdlibEntry::new("embed", "Access to files embedded in the running program", Build),
    StdlibEntry::new("encoding", "Interfaces shared by encoders", Data),
    StdlibEntry::new("encoding/base64", "Base64 encoding", Data),
    StdlibEntry::new("encoding/binary", "Translation between numbers and byte sequences", Data),
    StdlibEntry::new("encoding/csv", "Reading and writing CSV files", Data),
    StdlibEntry::new("encoding/gob", "Streams of gob-encoded values", Data),
    StdlibEntry::new("encoding/hex", "Hexadecimal encoding and decoding", Data),
    StdlibEntry::new("encoding/json", "JSON encoding and decoding", Data),
    StdlibEntry::new("encoding/pem", "PEM data encoding", Data),
    StdlibEntry::new("encoding/xml", "XML 1.0 parser that understands name spaces", Data),
    StdlibEntry::new("errors", "Functions to manipulate errors", Utility),
    StdlibEntry::new("expvar", "Public variables exposed over HTTP", Network),
    StdlibEntry::new("flag", "Command-line flag parsing", Utility),
    StdlibEntry::new("fmt", "Formatted I/O", Utility),
    StdlibEntry::new("go/ast", "Syntax trees for Go packages", Build),
    StdlibEntry::new("go/build", "Gathering information about Go packages", Build),
    StdlibEntry::new("go/format", "Standard formatting of Go source", Build),
    StdlibEntry::new("go/parser", "Parser for Go source files", Build),
    StdlibEntry::new("go/token", "Lexical tokens of Go", Build),
    StdlibEntry::new("go/types", "Type-checking of Go packages", Build),
    StdlibEntry::new("hash", "Interfaces for hash functions", Data),
    StdlibEntry::new("hash/crc32", "32-bit cyclic redundancy check", Data),
    StdlibEntry::new("hash/fnv", "FNV-1 and FNV-1a hash functions", Data),
    StdlibEntry::new("html", "Escaping and unescaping HTML text", Ui),
    StdlibEntry::new("html/template", "Data-driven templates safe against code injection", Ui),
    StdlibEntry::new("image", "Basic 2-D image library", Ui),
    StdlibEntry::new("image/color", "Basic color library", Ui),
    StdlibEntry::new("image/png", "PNG image decoder and encoder", Ui),
    StdlibEntry::new("image/jpeg", "JPEG image decoder and encoder", Ui),
    StdlibEntry::new("io", "Basic interfaces to I/O primitives", Utility),
    StdlibEntry::new("io/fs", "Interfaces to a file system", Utility),
    StdlibEntry::new("iter", "Iterators over sequences", Utility),
    StdlibEntry::new("log", "Simple logging package", Utility),
    StdlibEntry::new("log/slog", "Structured logging", Utility),
    StdlibEntry::new("maps", "Generic functions for maps", Data),
    StdlibEntry::new("math", "Basic constants and mathematical functions", Data),
    StdlibEntry::new("math/big", "Arbitrary-precision arithmetic", Data),
    StdlibEntry::new("math/bits", "Bit counting and manipulation functions", Data),
    StdlibEntry::new("math/rand", "Pseudo-random number generators", Data),
    StdlibEntry::new("math/rand/v2", "Pseudo-random number generators, version 2", Data),
    StdlibEntry::new("mime", "Parts of the MIME spec", Network),
    StdlibEntry::new("mime/multipart", "MIME multipart parsing", Network),
    StdlibEntry::new("net", "Portable interface for network I/O", Network),
    StdlibEntry::new("net/http", "HTTP client and server implementations", Network),
    StdlibEntry::new("net/http/httptest", "Utilities for HTTP testing", Testing),
    StdlibEntry::new("net/http/pprof", "Runtime profiling data over HTTP", Testing),
    StdlibEntry::new("net/mail", "Mail message parsing", Network),
    StdlibEntry::new("net/netip", "Small IP address value type", Network),
    StdlibEntry::new("net/rpc", "Access to exported methods across a network", Network),
    StdlibEntry::new("net/smtp", "Simple Mail Transfer Protocol", Network),
    StdlibEntry::new("net/url", "URL parsing and query escaping", Network),
    StdlibEntry::new("os", "Platform-independent interface to operating system functionality", Utility),
    StdlibEntry::new("os/exec", "Running external commands", Utility),
    StdlibEntry::new("os/signal", "Access to incoming signals", Utility),
    StdlibEntry::new("os/user", "User account lookups", Utility),
    StdlibEntry::new("path", "Manipulating slash-separated paths", Utility),
    StdlibEntry::new("path/filepath", "Manipulating filename paths", Utility),
    StdlibEntry::new("plugin", "Loading Go plugins", Build),
    StdlibEntry::new("reflect", "Run-time reflection", Utility),
    StdlibEntry::new("regexp", "Regular expression search", Data),
    StdlibEntry::new("runtime", "Interaction with the Go runtime system", Build),
    StdlibEntry::new("runtime/debug", "Debugging facilities for programs", Testing),
    StdlibEntry::new("runtime/pprof", "Profiling data in pprof format", Testing),
    StdlibEntry::new("slices", "Generic functions for slices", Data),
    StdlibEntry::new("sort", "Sorting slices and user-defined collections", Data),
    StdlibEntry::new("strconv", "Conversions to and from string representations", Data),
    StdlibEntry::new("strings", "Functions to manipulate UTF-8 encoded strings", Data),
    StdlibEntry::new("sync", "Basic synchronization primitives", Utility),
    StdlibEntry::new("sync/atomic", "Low-level atomic memory primitives", Utility),
    StdlibEntry::new("syscall", "Interface to low-level operating system primitives", Utility),
    StdlibEntry::new("testing", "Support for automated testing of Go packages", Testing),
    StdlibEntry::new("testing/fstest", "Testing file system implementations", Testing),
    StdlibEntry::new("testing/quick", "Black box testing utilities", Testing),
    StdlibEntry::new("text/tabwriter", "Aligned text columns", Ui),
    StdlibEntry::new("text/template", "Data-driven templates for generating text", Ui),
    StdlibEntry::new("time", "Measuring and displaying time", Utility),
    StdlibEntry::new("unicode", "Data and functions to test Unicode code points", Data),
    StdlibEntry::new("unicode/utf8", "UTF-8 encoding and decoding", Data),
    StdlibEntry::new("unsafe", "Operations that step around Go's type safety", Build),
];

/// Go standard library; `net/http/cookiejar` is covered by `net/http`.
pub static GO_STDLIB: Lazy<StandardLibrary> =
    Lazy::new(|| StandardLibrary::new(GO_PACKAGES).with_separator("/"));
