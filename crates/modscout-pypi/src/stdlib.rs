//! CPython standard-library modules.

use modscout_core::{Category, StandardLibrary, StdlibEntry};
use once_cell::sync::Lazy;

use Category::{Build, Data, Network, Testing, Ui, Utility};

static PYTHON_MODULES: &[StdlibEntry] = &[
    StdlibEntry::new("__future__", "Future statement definitions", Build),
    StdlibEntry::new("_thread", "Low-level threading API", Utility),
    StdlibEntry::new("abc", "Abstract base classes", Utility),
    StdlibEntry::new("argparse", "Command-line option and argument parsing", Utility),
    StdlibEntry::new("array", "Efficient arrays of numeric values", Data),
    StdlibEntry::new("ast", "Abstract syntax trees", Build),
    StdlibEntry::new("asyncio", "Asynchronous I/O, event loop and coroutines", Network),
    StdlibEntry::new("atexit", "Exit handlers", Utility),
    StdlibEntry::new("base64", "Base16, Base32, Base64 and Base85 data encodings", Data),
    StdlibEntry::new("bdb", "Debugger framework", Testing),
    StdlibEntry::new("binascii", "Conversion between binary and ASCII", Data),
    StdlibEntry::new("bisect", "Array bisection algorithm", Utility),
    StdlibEntry::new("builtins", "Built-in objects", Utility),
    StdlibEntry::new("bz2", "Support for bzip2 compression", Data),
    StdlibEntry::new("calendar", "General calendar-related functions", Utility),
    StdlibEntry::new("cmath", "Mathematical functions for complex numbers", Data),
    StdlibEntry::new("cmd", "Support for line-oriented command interpreters", Ui),
    StdlibEntry::new("code", "Interpreter base classes", Build),
    StdlibEntry::new("codecs", "Codec registry and base classes", Data),
    StdlibEntry::new("codeop", "Compile Python code", Build),
    StdlibEntry::new("collections", "Container datatypes", Data),
    StdlibEntry::new("collections.abc", "Abstract base classes for containers", Data),
    StdlibEntry::new("colorsys", "Conversions between color systems", Ui),
    StdlibEntry::new("compileall", "Byte-compile Python libraries", Build),
    StdlibEntry::new("concurrent", "Concurrent execution package", Utility),
    StdlibEntry::new("concurrent.futures", "Launching parallel tasks", Utility),
    StdlibEntry::new("configparser", "Configuration file parser", Data),
    StdlibEntry::new("contextlib", "Utilities for with-statement contexts", Utility),
    StdlibEntry::new("contextvars", "Context variables", Utility),
    StdlibEntry::new("copy", "Shallow and deep copy operations", Utility),
    StdlibEntry::new("copyreg", "Register pickle support functions", Data),
    StdlibEntry::new("cProfile", "Deterministic profiler", Testing),
    StdlibEntry::new("csv", "CSV file reading and writing", Data),
    StdlibEntry::new("ctypes", "A foreign function library for Python", Build),
    StdlibEntry::new("curses", "Terminal handling for character-cell displays", Ui),
    StdlibEntry::new("dataclasses", "Data classes", Data),
    StdlibEntry::new("datetime", "Basic date and time types", Utility),
    StdlibEntry::new("dbm", "Interfaces to Unix databases", Data),
    StdlibEntry::new("decimal", "Decimal fixed-point and floating-point arithmetic", Data),
    StdlibEntry::new("difflib", "Helpers for computing deltas", Utility),
    StdlibEntry::new("dis", "Disassembler for Python bytecode", Build),
    StdlibEntry::new("doctest", "Test interactive Python examples", Testing),
    StdlibEntry::new("email", "An email and MIME handling package", Network),
    StdlibEntry::new("encodings", "Standard encodings package", Data),
    StdlibEntry::new("ensurepip", "Bootstrapping the pip installer", Build),
    StdlibEntry::new("enum", "Support for enumerations", Utility),
    StdlibEntry::new("errno", "Standard errno system symbols", Utility),
    StdlibEntry::new("faulthandler", "Dump the Python traceback", Testing),
    StdlibEntry::new("fcntl", "The fcntl and ioctl system calls", Utility),
    StdlibEntry::new("filecmp", "File and directory comparisons", Utility),
    StdlibEntry::new("fileinput", "Iterate over lines from multiple input streams", Utility),
    StdlibEntry::new("fnmatch", "Unix filename pattern matching", Utility),
    StdlibEntry::new("fractions", "Rational numbers", Data),
    StdlibEntry::new("ftplib", "FTP protocol client", Network),
    StdlibEntry::new("functools", "Higher-order functions and operations on callable objects", Utility),
    StdlibEntry::new("gc", "Garbage collector interface", Utility),
    StdlibEntry::new("getopt", "C-style parser for command line options", Utility),
    StdlibEntry::new("getpass", "Portable password input", Ui),
    StdlibEntry::new("gettext", "Multilingual internationalization services", Utility),
    StdlibEntry::new("glob", "Unix style pathname pattern expansion", Utility),
    StdlibEntry::new("graphlib", "Operate with graph-like structures", Data),
    StdlibEntry::new("grp", "The group database", Utility),
    StdlibEntry::new("gzip", "Support for gzip files", Data),
    StdlibEntry::new("hashlib", "Secure hashes and message digests", Utility),
    StdlibEntry::new("heapq", "Heap queue algorithm", Data),
    StdlibEntry::new("hmac", "Keyed-hashing for message authentication", Utility),
    StdlibEntry::new("html", "HyperText Markup Language support", Ui),
    StdlibEntry::new("html.parser", "Simple HTML and XHTML parser", Ui),
    StdlibEntry::new("http", "HTTP modules", Network),
    StdlibEntry::new("http.client", "HTTP protocol client", Network),
    StdlibEntry::new("http.cookies", "HTTP state management", Network),
    StdlibEntry::new("http.server", "HTTP servers", Network),
    StdlibEntry::new("idlelib", "IDLE implementation", Ui),
    StdlibEntry::new("imaplib", "IMAP4 protocol client", Network),
    StdlibEntry::new("importlib", "The implementation of import", Build),
    StdlibEntry::new("importlib.metadata", "Accessing package metadata", Build),
    StdlibEntry::new("importlib.resources", "Package resource reading", Build),
    StdlibEntry::new("inspect", "Inspect live objects", Utility),
    StdlibEntry::new("io", "Core tools for working with streams", Utility),
    StdlibEntry::new("ipaddress", "IPv4/IPv6 manipulation library", Network),
    StdlibEntry::new("itertools", "Functions creating iterators for efficient looping", Utility),
    StdlibEntry::new("json", "JSON encoder and decoder", Data),
    StdlibEntry::new("keyword", "Testing for Python keywords", Build),
    StdlibEntry::new("linecache", "Random access to text lines", Utility),
    StdlibEntry::new("locale", "Internationalization services", Utility),
    StdlibEntry::new("logging", "Logging facility for Python", Utility),
    StdlibEntry::new("logging.config", "Logging configuration", Utility),
    StdlibEntry::new("logging.handlers", "Logging handlers", Utility),
    StdlibEntry::new("lzma", "Compression using the LZMA algorithm", Data),
    StdlibEntry::new("mailbox", "Manipulate mailboxes in various formats", Network),
    StdlibEntry::new("marshal", "Internal Python object serialization", Data),
    StdlibEntry::new("math", "Mathematical functions", Data),
    StdlibEntry::new("mimetypes", "Map filenames to MIME types", Network),
    StdlibEntry::new("mmap", "Memory-mapped file support", Utility),
    StdlibEntry::new("modulefinder", "Find modules used by a script", Build),
    StdlibEntry::new("multiprocessing", "Process-based parallelism", Utility),
    StdlibEntry::new("netrc", "netrc file processing", Network),
    StdlibEntry::new("numbers", "Numeric abstract base classes", Data),
    StdlibEntry::new("operator", "Standard operators as functions", Utility),
    StdlibEntry::new("os", "Miscellaneous operating system interfaces", Utility),
    StdlibEntry::new("os.path", "Common pathname manipulations", Utility),
    StdlibEntry::new("pathlib", "Object-oriented filesystem paths", Utility),
    StdlibEntry::new("pdb", "The Python debugger", Testing),
    StdlibEntry::new("pickle", "Python object serialization", Data),
    StdlibEntry::new("pickletools", "Tools for pickle developers", Data),
    StdlibEntry::new("pkgutil", "Package extension utility", Build),
    StdlibEntry::new("platform", "Access to underlying platform's identifying data", Utility),
    StdlibEntry::new("plistlib", "Generate and parse Apple .plist files", Data),
    StdlibEntry::new("poplib", "POP3 protocol client", Network),
    StdlibEntry::new("posix", "The most common POSIX system calls", Utility),
    StdlibEntry::new("pprint", "Data pretty printer", Ui),
    StdlibEntry::new("profile", "Pure Python profiler", Testing),
    StdlibEntry::new("pstats", "Statistics for profilers", Testing),
    StdlibEntry::new("pty", "Pseudo-terminal utilities", Ui),
    StdlibEntry::new("pwd", "The password database", Utility),
    StdlibEntry::new("py_compile", "Compile Python source files", Build),
    StdlibEntry::new("pyclbr", "Python module browser support", Build),
    StdlibEntry::new("pydoc", "Documentation generator and online help system", Build),
    StdlibEntry::new("queue", "A synchronized queue class", Utility),
    StdlibEntry::new("quopri", "Encode and decode MIME quoted-printable data", Data),
    StdlibEntry::new("random", "Generate pseudo-random numbers", Data),
    StdlibEntry::new("re", "Regular expression operations", Utility),
    StdlibEntry::new("readline", "GNU readline interface", Ui),
    StdlibEntry::new("reprlib", "Alternate repr() implementation", Utility),
    StdlibEntry::new("resource", "Resource usage information", Utility),
    StdlibEntry::new("rlcompleter", "Completion function for GNU readline", Ui),
    StdlibEntry::new("runpy", "Locating and executing Python modules", Build),
    StdlibEntry::new("sched", "Event scheduler", Utility),
    StdlibEntry::new("secrets", "Generate secure random numbers for managing secrets", Utility),
    StdlibEntry::new("select", "Waiting for I/O completion", Network),
    StdlibEntry::new("selectors", "High-level I/O multiplexing", Network),
    StdlibEntry::new("shelve", "Python object persistence", Data),
    StdlibEntry::new("shlex", "Simple lexical analysis", Utility),
    StdlibEntry::new("shutil", "High-level file operations", Utility),
    StdlibEntry::new("signal", "Set handlers for asynchronous events", Utility),
    StdlibEntry::new("site", "Site-specific configuration hook", Build),
    StdlibEntry::new("smtplib", "SMTP protocol client", Network),
    StdlibEntry::new("socket", "Low-level networking interface", Network),
    StdlibEntry::new("socketserver", "A framework for network servers", Network),
    StdlibEntry::new("sqlite3", "DB-API 2.0 interface for SQLite databases", Data),
    StdlibEntry::new("ssl", "TLS/SSL wrapper for socket objects", Network),
    StdlibEntry::new("stat", "Interpreting stat() results", Utility),
    StdlibEntry::new("statistics", "Mathematical statistics functions", Data),
    StdlibEntry::new("string", "Common string operations", Utility),
    StdlibEntry::new("stringprep", "Internet string preparation", Network),
    StdlibEntry::new("struct", "Interpret bytes as packed binary data", Data),
    StdlibEntry::new("subprocess", "Subprocess management", Utility),
    StdlibEntry::new("symtable", "Access to the compiler's symbol tables", Build),
    StdlibEntry::new("sys", "System-specific parameters and functions", Utility),
    StdlibEntry::new("sysconfig", "Provide access to Python's configuration information", Build),
    StdlibEntry::new("syslog", "Unix syslog library routines", Utility),
    StdlibEntry::new("tabnanny", "Detection of ambiguous indentation", Build),
    StdlibEntry::new("tarfile", "Read and write tar archive files", Data),
    StdlibEntry::new("tempfile", "Generate temporary files and directories", Utility),
    StdlibEntry::new("termios", "POSIX style tty control", Ui),
    StdlibEntry::new("textwrap", "Text wrapping and filling", Utility),
    StdlibEntry::new("threading", "Thread-based parallelism", Utility),
    StdlibEntry::new("time", "Time access and conversions", Utility),
    StdlibEntry::new("timeit", "Measure execution time of small code snippets", Testing),
    StdlibEntry::new("tkinter", "Python interface to Tcl/Tk GUI toolkit", Ui),
    StdlibEntry::new("token", "Constants used with Python parse trees", Build),
    StdlibEntry::new("tokenize", "Tokenizer for Python source", Build),
    StdlibEntry::new("tomllib", "Parse TOML files", Data),
    StdlibEntry::new("trace", "Trace or track Python statement execution", Testing),
    StdlibEntry::new("traceback", "Print or retrieve a stack traceback", Utility),
    StdlibEntry::new("tracemalloc", "Trace memory allocations", Testing),
    StdlibEntry::new("tty", "Terminal control functions", Ui),
    StdlibEntry::new("turtle", "Turtle graphics", Ui),
    StdlibEntry::new("types", "Dynamic type creation and names for built-in types", Utility),
    StdlibEntry::new("typing", "Support for type hints", Utility),
    StdlibEntry::new("unicodedata", "Unicode database", Data),
    StdlibEntry::new("unittest", "Unit testing framework", Testing),
    StdlibEntry::new("unittest.mock", "Mock object library", Testing),
    StdlibEntry::new("urllib", "URL handling modules", Network),
    StdlibEntry::new("urllib.parse", "Parse URLs into components", Network),
    StdlibEntry::new("urllib.request", "Extensible library for opening URLs", Network),
    StdlibEntry::new("uuid", "UUID objects according to RFC 4122", Data),
    StdlibEntry::new("venv", "Creation of virtual environments", Build),
    StdlibEntry::new("warnings", "Warning control", Utility),
    StdlibEntry::new("wave", "Read and write WAV files", Data),
    StdlibEntry::new("weakref", "Weak references", Utility),
    StdlibEntry::new("webbrowser", "Convenient web-browser controller", Ui),
    StdlibEntry::new("winreg", "Windows registry access", Utility),
    StdlibEntry::new("wsgiref", "WSGI utilities and reference implementation", Network),
    StdlibEntry::new("xml", "XML processing modules", Data),
    StdlibEntry::new("xml.dom", "The Document Object Model API", Data),
    StdlibEntry::new("xml.etree.ElementTree", "The ElementTree XML API", Data),
    StdlibEntry::new("xml.sax", "Support for SAX2 parsers", Data),
    StdlibEntry::new("xmlrpc", "XMLRPC server and client modules", Network),
    StdlibEntry::new("zipapp", "Manage executable Python zip archives", Build),
    StdlibEntry::new("zipfile", "Work with ZIP archives", Data),
    StdlibEntry::new("zipimport", "Import modules from Zip archives", Build),
    StdlibEntry::new("zlib", "Compression compatible with gzip", Data),
    StdlibEntry::new("zoneinfo", "IANA time zone support", Utility),
];

/// CPython standard library; dotted submodules of a listed module count too.
pub static PYTHON_STDLIB: Lazy<StandardLibrary> =
    Lazy::new(|| StandardLibrary::new(PYTHON_MODULES).with_separator("."));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdlib_modules() {
        assert!(PYTHON_STDLIB.len() > 180);
        for name in ["os", "sys", "json", "asyncio", "typing", "unittest", "tomllib"] {
            assert!(PYTHON_STDLIB.is_standard_library(name), "{name}");
        }
    }

    #[test]
    fn test_dotted_prefix() {
        assert!(PYTHON_STDLIB.is_standard_library("os.path"));
        assert!(PYTHON_STDLIB.is_standard_library("email.mime.text"));
        assert!(PYTHON_STDLIB.is_standard_library("concurrent.futures.thread"));
    }

    #[test]
    fn test_third_party_rejected() {
        for name in ["requests", "numpy", "django", "ossaudio", "jsonschema"] {
            assert!(!PYTHON_STDLIB.is_standard_library(name), "{name}");
        }
    }

    #[test]
    fn test_most_specific_description() {
        let info = PYTHON_STDLIB.describe("unittest.mock").unwrap();
        assert_eq!(info.category, Category::Testing);
        assert!(info.description.contains("Mock"));
    }
}
