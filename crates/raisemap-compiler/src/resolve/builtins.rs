//! Builtin name tables.
//!
//! The last stop of name resolution: names that exist without any import.

const BUILTIN_EXCEPTIONS: &[&str] = &[
    "ArithmeticError", "AssertionError", "AttributeError", "BaseException", "BaseExceptionGroup",
    "BlockingIOError", "BrokenPipeError", "BufferError", "ChildProcessError", "ConnectionAbortedError",
    "ConnectionError", "ConnectionRefusedError", "ConnectionResetError", "EOFError", "Exception",
    "ExceptionGroup", "FileExistsError", "FileNotFoundError", "FloatingPointError", "GeneratorExit",
    "ImportError", "IndentationError", "IndexError", "InterruptedError", "IsADirectoryError",
    "KeyError", "KeyboardInterrupt", "LookupError", "MemoryError", "ModuleNotFoundError",
    "NameError", "NotADirectoryError", "NotImplementedError", "OSError", "OverflowError",
    "PermissionError", "ProcessLookupError", "RecursionError", "ReferenceError", "RuntimeError",
    "StopAsyncIteration", "StopIteration", "SyntaxError", "SystemError", "SystemExit",
    "TimeoutError", "TypeError", "UnboundLocalError", "UnicodeDecodeError", "UnicodeEncodeError",
    "UnicodeError", "ValueError", "ZeroDivisionError",
];

const BUILTIN_CALLABLES: &[&str] = &[
    "abs", "all", "any", "bool", "bytes", "callable", "dict", "enumerate", "filter", "float",
    "format", "frozenset", "getattr", "hasattr", "id", "int", "isinstance", "issubclass", "iter",
    "len", "list", "map", "max", "min", "next", "object", "open", "print", "range", "repr",
    "reversed", "round", "set", "setattr", "sorted", "str", "sum", "super", "tuple", "type",
    "vars", "zip",
];

/// Whether `name` is a builtin exception class.
pub fn is_builtin_exception(name: &str) -> bool {
    BUILTIN_EXCEPTIONS.contains(&name)
}

/// Whether `name` exists in the builtin namespace at all.
pub fn is_builtin(name: &str) -> bool {
    is_builtin_exception(name) || BUILTIN_CALLABLES.contains(&name)
}
