//! Call stack capture and frame filtering
//!
//! Capture is cheap (addresses only). Symbol resolution happens the first
//! time frames are requested and is cached, so a stack shared between an
//! error and its wrappers is resolved at most once.

use std::fmt;
use std::sync::{Arc, OnceLock};

use backtrace::{Backtrace, BacktraceSymbol};
use serde::Serialize;

/// Symbol prefixes that belong to the runtime, the capture machinery or this
/// crate's constructors rather than to the failure site.
const INTERNAL_PREFIXES: &[&str] = &[
    "backtrace::",
    "std::",
    "core::",
    "alloc::",
    "test::",
    "tokio::",
    "<std::",
    "<core::",
    "<alloc::",
    "<F as core::",
    "__rust",
    "__libc",
    "_start",
    "rust_begin_unwind",
    "devshare_error::core::stack::Stack::",
    "devshare_error::core::error::Error::",
];

/// One resolved call frame. Diagnostic only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub file: String,
    pub line: u32,
    pub function: String,
}

impl Frame {
    fn from_symbol(symbol: &BacktraceSymbol) -> Option<Self> {
        // `{:#}` drops the trailing symbol hash
        let name = format!("{:#}", symbol.name()?);
        if INTERNAL_PREFIXES.iter().any(|p| name.starts_with(p)) {
            return None;
        }

        Some(Self {
            file: symbol
                .filename()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            line: symbol.lineno().unwrap_or(0),
            function: shorten(&name),
        })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.function, self.file, self.line)
    }
}

/// Keep the owner and the function name, drop the module path.
fn shorten(name: &str) -> String {
    let segments: Vec<&str> = name.rsplitn(3, "::").collect();
    match segments.as_slice() {
        [last, owner, _] => format!("{owner}::{last}"),
        _ => name.to_string(),
    }
}

struct Inner {
    raw: Backtrace,
    resolved: OnceLock<Vec<Frame>>,
}

/// A captured call stack, shared by reference count.
///
/// Cloning a `Stack` never re-captures; wrappers hold the very same frames as
/// the value they wrap.
#[derive(Clone)]
pub struct Stack(Arc<Inner>);

impl Stack {
    #[inline(never)]
    pub(crate) fn capture() -> Self {
        Self(Arc::new(Inner {
            raw: Backtrace::new_unresolved(),
            resolved: OnceLock::new(),
        }))
    }

    /// Filtered frames, innermost first
    pub fn frames(&self) -> &[Frame] {
        self.0.resolved.get_or_init(|| {
            let mut bt = self.0.raw.clone();
            bt.resolve();
            bt.frames()
                .iter()
                .flat_map(backtrace::BacktraceFrame::symbols)
                .filter_map(Frame::from_symbol)
                .collect()
        })
    }

    /// Whether both handles refer to the same capture
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("frames", &self.0.resolved.get().map(Vec::len))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("devshare_storage::uow::Coordinator::begin"), "Coordinator::begin");
        assert_eq!(shorten("main"), "main");
        assert_eq!(shorten("a::b"), "a::b");
    }

    #[test]
    fn test_capture_filters_internal_frames() {
        let stack = Stack::capture();
        let frames = stack.frames();

        assert!(!frames.is_empty());
        for frame in frames {
            assert!(!frame.function.starts_with("backtrace::"));
            assert!(!frame.function.starts_with("std::"));
            assert!(!frame.function.contains("Stack::capture"));
        }
        assert!(
            frames
                .iter()
                .any(|f| f.function.contains("test_capture_filters_internal_frames"))
        );
    }

    #[test]
    fn test_clone_shares_capture() {
        let stack = Stack::capture();
        let copy = stack.clone();
        assert!(stack.ptr_eq(&copy));
        assert_eq!(stack.frames(), copy.frames());
        assert!(!stack.ptr_eq(&Stack::capture()));
    }
}
