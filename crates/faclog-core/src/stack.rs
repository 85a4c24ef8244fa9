//! Call-stack capture and rendering
//!
//! Capture walks `std::backtrace::Backtrace` into [`StackFrame`]s; rendering is a
//! pure function over frames so it can be exercised without a live stack.
//!
//! Native frames carry no argument values, so captured frames render with an
//! empty argument list. Frames built by hand (or by an embedding runtime) can
//! supply arguments through [`Value`].

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt::{self, Write};

/// Path prefixes of frames that belong to the logging facility itself
const INTERNAL_PREFIXES: &[&str] = &["faclog_core::", "faclog_store::"];

/// Frames produced by the backtrace machinery itself
const BACKTRACE_PREFIXES: &[&str] = &["std::backtrace", "std::backtrace_rs", "backtrace::"];

/// Path of this module as it appears in symbol names
const STACK_MODULE: &str = "faclog_core::stack::";

/// A single argument value as seen by the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Text(String),
    Number(serde_json::Number),
    /// Aggregate or opaque value, already converted to text
    Other(String),
}

impl Value {
    /// Best-effort conversion of an arbitrary value; a failing `Debug` impl
    /// yields a `?` placeholder instead of an error.
    pub fn other<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        let mut repr = String::new();
        if write!(repr, "{:?}", value).is_err() {
            repr = "?".to_string();
        }
        Value::Other(repr)
    }

    fn render(&self) -> String {
        match self {
            Value::Other(repr) => format!("[{}]", repr),
            Value::Null => "NULL".to_string(),
            Value::Text(text) => format!("'{}'", text),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Number(n) => n.to_string(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Number(n) => Value::Number(n),
            aggregate @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::Other(aggregate.to_string())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::Other(n.to_string()))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One call-site in a captured stack
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StackFrame {
    pub function: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub args: Vec<Value>,
}

impl StackFrame {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    fn is_internal(&self) -> bool {
        let path = self.function.trim_start_matches('<');
        INTERNAL_PREFIXES.iter().any(|p| path.starts_with(p))
    }

    fn is_capture_machinery(&self) -> bool {
        let path = self.function.trim_start_matches('<');
        BACKTRACE_PREFIXES.iter().any(|p| path.starts_with(p))
    }

    fn is_stack_module(&self) -> bool {
        self.function.starts_with(STACK_MODULE)
    }

    fn is_entry(&self, entry: &str) -> bool {
        self.function
            .strip_prefix(STACK_MODULE)
            .is_some_and(|name| name == entry)
    }
}

/// Render frames most-recent first:
/// `#<i> <function>(<args>) called at [<file>:<line>]`
pub fn render_frames(frames: &[StackFrame]) -> String {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let args: Vec<String> = frame.args.iter().map(Value::render).collect();
            let line = frame
                .line
                .map(|l| l.to_string())
                .unwrap_or_else(|| "??".to_string());
            format!(
                "#{} {}({}) called at [{}:{}]",
                i,
                frame.function,
                args.join(", "),
                frame.file.as_deref().unwrap_or("Unknown"),
                line
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Capture the current stack, skipping the `frames_to_skip` innermost frames
///
/// Frame 0 is `capture_frames` itself, so a skip of 1 starts the result at
/// its caller and a skip of 2 at the caller's caller.
#[inline(never)]
pub fn capture_frames(frames_to_skip: usize) -> Vec<StackFrame> {
    frames_from("capture_frames", frames_to_skip)
}

/// Capture and render the current stack; frame 0 is `capture_stack` itself
#[inline(never)]
pub fn capture_stack(frames_to_skip: usize) -> String {
    render_frames(&frames_from("capture_stack", frames_to_skip))
}

/// Capture the stack starting at the first frame outside the logging facility
///
/// Everything up to the deepest facility frame (sinks, dispatcher, convenience
/// wrappers) is dropped, so the trace begins at whoever called the logger.
#[inline(never)]
pub fn capture_caller_stack() -> String {
    let frames = native_frames();
    let start = frames
        .iter()
        .rposition(StackFrame::is_internal)
        .map(|i| i + 1)
        .unwrap_or(0);
    render_frames(&frames[start..])
}

/// Frames starting `frames_to_skip` below the public `entry` frame
///
/// Without symbols for `entry` the first frame outside this module stands in
/// for frame 1.
fn frames_from(entry: &str, frames_to_skip: usize) -> Vec<StackFrame> {
    let frames = native_frames();
    let start = match frames.iter().position(|f| f.is_entry(entry)) {
        Some(index) => index + frames_to_skip,
        None => {
            let module = frames.iter().take_while(|f| f.is_stack_module()).count();
            module + frames_to_skip.saturating_sub(1)
        }
    };
    frames.into_iter().skip(start).collect()
}

fn native_frames() -> Vec<StackFrame> {
    let backtrace = Backtrace::force_capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }
    parse_backtrace(&backtrace.to_string())
        .into_iter()
        .skip_while(StackFrame::is_capture_machinery)
        .collect()
}

/// Parse the textual form of `std::backtrace::Backtrace`
///
/// Each frame is `N: symbol` optionally followed by `at file:line:col`;
/// inlined symbols appear as unnumbered lines and become frames of their own.
///
/// The backtrace reports where execution sits inside each function. A frame
/// is rendered with the place it was called from instead, which is the
/// position reported for the next frame out; the outermost frame has none.
fn parse_backtrace(text: &str) -> Vec<StackFrame> {
    let mut symbols: Vec<(String, Option<(String, Option<u32>)>)> = Vec::new();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(location) = line.strip_prefix("at ") {
            if let Some((_, position)) = symbols.last_mut() {
                *position = Some(parse_location(location));
            }
            continue;
        }
        match line.split_once(": ") {
            Some((index, symbol)) if index.chars().all(|c| c.is_ascii_digit()) => {
                symbols.push((symbol.trim().to_string(), None));
            }
            _ if !symbols.is_empty() => symbols.push((line.to_string(), None)),
            _ => {}
        }
    }

    let call_sites: Vec<_> = symbols
        .iter()
        .skip(1)
        .map(|(_, position)| position.clone())
        .chain(std::iter::once(None))
        .collect();

    symbols
        .into_iter()
        .zip(call_sites)
        .map(|((function, _), call_site)| {
            let mut frame = StackFrame::new(function);
            if let Some((file, line)) = call_site {
                frame.file = Some(file);
                frame.line = line;
            }
            frame
        })
        .collect()
}

fn parse_location(location: &str) -> (String, Option<u32>) {
    let is_num = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    let parts: Vec<&str> = location.rsplitn(3, ':').collect();
    match parts.as_slice() {
        [col, line, file] if is_num(col) && is_num(line) => (file.to_string(), line.parse().ok()),
        [line, tail, head] if is_num(line) => (format!("{}:{}", head, tail), line.parse().ok()),
        [line, file] if is_num(line) => (file.to_string(), line.parse().ok()),
        _ => (location.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_argument_rendering_rules() {
        let frame = StackFrame::new("handle")
            .at("src/app.rs", 12)
            .with_args(vec![
                Value::from(json!([1, 2])),
                Value::Null,
                Value::from("value"),
                Value::from(true),
                Value::from(false),
                Value::from(42_i64),
                Value::from(1.5_f64),
            ]);

        assert_eq!(
            render_frames(&[frame]),
            "#0 handle([[1,2]], NULL, 'value', TRUE, FALSE, 42, 1.5) called at [src/app.rs:12]"
        );
    }

    #[test]
    fn test_missing_location_placeholders() {
        let frames = vec![StackFrame::new("inner"), StackFrame::new("outer").at("main.rs", 3)];
        assert_eq!(
            render_frames(&frames),
            "#0 inner() called at [Unknown:??]\n#1 outer() called at [main.rs:3]"
        );
    }

    #[test]
    fn test_empty_stack_renders_empty() {
        assert_eq!(render_frames(&[]), "");
    }

    #[test]
    fn test_failing_debug_is_swallowed() {
        struct Broken;
        impl fmt::Debug for Broken {
            fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }
        assert_eq!(Value::other(&Broken), Value::Other("?".to_string()));
        assert_eq!(Value::other(&Broken).render(), "[?]");
    }

    #[test]
    fn test_parse_backtrace_text() {
        let text = "   0: std::backtrace::Backtrace::create
             at /rustc/abc/library/std/src/backtrace.rs:331:13
   1: faclog_core::stack::native_frames
             at ./src/stack.rs:10:5
   2: app::helper
             at ./src/main.rs:3:5
   3: app::main
             at ./src/main.rs:7:9
   4: <unknown>";
        let frames: Vec<StackFrame> = parse_backtrace(text)
            .into_iter()
            .skip_while(StackFrame::is_capture_machinery)
            .collect();

        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].function, "faclog_core::stack::native_frames");
        assert_eq!(frames[1].function, "app::helper");
        assert_eq!(frames[1].file.as_deref(), Some("./src/main.rs"));
        assert_eq!(frames[1].line, Some(7));
        assert_eq!(frames[2].function, "app::main");
        assert_eq!(frames[2].file, None);
        assert_eq!(frames[3].function, "<unknown>");
    }

    #[test]
    fn test_frames_report_their_call_site() {
        let text = "   0: app::inner
             at src/lib.rs:3:5
      app::outer
             at src/lib.rs:9:5
   1: app::main
             at src/main.rs:2:5";
        let frames = parse_backtrace(text);

        assert_eq!(
            render_frames(&frames),
            "#0 app::inner() called at [src/lib.rs:9]\n\
             #1 app::outer() called at [src/main.rs:2]\n\
             #2 app::main() called at [Unknown:??]"
        );
    }

    #[test]
    fn test_parse_location_variants() {
        assert_eq!(
            parse_location("/a/b.rs:10:2"),
            ("/a/b.rs".to_string(), Some(10))
        );
        assert_eq!(parse_location("b.rs:10"), ("b.rs".to_string(), Some(10)));
        assert_eq!(
            parse_location("C:\\src\\b.rs:10:2"),
            ("C:\\src\\b.rs".to_string(), Some(10))
        );
        assert_eq!(parse_location("nowhere"), ("nowhere".to_string(), None));
    }

    #[test]
    fn test_internal_frame_detection() {
        assert!(StackFrame::new("faclog_core::dispatcher::Logger::log").is_internal());
        assert!(StackFrame::new(
            "<faclog_store::sink::database::DatabaseSink as faclog_core::sink::LogSink>::write"
        )
        .is_internal());
        assert!(!StackFrame::new("billing::charge").is_internal());
    }

    #[test]
    fn test_entry_frame_detection() {
        let frame = StackFrame::new("faclog_core::stack::capture_stack");
        assert!(frame.is_stack_module());
        assert!(frame.is_entry("capture_stack"));
        assert!(!frame.is_entry("capture_frames"));
        assert!(!StackFrame::new("app::capture_stack").is_entry("capture_stack"));
    }

    #[test]
    fn test_capture_starts_at_capturer() {
        let frames = capture_frames(0);
        assert_eq!(frames[0].function, "faclog_core::stack::capture_frames");
        assert!(frames.iter().all(|f| !f.is_capture_machinery()));
    }
}
