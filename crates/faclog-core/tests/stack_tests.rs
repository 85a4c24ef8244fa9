#![allow(clippy::unwrap_used, clippy::expect_used)]

use faclog_core::stack::{capture_frames, capture_stack};
use faclog_core::StackFrame;

#[inline(never)]
fn frames_via_helper(frames_to_skip: usize) -> Vec<StackFrame> {
    capture_frames(frames_to_skip)
}

#[inline(never)]
fn trace_via_helper(frames_to_skip: usize) -> String {
    capture_stack(frames_to_skip)
}

#[test]
fn test_skip_zero_keeps_capturer_frame() {
    let frames = frames_via_helper(0);

    assert_eq!(frames[0].function, "faclog_core::stack::capture_frames");
    assert_eq!(frames[1].function, "stack_tests::frames_via_helper");
}

#[test]
fn test_skip_one_starts_at_caller() {
    let frames = frames_via_helper(1);

    assert_eq!(frames[0].function, "stack_tests::frames_via_helper");
    assert_eq!(
        frames[1].function,
        "stack_tests::test_skip_one_starts_at_caller"
    );
}

#[test]
fn test_skip_two_drops_capturer_and_caller() {
    let frames = frames_via_helper(2);

    assert_eq!(
        frames[0].function,
        "stack_tests::test_skip_two_drops_capturer_and_caller"
    );
}

#[test]
fn test_frame_location_is_call_site() {
    let (frames, call_line) = (frames_via_helper(1), line!());

    assert_eq!(frames[0].line, Some(call_line));
    assert!(frames[0].file.as_deref().unwrap().ends_with("stack_tests.rs"));
}

#[test]
fn test_rendered_trace_names_call_line() {
    let (trace, call_line) = (trace_via_helper(1), line!());
    let first = trace.lines().next().unwrap();

    assert!(
        first.starts_with("#0 stack_tests::trace_via_helper() called at ["),
        "unexpected trace: {}",
        trace
    );
    assert!(
        first.ends_with(&format!("stack_tests.rs:{}]", call_line)),
        "unexpected trace: {}",
        trace
    );
}
