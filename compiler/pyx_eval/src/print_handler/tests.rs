use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_buffer_captures_lines() {
    let handler = buffer_handler();
    handler.println("hello");
    handler.println("");
    handler.println("world");
    assert_eq!(handler.get_output(), "hello\n\nworld\n");
    handler.clear();
    assert_eq!(handler.get_output(), "");
}

#[test]
fn test_silent_discards() {
    let handler = silent_handler();
    handler.println("dropped");
    assert_eq!(handler.get_output(), "");
}
