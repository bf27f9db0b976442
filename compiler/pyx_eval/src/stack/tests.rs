use super::Stack;
use pretty_assertions::assert_eq;

#[test]
fn test_push_pop_peek() {
    let mut stack = Stack::new();
    assert!(stack.is_empty());
    assert_eq!(stack.pop(), None::<i32>);
    stack.push(1);
    stack.push(2);
    assert_eq!(stack.peek(), Some(&2));
    assert_eq!(stack.size(), 2);
    assert_eq!(stack.pop(), Some(2));
    assert_eq!(stack.pop(), Some(1));
    assert_eq!(stack.peek(), None);
}

#[test]
fn test_clone_is_independent() {
    let mut original = Stack::new();
    original.push("a".to_string());
    let mut copy = original.clone();
    copy.push("b".to_string());
    assert_eq!(original.size(), 1);
    assert_eq!(copy.size(), 2);
    assert_eq!(original.pop(), Some("a".to_string()));
    assert_eq!(copy.iter().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_pop_n_keeps_order() {
    let mut stack = Stack::new();
    for i in 0..5 {
        stack.push(i);
    }
    assert_eq!(stack.pop_n(3), Some(vec![2, 3, 4]));
    assert_eq!(stack.pop_n(0), Some(vec![]));
    assert_eq!(stack.pop_n(3), None);
    assert_eq!(stack.size(), 2);
}
