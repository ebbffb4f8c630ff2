use recoll_render::{Binding, RenderError};

// ── Valid expressions ────────────────────────────────────────────

#[test]
fn simple_binding() {
    let b = Binding::parse("todo in todos").unwrap();
    assert_eq!(b.alias(), "todo");
    assert_eq!(b.collection(), "todos");
}

#[test]
fn surrounding_and_inner_whitespace_is_trimmed() {
    let b = Binding::parse("  todo \t in\n  todos  ").unwrap();
    assert_eq!(b.alias(), "todo");
    assert_eq!(b.collection(), "todos");
}

#[test]
fn in_inside_words_is_not_a_separator() {
    let b = Binding::parse("ingredient in inventory").unwrap();
    assert_eq!(b.alias(), "ingredient");
    assert_eq!(b.collection(), "inventory");
}

#[test]
fn splits_at_first_standalone_in() {
    let b = Binding::parse("item in lists in order").unwrap();
    assert_eq!(b.alias(), "item");
    assert_eq!(b.collection(), "lists in order");
}

#[test]
fn alias_may_itself_be_in() {
    let b = Binding::parse("in in items").unwrap();
    assert_eq!(b.alias(), "in");
    assert_eq!(b.collection(), "items");
}

#[test]
fn from_str_and_display() {
    let b: Binding = "row in rows".parse().unwrap();
    assert_eq!(b.to_string(), "row in rows");
}

// ── Malformed expressions ────────────────────────────────────────

fn reason(expression: &str) -> &'static str {
    match Binding::parse(expression).unwrap_err() {
        RenderError::BindingSyntax { reason, .. } => reason,
    }
}

#[test]
fn missing_in_is_rejected() {
    assert_eq!(reason("todos"), "expected `<alias> in <collection>`");
    assert_eq!(reason(""), "expected `<alias> in <collection>`");
}

#[test]
fn missing_alias_is_rejected() {
    assert_eq!(reason("in todos"), "expected `<alias> in <collection>`");
}

#[test]
fn missing_collection_is_rejected() {
    assert_eq!(reason("todo in"), "expected `<alias> in <collection>`");
    assert_eq!(reason("todo in    "), "expected `<alias> in <collection>`");
}

#[test]
fn multi_word_alias_is_rejected() {
    assert_eq!(reason("my todo in todos"), "alias must be a single name");
}

#[test]
fn error_keeps_expression() {
    let err = Binding::parse("nope").unwrap_err();
    assert_eq!(
        err,
        RenderError::BindingSyntax {
            expression: "nope".into(),
            reason: "expected `<alias> in <collection>`",
        }
    );
    assert!(err.to_string().contains("\"nope\""));
}
