use decaf_lexer::Lexer;
use insta::assert_yaml_snapshot;
use serde::Serialize;

#[derive(Serialize)]
struct TokenSnapshot {
    kind: String,
    text: String,
    span: (u32, u32),
}

fn tokenize_snapshot(source: &str) -> Vec<TokenSnapshot> {
    Lexer::tokenize(source)
        .0
        .into_iter()
        .map(|tok| TokenSnapshot {
            kind: format!("{:?}", tok.kind),
            text: tok.text,
            span: (tok.span.start, tok.span.end),
        })
        .collect()
}

#[test]
fn class_declaration() {
    assert_yaml_snapshot!(tokenize_snapshot(
        "class Animal {\n  int legs;\n  void speak() {}\n}"
    ));
}

#[test]
fn literals() {
    assert_yaml_snapshot!(tokenize_snapshot(
        r#"int x = 0x1F; double y = 3.14e2; string s = "hi"; bool b = true;"#
    ));
}

#[test]
fn control_flow() {
    assert_yaml_snapshot!(tokenize_snapshot(
        "if (x <= 10 && y != null) { break; } else { return; }"
    ));
}
