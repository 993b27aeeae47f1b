use xiaohai_policy_core::model::{PolicySet, SettingValue};
use xiaohai_policy_core::parse::{parse_policy_text, ParseError};

fn parse_ok(text: &str) -> PolicySet {
    parse_policy_text(text).unwrap_or_else(|e| panic!("parse failed: {e}"))
}

#[test]
fn parses_minimal_user_block() {
    let set = parse_ok("User\nSoftware\\Test\nGreeting\nSZ:Hello\n");
    assert_eq!(set.keys.len(), 1);
    assert_eq!(
        set.keys["Software\\Test"]["Greeting"],
        SettingValue::Sz("Hello".to_string())
    );
}

#[test]
fn key_paths_reflect_key_path_lines_only() {
    let text = "\
; comment at top
Computer
HKLM\\Software\\Policies\\A
Enabled
DWORD:1

User
Software\\Policies\\B
Name
SZ:value
";
    let set = parse_ok(text);
    let paths: Vec<&str> = set.keys.keys().map(String::as_str).collect();
    assert_eq!(
        paths,
        vec!["HKLM\\Software\\Policies\\A", "Software\\Policies\\B"]
    );
    assert_eq!(
        set.keys["HKLM\\Software\\Policies\\A"]["Enabled"],
        SettingValue::Dword(1)
    );
}

#[test]
fn comment_and_blank_lines_are_dropped_before_structure() {
    let text = "\
User

; key path follows
Software\\Test
; pair follows
Greeting

SZ:Hello
";
    let set = parse_ok(text);
    assert_eq!(
        set.keys["Software\\Test"]["Greeting"],
        SettingValue::Sz("Hello".to_string())
    );
}

#[test]
fn delete_all_values_and_create_key_directives_are_skipped() {
    let text = "\
User
Software\\Test
*
DELETEALLVALUES
Greeting
SZ:Hello
*
CREATEKEY
";
    let set = parse_ok(text);
    let block = &set.keys["Software\\Test"];
    assert_eq!(block.len(), 1);
    assert!(!block.contains_key("*"));
}

#[test]
fn data_line_without_colon_is_silently_skipped() {
    let text = "\
User
Software\\Test
Broken
NOCOLONHERE
Greeting
SZ:Hello
";
    let set = parse_ok(text);
    let block = &set.keys["Software\\Test"];
    assert_eq!(block.len(), 1);
    assert!(block.contains_key("Greeting"));
}

#[test]
fn type_tags_normalize_case_insensitively() {
    let text = "\
User
Software\\Test
A
dword:1
B
REG_DWORD:2
C
DWORD:3
D
REG_BINARY:abc
";
    let set = parse_ok(text);
    let block = &set.keys["Software\\Test"];
    assert_eq!(block["A"], SettingValue::Dword(1));
    assert_eq!(block["B"], SettingValue::Dword(2));
    assert_eq!(block["C"], SettingValue::Dword(3));
    // 未识别标签回退为字符串，字面值原样保留。
    assert_eq!(block["D"], SettingValue::Sz("abc".to_string()));
}

#[test]
fn repeated_key_paths_merge_and_later_values_override() {
    let text = "\
User
Software\\Test
Greeting
SZ:old
Computer
Software\\Test
Greeting
SZ:new
Extra
DWORD:7
";
    let set = parse_ok(text);
    assert_eq!(set.keys.len(), 1);
    let block = &set.keys["Software\\Test"];
    assert_eq!(block["Greeting"], SettingValue::Sz("new".to_string()));
    assert_eq!(block["Extra"], SettingValue::Dword(7));
}

#[test]
fn bad_dword_literal_is_a_parse_error() {
    let err = parse_policy_text("User\nSoftware\\Test\nCount\nDWORD:abc\n").unwrap_err();
    match err {
        ParseError::BadInteger { line, text } => {
            assert_eq!(line, 4);
            assert_eq!(text, "abc");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scope_marker_at_end_of_file_is_a_parse_error() {
    let err = parse_policy_text("User\nSoftware\\Test\nGreeting\nSZ:Hello\nComputer\n").unwrap_err();
    assert!(matches!(err, ParseError::MissingKeyPath { .. }));
}

#[test]
fn stray_lines_outside_blocks_are_ignored() {
    let text = "\
garbage before any marker
User
Software\\Test
Greeting
SZ:Hello
trailing-unpaired-name
";
    let set = parse_ok(text);
    assert_eq!(set.keys.len(), 1);
    assert_eq!(set.keys["Software\\Test"].len(), 1);
}

#[test]
fn value_literal_keeps_embedded_colons() {
    let set = parse_ok("User\nSoftware\\Test\nUrl\nSZ:https://example.invalid:8443\n");
    assert_eq!(
        set.keys["Software\\Test"]["Url"],
        SettingValue::Sz("https://example.invalid:8443".to_string())
    );
}

#[test]
fn empty_text_parses_to_empty_set() {
    assert!(parse_ok("").is_empty());
    assert!(parse_ok("; only comments\n\n").is_empty());
}
