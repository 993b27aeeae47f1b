#![cfg(windows)]

use uuid::Uuid;
use winreg::enums::HKEY_CURRENT_USER;
use winreg::RegKey;

use xiaohai_policy_core::model::{KeyBlock, SettingValue};
use xiaohai_policy_windows::apply::write_key_block;
use xiaohai_policy_windows::hive::temp_mount_name;
use xiaohai_policy_windows::verify::check_key_block;

fn sample_block() -> KeyBlock {
    let mut block = KeyBlock::new();
    block.insert("Greeting".to_string(), SettingValue::Sz("Hello".to_string()));
    block.insert("Count".to_string(), SettingValue::Dword(42));
    block
}

fn check(key: &RegKey, block: &KeyBlock) -> (Vec<String>, Vec<xiaohai_policy_core::report::ValueMismatch>) {
    let mut matched = Vec::new();
    let mut mismatches = Vec::new();
    check_key_block(key, "Software\\Test", block, &mut |_| {}, &mut matched, &mut mismatches);
    (matched, mismatches)
}

#[test]
fn apply_then_check_round_trips() {
    let (key_path, _guard) = create_test_key();
    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let (key, _disp) = hkcu.create_subkey(&key_path).expect("create subkey");

    let block = sample_block();
    write_key_block(&key, &block).expect("write block");

    let (matched, mismatches) = check(&key, &block);
    assert_eq!(matched.len(), 2);
    assert!(mismatches.is_empty());
}

#[test]
fn applying_twice_is_idempotent() {
    let (key_path, _guard) = create_test_key();
    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let (key, _disp) = hkcu.create_subkey(&key_path).expect("create subkey");

    let block = sample_block();
    write_key_block(&key, &block).expect("first write");
    write_key_block(&key, &block).expect("second write");

    let (matched, mismatches) = check(&key, &block);
    assert_eq!(matched.len(), 2);
    assert!(mismatches.is_empty());
    assert_eq!(key.enum_values().count(), 2);
}

#[test]
fn mutated_value_is_reported_as_exactly_one_mismatch() {
    let (key_path, _guard) = create_test_key();
    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let (key, _disp) = hkcu.create_subkey(&key_path).expect("create subkey");

    let block = sample_block();
    write_key_block(&key, &block).expect("write block");
    key.set_value("Count", &43u32).expect("mutate value");

    let (matched, mismatches) = check(&key, &block);
    assert_eq!(matched, vec!["Software\\Test\\Greeting".to_string()]);
    assert_eq!(mismatches.len(), 1);
    let m = &mismatches[0];
    assert_eq!(m.value_name.as_deref(), Some("Count"));
    assert_eq!(m.expected.as_deref(), Some("REG_DWORD:42"));
    assert!(m.found.as_deref().unwrap().contains("43"));
}

#[test]
fn same_value_with_different_stored_type_mismatches() {
    let (key_path, _guard) = create_test_key();
    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let (key, _disp) = hkcu.create_subkey(&key_path).expect("create subkey");

    // 期望 DWORD:42，但实际存成了字符串 "42"：值相同、类型不同，必须不一致。
    key.set_value("Count", &"42").expect("set sz");
    let mut block = KeyBlock::new();
    block.insert("Count".to_string(), SettingValue::Dword(42));

    let (matched, mismatches) = check(&key, &block);
    assert!(matched.is_empty());
    assert_eq!(mismatches.len(), 1);
}

#[test]
fn missing_value_is_a_mismatch_with_no_found_repr() {
    let (key_path, _guard) = create_test_key();
    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let (key, _disp) = hkcu.create_subkey(&key_path).expect("create subkey");

    let mut block = KeyBlock::new();
    block.insert("Absent".to_string(), SettingValue::Sz("x".to_string()));

    let (matched, mismatches) = check(&key, &block);
    assert!(matched.is_empty());
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].found, None);
}

#[test]
fn temp_mount_names_are_unique_per_operation() {
    let a = temp_mount_name();
    let b = temp_mount_name();
    assert_ne!(a, b);
    assert!(a.starts_with("XiaoHaiPolicy_"));
}

fn create_test_key() -> (String, CleanupKey) {
    let path = format!("Software\\XiaoHaiPolicyTest\\{}", Uuid::new_v4());
    (path.clone(), CleanupKey(path))
}

struct CleanupKey(String);

impl Drop for CleanupKey {
    fn drop(&mut self) {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let _ = hkcu.delete_subkey_all(&self.0);
    }
}
