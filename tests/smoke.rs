//! Integration smoke tests for `credit_checker`

use credit_checker::get_version;

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}
