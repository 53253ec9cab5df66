use std::fs;

use density_expr::{LowerOpts, compile_str};

#[test]
fn fixtures_lower_to_expected_json() {
    let mut checked = 0;
    for entry in fs::read_dir("tests/data/density").unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|s| s.to_str()) != Some("expr") {
            continue;
        }
        let src = fs::read_to_string(&path).unwrap();
        let expected: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path.with_extension("json")).unwrap())
                .unwrap();

        let value = compile_str(&src, &LowerOpts::default())
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            expected,
            "{}",
            path.display()
        );
        checked += 1;
    }
    assert!(checked >= 5, "only {checked} fixtures found");
}
