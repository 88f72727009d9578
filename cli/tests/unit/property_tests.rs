//! Property-based tests for identifiers, HCL formatting and staging rules.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use pnc_harness::domain::module::{TfSource, declared_variables, should_stage};
use pnc_harness::domain::unique_id::{is_valid_unique_id, unique_id};
use pnc_harness::domain::{PncInputs, ProvisioningRequest, VarValue};
use proptest::prelude::*;

proptest! {
    /// Every generated identifier is six ASCII alphanumerics.
    #[test]
    fn prop_unique_id_is_well_formed(_seed in 0u32..200) {
        let id = unique_id();
        prop_assert!(is_valid_unique_id(&id), "bad id: {}", id);
    }

    /// A list renders as one bracketed, comma-separated HCL literal.
    #[test]
    fn prop_list_to_hcl_is_bracketed(items in proptest::collection::vec("[a-z0-9-]{1,12}", 0..6)) {
        let hcl = VarValue::List(items.clone()).to_hcl();
        prop_assert!(hcl.starts_with('['), "got: {}", hcl);
        prop_assert!(hcl.ends_with(']'), "got: {}", hcl);
        for item in &items {
            let quoted = format!("\"{item}\"");
            prop_assert!(hcl.contains(&quoted), "missing {} in {}", quoted, hcl);
        }
    }

    /// Quotes and backslashes inside list items are escaped.
    #[test]
    fn prop_list_items_are_escaped(item in r#"[a-z"\\]{1,10}"#) {
        let hcl = VarValue::List(vec![item.clone()]).to_hcl();
        let inner = &hcl[2..hcl.len() - 2];
        let unescaped = inner.replace("\\\"", "\"").replace("\\\\", "\\");
        prop_assert_eq!(unescaped, item);
    }

    /// Top-level strings pass through untouched.
    #[test]
    fn prop_string_to_hcl_is_raw(s in "[ -~]{0,40}") {
        prop_assert_eq!(VarValue::Str(s.clone()).to_hcl(), s);
    }

    /// Any name prefix made of ID characters yields a full request.
    #[test]
    fn prop_request_contains_every_input(prefix in "[0-9A-Za-z]{6}") {
        let request = ProvisioningRequest::new(&prefix, &PncInputs::default()).unwrap();
        prop_assert_eq!(request.len(), 14);
        prop_assert_eq!(request.to_var_args().len(), 28);
        let declared: BTreeSet<String> = request.names().map(str::to_string).collect();
        prop_assert!(request.ensure_declared(&declared).is_ok());
    }

    /// Nothing under a hidden directory is ever staged.
    #[test]
    fn prop_hidden_dirs_never_staged(dir in "\\.[a-z]{1,8}", file in "[a-z]{1,8}\\.tf") {
        let path: PathBuf = [dir.as_str(), file.as_str()].iter().collect();
        prop_assert!(!should_stage(&path, Path::new("plan.out")));
    }

    /// Plain `.tf` files at any depth are staged.
    #[test]
    fn prop_plain_tf_files_staged(parts in proptest::collection::vec("[a-z]{1,8}", 0..4), file in "[a-z]{1,8}\\.tf") {
        let mut path: PathBuf = parts.iter().collect();
        path.push(&file);
        prop_assert!(should_stage(&path, Path::new("plan.out")));
    }

    /// Declared names round-trip through the variable scanner.
    #[test]
    fn prop_declared_variables_finds_all(names in proptest::collection::btree_set("[a-z_][a-z0-9_]{0,15}", 1..8)) {
        let src: String = names
            .iter()
            .map(|n| format!("variable \"{n}\" {{\n  type = string\n}}\n"))
            .collect();
        let source = TfSource::new("variables.tf", src);
        prop_assert_eq!(declared_variables([&source]).ok(), Some(names));
    }
}
