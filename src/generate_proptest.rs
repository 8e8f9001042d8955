//! Property-based tests for resolution and assembly.
//!
//! These tests use proptest to generate component layouts and verify that
//! ordering and selection invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::environment::Environment;
    use crate::error::Error;
    use crate::generate::{generate_blocking, GenerateOptions};
    use crate::loader::Runtime;
    use crate::resolve::resolve;
    use proptest::prelude::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const EXTENSIONS: [&str; 4] = ["json", "yaml", "yml", "toml"];

    proptest! {
        /// Property: a file exporting K documents yields K manifests indexed 0..K
        #[test]
        fn indices_follow_sequence_order(count in 0usize..12) {
            let temp = TempDir::new().unwrap();
            let items: Vec<_> = (0..count).map(|n| json!({"n": n})).collect();
            fs::write(temp.path().join("list.json"), serde_json::to_string(&items).unwrap()).unwrap();

            let options = GenerateOptions::new(temp.path(), ["list"]);
            let result = generate_blocking(&options, &Runtime::builtin(), &Environment::new(temp.path()));

            if count == 0 {
                prop_assert!(matches!(result, Err(Error::NoManifests)));
            } else {
                let manifests = result.unwrap().manifests;
                prop_assert_eq!(manifests.len(), count);
                for (position, manifest) in manifests.iter().enumerate() {
                    prop_assert_eq!(manifest.index, position);
                    prop_assert_eq!(&manifest.data, &json!({"n": position}));
                }
            }
        }

        /// Property: a bare name resolves to the first existing extension only
        #[test]
        fn bare_name_picks_first_existing_extension(
            present in proptest::collection::vec(any::<bool>(), EXTENSIONS.len()),
            order in Just(EXTENSIONS.to_vec()).prop_shuffle(),
        ) {
            let temp = TempDir::new().unwrap();
            for (ext, exists) in EXTENSIONS.iter().zip(&present) {
                if *exists {
                    fs::write(temp.path().join(format!("app.{}", ext)), "").unwrap();
                }
            }

            let extensions: Vec<String> = order.iter().map(|e| e.to_string()).collect();
            let files = resolve(temp.path(), "app", &extensions).unwrap();

            let expected = order
                .iter()
                .find(|ext| {
                    let i = EXTENSIONS.iter().position(|e| e == *ext).unwrap();
                    present[i]
                })
                .map(|ext| temp.path().join(format!("app.{}", ext)));
            prop_assert_eq!(files.len(), expected.iter().count());
            prop_assert_eq!(files.first().cloned(), expected);
        }

        /// Property: manifests follow pattern order, not directory order
        #[test]
        fn manifests_follow_pattern_order(
            names in Just(vec!["a", "b", "c", "d"]).prop_shuffle(),
        ) {
            let temp = TempDir::new().unwrap();
            for name in ["a", "b", "c", "d"] {
                fs::write(temp.path().join(format!("{}.json", name)), format!(r#"{{"name": "{}"}}"#, name)).unwrap();
            }

            let options = GenerateOptions::new(temp.path(), names.clone());
            let result = generate_blocking(&options, &Runtime::builtin(), &Environment::new(temp.path())).unwrap();
            let produced: Vec<_> = result
                .manifests
                .iter()
                .map(|m| m.data["name"].as_str().unwrap().to_string())
                .collect();
            prop_assert_eq!(produced, names.iter().map(|n| n.to_string()).collect::<Vec<_>>());
        }
    }
}
