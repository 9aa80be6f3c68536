//! Property-based tests for branch-name derivation.

use proptest::prelude::*;

use easy_merge::naming::RefNameSanitizer;

proptest! {
    /// A derived name never contains anything git forbids in a ref
    /// component.
    #[test]
    fn output_has_no_forbidden_patterns(input in ".{1,80}") {
        let sanitizer = RefNameSanitizer::new();
        if let Ok(name) = sanitizer.sanitize(&input) {
            prop_assert!(!name.contains(' '));
            prop_assert!(!name.contains('\t'));
            prop_assert!(!name.contains('\n'));
            prop_assert!(!name.contains(".."));
            prop_assert!(!name.contains('^'));
            prop_assert!(!name.contains('~'));
            prop_assert!(!name.contains(':'));
            prop_assert!(!name.contains('?'));
            prop_assert!(!name.contains('*'));
            prop_assert!(!name.contains('['));
            prop_assert!(!name.contains('\\'));
            prop_assert!(!name.contains("@{"), "name contains @{{: {:?}", name);
            prop_assert!(!name.starts_with('/'));
            prop_assert!(!name.ends_with('/'));
            prop_assert!(!name.contains("//"));
            prop_assert!(!name.starts_with('.'));
            prop_assert!(!name.ends_with('.'));
            prop_assert!(name != "@");
        }
    }

    /// Sanitizing is stable: a second pass changes nothing.
    #[test]
    fn sanitizing_twice_is_identity(input in ".{1,80}") {
        let sanitizer = RefNameSanitizer::new();
        if let Ok(once) = sanitizer.sanitize(&input) {
            let twice = sanitizer.sanitize(&once).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    /// Names that are already valid pass through untouched.
    #[test]
    fn plain_names_pass_through(input in "[a-z][a-z0-9-]{0,40}") {
        let sanitizer = RefNameSanitizer::new();
        prop_assert_eq!(sanitizer.sanitize(&input).unwrap(), input);
    }

    /// Non-empty input always yields a non-empty name: rewrites
    /// substitute, they never delete.
    #[test]
    fn non_empty_input_yields_a_name(input in ".{1,80}") {
        let sanitizer = RefNameSanitizer::new();
        prop_assert!(!sanitizer.sanitize(&input).unwrap().is_empty());
    }
}
