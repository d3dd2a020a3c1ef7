//! Alias reconciliation.

use cmdkit_core::FlagSpec;
use tracing::debug;

use crate::error::DispatchError;
use crate::flagset::FlagSet;

/// Makes every alias of a multi-name flag carry the same value.
///
/// When exactly one alias of a declaration was given, its value is copied to
/// the other aliases, which then also report as set. When none was given
/// they all already hold the shared default. Giving two aliases of the same
/// flag is an [`DispatchError::AliasConflict`].
///
/// Only the per-invocation `set` is written; `specs` stay untouched.
///
/// # Examples
///
/// ```
/// use cmdkit::{FlagSet, normalize_flags};
/// use cmdkit_core::{FlagSpec, FlagValue};
///
/// let specs = [FlagSpec::string("output, o")];
/// let mut set = FlagSet::from_specs("build", &specs).unwrap();
/// set.parse(["-o", "dist"]);
///
/// normalize_flags(&specs, &mut set).unwrap();
/// assert_eq!(set.lookup("output"), Some(&FlagValue::String("dist".into())));
/// assert!(set.is_set("output"));
/// ```
pub fn normalize_flags(specs: &[FlagSpec], set: &mut FlagSet) -> Result<(), DispatchError> {
    for spec in specs {
        let names = spec.names();
        if names.len() < 2 {
            continue;
        }

        let mut given: Option<&str> = None;
        for &name in &names {
            if !set.is_set(name) {
                continue;
            }
            if let Some(first) = given {
                return Err(DispatchError::AliasConflict {
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }
            given = Some(name);
        }

        let Some(source) = given else {
            continue;
        };
        let Some(value) = set.lookup(source).cloned() else {
            continue;
        };
        for &name in names.iter().filter(|&&name| name != source) {
            set.set(name, &value)?;
        }
        debug!(flag = spec.canonical_name(), from = source, value = %value, "Propagated alias value");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use cmdkit_core::FlagValue;

    use super::*;

    #[test]
    fn test_conflicting_aliases_are_rejected() {
        let specs = [FlagSpec::string("verbose, v")];
        let mut set = FlagSet::from_specs("t", &specs).unwrap();
        set.parse(["-v=a", "-verbose=b"]);

        let err = normalize_flags(&specs, &mut set).unwrap_err();
        match err {
            DispatchError::AliasConflict { first, second } => {
                assert_eq!(first, "verbose");
                assert_eq!(second, "v");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_untouched_aliases_keep_default() {
        let specs = [FlagSpec::int("jobs, j").with_default(4), FlagSpec::bool("q")];
        let mut set = FlagSet::from_specs("t", &specs).unwrap();
        set.parse(["-q"]);

        normalize_flags(&specs, &mut set).unwrap();
        assert_eq!(set.lookup("j"), Some(&FlagValue::Int(4)));
        assert!(!set.is_set("jobs"));
        assert!(!set.is_set("j"));
    }

    #[test]
    fn test_list_value_propagates_whole() {
        let specs = [FlagSpec::string_list("tag, t, label")];
        let mut set = FlagSet::from_specs("t", &specs).unwrap();
        set.parse(["-t=a", "-t=b"]);

        normalize_flags(&specs, &mut set).unwrap();
        let expected = FlagValue::from(vec!["a", "b"]);
        assert_eq!(set.lookup("tag"), Some(&expected));
        assert_eq!(set.lookup("label"), Some(&expected));
    }

    #[test]
    fn test_declarations_are_not_mutated() {
        let specs = [FlagSpec::string("mode, m").with_default("fast")];
        let before = specs.clone();
        let mut set = FlagSet::from_specs("t", &specs).unwrap();
        set.parse(["-m=slow"]);
        normalize_flags(&specs, &mut set).unwrap();

        assert_eq!(specs, before);
        assert_eq!(
            FlagSet::from_specs("t", &specs).unwrap().lookup("mode"),
            Some(&FlagValue::String("fast".into()))
        );
    }
}
