//! # Unknown-Path Fallback
//!
//! What to do with a request that matched no payload, extension, prefix or
//! root. Mutating verbs get a plausible JSON acknowledgement and nothing is
//! generated or written. Every other verb is served as a type picked
//! uniformly at random from the eligible set.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::faker::random_name;
use crate::registry::{ContentRegistry, RegisteredType};

/// The HTTP verb, reduced to what the fallback cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Other,
}

impl Verb {
    pub fn from_method(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "HEAD" => Self::Head,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            _ => Self::Other,
        }
    }

    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Put | Self::Patch | Self::Delete)
    }
}

/// JSON body returned for mutating verbs on unknown paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub message: String,
}

impl Acknowledgement {
    fn new<R: Rng + ?Sized>(verb: Verb, rng: &mut R) -> Self {
        let resource = random_name(rng, "txt");
        let action = if verb == Verb::Delete {
            "deleted"
        } else {
            "updated"
        };
        Self {
            message: format!("Resource '{resource}' has been {action} successfully."),
        }
    }
}

#[derive(Debug)]
pub enum Fallback<'r> {
    Acknowledge(Acknowledgement),
    Delegate(&'r RegisteredType),
    /// Nothing is eligible.
    Nothing,
}

/// Pick uniformly from `eligible`.
pub fn choose_with<'r, R: Rng + ?Sized>(
    eligible: &[&'r RegisteredType],
    rng: &mut R,
) -> Option<&'r RegisteredType> {
    eligible.choose(rng).copied()
}

/// Decide how to answer an unknown path.
pub fn resolve_unknown<'r, R: Rng + ?Sized>(
    registry: &'r ContentRegistry,
    verb: Verb,
    rng: &mut R,
) -> Fallback<'r> {
    if verb.is_mutating() {
        return Fallback::Acknowledge(Acknowledgement::new(verb, rng));
    }
    match choose_with(&registry.eligible(), rng) {
        Some(entry) => Fallback::Delegate(entry),
        None => Fallback::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ChainSettings;
    use pandora_core::BodyKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn registry() -> ContentRegistry {
        ContentRegistry::builtin(&ChainSettings::default(), Vec::new()).unwrap()
    }

    #[test]
    fn verbs_parse_case_insensitively() {
        assert_eq!(Verb::from_method("delete"), Verb::Delete);
        assert_eq!(Verb::from_method("OPTIONS"), Verb::Other);
        assert!(Verb::Patch.is_mutating());
        assert!(!Verb::Post.is_mutating());
    }

    #[test]
    fn mutating_verbs_are_acknowledged() {
        let r = registry();
        let mut rng = StdRng::seed_from_u64(3);
        for (verb, action) in [
            (Verb::Put, "updated"),
            (Verb::Patch, "updated"),
            (Verb::Delete, "deleted"),
        ] {
            let Fallback::Acknowledge(ack) = resolve_unknown(&r, verb, &mut rng) else {
                panic!("{verb:?} was not acknowledged");
            };
            assert!(ack.message.starts_with("Resource '"), "{}", ack.message);
            assert!(ack.message.contains(".txt' has been"), "{}", ack.message);
            assert!(ack.message.ends_with(&format!("{action} successfully.")));
        }
    }

    #[test]
    fn read_verbs_delegate_to_an_eligible_type() {
        let r = registry();
        let mut rng = StdRng::seed_from_u64(9);
        for verb in [Verb::Get, Verb::Head, Verb::Post, Verb::Other] {
            match resolve_unknown(&r, verb, &mut rng) {
                Fallback::Delegate(entry) => assert!(entry.is_random_eligible()),
                other => panic!("{verb:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn selection_is_roughly_uniform() {
        let r = registry();
        let eligible = r.eligible();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<BodyKind, usize> = HashMap::new();
        let draws = 10_000;
        for _ in 0..draws {
            let picked = choose_with(&eligible, &mut rng).unwrap();
            *counts.entry(picked.kind()).or_default() += 1;
        }

        assert_eq!(counts.len(), eligible.len());
        assert!(!counts.contains_key(&BodyKind::Video));
        let expected = draws / eligible.len();
        for (kind, n) in counts {
            assert!(
                n > expected * 7 / 10 && n < expected * 13 / 10,
                "{kind} drawn {n} times, expected about {expected}"
            );
        }
    }

    #[test]
    fn empty_eligible_set_yields_nothing() {
        let r = ContentRegistry::new(Vec::new(), Vec::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(resolve_unknown(&r, Verb::Get, &mut rng), Fallback::Nothing));
    }
}
