//! # Decoy Error Responses
//!
//! Real sites are not perfectly available. A small share of reads of the
//! site root or of unknown paths are answered with a redirect or a 404
//! instead of content. A redirect points back at the requested URL with
//! every UUID in it replaced by a fresh one, so a crawler following links
//! keeps finding "new" resources.
//!
//! Typed routes, payloads and mutating verbs are never affected.

use std::sync::OnceLock;

use rand::Rng;
use regex::{Captures, Regex};

use crate::faker::random_uuid;

/// Lowercase hyphenated UUIDs, as they appear in generated links.
const UUID_PATTERN: &str = "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

/// How often eligible reads are answered without content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoyErrors {
    /// Percent of eligible reads answered with a redirect or a 404.
    pub percent: u8,
    /// Percent of those answered with a 302 rather than a 404.
    pub redirect_percent: u8,
}

/// The non-200 answer chosen for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoyError {
    /// 302 to the given location.
    Redirect(String),
    NotFound,
}

impl Default for DecoyErrors {
    fn default() -> Self {
        Self {
            percent: 5,
            redirect_percent: 50,
        }
    }
}

impl DecoyErrors {
    pub const fn disabled() -> Self {
        Self {
            percent: 0,
            redirect_percent: 0,
        }
    }

    /// Decide whether this request gets a decoy error. `url` is the request
    /// target, query included.
    pub fn roll<R: Rng + ?Sized>(&self, url: &str, rng: &mut R) -> Option<DecoyError> {
        if rng.gen_range(0..100u8) >= self.percent {
            return None;
        }
        if rng.gen_range(0..100u8) < self.redirect_percent {
            Some(DecoyError::Redirect(refresh_uuids(url, rng)))
        } else {
            Some(DecoyError::NotFound)
        }
    }
}

/// `url` with each UUID replaced by a new random one.
pub fn refresh_uuids<R: Rng + ?Sized>(url: &str, rng: &mut R) -> String {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(pattern) = PATTERN.get_or_init(|| Regex::new(UUID_PATTERN).ok()) else {
        return url.to_string();
    };
    pattern
        .replace_all(url, |_: &Captures<'_>| random_uuid(rng).to_string())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const LINK: &str = "/css/3f2a1b4c-5d6e-4f70-8a9b-0c1d2e3f4a5b/main.css?v=1";

    #[test]
    fn disabled_never_fires() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1_000 {
            assert_eq!(DecoyErrors::disabled().roll("/", &mut rng), None);
        }
    }

    #[test]
    fn always_on_splits_between_redirect_and_not_found() {
        let policy = DecoyErrors {
            percent: 100,
            redirect_percent: 50,
        };
        let mut rng = StdRng::seed_from_u64(2);
        let (mut redirects, mut missing) = (0, 0);
        for _ in 0..1_000 {
            match policy.roll(LINK, &mut rng) {
                Some(DecoyError::Redirect(_)) => redirects += 1,
                Some(DecoyError::NotFound) => missing += 1,
                None => panic!("a 100% policy let a request through"),
            }
        }
        assert!(redirects > 350 && missing > 350, "{redirects} / {missing}");
    }

    #[test]
    fn default_rate_is_about_five_percent() {
        let policy = DecoyErrors::default();
        let mut rng = StdRng::seed_from_u64(3);
        let fired = (0..10_000)
            .filter(|_| policy.roll("/", &mut rng).is_some())
            .count();
        assert!((350..=650).contains(&fired), "{fired}");
    }

    #[test]
    fn redirects_get_fresh_uuids() {
        let mut rng = StdRng::seed_from_u64(4);
        let a = refresh_uuids(LINK, &mut rng);
        let b = refresh_uuids(LINK, &mut rng);
        assert_ne!(a, LINK);
        assert_ne!(a, b);
        assert!(a.starts_with("/css/") && a.ends_with("/main.css?v=1"), "{a}");
        assert_eq!(a.len(), LINK.len());
    }

    #[test]
    fn every_uuid_is_replaced() {
        let url = format!("/a/{0}/b/{0}", "00000000-0000-4000-8000-000000000000");
        let out = refresh_uuids(&url, &mut StdRng::seed_from_u64(5));
        assert!(!out.contains("00000000-0000-4000-8000-000000000000"), "{out}");
        let parts: Vec<&str> = out.split('/').collect();
        assert_ne!(parts[2], parts[4]);
    }

    #[test]
    fn urls_without_uuids_are_unchanged() {
        let mut rng = StdRng::seed_from_u64(6);
        assert_eq!(refresh_uuids("/index.html?q=1", &mut rng), "/index.html?q=1");
    }
}
