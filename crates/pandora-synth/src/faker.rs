//! Seeded fake-data source for the synthetic builders.
//!
//! Everything is drawn from one [`StdRng`], so a builder run with the same
//! seed produces the same bytes.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::{Builder, Uuid};

/// Earliest fake timestamp; [`Faker::timestamp`] draws from the twelve years after it.
const EPOCH_YEAR: i32 = 2015;
const SPAN_SECS: i64 = 12 * 365 * 86_400;

const WORDS: &[&str] = &[
    "account", "action", "agenda", "alpha", "analysis", "annual", "archive", "asset", "audit",
    "balance", "baseline", "batch", "benefit", "board", "branch", "budget", "bulletin", "campaign",
    "capital", "catalog", "channel", "client", "cluster", "compliance", "contract", "core",
    "cost", "council", "customer", "cycle", "data", "deadline", "delta", "deployment", "design",
    "district", "draft", "estimate", "event", "facility", "field", "finance", "forecast",
    "framework", "fund", "goal", "grant", "growth", "guide", "harbor", "health", "incident",
    "index", "initiative", "inventory", "invoice", "journal", "ledger", "license", "logistics",
    "maintenance", "market", "meeting", "memo", "metric", "migration", "milestone", "network",
    "notice", "office", "operations", "order", "outline", "overview", "partner", "payroll",
    "pipeline", "plan", "policy", "portfolio", "procurement", "program", "project", "proposal",
    "quarter", "record", "region", "release", "report", "request", "research", "resource",
    "review", "risk", "roadmap", "roster", "safety", "schedule", "security", "server", "service",
    "shipment", "site", "staff", "standard", "status", "strategy", "summary", "supplier",
    "support", "survey", "system", "target", "task", "team", "template", "timeline", "training",
    "transfer", "update", "vendor", "vision", "warehouse", "workflow", "workshop",
];

const FIRST_NAMES: &[&str] = &[
    "Alex", "Blake", "Casey", "Dana", "Elliot", "Frankie", "Gray", "Harper", "Indra", "Jordan",
    "Kai", "Logan", "Morgan", "Noor", "Oakley", "Parker", "Quinn", "Riley", "Sasha", "Taylor",
    "Uma", "Val", "Wren", "Yuri", "Zion",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Baker", "Castillo", "Diaz", "Ellis", "Fischer", "Garcia", "Hughes", "Ito",
    "Jensen", "Khan", "Larsen", "Moreau", "Nakamura", "Okafor", "Patel", "Quintero", "Rossi",
    "Schmidt", "Thompson", "Ueda", "Vargas", "Walsh", "Young", "Zhang",
];

const STREETS: &[&str] = &[
    "Maple", "Oak", "Cedar", "Pine", "Elm", "Willow", "Lake", "Hill", "River", "Park", "Main",
    "Church", "Mill", "Market", "Station",
];

const STREET_KINDS: &[&str] = &["St", "Ave", "Rd", "Blvd", "Ln", "Way", "Ct"];

const CITIES: &[&str] = &[
    "Springfield", "Riverton", "Fairview", "Greenville", "Madison", "Clinton", "Franklin",
    "Georgetown", "Salem", "Arlington", "Ashland", "Milton",
];

const DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "corp.example"];

const ADJECTIVES: &[&str] = &[
    "adaptive", "balanced", "centralized", "distributed", "enhanced", "focused", "integrated",
    "modular", "optimized", "proactive", "reliable", "scalable", "streamlined", "unified",
    "versatile",
];

const NOUNS: &[&str] = &[
    "approach", "architecture", "capability", "database", "framework", "hierarchy", "initiative",
    "interface", "methodology", "model", "paradigm", "platform", "process", "solution",
    "toolset",
];

const VERBS: &[&str] = &[
    "aligns", "covers", "describes", "documents", "extends", "highlights", "improves", "outlines",
    "reviews", "summarizes", "supports", "tracks",
];

pub const FONTS: &[&str] = &[
    "Arial", "Helvetica", "Verdana", "Georgia", "Tahoma", "Trebuchet MS", "Times New Roman",
    "Courier New", "Segoe UI", "Calibri",
];

/// Deterministic fake-data generator.
#[derive(Debug, Clone)]
pub struct Faker {
    rng: StdRng,
}

impl Faker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn range(&mut self, low: usize, high_inclusive: usize) -> usize {
        self.rng.gen_range(low..=high_inclusive)
    }

    pub fn chance(&mut self, percent: u32) -> bool {
        self.rng.gen_range(0..100) < percent
    }

    fn pick(&mut self, list: &'static [&'static str]) -> &'static str {
        list.choose(&mut self.rng).copied().unwrap_or("data")
    }

    pub fn word(&mut self) -> &'static str {
        self.pick(WORDS)
    }

    pub fn words(&mut self, n: usize) -> Vec<&'static str> {
        (0..n).map(|_| self.word()).collect()
    }

    /// A capitalised sentence ending in a period.
    pub fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let n = self.range(min_words.max(1), max_words.max(min_words.max(1)));
        let body = self.words(n).join(" ");
        format!("{}.", capitalize(&body))
    }

    pub fn paragraph(&mut self, sentences: usize) -> String {
        (0..sentences.max(1))
            .map(|_| self.sentence(4, 12))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn title(&mut self) -> String {
        let n = self.range(2, 5);
        self.words(n)
            .into_iter()
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn catch_phrase(&mut self) -> String {
        let adjective = self.pick(ADJECTIVES);
        let noun = self.pick(NOUNS);
        let verb = self.pick(VERBS);
        let object = self.word();
        format!("{} {noun} {verb} the {object} {}", capitalize(adjective), self.word())
    }

    pub fn first_name(&mut self) -> &'static str {
        self.pick(FIRST_NAMES)
    }

    pub fn name(&mut self) -> String {
        format!("{} {}", self.first_name(), self.pick(LAST_NAMES))
    }

    pub fn email(&mut self) -> String {
        let first = self.first_name().to_ascii_lowercase();
        let last = self.pick(LAST_NAMES).to_ascii_lowercase();
        format!("{first}.{last}@{}", self.pick(DOMAINS))
    }

    pub fn address(&mut self) -> String {
        let number = self.range(10, 9999);
        let street = self.pick(STREETS);
        let kind = self.pick(STREET_KINDS);
        let city = self.pick(CITIES);
        let zip = self.range(10000, 99999);
        format!("{number} {street} {kind}, {city} {zip}")
    }

    pub fn password(&mut self) -> String {
        const CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#$%";
        (0..12)
            .map(|_| CHARS[self.rng.gen_range(0..CHARS.len())] as char)
            .collect()
    }

    /// A second-resolution timestamp between 2015 and 2027.
    pub fn timestamp(&mut self) -> NaiveDateTime {
        let epoch = NaiveDate::from_ymd_opt(EPOCH_YEAR, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        epoch + Duration::seconds(self.rng.gen_range(0..SPAN_SECS))
    }

    /// A `YYYY-MM-DD` date.
    pub fn date(&mut self) -> String {
        self.timestamp().date().format("%Y-%m-%d").to_string()
    }

    /// A random `#rrggbb` color.
    pub fn hex_color(&mut self) -> String {
        let [r, g, b] = self.rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn rgb(&mut self) -> [u8; 3] {
        [self.rng.gen(), self.rng.gen(), self.rng.gen()]
    }

    /// A v4 UUID string drawn from the seeded generator.
    pub fn uuid(&mut self) -> String {
        random_uuid(&mut self.rng).to_string()
    }

    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len];
        self.rng.fill(out.as_mut_slice());
        out
    }

    pub fn font(&mut self) -> &'static str {
        self.pick(FONTS)
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A v4 UUID from `rng` rather than the OS generator.
pub fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// A `word_word` name, optionally with an extension.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R, extension: &str) -> String {
    let a = WORDS.choose(rng).copied().unwrap_or("file");
    let b = WORDS.choose(rng).copied().unwrap_or("data");
    if extension.is_empty() {
        format!("{a}_{b}")
    } else {
        format!("{a}_{b}.{}", extension.trim_start_matches('.'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_output() {
        let mut a = Faker::new(42);
        let mut b = Faker::new(42);
        assert_eq!(a.paragraph(3), b.paragraph(3));
        assert_eq!(a.uuid(), b.uuid());
        assert_eq!(a.bytes(64), b.bytes(64));
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Faker::new(1);
        let mut b = Faker::new(2);
        assert_ne!(a.paragraph(5), b.paragraph(5));
    }

    #[test]
    fn uuid_has_v4_shape() {
        let id = Uuid::parse_str(&Faker::new(7).uuid()).unwrap();
        assert_eq!(id.get_version(), Some(uuid::Version::Random));
        assert_eq!(id.get_variant(), uuid::Variant::RFC4122);
    }

    #[test]
    fn dates_parse_and_stay_in_range() {
        let mut fake = Faker::new(11);
        for _ in 0..200 {
            let date = NaiveDate::parse_from_str(&fake.date(), "%Y-%m-%d").unwrap();
            assert!((2015..=2027).contains(&chrono::Datelike::year(&date)), "{date}");
        }
    }

    #[test]
    fn sentence_is_capitalised() {
        let s = Faker::new(3).sentence(3, 3);
        assert!(s.chars().next().unwrap().is_uppercase());
        assert!(s.ends_with('.'));
    }

    #[test]
    fn random_name_shape() {
        let mut rng = StdRng::seed_from_u64(9);
        let name = random_name(&mut rng, ".txt");
        assert!(name.ends_with(".txt"));
        assert_eq!(name.matches('_').count(), 1);
    }
}
