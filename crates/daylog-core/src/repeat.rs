//! Weekday repeat patterns and their canonical string encoding.
//!
//! A template's recurrence is a set of weekdays persisted as a sorted,
//! comma-joined token string (`"fr,mo,th,tu,we"`). [`RepeatSet`] owns the
//! encode/decode rules plus the two derived views the UI needs: a compact
//! human label and the display buckets used to group the template list.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced when parsing a repeat encoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepeatError {
    /// A token outside the seven allowed weekday tokens.
    #[error("invalid repeat token: {0:?}")]
    InvalidToken(String),
}

/// Day of the week, identified by its two-letter form token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Monday (`mo`).
    Mo,
    /// Tuesday (`tu`).
    Tu,
    /// Wednesday (`we`).
    We,
    /// Thursday (`th`).
    Th,
    /// Friday (`fr`).
    Fr,
    /// Saturday (`sa`).
    Sa,
    /// Sunday (`su`).
    Su,
}

impl Weekday {
    /// All seven days in week order, Monday first.
    pub const ALL: [Self; 7] = [
        Self::Mo,
        Self::Tu,
        Self::We,
        Self::Th,
        Self::Fr,
        Self::Sa,
        Self::Su,
    ];

    /// Two-letter token used in the persisted encoding and in forms.
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Mo => "mo",
            Self::Tu => "tu",
            Self::We => "we",
            Self::Th => "th",
            Self::Fr => "fr",
            Self::Sa => "sa",
            Self::Su => "su",
        }
    }

    /// Parse a two-letter token. Returns `None` for anything else.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "mo" => Some(Self::Mo),
            "tu" => Some(Self::Tu),
            "we" => Some(Self::We),
            "th" => Some(Self::Th),
            "fr" => Some(Self::Fr),
            "sa" => Some(Self::Sa),
            "su" => Some(Self::Su),
            _ => None,
        }
    }

    /// The weekday a calendar date falls on.
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Mon => Self::Mo,
            chrono::Weekday::Tue => Self::Tu,
            chrono::Weekday::Wed => Self::We,
            chrono::Weekday::Thu => Self::Th,
            chrono::Weekday::Fri => Self::Fr,
            chrono::Weekday::Sat => Self::Sa,
            chrono::Weekday::Sun => Self::Su,
        }
    }

    /// Full English name, as used for bucket titles.
    pub fn full_name(self) -> &'static str {
        match self {
            Self::Mo => "Monday",
            Self::Tu => "Tuesday",
            Self::We => "Wednesday",
            Self::Th => "Thursday",
            Self::Fr => "Friday",
            Self::Sa => "Saturday",
            Self::Su => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// A set of weekdays a template repeats on.
///
/// Set semantics throughout: duplicates collapse, insertion order is
/// irrelevant. The canonical encoding sorts tokens lexicographically, so the
/// full week is always `"fr,mo,sa,su,th,tu,we"` and `encode` and `decode`
/// round-trip for every subset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepeatSet(BTreeSet<Weekday>);

impl RepeatSet {
    /// The empty repeat set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set repeating on every day of the week.
    pub fn full_week() -> Self {
        Weekday::ALL.into_iter().collect()
    }

    /// Add a day. Adding a day twice is a no-op.
    pub fn insert(&mut self, day: Weekday) {
        let _ = self.0.insert(day);
    }

    /// Whether the set contains `day`.
    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct days in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set covers all seven days.
    ///
    /// Membership is decided here by set contents, never by inspecting the
    /// encoded string.
    pub fn is_full_week(&self) -> bool {
        self.0.len() == Weekday::ALL.len()
    }

    /// Days in week order, Monday first.
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }

    /// Canonical encoding: tokens sorted lexicographically, comma-joined.
    ///
    /// The empty set encodes to the empty string.
    pub fn encode(&self) -> String {
        let mut tokens: Vec<&str> = self.0.iter().map(|day| day.as_token()).collect();
        tokens.sort_unstable();
        tokens.join(",")
    }

    /// Parse an encoding back into a set.
    ///
    /// The empty string decodes to the empty set. Token order and duplicates
    /// in the input are tolerated; the result is always canonical.
    pub fn decode(encoded: &str) -> Result<Self, RepeatError> {
        if encoded.is_empty() {
            return Ok(Self::new());
        }
        encoded
            .split(',')
            .map(|token| {
                Weekday::from_token(token)
                    .ok_or_else(|| RepeatError::InvalidToken(token.to_owned()))
            })
            .collect()
    }

    /// Compact human label for the set.
    ///
    /// Checked in order: full week, the five weekdays, the weekend; anything
    /// else falls back to listing each day token on its own.
    pub fn label(&self) -> RepeatLabel {
        const WEEKDAYS: [Weekday; 5] = [
            Weekday::Mo,
            Weekday::Tu,
            Weekday::We,
            Weekday::Th,
            Weekday::Fr,
        ];
        const WEEKEND: [Weekday; 2] = [Weekday::Sa, Weekday::Su];

        if self.is_full_week() {
            RepeatLabel::EveryDay
        } else if self.0.len() == WEEKDAYS.len() && WEEKDAYS.iter().all(|d| self.contains(*d)) {
            RepeatLabel::Weekdays
        } else if self.0.len() == WEEKEND.len() && WEEKEND.iter().all(|d| self.contains(*d)) {
            RepeatLabel::Weekend
        } else {
            // Canonical (token-sorted) order, matching the encoding.
            let mut days: Vec<Weekday> = self.0.iter().copied().collect();
            days.sort_unstable_by_key(|day| day.as_token());
            RepeatLabel::Days(days)
        }
    }

    /// Display buckets this set belongs to.
    ///
    /// A full-week set belongs to the Every Day bucket ONLY; the check
    /// short-circuits before the per-day membership test so such a set never
    /// also lands in Monday through Sunday. Any other set belongs to one
    /// bucket per member day.
    pub fn buckets(&self) -> Vec<Bucket> {
        if self.is_full_week() {
            return vec![Bucket::EveryDay];
        }
        self.days().map(Bucket::Day).collect()
    }
}

impl FromIterator<Weekday> for RepeatSet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for RepeatSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for RepeatSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::decode(&encoded).map_err(D::Error::custom)
    }
}

/// Human-readable rendering of a repeat set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RepeatLabel {
    /// All seven days.
    EveryDay,
    /// Monday through Friday.
    Weekdays,
    /// Saturday and Sunday.
    Weekend,
    /// No compact form; each day rendered standalone.
    Days(Vec<Weekday>),
}

impl RepeatLabel {
    /// Chip strings for the UI, one per rendered unit.
    pub fn chips(&self) -> Vec<String> {
        match self {
            Self::EveryDay => vec!["every day".to_owned()],
            Self::Weekdays => vec!["mo-fr".to_owned()],
            Self::Weekend => vec!["weekend".to_owned()],
            Self::Days(days) => days.iter().map(|day| day.as_token().to_owned()).collect(),
        }
    }
}

impl fmt::Display for RepeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.chips().join(", "))
    }
}

/// A display group in the template list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "day")]
pub enum Bucket {
    /// Templates repeating on all seven days.
    EveryDay,
    /// Templates repeating on this specific day.
    Day(Weekday),
}

impl Bucket {
    /// All buckets in display order: Every Day, then Monday through Sunday.
    pub fn all() -> [Self; 8] {
        [
            Self::EveryDay,
            Self::Day(Weekday::Mo),
            Self::Day(Weekday::Tu),
            Self::Day(Weekday::We),
            Self::Day(Weekday::Th),
            Self::Day(Weekday::Fr),
            Self::Day(Weekday::Sa),
            Self::Day(Weekday::Su),
        ]
    }

    /// Heading shown above the bucket.
    pub fn title(self) -> &'static str {
        match self {
            Self::EveryDay => "Every Day",
            Self::Day(day) => day.full_name(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn set(days: &[Weekday]) -> RepeatSet {
        days.iter().copied().collect()
    }

    // ── encode / decode ──────────────────────────────────────────────────

    #[test]
    fn encode_sorts_lexicographically() {
        let s = set(&[Weekday::We, Weekday::Mo]);
        assert_eq!(s.encode(), "mo,we");
    }

    #[test]
    fn encode_full_week() {
        assert_eq!(RepeatSet::full_week().encode(), "fr,mo,sa,su,th,tu,we");
    }

    #[test]
    fn encode_empty_set() {
        assert_eq!(RepeatSet::new().encode(), "");
    }

    #[test]
    fn encode_is_order_independent() {
        let a = set(&[Weekday::We, Weekday::Mo]);
        let b = set(&[Weekday::Mo, Weekday::We]);
        assert_eq!(a.encode(), b.encode());
    }

    #[test]
    fn decode_empty_string_is_empty_set() {
        let s = RepeatSet::decode("").unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn decode_collapses_duplicates() {
        let s = RepeatSet::decode("mo,mo,tu").unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.encode(), "mo,tu");
    }

    #[test]
    fn decode_tolerates_non_canonical_order() {
        let s = RepeatSet::decode("we,mo,fr").unwrap();
        assert_eq!(s.encode(), "fr,mo,we");
    }

    #[test]
    fn decode_rejects_unknown_token() {
        let err = RepeatSet::decode("mo,xx").unwrap_err();
        assert_eq!(err, RepeatError::InvalidToken("xx".to_owned()));
    }

    #[test]
    fn decode_rejects_blank_token_in_list() {
        // "mo," splits into ["mo", ""] and the empty token is not a day.
        assert!(RepeatSet::decode("mo,").is_err());
    }

    #[test]
    fn round_trip_all_subsets() {
        for bits in 0u8..128 {
            let days: Vec<Weekday> = Weekday::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| bits & (1 << i) != 0)
                .map(|(_, day)| day)
                .collect();
            let original = set(&days);
            let decoded = RepeatSet::decode(&original.encode()).unwrap();
            assert_eq!(decoded, original, "subset {bits:#09b} did not round-trip");
        }
    }

    // ── labels ───────────────────────────────────────────────────────────

    #[test]
    fn label_full_week() {
        assert_eq!(RepeatSet::full_week().label(), RepeatLabel::EveryDay);
        assert_eq!(RepeatSet::full_week().label().to_string(), "every day");
    }

    #[test]
    fn label_weekdays() {
        let s = RepeatSet::decode("fr,mo,th,tu,we").unwrap();
        assert_eq!(s.label(), RepeatLabel::Weekdays);
        assert_eq!(s.label().to_string(), "mo-fr");
    }

    #[test]
    fn label_weekend() {
        let s = set(&[Weekday::Sa, Weekday::Su]);
        assert_eq!(s.label(), RepeatLabel::Weekend);
        assert_eq!(s.label().to_string(), "weekend");
    }

    #[test]
    fn label_fallback_lists_each_day() {
        let s = set(&[Weekday::Mo, Weekday::We, Weekday::Fr]);
        // Canonical token order, not collapsed.
        assert_eq!(s.label().chips(), vec!["fr", "mo", "we"]);
    }

    #[test]
    fn label_six_days_is_not_every_day() {
        let s = RepeatSet::decode("fr,mo,sa,th,tu,we").unwrap();
        assert_eq!(s.label().chips().len(), 6);
    }

    #[test]
    fn label_weekdays_plus_saturday_falls_back() {
        let s = RepeatSet::decode("fr,mo,sa,th,tu,we").unwrap();
        assert!(matches!(s.label(), RepeatLabel::Days(_)));
    }

    #[test]
    fn label_empty_set_has_no_chips() {
        assert!(RepeatSet::new().label().chips().is_empty());
    }

    // ── buckets ──────────────────────────────────────────────────────────

    #[test]
    fn full_week_belongs_only_to_every_day_bucket() {
        assert_eq!(RepeatSet::full_week().buckets(), vec![Bucket::EveryDay]);
    }

    #[test]
    fn single_day_belongs_to_its_day_bucket_only() {
        let s = set(&[Weekday::Mo]);
        assert_eq!(s.buckets(), vec![Bucket::Day(Weekday::Mo)]);
    }

    #[test]
    fn multi_day_set_belongs_to_each_day_bucket() {
        let s = set(&[Weekday::Tu, Weekday::Sa]);
        assert_eq!(
            s.buckets(),
            vec![Bucket::Day(Weekday::Tu), Bucket::Day(Weekday::Sa)]
        );
    }

    #[test]
    fn six_days_do_not_collapse_to_every_day() {
        let s = RepeatSet::decode("fr,mo,sa,th,tu,we").unwrap();
        assert_eq!(s.buckets().len(), 6);
        assert!(!s.buckets().contains(&Bucket::EveryDay));
    }

    #[test]
    fn bucket_display_order() {
        let titles: Vec<&str> = Bucket::all().iter().map(|b| b.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Every Day",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday"
            ]
        );
    }

    // ── weekday ──────────────────────────────────────────────────────────

    #[test]
    fn token_round_trip() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_token(day.as_token()), Some(day));
        }
    }

    #[test]
    fn from_token_rejects_unknown() {
        assert_eq!(Weekday::from_token("monday"), None);
        assert_eq!(Weekday::from_token(""), None);
        assert_eq!(Weekday::from_token("MO"), None);
    }

    #[test]
    fn weekday_from_date() {
        // 2026-08-04 is a Tuesday.
        let date = NaiveDate::from_ymd_opt(2026, 8, 4).unwrap();
        assert_eq!(Weekday::from_date(date), Weekday::Tu);
        // 2026-08-09 is a Sunday.
        let date = NaiveDate::from_ymd_opt(2026, 8, 9).unwrap();
        assert_eq!(Weekday::from_date(date), Weekday::Su);
    }

    // ── serde ────────────────────────────────────────────────────────────

    #[test]
    fn serializes_as_canonical_string() {
        let s = set(&[Weekday::We, Weekday::Mo]);
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"mo,we\"");
    }

    #[test]
    fn deserializes_from_encoded_string() {
        let s: RepeatSet = serde_json::from_str("\"sa,su\"").unwrap();
        assert_eq!(s.label(), RepeatLabel::Weekend);
    }

    #[test]
    fn deserialize_rejects_bad_token() {
        let result: Result<RepeatSet, _> = serde_json::from_str("\"mo,nope\"");
        assert!(result.is_err());
    }
}
