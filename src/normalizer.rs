//! Team name normalization: exact alias lookup first, then fuzzy matching
//! against the alias table.

use crate::config::NormalizerConfig;
use crate::constants::DEFAULT_SIMILARITY_THRESHOLD;
use crate::types::{ScrapingResult, TicketEvent};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

static SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:fc|cf|ud|club|de fútbol|de futbol)\b").expect("suffix pattern is valid")
});

// Standalone "vs"/"v" with an optional dot, with or without surrounding spaces
static VS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bvs?\b\.?").expect("vs pattern is valid"));

/// Built-in alias table: lowercase variant -> canonical display name
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    // Real Madrid
    ("real madrid", "Real Madrid"),
    ("real madrid cf", "Real Madrid"),
    ("real madrid club de fútbol", "Real Madrid"),
    ("rm", "Real Madrid"),
    ("madrid", "Real Madrid"),
    // Barcelona
    ("barcelona", "Barcelona"),
    ("fc barcelona", "Barcelona"),
    ("barça", "Barcelona"),
    ("barca", "Barcelona"),
    ("fcb", "Barcelona"),
    // Atlético Madrid
    ("atletico madrid", "Atlético Madrid"),
    ("atletico de madrid", "Atlético Madrid"),
    ("atleti", "Atlético Madrid"),
    ("atm", "Atlético Madrid"),
    // Manchester United
    ("manchester united", "Manchester United"),
    ("man utd", "Manchester United"),
    ("manchester utd", "Manchester United"),
    ("man u", "Manchester United"),
    ("manchester united fc", "Manchester United"),
    // Liverpool
    ("liverpool", "Liverpool"),
    ("liverpool fc", "Liverpool"),
    ("lfc", "Liverpool"),
    // Juventus
    ("juventus", "Juventus"),
    ("juventus fc", "Juventus"),
    ("juve", "Juventus"),
    // La Liga
    ("villarreal", "Villarreal"),
    ("villarreal cf", "Villarreal"),
    ("getafe", "Getafe"),
    ("getafe cf", "Getafe"),
    ("valencia", "Valencia"),
    ("valencia cf", "Valencia"),
    ("sevilla", "Sevilla"),
    ("sevilla fc", "Sevilla"),
    ("athletic bilbao", "Athletic Bilbao"),
    ("athletic club", "Athletic Bilbao"),
    ("real betis", "Real Betis"),
    ("real sociedad", "Real Sociedad"),
    ("rayo vallecano", "Rayo Vallecano"),
    ("elche", "Elche"),
    ("elche cf", "Elche"),
    ("girona", "Girona"),
    ("girona fc", "Girona"),
    ("celta de vigo", "Celta de Vigo"),
    ("celta vigo", "Celta de Vigo"),
    ("rc celta de vigo", "Celta de Vigo"),
    ("deportivo alaves", "Deportivo Alavés"),
    ("alaves", "Deportivo Alavés"),
    ("ca osasuna", "CA Osasuna"),
    ("osasuna", "CA Osasuna"),
    ("levante ud", "Levante UD"),
    ("levante", "Levante UD"),
    ("mallorca", "Mallorca"),
    ("rcd mallorca", "Mallorca"),
    ("rcd espanyol", "RCD Espanyol"),
    ("espanyol", "RCD Espanyol"),
    ("oviedo", "Oviedo"),
    ("real oviedo", "Oviedo"),
    // Champions League
    ("manchester city", "Manchester City"),
    ("manchester city fc", "Manchester City"),
    ("man city", "Manchester City"),
    ("as monaco", "AS Monaco"),
    ("monaco", "AS Monaco"),
    ("sl benfica", "SL Benfica"),
    ("benfica", "SL Benfica"),
    ("olympiacos fc", "Olympiacos FC"),
    ("olympiacos", "Olympiacos FC"),
    ("kairat almaty", "Kairat Almaty"),
    ("kairat almaty fc", "Kairat Almaty"),
];

/// Lowercase, drop club suffix tokens and collapse whitespace.
pub fn clean_team_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let stripped = SUFFIX_RE.replace_all(&lowered, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-case the first letter of every word, leaving the rest untouched.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if at_word_start && ch.is_alphabetic() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !ch.is_alphanumeric();
    }
    out
}

/// Read-only mapping from cleaned alias to canonical team name.
///
/// Keys go through [`clean_team_name`] on insertion so they compare equal to
/// cleaned lookups. Iteration order is the sorted key order, which is what
/// breaks ties between equally similar aliases.
#[derive(Debug, Clone)]
pub struct TeamAliases {
    aliases: BTreeMap<String, String>,
}

impl Default for TeamAliases {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_ALIASES.iter().copied())
    }
}

impl TeamAliases {
    pub fn from_pairs<A, C>(pairs: impl IntoIterator<Item = (A, C)>) -> Self
    where
        A: AsRef<str>,
        C: Into<String>,
    {
        let mut aliases = BTreeMap::new();
        for (alias, canonical) in pairs {
            let key = clean_team_name(alias.as_ref());
            if !key.is_empty() {
                aliases.insert(key, canonical.into());
            }
        }
        Self { aliases }
    }

    /// Built-in table plus extra aliases; extras win on conflicts.
    pub fn with_extra(extra: &BTreeMap<String, String>) -> Self {
        let mut table = Self::default();
        for (alias, canonical) in extra {
            let key = clean_team_name(alias);
            if !key.is_empty() {
                table.aliases.insert(key, canonical.clone());
            }
        }
        table
    }

    pub fn get(&self, cleaned: &str) -> Option<&str> {
        self.aliases.get(cleaned).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Best of normalized Levenshtein, Jaro and Jaro-Winkler, in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let levenshtein = strsim::normalized_levenshtein(a, b);
    let jaro = strsim::jaro(a, b);
    let jaro_winkler = strsim::jaro_winkler(a, b);
    levenshtein.max(jaro).max(jaro_winkler)
}

#[derive(Debug, Clone)]
pub struct TeamNameNormalizer {
    aliases: Arc<TeamAliases>,
    similarity_threshold: f64,
}

impl Default for TeamNameNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(TeamAliases::default()), DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl TeamNameNormalizer {
    pub fn new(aliases: Arc<TeamAliases>, similarity_threshold: f64) -> Self {
        Self { aliases, similarity_threshold }
    }

    /// Built-in aliases plus the configured extras
    pub fn from_config(config: &NormalizerConfig) -> Self {
        Self::new(
            Arc::new(TeamAliases::with_extra(&config.aliases)),
            config.similarity_threshold,
        )
    }

    pub fn aliases(&self) -> &TeamAliases {
        &self.aliases
    }

    /// Map a team name to its canonical form, falling back to the title-cased input.
    pub fn normalize_team_name(&self, raw: &str) -> String {
        let cleaned = clean_team_name(raw);

        if let Some(canonical) = self.aliases.get(&cleaned) {
            return canonical.to_string();
        }

        if let Some(canonical) = self.find_best_similar_team(&cleaned) {
            return canonical.to_string();
        }

        title_case(raw.trim())
    }

    /// Highest scoring alias at or above the threshold. Strict comparison
    /// keeps the first alias in sorted order on ties.
    fn find_best_similar_team(&self, cleaned: &str) -> Option<&str> {
        if cleaned.is_empty() || self.aliases.is_empty() {
            return None;
        }

        let mut best: Option<(&str, &str, f64)> = None;
        for (alias, canonical) in self.aliases.iter() {
            let score = similarity(cleaned, alias);
            if score < self.similarity_threshold {
                continue;
            }
            if best.map_or(true, |(_, _, best_score)| score > best_score) {
                best = Some((alias, canonical, score));
            }
        }

        best.map(|(alias, canonical, score)| {
            debug!(input = cleaned, alias, canonical, similarity = score, "Fuzzy matched team name");
            canonical
        })
    }

    /// Normalize both sides of an "A vs B" string. Anything that does not
    /// split into exactly two teams is returned unchanged.
    pub fn normalize_event_name(&self, event_name: &str) -> String {
        let parts: Vec<&str> = VS_RE.split(event_name.trim()).collect();
        if parts.len() != 2 {
            return event_name.to_string();
        }

        let (home, away) = (parts[0].trim(), parts[1].trim());
        if home.is_empty() || away.is_empty() {
            return event_name.to_string();
        }

        format!(
            "{} vs {}",
            self.normalize_team_name(home),
            self.normalize_team_name(away)
        )
    }

    pub fn normalize_event(&self, event: &TicketEvent) -> TicketEvent {
        TicketEvent {
            date_time: event.date_time.split_whitespace().collect::<Vec<_>>().join(" "),
            event: self.normalize_event_name(&event.event),
            link: event.link.clone(),
            source: event.source,
        }
    }

    pub fn normalize_result(&self, result: &ScrapingResult) -> ScrapingResult {
        let events = result.events().iter().map(|e| self.normalize_event(e)).collect();
        result.with_events(events)
    }
}
