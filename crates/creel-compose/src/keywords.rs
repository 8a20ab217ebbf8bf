//! Frequency-based keyword extraction for clip search.

use std::collections::HashMap;

use creel_models::{Theme, TranscriptSpan};

/// Tokens shorter than this are ignored.
pub const MIN_KEYWORD_LEN: usize = 3;

/// Default number of keywords handed to the clip provider.
pub const DEFAULT_KEYWORD_LIMIT: usize = 5;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "could", "couldn't", "did", "didn't", "do",
    "does", "doesn't", "doing", "don't", "down", "during", "each", "even", "ever", "every", "few",
    "for", "from", "further", "get", "got", "gonna", "had", "hadn't", "has", "hasn't", "have",
    "haven't", "having", "he", "he's", "her", "here", "hers", "herself", "him", "himself", "his",
    "how", "i", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself",
    "just", "know", "let", "let's", "like", "me", "more", "most", "much", "my", "myself", "never",
    "no", "nor", "not", "now", "of", "off", "oh", "on", "once", "only", "or", "other", "our",
    "ours", "ourselves", "out", "over", "own", "really", "said", "same", "say", "she", "she's",
    "should", "so", "some", "still", "such", "than", "that", "that's", "the", "their", "theirs",
    "them", "themselves", "then", "there", "there's", "these", "they", "they're", "thing",
    "things", "this", "those", "through", "to", "too", "under", "until", "up", "very", "want",
    "was", "wasn't", "way", "we", "we're", "well", "were", "weren't", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "won't", "would", "yeah", "yes", "you",
    "you're", "your", "yours", "yourself",
];

/// Search seeds per theme, used to pad short keyword lists.
pub fn theme_keywords(theme: Theme) -> &'static [&'static str] {
    match theme {
        Theme::Nature => &["forest", "ocean", "mountains", "sunset", "river"],
        Theme::City => &["skyline", "traffic", "streets", "night city", "neon"],
        Theme::Abstract => &["particles", "gradient", "shapes", "fluid", "light leaks"],
        Theme::Minimal => &["white space", "soft light", "texture", "paper", "clean"],
        Theme::Colorful => &["colors", "confetti", "paint", "rainbow", "festival"],
        Theme::Other => &["background", "texture", "light"],
    }
}

/// Ranks transcript words for background clip search.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    limit: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORD_LIMIT)
    }
}

impl KeywordExtractor {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Most frequent non-stop-words, ties broken by first occurrence.
    pub fn extract(&self, spans: &[TranscriptSpan]) -> Vec<String> {
        // word -> (count, first position)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut position = 0usize;

        for span in spans {
            for token in tokenize(&span.text) {
                if !is_keyword_candidate(&token) {
                    continue;
                }
                let entry = counts.entry(token).or_insert((0, position));
                entry.0 += 1;
                position += 1;
            }
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(word, (count, first))| (word, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(self.limit)
            .map(|(word, _, _)| word)
            .collect()
    }

    /// Like [`extract`](Self::extract), padded with theme seeds up to the limit.
    pub fn extract_with_theme(&self, spans: &[TranscriptSpan], theme: Theme) -> Vec<String> {
        let mut keywords = self.extract(spans);
        for seed in theme_keywords(theme) {
            if keywords.len() >= self.limit {
                break;
            }
            if !keywords.iter().any(|k| k == seed) {
                keywords.push((*seed).to_string());
            }
        }
        keywords
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|raw| {
            raw.trim_matches(|c: char| c == '\'' || c == '\u{2019}')
                .replace('\u{2019}', "'")
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_keyword_candidate(token: &str) -> bool {
    token.chars().count() >= MIN_KEYWORD_LEN
        && !token.chars().all(|c| c.is_ascii_digit())
        && !STOP_WORDS.contains(&token)
}
