use std::collections::HashMap;

use icu_normalizer::ComposingNormalizer;

const WORDS_FR: &str = include_str!("../../assets/words-fr.txt");
const WORDS_EN: &str = include_str!("../../assets/words-en.txt");

/// Highest 1-based letter position the precomputed index covers.
/// Activation input is validated against the same bound.
pub const MAX_RANK: usize = 6;

const FALLBACK_FR: &[&str] = &[
    "MAISON", "SOLEIL", "JARDIN", "RIVAGE", "ORANGE", "VIOLON", "CHEMIN", "NUAGE",
];
const FALLBACK_EN: &[&str] = &[
    "GARDEN", "SILVER", "WINDOW", "PLANET", "VIOLIN", "MIRROR", "BRIDGE", "CANDLE",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    Fr,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::Fr => Language::En,
            Language::En => Language::Fr,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "fr" => Some(Language::Fr),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

/// Canonical form used everywhere a word is compared: NFC, trimmed, uppercased.
/// The French list carries accented letters, so byte comparison without a fixed
/// normalization would split É into two unequal spellings.
pub fn normalize(word: &str) -> String {
    ComposingNormalizer::new_nfc()
        .normalize(word.trim())
        .to_uppercase()
}

struct WordBank {
    words: Vec<String>,
    // (rank, letter) -> indices into words, in list order
    rank_index: Option<HashMap<(usize, char), Vec<usize>>>,
}

impl WordBank {
    fn from_raw(raw: &str, fallback: &[&str]) -> Self {
        let mut words: Vec<String> = raw
            .lines()
            .map(normalize)
            .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_alphabetic()))
            .collect();
        if words.is_empty() {
            words = fallback.iter().map(|w| normalize(w)).collect();
        }
        Self {
            words,
            rank_index: None,
        }
    }

    fn from_words(words: &[&str]) -> Self {
        let words: Vec<String> = words
            .iter()
            .map(|w| normalize(w))
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Self::from_raw("", FALLBACK_EN);
        }
        Self {
            words,
            rank_index: None,
        }
    }

    fn build_index(&mut self) {
        let mut index: HashMap<(usize, char), Vec<usize>> = HashMap::new();
        for (i, word) in self.words.iter().enumerate() {
            for (pos, letter) in word.chars().take(MAX_RANK).enumerate() {
                index.entry((pos + 1, letter)).or_default().push(i);
            }
        }
        self.rank_index = Some(index);
    }

    fn candidates(&self, rank: usize, letter: char) -> Vec<&str> {
        if let Some(ref index) = self.rank_index {
            if rank <= MAX_RANK {
                return index
                    .get(&(rank, letter))
                    .map(|ids| ids.iter().map(|&i| self.words[i].as_str()).collect())
                    .unwrap_or_default();
            }
        }
        self.words
            .iter()
            .filter(|w| w.chars().nth(rank - 1) == Some(letter))
            .map(|w| w.as_str())
            .collect()
    }
}

pub struct WordSource {
    language: Language,
    banks: HashMap<Language, WordBank>,
}

impl WordSource {
    /// Load both embedded lists, falling back to the built-in minimum per
    /// language, and precompute the rank index.
    pub fn load() -> Self {
        let mut banks = HashMap::new();
        banks.insert(Language::Fr, WordBank::from_raw(WORDS_FR, FALLBACK_FR));
        banks.insert(Language::En, WordBank::from_raw(WORDS_EN, FALLBACK_EN));
        let mut source = Self {
            language: Language::Fr,
            banks,
        };
        for bank in source.banks.values_mut() {
            bank.build_index();
        }
        source
    }

    /// A single-language source over the given words, without an index.
    /// Lookups go through the scan path until `with_rank_index` is called.
    pub fn from_words(language: Language, words: &[&str]) -> Self {
        let mut banks = HashMap::new();
        banks.insert(language, WordBank::from_words(words));
        Self { language, banks }
    }

    pub fn with_rank_index(mut self) -> Self {
        for bank in self.banks.values_mut() {
            bank.build_index();
        }
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.banks.entry(language).or_insert_with(|| {
            let fallback = match language {
                Language::Fr => FALLBACK_FR,
                Language::En => FALLBACK_EN,
            };
            WordBank::from_raw("", fallback)
        });
        self.language = language;
    }

    fn active(&self) -> &WordBank {
        &self.banks[&self.language]
    }

    /// The active language's word list. Never empty.
    pub fn words(&self) -> &[String] {
        &self.active().words
    }

    /// All active-language words with `letter` at 1-based position `rank`,
    /// excluding `exclude`, unless the exclusion would leave nothing, in
    /// which case the matches are returned as-is. With no match at all, a
    /// synthetic placeholder is returned, so the result is never empty.
    pub fn lookup(&self, rank: usize, letter: char, exclude: &str) -> Vec<String> {
        if rank == 0 {
            return vec![Self::placeholder(letter)];
        }
        let candidates = self.active().candidates(rank, letter);
        if candidates.is_empty() {
            return vec![Self::placeholder(letter)];
        }
        let filtered: Vec<String> = candidates
            .iter()
            .copied()
            .filter(|w| *w != exclude)
            .map(str::to_string)
            .collect();
        if filtered.is_empty() {
            candidates.iter().map(|w| w.to_string()).collect()
        } else {
            filtered
        }
    }

    pub fn placeholder(letter: char) -> String {
        format!("X{letter}X")
    }
}
