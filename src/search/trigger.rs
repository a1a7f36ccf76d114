//! Keyword heuristic deciding whether a message warrants web augmentation.

use std::sync::{PoisonError, RwLock};

/// Built-in trigger phrases (Turkish: news, definitions, how-tos, prices,
/// comparisons, locations, contact details).
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "son haberler",
    "güncel",
    "haber",
    "son dakika",
    "en yeni",
    "ne demek",
    "anlamı",
    "tanımı",
    "açıklaması",
    "nasıl yapılır",
    "rehber",
    "adım adım",
    "fiyatı",
    "maliyeti",
    "ne kadar",
    "en iyi",
    "karşılaştırma",
    "değerlendirmesi",
    "nerede",
    "nerede bulunur",
    "adresi",
    "telefon numarası",
    "iletişim bilgileri",
];

/// Runtime-editable keyword set plus the question-mark rule.
///
/// Keywords are stored as given but matched case-insensitively. This is a
/// heuristic; false positives and negatives are expected.
#[derive(Debug)]
pub struct KeywordTrigger {
    keywords: RwLock<Vec<String>>,
}

impl Default for KeywordTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().map(|k| k.to_string()))
    }
}

impl KeywordTrigger {
    pub fn new(keywords: impl IntoIterator<Item = String>) -> Self {
        Self {
            keywords: RwLock::new(keywords.into_iter().collect()),
        }
    }

    /// True when the message contains a `?` or any keyword (ignoring case).
    pub fn should_trigger(&self, message: &str) -> bool {
        if message.contains('?') {
            return true;
        }
        let lowered = message.to_lowercase();
        self.keywords
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|keyword| lowered.contains(&keyword.to_lowercase()))
    }

    /// Add a keyword unless the exact same string is already present.
    pub fn add(&self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        let mut keywords = self.keywords.write().unwrap_or_else(PoisonError::into_inner);
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }

    /// Remove every keyword equal to `keyword` ignoring case.
    pub fn remove(&self, keyword: &str) {
        let target = keyword.to_lowercase();
        self.keywords
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|k| k.to_lowercase() != target);
    }

    /// Current keywords in insertion order.
    pub fn keywords(&self) -> Vec<String> {
        self.keywords
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
