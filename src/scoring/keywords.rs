use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::error::KeywordError;

const POSITIVE: &[(&str, i64)] = &[
    ("ancien", 40),
    ("très ancien", 50),
    ("art nouveau", 50),
    ("art deco", 50),
    ("daum", 60),
    ("gallé", 60),
    ("lalique", 60),
    ("baccarat", 55),
    ("loetz", 55),
    ("bronze", 50),
    ("bronze d’art", 60),
    ("statue", 40),
    ("statuette", 40),
    ("huile sur toile", 50),
    ("peinture", 30),
    ("peinture signée", 50),
    ("gravure", 25),
    ("lithographie", 30),
    ("eau-forte", 35),
    ("pâte de verre", 40),
    ("verre soufflé", 30),
    ("cristal", 35),
    ("faience", 30),
    ("porcelaine", 30),
    ("terre cuite", 30),
    ("céladon", 40),
    ("imari", 40),
    ("satsuma", 40),
    ("kutani", 40),
    ("monnaie", 30),
    ("pièce argent", 40),
    ("pièce or", 50),
    ("napoleon", 45),
    ("denier", 50),
    ("sesterce", 50),
    ("drachme", 50),
    ("timbre", 30),
    ("album timbre", 30),
    ("timbre rare", 40),
    ("bd ancien", 40),
    ("tintin", 45),
    ("hergé", 45),
    ("asterix", 40),
    ("jouet ancien", 35),
    ("dinky", 35),
    ("meccano", 35),
    ("figurine", 30),
    ("figurine plomb", 30),
    ("militaria", 40),
    ("ww1", 40),
    ("ww2", 40),
    ("casque", 40),
    ("épée", 40),
    ("baionnette", 40),
    ("medaille", 40),
    ("decoration", 40),
    ("legion", 50),
    ("art tribal", 50),
    ("masque africain", 50),
    ("statuette africain", 50),
    ("objets de vitrine", 25),
    ("curiosité", 40),
    ("succession", 40),
    ("grenier", 40),
    ("vide maison", 35),
    ("brocante", 20),
];

const NEGATIVE: &[&str] = &[
    "reproduction",
    "repro",
    "copie",
    "imitation",
    "fake",
    "style",
    "façon",
    "poster",
    "print",
    "giclee",
    "déco",
    "decoratif",
    "made in china",
    "résine",
    "zamak",
    "plastique",
    "look ancien",
    "vieilli artificiellement",
];

/// Weighted phrase table plus exclusion list. Phrases are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTables {
    positive: BTreeMap<String, i64>,
    negative: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordFile {
    #[serde(default)]
    positive: BTreeMap<String, i64>,
    #[serde(default)]
    negative: Vec<String>,
}

impl KeywordTables {
    pub fn new<P, N, S>(positive: P, negative: N) -> Self
    where
        P: IntoIterator<Item = (S, i64)>,
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let positive = positive
            .into_iter()
            .map(|(phrase, weight)| (phrase.as_ref().to_lowercase(), weight))
            .filter(|(phrase, _)| !phrase.is_empty())
            .collect();

        let mut negative: Vec<String> = negative
            .into_iter()
            .map(|phrase| phrase.as_ref().to_lowercase())
            .filter(|phrase| !phrase.is_empty())
            .collect();
        negative.sort();
        negative.dedup();

        Self { positive, negative }
    }

    /// Reads a TOML or JSON file with a `positive` table and a `negative` list.
    pub fn from_file(path: &Path) -> Result<Self, KeywordError> {
        let file: KeywordFile = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|source| KeywordError::Load {
                path: path.display().to_string(),
                source,
            })?;

        let tables = Self::new(file.positive, file.negative);
        if tables.positive.is_empty() {
            return Err(KeywordError::Empty);
        }

        tracing::info!(
            "Loaded {} positive and {} negative keywords from {}",
            tables.positive.len(),
            tables.negative.len(),
            path.display()
        );
        Ok(tables)
    }

    pub fn positive(&self) -> impl Iterator<Item = (&str, i64)> {
        self.positive.iter().map(|(p, w)| (p.as_str(), *w))
    }

    pub fn negative(&self) -> impl Iterator<Item = &str> {
        self.negative.iter().map(String::as_str)
    }
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self::new(POSITIVE.iter().copied(), NEGATIVE.iter().copied())
    }
}
