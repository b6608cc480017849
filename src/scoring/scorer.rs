use super::keywords::KeywordTables;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// An exclusion phrase matched; no score is computed.
    Excluded(String),
    BelowThreshold(i64),
    Passed(i64),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed(_))
    }
}

/// Substring scorer over lowercased title and description.
///
/// Matching is plain substring search: "ancien" also hits "anciennes".
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    tables: KeywordTables,
    threshold: i64,
}

impl KeywordScorer {
    pub fn new(tables: KeywordTables, threshold: i64) -> Self {
        Self { tables, threshold }
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub fn evaluate(&self, title: &str, description: &str) -> Verdict {
        let title = title.to_lowercase();
        let description = description.to_lowercase();

        if let Some(phrase) = self.excluded_by(&title, &description) {
            return Verdict::Excluded(phrase.to_string());
        }

        let score = self.score(&title, &description);
        if score >= self.threshold {
            Verdict::Passed(score)
        } else {
            Verdict::BelowThreshold(score)
        }
    }

    /// First exclusion phrase found in either field. Inputs must already be lowercase.
    pub fn excluded_by(&self, title: &str, description: &str) -> Option<&str> {
        self.tables
            .negative()
            .find(|phrase| title.contains(phrase) || description.contains(phrase))
    }

    /// Sum of weights of every positive phrase present. Inputs must already be lowercase.
    pub fn score(&self, title: &str, description: &str) -> i64 {
        self.tables
            .positive()
            .filter(|(phrase, _)| title.contains(phrase) || description.contains(phrase))
            .map(|(_, weight)| weight)
            .sum()
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new(KeywordTables::default(), 40)
    }
}
