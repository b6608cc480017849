pub mod keywords;
pub mod scorer;

pub use keywords::KeywordTables;
pub use scorer::{KeywordScorer, Verdict};
