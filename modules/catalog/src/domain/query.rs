//! Query-engine selectors.
//!
//! All three modes page identically and sort newest-first; they differ only
//! in which rows match.

use crate::contract::model::{BookGenre, ClothingKind};

/// A prepared free-text search: the whole phrase plus its whitespace tokens,
/// all lowercased. A product matches when its name or secondary field
/// contains the phrase, or contains any single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms {
    pub phrase: String,
    pub tokens: Vec<String>,
}

impl SearchTerms {
    /// Returns None for blank input; blank queries are a validation error at
    /// the operation boundary.
    pub fn parse(raw: &str) -> Option<Self> {
        let phrase = raw.trim().to_lowercase();
        if phrase.is_empty() {
            return None;
        }
        let tokens = phrase.split_whitespace().map(str::to_string).collect();
        Some(Self { phrase, tokens })
    }

    /// Every needle to try against a column: the phrase first, then tokens.
    /// Single-token phrases need no separate token pass.
    pub fn needles(&self) -> impl Iterator<Item = &str> {
        let skip_tokens = self.tokens.len() == 1;
        std::iter::once(self.phrase.as_str()).chain(
            self.tokens
                .iter()
                .map(String::as_str)
                .filter(move |_| !skip_tokens),
        )
    }
}

/// Category selector, already parsed against the right line's enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySelector {
    Book(BookGenre),
    Clothing(ClothingKind),
}

impl CategorySelector {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Book(genre) => genre.as_str(),
            Self::Clothing(kind) => kind.as_str(),
        }
    }
}

/// What a page query should match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSelector {
    /// Everything in the line.
    All,
    /// Free-text match over name + secondary field.
    Search(SearchTerms),
    /// Exact category match.
    Category(CategorySelector),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_queries_do_not_parse() {
        assert_eq!(SearchTerms::parse(""), None);
        assert_eq!(SearchTerms::parse("   "), None);
    }

    #[test]
    fn phrase_and_tokens_are_lowercased() {
        let terms = SearchTerms::parse("  Great GATS ").unwrap();
        assert_eq!(terms.phrase, "great gats");
        assert_eq!(terms.tokens, vec!["great", "gats"]);
        let needles: Vec<_> = terms.needles().collect();
        assert_eq!(needles, vec!["great gats", "great", "gats"]);
    }

    #[test]
    fn single_token_has_one_needle() {
        let terms = SearchTerms::parse("gatsby").unwrap();
        let needles: Vec<_> = terms.needles().collect();
        assert_eq!(needles, vec!["gatsby"]);
    }
}
