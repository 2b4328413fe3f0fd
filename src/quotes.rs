use rand::seq::SliceRandom;

pub const DEFAULT_PRACTICE_TEXT: &str =
    "Typing is not about speed alone, it is about accuracy, rhythm, and calm focus.";
pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const MAX_QUOTES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Default for Quote {
    fn default() -> Self {
        Self {
            text: DEFAULT_PRACTICE_TEXT.to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
        }
    }
}

/// Where quote sessions get their text from. A network-backed source lives
/// outside this crate; [`BuiltinQuotes`] needs no network at all.
pub trait QuoteSource {
    fn fetch(&self) -> Quote;

    /// `count` is clamped into `1..=MAX_QUOTES`.
    fn fetch_many(&self, count: usize) -> Vec<Quote> {
        (0..count.clamp(1, MAX_QUOTES)).map(|_| self.fetch()).collect()
    }
}

const BUILTIN: &[(&str, &str)] = &[
    (
        "The secret of getting ahead is getting started.",
        "Mark Twain",
    ),
    (
        "It does not matter how slowly you go as long as you do not stop.",
        "Confucius",
    ),
    (
        "Simplicity is prerequisite for reliability.",
        "Edsger W. Dijkstra",
    ),
    (
        "We are what we repeatedly do. Excellence, then, is not an act, but a habit.",
        "Will Durant",
    ),
    (
        "Programs must be written for people to read, and only incidentally for machines to execute.",
        "Harold Abelson",
    ),
    ("Well begun is half done.", "Aristotle"),
    (
        "The only way to learn a new programming language is by writing programs in it.",
        "Dennis Ritchie",
    ),
    (
        "Practice does not make perfect. Only perfect practice makes perfect.",
        "Vince Lombardi",
    ),
    (DEFAULT_PRACTICE_TEXT, UNKNOWN_AUTHOR),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinQuotes;

impl QuoteSource for BuiltinQuotes {
    fn fetch(&self) -> Quote {
        BUILTIN
            .choose(&mut rand::thread_rng())
            .map(|(text, author)| Quote {
                text: text.to_string(),
                author: author.to_string(),
            })
            .unwrap_or_default()
    }
}

/// A fixed, user-supplied text.
#[derive(Debug, Clone)]
pub struct CustomText(pub String);

impl QuoteSource for CustomText {
    fn fetch(&self) -> Quote {
        if self.0.trim().is_empty() {
            return Quote::default();
        }
        Quote {
            text: self.0.clone(),
            author: UNKNOWN_AUTHOR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_quotes_are_non_empty() {
        let quote = BuiltinQuotes.fetch();
        assert!(!quote.text.is_empty());
        assert!(!quote.author.is_empty());
    }

    #[test]
    fn fetch_many_is_clamped() {
        assert_eq!(BuiltinQuotes.fetch_many(0).len(), 1);
        assert_eq!(BuiltinQuotes.fetch_many(3).len(), 3);
        assert_eq!(BuiltinQuotes.fetch_many(50).len(), MAX_QUOTES);
    }

    #[test]
    fn blank_custom_text_uses_default_practice_text() {
        assert_eq!(CustomText("  ".into()).fetch(), Quote::default());
        assert_eq!(CustomText("hi".into()).fetch().text, "hi");
    }
}
