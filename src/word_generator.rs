use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Used when a language has no word list of its own.
pub const DEFAULT_WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "hello", "world", "typing",
    "speed", "test", "practice", "accuracy", "keyboard", "computer", "software", "development",
    "programming", "rust", "language", "terminal", "user", "interface",
];

const ENGLISH_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "air", "all", "almost", "along", "also", "always",
    "an", "and", "animal", "another", "answer", "any", "are", "around", "as", "ask", "at",
    "away", "back", "be", "because", "been", "before", "began", "begin", "being", "below",
    "between", "big", "book", "both", "boy", "but", "by", "call", "came", "can", "car", "carry",
    "change", "children", "city", "close", "come", "could", "country", "cut", "day", "did",
    "different", "do", "does", "don't", "down", "each", "earth", "eat", "end", "enough", "even",
    "every", "example", "eye", "face", "family", "far", "father", "feet", "few", "find",
    "first", "follow", "food", "for", "form", "found", "four", "from", "get", "girl", "give",
    "go", "good", "got", "great", "group", "grow", "had", "hand", "hard", "has", "have", "he",
    "head", "hear", "help", "her", "here", "high", "him", "his", "home", "house", "how", "idea",
    "if", "important", "in", "into", "is", "it", "its", "just", "keep", "kind", "know", "land",
    "large", "last", "later", "learn", "leave", "left", "let", "letter", "life", "light",
    "like", "line", "list", "little", "live", "long", "look", "made", "make", "man", "many",
    "may", "me", "mean", "men", "might", "mile", "miss", "more", "most", "mother", "mountain",
    "move", "much", "must", "my", "name", "near", "need", "never", "new", "next", "night", "no",
    "not", "now", "number", "of", "off", "often", "old", "on", "once", "one", "only", "open",
    "or", "other", "our", "out", "over", "own", "page", "paper", "part", "people", "picture",
    "place", "plant", "play", "point", "put", "question", "quick", "quickly", "read", "really",
    "right", "river", "run", "said", "same", "saw", "say", "school", "sea", "second", "see",
    "seem", "sentence", "set", "she", "should", "show", "side", "small", "so", "some",
    "something", "sometimes", "song", "soon", "sound", "spell", "start", "state", "still",
    "stop", "story", "study", "such", "take", "talk", "tell", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "thing", "think", "this", "those", "thought",
    "three", "through", "time", "to", "together", "too", "took", "tree", "try", "turn", "two",
    "under", "until", "up", "us", "use", "very", "walk", "want", "was", "watch", "water", "way",
    "we", "well", "went", "were", "what", "when", "where", "which", "while", "white", "who",
    "why", "will", "with", "without", "word", "work", "world", "would", "write", "year", "you",
    "young", "your",
];

const LANGUAGES: &[(&str, &[&str])] = &[("english", ENGLISH_WORDS), ("random", DEFAULT_WORDS)];

pub fn is_language_supported(language: &str) -> bool {
    LANGUAGES
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case(language))
}

pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|(name, _)| *name)
}

/// Produces word streams for word, timed and challenge sessions.
#[derive(Debug, Clone)]
pub struct WordGenerator {
    words: &'static [&'static str],
}

impl WordGenerator {
    /// Unknown languages fall back to [`DEFAULT_WORDS`].
    pub fn new(language: &str) -> Self {
        let words = LANGUAGES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(language))
            .map(|(_, words)| *words)
            .unwrap_or(DEFAULT_WORDS);
        Self { words }
    }

    pub fn words(&self) -> &[&'static str] {
        self.words
    }

    /// Pick one word with a freshly seeded generator, so consecutive words
    /// never share a seed.
    pub fn generate_word(&self) -> &'static str {
        let mut rng = StdRng::from_entropy();
        self.words.choose(&mut rng).copied().unwrap_or("the")
    }

    /// `count` words separated by single spaces.
    pub fn generate_words(&self, count: usize) -> String {
        (0..count)
            .map(|_| self.generate_word())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
