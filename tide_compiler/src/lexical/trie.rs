//! Byte-indexed prefix tree for reserved-word lookup

/// Reserved words used when no keyword file is supplied
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "def", "if", "elif", "else", "while", "for", "in", "range", "return", "print", "int", "float",
    "string", "bool", "true", "false", "and", "or", "not", "pass",
];

/// Index 0 is the root, which is never a child, so 0 doubles as "no edge".
const NO_CHILD: u32 = 0;

#[derive(Debug, Clone)]
struct TrieNode {
    children: Box<[u32; 256]>,
    terminal: bool,
}

impl TrieNode {
    fn new() -> Self {
        Self {
            children: Box::new([NO_CHILD; 256]),
            terminal: false,
        }
    }
}

/// Exact-membership set of keywords.
///
/// Nodes live in one arena; each node has a 256-way edge table keyed by
/// byte, so a lookup costs one index per byte of the query.
#[derive(Debug, Clone)]
pub struct KeywordTrie {
    nodes: Vec<TrieNode>,
    word_count: usize,
}

impl Default for KeywordTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new()],
            word_count: 0,
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for word in words {
            trie.insert(word.as_ref());
        }
        trie
    }

    /// Trie over [`DEFAULT_KEYWORDS`]
    pub fn with_default_keywords() -> Self {
        Self::from_words(DEFAULT_KEYWORDS.iter().copied())
    }

    /// Inserting the same word twice has no further effect
    pub fn insert(&mut self, word: &str) {
        let mut node = 0usize;
        for &byte in word.as_bytes() {
            let next = self.nodes[node].children[byte as usize];
            node = if next == NO_CHILD {
                let index = self.nodes.len();
                self.nodes.push(TrieNode::new());
                self.nodes[node].children[byte as usize] = index as u32;
                index
            } else {
                next as usize
            };
        }

        if !self.nodes[node].terminal {
            self.nodes[node].terminal = true;
            self.word_count += 1;
        }
    }

    /// True only when the walk consumes all of `text` and ends on a
    /// terminal node; prefixes of keywords are not keywords.
    pub fn is_keyword(&self, text: &str) -> bool {
        let mut node = 0usize;
        for &byte in text.as_bytes() {
            match self.nodes[node].children[byte as usize] {
                NO_CHILD => return false,
                next => node = next as usize,
            }
        }
        self.nodes[node].terminal
    }

    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inserted_words_are_keywords() {
        let trie = KeywordTrie::with_default_keywords();
        for word in DEFAULT_KEYWORDS {
            assert!(trie.is_keyword(word), "{word} should be a keyword");
        }
        assert_eq!(trie.len(), DEFAULT_KEYWORDS.len());
    }

    #[test]
    fn test_prefixes_and_extensions_are_not_keywords() {
        let trie = KeywordTrie::from_words(["while", "whilst"]);

        assert!(!trie.is_keyword("whil"));
        assert!(!trie.is_keyword("while_"));
        assert!(!trie.is_keyword("whiles"));
        assert!(!trie.is_keyword("While"));
        assert!(!trie.is_keyword("x"));
        assert!(trie.is_keyword("whilst"));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut trie = KeywordTrie::new();
        trie.insert("if");
        let nodes = trie.node_count();
        trie.insert("if");

        assert_eq!(trie.len(), 1);
        assert_eq!(trie.node_count(), nodes);
    }

    #[test]
    fn test_empty_trie_and_empty_word() {
        let mut trie = KeywordTrie::new();
        assert!(trie.is_empty());
        assert!(!trie.is_keyword(""));
        assert!(!trie.is_keyword("def"));

        trie.insert("");
        assert!(trie.is_keyword(""));
    }

    #[test]
    fn test_non_ascii_bytes() {
        let trie = KeywordTrie::from_words(["naïve"]);
        assert!(trie.is_keyword("naïve"));
        assert!(!trie.is_keyword("naï"));
    }
}
