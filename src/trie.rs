use std::collections::BTreeMap;

/// Command names for TAB completion, keyed one character per level.
#[derive(Debug, Default)]
pub struct Trie {
    children: BTreeMap<char, Trie>,
    end_of_word: bool
}

impl Trie {
    pub fn new () -> Self {
        Self::default()
    }

    pub fn insert (&mut self, word: &str) {
        let mut curr = self;

        for ch in word.chars() {
            curr = curr.children.entry(ch).or_default();
        }

        curr.end_of_word = true;
    }

    pub fn extend <I, T>(&mut self, words: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>
    {
        for word in words {
            self.insert(word.as_ref());
        }
    }

    /// All stored words starting with `prefix`, in lexical order.
    ///
    /// An empty prefix completes to nothing rather than to every known word.
    pub fn complete (&self, prefix: &str) -> Vec<String> {
        let mut res = Vec::new();
        if prefix.is_empty() { return res };

        let mut curr = self;
        for ch in prefix.chars() {
            match curr.children.get(&ch) {
                Some(next) => curr = next,
                None => return res,
            }
        }

        let mut word = prefix.to_string();
        curr.collect_words(&mut word, &mut res);
        res
    }

    fn collect_words (&self, word: &mut String, res: &mut Vec<String>) {
        if self.end_of_word {
            res.push(word.clone());
        }

        for (ch, node) in &self.children {
            word.push(*ch);
            node.collect_words(word, res);
            word.pop();
        }
    }
}

/// Longest prefix shared by every candidate. Empty when there are none.
pub fn longest_common_prefix <T: AsRef<str>>(candidates: &[T]) -> String {
    let Some((first, rest)) = candidates.split_first() else {
        return String::new();
    };

    let mut lcp = first.as_ref();

    for candidate in rest {
        let shared: usize = lcp
            .chars()
            .zip(candidate.as_ref().chars())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.len_utf8())
            .sum();

        lcp = &lcp[..shared];
    }

    lcp.to_string()
}
