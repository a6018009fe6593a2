//! Sentence splitting, word tokenization and token normalization.
//!
//! Tokens are lowercased, stopwords are removed and anything that is not
//! entirely alphanumeric (or alphabetic, for topic tokens) is dropped. There
//! is no stemming or lemmatization.

use lazy_static::lazy_static;
use std::collections::HashSet;

/// English stopword list (the NLTK `english` corpus).
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Words that may end in a period without ending a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc", "ltd",
    "corp", "approx", "dept", "jan", "feb", "apr", "jun", "jul", "aug", "sep", "sept", "oct",
    "nov", "dec", "u.s", "u.k", "a.m", "p.m",
];

/// Titles that precede a name and never end a sentence.
const TITLES: &[&str] = &["mr", "mrs", "ms", "dr", "prof"];

/// Clitics split off the end of a word, longest first.
const CLITICS: &[&str] = &["n't", "'ll", "'re", "'ve", "'s", "'d", "'m"];

/// Contractions written as one word, split after the third letter.
const CONTRACTIONS: &[&str] = &["cannot", "gimme", "gonna", "gotta", "lemme", "wanna"];

lazy_static! {
    static ref STOPWORD_SET: HashSet<&'static str> = STOPWORDS.iter().copied().collect();
    static ref ABBREVIATION_SET: HashSet<&'static str> = ABBREVIATIONS.iter().copied().collect();
}

/// Which tokens survive normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenFilter {
    /// Keep tokens made only of letters and digits.
    #[default]
    Alphanumeric,
    /// Keep tokens made only of letters.
    Alphabetic,
}

impl TokenFilter {
    fn accepts(self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        match self {
            TokenFilter::Alphanumeric => token.chars().all(char::is_alphanumeric),
            TokenFilter::Alphabetic => token.chars().all(char::is_alphabetic),
        }
    }
}

/// Returns true if `word` (already lowercased) is an English stopword.
pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}

/// Tokenize `text` into lowercased alphanumeric non-stopword tokens.
///
/// Empty input yields an empty token list.
pub fn tokenize_and_filter(text: &str) -> Vec<String> {
    tokenize_with(text, TokenFilter::Alphanumeric)
}

/// Tokenize `text` and keep the tokens accepted by `filter`, lowercased and
/// with stopwords removed. Source order is preserved.
pub fn tokenize_with(text: &str, filter: TokenFilter) -> Vec<String> {
    word_tokens(text)
        .into_iter()
        .filter(|token| filter.accepts(token))
        .map(str::to_lowercase)
        .filter(|token| !is_stopword(token))
        .collect()
}

/// Split `text` into word and punctuation tokens.
///
/// Leading and trailing punctuation become tokens of their own and English
/// clitics (`n't`, `'s`, `'ll`, ...) are split off the word they end.
/// One-word contractions split in two (`cannot` is `can` + `not`, `gonna` is
/// `gon` + `na`). Internal punctuation such as hyphens keeps a word whole.
pub fn word_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        let core_start = chunk
            .char_indices()
            .find(|(_, c)| c.is_alphanumeric())
            .map(|(i, _)| i);
        let Some(core_start) = core_start else {
            push_chars(&mut tokens, chunk);
            continue;
        };
        let core_end = chunk
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_alphanumeric())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(chunk.len());

        push_chars(&mut tokens, &chunk[..core_start]);

        let core = &chunk[core_start..core_end];
        let trailing = &chunk[core_end..];
        // clitics end in a letter, so they are still inside the core
        match split_contraction(core).or_else(|| split_clitic(core)) {
            Some((word, clitic)) => {
                tokens.push(word);
                tokens.push(clitic);
            }
            None => tokens.push(core),
        }

        push_chars(&mut tokens, trailing);
    }
    tokens
}

fn push_chars<'a>(tokens: &mut Vec<&'a str>, punctuation: &'a str) {
    for (i, c) in punctuation.char_indices() {
        tokens.push(&punctuation[i..i + c.len_utf8()]);
    }
}

fn split_contraction(word: &str) -> Option<(&str, &str)> {
    let lower = word.to_ascii_lowercase();
    CONTRACTIONS
        .contains(&lower.as_str())
        .then(|| word.split_at(3))
}

fn split_clitic(word: &str) -> Option<(&str, &str)> {
    let lower = word.to_lowercase();
    for clitic in CLITICS {
        if lower.len() > clitic.len() && lower.ends_with(clitic) && lower.len() == word.len() {
            let at = word.len() - clitic.len();
            if word.is_char_boundary(at) {
                return Some((&word[..at], &word[at..]));
            }
        }
    }
    None
}

/// Split `text` into trimmed sentences.
///
/// A sentence ends at a run of `.`, `!` or `?` (plus any closing quotes or
/// brackets) followed by whitespace or the end of input. A single period
/// after a title (`Dr.`, `Mrs.`) never ends a sentence. After another known
/// abbreviation or a one-letter initial it ends one only when the next word
/// looks like a sentence start: capitalized and not itself an abbreviation.
/// Text without terminal punctuation is a single sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        if !is_terminal(c) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && is_terminal(chars[j].1) {
            j += 1;
        }
        let single_period = c == '.' && j == i + 1;
        while j < chars.len() && is_closing(chars[j].1) {
            j += 1;
        }

        let end = chars.get(j).map(|(o, _)| *o).unwrap_or(text.len());
        let at_boundary = j == chars.len() || chars[j].1.is_whitespace();

        let continues =
            single_period && continues_after_period(&text[start..offset], &text[end..]);
        if at_boundary && !continues {
            push_sentence(&mut sentences, &text[start..end]);
            start = end;
        }
        i = j;
    }

    push_sentence(&mut sentences, &text[start..]);
    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, piece: &'a str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '\u{201d}' | '\u{2019}')
}

/// True when the period ending `before` belongs to an abbreviation or
/// initial and `after` carries on the same sentence.
fn continues_after_period(before: &str, after: &str) -> bool {
    let word = before.split_whitespace().next_back().unwrap_or("");
    let Some(stem) = abbreviation_stem(word) else {
        return false;
    };
    if TITLES.contains(&stem.as_str()) {
        return true;
    }

    let next = after.split_whitespace().next().unwrap_or("");
    let next = next.trim_start_matches(|c: char| !c.is_alphanumeric());
    match next.chars().next() {
        None => false,
        Some(c) if c.is_lowercase() || c.is_numeric() => true,
        Some(_) => next
            .strip_suffix('.')
            .is_some_and(|word| abbreviation_stem(word).is_some()),
    }
}

/// Lowercased `word` when it is a known abbreviation or a one-letter initial.
fn abbreviation_stem(word: &str) -> Option<String> {
    let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
    let mut letters = word.chars();
    let is_initial = matches!(
        (letters.next(), letters.next()),
        (Some(first), None) if first.is_alphabetic()
    );
    let stem = word.to_lowercase();
    (is_initial || ABBREVIATION_SET.contains(stem.as_str())).then_some(stem)
}
