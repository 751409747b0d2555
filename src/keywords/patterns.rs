// file: src/keywords/patterns.rs
// description: compiled token pattern and stop word list for keyword extraction
// reference: https://docs.rs/regex, scikit-learn ENGLISH_STOP_WORDS

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    /// Two or more word characters, as CountVectorizer's default token pattern.
    pub static ref TOKEN: Regex = Regex::new(r"\b\w\w+\b").expect("TOKEN regex is valid");

    pub static ref STOP_WORDS: HashSet<&'static str> = [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
        "anywhere", "are", "around", "as", "at", "be", "became", "because", "become",
        "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below",
        "beside", "besides", "between", "beyond", "both", "but", "by", "can", "cannot",
        "could", "did", "do", "does", "done", "down", "due", "during", "each", "eg", "either",
        "else", "elsewhere", "enough", "etc", "even", "ever", "every", "everyone",
        "everything", "everywhere", "except", "few", "for", "former", "formerly", "from",
        "further", "had", "has", "have", "he", "hence", "her", "here", "hereafter", "hereby",
        "herein", "hers", "herself", "him", "himself", "his", "how", "however", "ie", "if",
        "in", "indeed", "into", "is", "it", "its", "itself", "just", "last", "latter",
        "latterly", "least", "less", "many", "may", "me", "meanwhile", "might", "mine",
        "more", "moreover", "most", "mostly", "much", "must", "my", "myself", "namely",
        "neither", "never", "nevertheless", "next", "no", "nobody", "none", "noone", "nor",
        "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only",
        "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out",
        "over", "own", "per", "perhaps", "please", "rather", "re", "same", "seem", "seemed",
        "seeming", "seems", "several", "she", "should", "since", "so", "some", "somehow",
        "someone", "something", "sometime", "sometimes", "somewhere", "still", "such",
        "than", "that", "the", "their", "them", "themselves", "then", "thence", "there",
        "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they",
        "this", "those", "though", "through", "throughout", "thru", "thus", "to", "together",
        "too", "toward", "towards", "under", "until", "up", "upon", "us", "very", "via", "was",
        "we", "well", "were", "what", "whatever", "when", "whence", "whenever", "where",
        "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether",
        "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why", "will",
        "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
        "yourselves",
    ]
    .into_iter()
    .collect();
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Lowercased tokens in text order, stop words removed.
pub fn content_tokens(text: &str) -> Vec<String> {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|t| !is_stop_word(t))
        .collect()
}
