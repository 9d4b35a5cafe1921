use crate::error::AlignmentError;

/// Month names in Danish and Kalaallisut, lower-cased.
pub const MONTH_NAMES: [&str; 24] = [
    "januar",
    "februar",
    "marts",
    "april",
    "maj",
    "juni",
    "juli",
    "august",
    "september",
    "oktober",
    "november",
    "december",
    "januaari",
    "februaari",
    "martsi",
    "apriili",
    "maaji",
    "juuni",
    "juuli",
    "aggusti",
    "septembari",
    "oktobari",
    "novembari",
    "decembari",
];

/// Splits text into sentences on `.`, `!` and `?`.
///
/// A terminator does not end a sentence when the sentence so far is shorter
/// than `min_sentence_length` characters, when the next non-space character is
/// lowercase, or when it follows a bare number that is followed by a month name
/// (`15. januar 2024`). Line breaks and other whitespace runs inside a
/// sentence are collapsed to single spaces.
pub fn split_sentences(
    text: &str,
    min_sentence_length: usize,
) -> Result<Vec<String>, AlignmentError> {
    if text.trim().is_empty() {
        return Err(AlignmentError::empty_input("input text"));
    }

    let mut sentences = Vec::new();
    let mut start = 0usize;

    for (idx, ch) in text.char_indices() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let end = idx + ch.len_utf8();
        let current = text[start..end].trim();
        if current.chars().count() < min_sentence_length {
            continue;
        }

        let rest = text[end..].trim();
        if rest.is_empty() {
            sentences.push(collapse_whitespace(current));
            start = end;
            continue;
        }

        if ends_with_date_ordinal(current, rest) {
            continue;
        }
        if rest.chars().next().is_some_and(char::is_lowercase) {
            continue;
        }

        sentences.push(collapse_whitespace(current));
        start = end;
    }

    let remainder = text[start..].trim();
    if !remainder.is_empty() {
        sentences.push(collapse_whitespace(remainder));
    }

    Ok(sentences)
}

fn collapse_whitespace(sentence: &str) -> String {
    sentence.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn ends_with_date_ordinal(current: &str, rest: &str) -> bool {
    let Some(last_word) = current.split_whitespace().last() else {
        return false;
    };
    let mut number = last_word.chars();
    number.next_back();
    let number = number.as_str();
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    rest.split_whitespace()
        .next()
        .is_some_and(|next| is_month_name(next))
}

pub fn is_month_name(word: &str) -> bool {
    let lower = word.to_lowercase();
    MONTH_NAMES.contains(&lower.as_str())
}
