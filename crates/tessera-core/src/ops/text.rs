//! Text kernels
//!
//! Email extraction is a hand-written scanner over character classes rather
//! than a regex: each `@` anchors a backward scan over the local part and a
//! forward scan over the domain, and the candidate is accepted only when both
//! sides satisfy their shape rules.

use std::collections::{HashMap, HashSet};

/// Case-insensitive frequency count keyed by the lowercased word
pub fn word_frequencies<S: AsRef<str>>(words: &[S]) -> HashMap<String, u64> {
    let mut freq = HashMap::new();
    for word in words {
        *freq.entry(word.as_ref().to_lowercase()).or_insert(0) += 1;
    }
    freq
}

/// Number of distinct whitespace-separated tokens, ignoring case
pub fn count_unique_words(text: &str) -> usize {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<HashSet<_>>()
        .len()
}

/// Whether `text` reads the same backwards, ignoring case and any
/// non-alphanumeric characters
pub fn is_palindrome(text: &str) -> bool {
    let cleaned: Vec<char> = text
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    cleaned.iter().eq(cleaned.iter().rev())
}

/// URL-friendly slug: lowercase ASCII alphanumerics separated by single
/// hyphens, with no leading or trailing hyphen
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Email-like substrings of `text`, in order of first appearance, without
/// duplicates
///
/// - local part: one or more of `[A-Za-z0-9._+-]`
/// - domain: `[A-Za-z0-9.-]` forming at least two non-empty `.`-separated
///   labels, none starting or ending with `-`; trailing dots are treated as
///   sentence punctuation
///
/// A bare `@nobody` or a trailing `broken@` yields nothing.
pub fn extract_emails(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut emails: Vec<String> = Vec::new();

    for (at, _) in chars.iter().enumerate().filter(|&(_, &c)| c == '@') {
        let mut start = at;
        while start > 0 && is_local_char(chars[start - 1]) {
            start -= 1;
        }

        let mut end = at + 1;
        while end < chars.len() && is_domain_char(chars[end]) {
            end += 1;
        }
        while end > at + 1 && chars[end - 1] == '.' {
            end -= 1;
        }

        if start == at || !is_valid_domain(&chars[at + 1..end]) {
            continue;
        }

        let email: String = chars[start..end].iter().collect();
        if !emails.contains(&email) {
            emails.push(email);
        }
    }
    emails
}

fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+')
}

fn is_domain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-')
}

fn is_valid_domain(domain: &[char]) -> bool {
    let mut labels = 0;
    for label in domain.split(|&c| c == '.') {
        if label.is_empty() || label.first() == Some(&'-') || label.last() == Some(&'-') {
            return false;
        }
        labels += 1;
    }
    labels >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_frequencies() {
        let freq = word_frequencies(&["Apple", "apple", "BANANA", "cherry", "banana"]);
        assert_eq!(freq.len(), 3);
        assert_eq!(freq["apple"], 2);
        assert_eq!(freq["banana"], 2);
        assert_eq!(freq["cherry"], 1);

        let owned = vec!["x".to_string()];
        assert_eq!(word_frequencies(&owned)["x"], 1);
    }

    #[test]
    fn test_count_unique_words() {
        assert_eq!(count_unique_words("The the THE cat  sat\ton the mat"), 5);
        assert_eq!(count_unique_words("   "), 0);
    }

    #[test]
    fn test_is_palindrome() {
        assert!(is_palindrome("A man, a plan, a canal: Panama"));
        assert!(is_palindrome("racecar"));
        assert!(is_palindrome(""));
        assert!(is_palindrome("No 'x' in Nixon"));
        assert!(!is_palindrome("hello"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  --Rust   is__FAST--  "), "rust-is-fast");
        assert_eq!(slugify("café au lait"), "caf-au-lait");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("v2.0 release"), "v2-0-release");
    }

    #[test]
    fn test_extract_emails() {
        assert_eq!(extract_emails("a@b.com and broken@"), vec!["a@b.com"]);
        assert!(extract_emails("@nobody").is_empty());
        assert!(extract_emails("user@localhost").is_empty());
    }

    #[test]
    fn test_extract_emails_rejects_hyphen_edged_labels() {
        assert!(extract_emails("x@-a.com").is_empty());
        assert!(extract_emails("x@a-.com").is_empty());
        assert!(extract_emails("x@a.com-").is_empty());
        assert_eq!(extract_emails("x@a-b.com"), vec!["x@a-b.com"]);
    }

    #[test]
    fn test_extract_emails_punctuation_and_dedup() {
        let text = "Write to john.doe+news@mail.example.org. Or (jane_d@corp-x.io), or john.doe+news@mail.example.org!";
        assert_eq!(
            extract_emails(text),
            vec!["john.doe+news@mail.example.org", "jane_d@corp-x.io"]
        );
    }

    #[test]
    fn test_extract_emails_rejects_empty_labels() {
        assert!(extract_emails("x@.com").is_empty());
        assert!(extract_emails("x@a..com").is_empty());
        assert!(extract_emails("x@y.").is_empty());
    }
}
