//! List splitting: section content → trimmed, non-empty items.

/// Delimiters for ordinary phrase lists.
pub const ITEM_DELIMITERS: &[char] = &[',', '.', ';'];

/// Delimiters between disease entries in a structured field.
pub const ENTRY_DELIMITERS: &[char] = &[',', ';'];

/// Delimiters inside a multi-line medical-sign block.
pub const SIGN_DELIMITERS: &[char] = &['\n', ',', ';'];

/// Split `content` on `delimiters`, trim each piece, drop empties, keep order.
pub fn split_items(content: &str, delimiters: &[char]) -> Vec<String> {
    content
        .split(delimiters)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Non-empty lines of `text`, trimmed.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_items() {
        let items = split_items(" 가려움, 탈모. 발적 ;; ", ITEM_DELIMITERS);
        assert_eq!(items, vec!["가려움", "탈모", "발적"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_items("", ITEM_DELIMITERS).is_empty());
        assert!(split_items(" , . ; ", ITEM_DELIMITERS).is_empty());
    }

    #[test]
    fn test_entry_delimiters_keep_periods() {
        let items = split_items("아토피 (높음). 추가; 알러지", ENTRY_DELIMITERS);
        assert_eq!(items, vec!["아토피 (높음). 추가", "알러지"]);
    }

    #[test]
    fn test_paragraphs() {
        let text = "첫 줄\r\n\n   \n  둘째 줄  \n";
        assert_eq!(paragraphs(text), vec!["첫 줄", "둘째 줄"]);
    }
}
