//! Structured-field lookup: `label : value` anchors in free text.
//!
//! Patterns are compiled with the `regex` crate (finite automata, no
//! backtracking), and every quantifier between label words is bounded, so
//! a scan stays linear in the length of the report.

use regex::Regex;

use vetsight_core::{Result, SectionLabels};

/// Gap allowed between two words of a label: a few non-newline, non-colon chars.
const WORD_GAP: &str = r"[^\n:]{0,16}?";

/// Line prefixes that end a multi-line block.
const BULLET_MARKERS: &[char] = &['-', '•'];

/// Compiled matchers for one field label.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    anchor: Regex,
    token: Regex,
    line: Regex,
}

impl LabelPattern {
    pub fn compile(label: &str) -> Result<Self> {
        let label_re = label
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(WORD_GAP);

        Ok(Self {
            anchor: Regex::new(&format!(r"(?i){}\s*:[^\S\n]*", label_re))?,
            token: Regex::new(&format!(r"(?i){}\s*:\s*(\S+)", label_re))?,
            line: Regex::new(&format!(r"(?i){}\s*:\s*([^\n]+)", label_re))?,
        })
    }

    /// First whitespace-delimited token after the separator.
    pub fn token<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.token
            .captures(text)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
    }

    /// Rest of the line after the first occurrence, trimmed.
    pub fn line<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.lines(text).next()
    }

    /// Rest of the line after every occurrence, in document order.
    pub fn lines<'r, 't>(&'r self, text: &'t str) -> impl Iterator<Item = &'t str> + 'r
    where
        't: 'r,
    {
        self.line
            .captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().trim())
    }

    /// Lines of the block that follows the separator, trimmed.
    ///
    /// With a value on the label line, the block runs to the next bullet
    /// line or end of text. With nothing after the separator, the block is
    /// the list nested under the label: it ends at a blank line or at a
    /// bullet indented no deeper than the label line, and bullet markers
    /// are stripped.
    ///
    /// Returns `None` when the label is absent or the block is blank.
    pub fn block<'t>(&self, text: &'t str) -> Option<Vec<&'t str>> {
        let found = self.anchor.find(text)?;
        let line_start = text[..found.start()].rfind('\n').map_or(0, |i| i + 1);
        let label_indent = indent(&text[line_start..found.start()]);

        let mut lines = text[found.end()..].lines();
        let head = lines.next().unwrap_or("").trim();

        let mut items = Vec::new();
        if head.is_empty() {
            for line in lines {
                let body = line.trim();
                if body.is_empty() {
                    break;
                }
                match body.strip_prefix(BULLET_MARKERS) {
                    Some(_) if indent(line) <= label_indent => break,
                    Some(item) => items.push(item.trim()),
                    None => items.push(body),
                }
            }
        } else {
            items.push(head);
            for line in lines {
                let body = line.trim();
                if body.starts_with(BULLET_MARKERS) {
                    break;
                }
                items.push(body);
            }
        }

        items.retain(|item| !item.is_empty());
        if items.is_empty() {
            None
        } else {
            Some(items)
        }
    }
}

fn indent(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Matchers for every configured section label.
#[derive(Debug, Clone)]
pub struct SectionPatterns {
    pub severity_assessment: LabelPattern,
    pub urgency: LabelPattern,
    pub key_findings: LabelPattern,
    pub medical_signs: LabelPattern,
    pub likely_diseases: LabelPattern,
    pub differential_diagnosis: LabelPattern,
}

impl SectionPatterns {
    pub fn compile(labels: &SectionLabels) -> Result<Self> {
        Ok(Self {
            severity_assessment: LabelPattern::compile(&labels.severity_assessment)?,
            urgency: LabelPattern::compile(&labels.urgency)?,
            key_findings: LabelPattern::compile(&labels.key_findings)?,
            medical_signs: LabelPattern::compile(&labels.medical_signs)?,
            likely_diseases: LabelPattern::compile(&labels.likely_diseases)?,
            differential_diagnosis: LabelPattern::compile(&labels.differential_diagnosis)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_after_label() {
        let p = LabelPattern::compile("심각도 평가").unwrap();
        assert_eq!(p.token("- 심각도 평가: 높음 (피부염)"), Some("높음"));
        assert_eq!(p.token("심각도평가 :  응급"), Some("응급"));
        assert_eq!(p.token("심각도는 중간입니다"), None);
    }

    #[test]
    fn test_label_is_case_insensitive() {
        let p = LabelPattern::compile("Severity Assessment").unwrap();
        assert_eq!(p.token("SEVERITY   assessment: high"), Some("high"));
    }

    #[test]
    fn test_label_words_allow_short_gap() {
        let p = LabelPattern::compile("가능성 높은 질병").unwrap();
        assert_eq!(
            p.line("가능성이 가장 높은 질병: 아토피 (높음)"),
            Some("아토피 (높음)")
        );
    }

    #[test]
    fn test_lines_returns_every_occurrence() {
        let p = LabelPattern::compile("감별진단").unwrap();
        let text = "감별진단: 옴\n설명\n감별진단: 모낭충증, 곰팡이 감염  \n";
        let found: Vec<&str> = p.lines(text).collect();
        assert_eq!(found, vec!["옴", "모낭충증, 곰팡이 감염"]);
    }

    #[test]
    fn test_label_special_chars_are_literal() {
        let p = LabelPattern::compile("dx (main)").unwrap();
        assert_eq!(p.line("dx (main): otitis"), Some("otitis"));
        assert_eq!(p.line("dx main: otitis"), None);
    }

    #[test]
    fn test_block_stops_at_next_bullet() {
        let p = LabelPattern::compile("발견된 의학적 징후").unwrap();
        let text = "- 발견된 의학적 징후: 피부 발적\n  눈 충혈, 기침\n- 심각도 평가: 중간\n";
        assert_eq!(p.block(text), Some(vec!["피부 발적", "눈 충혈, 기침"]));
    }

    #[test]
    fn test_block_runs_to_end_of_text() {
        let p = LabelPattern::compile("발견된 의학적 징후").unwrap();
        assert_eq!(p.block("발견된 의학적 징후: 탈모"), Some(vec!["탈모"]));
    }

    #[test]
    fn test_block_nested_bullet_list() {
        let p = LabelPattern::compile("발견된 의학적 징후").unwrap();
        let text = "- 주요 발견사항: 귀 발적\n- 발견된 의학적 징후:\n  - 피부 발적\n  • 눈 충혈\n- 심각도 평가: 중간";
        assert_eq!(p.block(text), Some(vec!["피부 발적", "눈 충혈"]));
    }

    #[test]
    fn test_block_nested_list_ends_at_blank_line() {
        let p = LabelPattern::compile("발견된 의학적 징후").unwrap();
        let text = "발견된 의학적 징후:\n  - 탈모\n  부분적 발적\n\n  - 다음 문단";
        assert_eq!(p.block(text), Some(vec!["탈모", "부분적 발적"]));
    }

    #[test]
    fn test_block_blank_is_none() {
        let p = LabelPattern::compile("발견된 의학적 징후").unwrap();
        assert_eq!(p.block("발견된 의학적 징후:\n- 다음 항목"), None);
        assert_eq!(p.block("징후 없음"), None);
    }
}
