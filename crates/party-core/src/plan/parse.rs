//! Free-text plan parser.
//!
//! Turns a loosely formatted text plan (markdown-ish headings and bullet
//! lists, as produced by a person or a language model) into a [`Plan`]:
//! - A heading line naming a category, in any supported language, opens
//!   that category. `Venue: big hall` opens the category and keeps the
//!   trailing text as its first entry.
//! - Every other non-empty line is cleaned and appended to the open category.
//! - Lines before the first heading are ignored.

use thiserror::Error;

use crate::i18n::{Dictionary, Language};

use super::{Category, Plan};

/// Errors that can occur while parsing a text plan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanParseError {
    #[error("plan text is empty")]
    Empty,

    #[error("no plan category heading found (expected e.g. \"Venue\" or \"场地布置\")")]
    NoSections,
}

/// Strip markdown decoration from a single line.
///
/// Removes heading markers, list bullets, leading ordinals (`1.`, `2)`,
/// `3、`, `(4)`, `一、`), emphasis markers and inline code ticks.
pub fn clean_text(line: &str) -> String {
    let mut s = line.trim();
    if is_thematic_break(s) {
        return String::new();
    }
    s = s.trim_start_matches('#').trim_start();
    if let Some(rest) = s.strip_prefix(['-', '*', '+', '•', '·']) {
        if rest.starts_with(char::is_whitespace) {
            s = rest.trim_start();
        }
    }
    s = strip_ordinal(s);

    let cleaned: String = s.replace("**", "").replace("__", "").replace('`', "");
    let cleaned = cleaned.trim();
    unwrap_emphasis(cleaned).trim().to_owned()
}

/// `---`, `***`, `___` (optionally spaced): a markdown horizontal rule.
fn is_thematic_break(s: &str) -> bool {
    let mut marks = s.chars().filter(|c| !c.is_whitespace());
    let Some(first) = marks.next() else {
        return false;
    };
    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    matches!(first, '-' | '*' | '_') && count >= 3
}

/// Strip one `*` or `_` wrapped around the whole line.
fn unwrap_emphasis(s: &str) -> &str {
    for mark in ['*', '_'] {
        if let Some(inner) = s.strip_prefix(mark).and_then(|rest| rest.strip_suffix(mark)) {
            if !inner.trim().is_empty() {
                return inner;
            }
        }
    }
    s
}

fn strip_ordinal(s: &str) -> &str {
    // (1) / （1）
    for (open, close) in [('(', ')'), ('（', '）')] {
        let Some(rest) = s.strip_prefix(open) else {
            continue;
        };
        if let Some(end) = rest.find(close) {
            let inner = &rest[..end];
            if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit()) {
                return rest[end + close.len_utf8()..].trim_start();
            }
        }
    }

    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    let numerals = s.chars().take_while(|c| is_cjk_numeral(*c)).count();
    let prefix_len = if digits > 0 {
        digits
    } else if numerals > 0 {
        s.chars().take(numerals).map(char::len_utf8).sum()
    } else {
        return s;
    };

    let rest = &s[prefix_len..];
    match rest.chars().next() {
        Some(sep @ ('、' | '）')) => rest[sep.len_utf8()..].trim_start(),
        // `1.5 hours` is a number, not an ordinal.
        Some(sep @ ('.' | ')' | '．')) => {
            let after = &rest[sep.len_utf8()..];
            if after.is_empty() || after.starts_with(char::is_whitespace) {
                after.trim_start()
            } else {
                s
            }
        }
        _ => s,
    }
}

fn is_cjk_numeral(c: char) -> bool {
    matches!(
        c,
        '一' | '二' | '三' | '四' | '五' | '六' | '七' | '八' | '九' | '十'
    )
}

/// Match a cleaned line against the category headings of every language.
///
/// Returns the category and any text following a `:` on the same line.
fn match_heading(line: &str, headings: &[(Category, Vec<String>)]) -> Option<(Category, String)> {
    let (head, tail) = match line.split_once([':', '：']) {
        Some((head, tail)) => (head.trim(), tail.trim()),
        None => (line.trim(), ""),
    };
    let head = head.to_lowercase();
    headings
        .iter()
        .find(|(_, names)| names.iter().any(|n| *n == head))
        .map(|(category, _)| (*category, tail.to_owned()))
}

fn all_headings() -> Vec<(Category, Vec<String>)> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let names = Language::ALL
                .into_iter()
                .flat_map(|lang| Dictionary::load(lang).list(&format!("headings.{}", category.key())))
                .map(|name| name.to_lowercase())
                .collect();
            (category, names)
        })
        .collect()
}

/// Parse a free-text plan into its six categories.
pub fn parse_plan_text(text: &str) -> Result<Plan, PlanParseError> {
    if text.trim().is_empty() {
        return Err(PlanParseError::Empty);
    }

    let headings = all_headings();
    let mut plan = Plan::default();
    let mut current: Option<Category> = None;
    let mut seen_heading = false;

    for raw in text.lines() {
        let line = clean_text(raw);
        if line.is_empty() {
            continue;
        }

        if let Some((category, tail)) = match_heading(&line, &headings) {
            current = Some(category);
            seen_heading = true;
            if !tail.is_empty() {
                plan.section_mut(category).push(tail);
            }
            continue;
        }

        match current {
            Some(category) => plan.section_mut(category).push(line),
            None => tracing::trace!(line = %line, "skipping text before first heading"),
        }
    }

    if !seen_heading {
        return Err(PlanParseError::NoSections);
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_markdown() {
        assert_eq!(clean_text("  ## **Venue**  "), "Venue");
        assert_eq!(clean_text("- balloons"), "balloons");
        assert_eq!(clean_text("* `cake` table"), "cake table");
        assert_eq!(clean_text("1. arrive early"), "arrive early");
        assert_eq!(clean_text("12) wrap up"), "wrap up");
        assert_eq!(clean_text("(3) raffle"), "raffle");
        assert_eq!(clean_text("一、场地布置"), "场地布置");
        assert_eq!(clean_text("2、签到"), "签到");
    }

    #[test]
    fn clean_text_keeps_times_and_plain_numbers() {
        assert_eq!(clean_text("0:30-1:00 opening"), "0:30-1:00 opening");
        assert_eq!(clean_text("30 guests"), "30 guests");
    }

    #[test]
    fn clean_text_keeps_decimals() {
        assert_eq!(clean_text("1.5 hours of dancing"), "1.5 hours of dancing");
        assert_eq!(clean_text("3.14"), "3.14");
        assert_eq!(clean_text("- 2.5 kg of cake"), "2.5 kg of cake");
        assert_eq!(clean_text("4) 1.5 hours of dancing"), "1.5 hours of dancing");
        assert_eq!(clean_text("7."), "");
    }

    #[test]
    fn clean_text_unwraps_single_emphasis() {
        assert_eq!(clean_text("*Venue*"), "Venue");
        assert_eq!(clean_text("_Music_"), "Music");
        assert_eq!(clean_text("- *bring* snacks"), "*bring* snacks");
        assert_eq!(clean_text("**"), "");
    }

    #[test]
    fn horizontal_rules_are_dropped() {
        assert_eq!(clean_text("---"), "");
        assert_eq!(clean_text("* * *"), "");
        assert_eq!(clean_text("___"), "");
        assert_eq!(clean_text("--"), "--");

        let plan = parse_plan_text("## Venue\n- hall\n---\n## Music\n- DJ").unwrap();
        assert_eq!(plan.venue, ["hall"]);
        assert_eq!(plan.music, ["DJ"]);
    }

    #[test]
    fn emphasised_heading_opens_section() {
        let plan = parse_plan_text("*Venue*\n- hall").unwrap();
        assert_eq!(plan.venue, ["hall"]);
    }

    #[test]
    fn parses_markdown_sections() {
        let text = "\
Here is your plan!

## Venue
- Rent the community hall
- Set up a photo wall

## Music
1. Jazz trio
2. Dance playlist

### Schedule: 6pm start
";
        let plan = parse_plan_text(text).unwrap();
        assert_eq!(plan.venue, ["Rent the community hall", "Set up a photo wall"]);
        assert_eq!(plan.music, ["Jazz trio", "Dance playlist"]);
        assert_eq!(plan.schedule, ["6pm start"]);
        assert!(plan.activities.is_empty());
    }

    #[test]
    fn parses_chinese_headings() {
        let text = "一、场地布置\n- 室内大厅\n二、餐饮建议：自助餐\n- 甜品台";
        let plan = parse_plan_text(text).unwrap();
        assert_eq!(plan.venue, ["室内大厅"]);
        assert_eq!(plan.catering, ["自助餐", "甜品台"]);
    }

    #[test]
    fn headings_are_case_insensitive() {
        let plan = parse_plan_text("TIMELINE\n- noon").unwrap();
        assert_eq!(plan.schedule, ["noon"]);
    }

    #[test]
    fn empty_and_headingless_inputs_fail() {
        assert_eq!(parse_plan_text("  \n "), Err(PlanParseError::Empty));
        assert_eq!(
            parse_plan_text("just some words\n- and a bullet"),
            Err(PlanParseError::NoSections)
        );
    }
}
