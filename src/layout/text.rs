use crate::config::LayoutConfig;
use crate::text_metrics;
use crate::theme::Theme;

use super::TextBlock;

pub const ELLIPSIS: char = '…';

/// Per-character width used when the measurer cannot answer.
const FIXED_CHAR_EM: f32 = 0.6;

pub fn line_height(font_size: f32) -> f32 {
    font_size + 2.0
}

/// Vertical offsets that centre `count` lines on the anchor.
pub fn line_offsets(count: usize, font_size: f32) -> Vec<f32> {
    let step = line_height(font_size);
    let mid = count.saturating_sub(1) as f32 / 2.0;
    (0..count).map(|idx| (idx as f32 - mid) * step).collect()
}

/// Wraps `label` into at most `max_lines` lines no wider than `max_width`.
///
/// Words are packed greedily; the last line collects whatever is left and is
/// cut back with an ellipsis when it overflows. Labels without at least two
/// whitespace-separated words are broken per character instead.
pub fn wrap<F>(
    label: &str,
    max_width: f32,
    measure: F,
    font_size: f32,
    max_lines: usize,
) -> Vec<String>
where
    F: Fn(&str) -> Option<f32>,
{
    let width_of = |text: &str| safe_width(&measure, text, font_size);
    let max_lines = max_lines.max(1);
    let words: Vec<&str> = label.split_whitespace().collect();
    if words.is_empty() {
        return vec![String::new()];
    }

    let mut lines = if words.len() < 2 {
        pack_chars(words[0], max_width, &width_of, max_lines)
    } else {
        pack_words(&words, max_width, &width_of, max_lines)
    };

    for line in &mut lines {
        if width_of(line.as_str()) > max_width {
            *line = fit_with_ellipsis(line.as_str(), max_width, &width_of);
        }
    }
    lines
}

fn pack_words<W>(words: &[&str], max_width: f32, width_of: &W, max_lines: usize) -> Vec<String>
where
    W: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in words {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if lines.len() + 1 < max_lines && width_of(&candidate) > max_width {
            lines.push(std::mem::replace(&mut current, (*word).to_string()));
        } else {
            current = candidate;
        }
    }
    lines.push(current);
    lines
}

fn pack_chars<W>(word: &str, max_width: f32, width_of: &W, max_lines: usize) -> Vec<String>
where
    W: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        if !current.is_empty() && lines.len() + 1 < max_lines {
            let mut candidate = current.clone();
            candidate.push(ch);
            if width_of(&candidate) > max_width {
                lines.push(std::mem::take(&mut current));
            }
        }
        current.push(ch);
    }
    lines.push(current);
    lines
}

fn fit_with_ellipsis<W>(line: &str, max_width: f32, width_of: &W) -> String
where
    W: Fn(&str) -> f32,
{
    let mut kept: Vec<char> = line.chars().collect();
    while !kept.is_empty() {
        kept.pop();
        let head: String = kept.iter().collect();
        let candidate = format!("{}{ELLIPSIS}", head.trim_end());
        if width_of(&candidate) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

fn safe_width<F>(measure: &F, text: &str, font_size: f32) -> f32
where
    F: Fn(&str) -> Option<f32>,
{
    measure(text)
        .filter(|width| width.is_finite() && *width >= 0.0)
        .unwrap_or_else(|| text.chars().count() as f32 * font_size * FIXED_CHAR_EM)
}

/// Measurement bound to the theme's font stack, falling back to the
/// character-class approximation when fonts are unavailable or disabled.
pub fn theme_measure<'a>(
    theme: &'a Theme,
    config: &'a LayoutConfig,
) -> impl Fn(&str) -> Option<f32> + 'a {
    let font_size = config.label.font_size;
    let fast = config.label.fast_text_metrics;
    move |text: &str| {
        if fast {
            return Some(text_metrics::approximate_text_width(text, font_size));
        }
        text_metrics::measure_text_width(text, font_size, &theme.font_family)
            .or_else(|| Some(text_metrics::approximate_text_width(text, font_size)))
    }
}

pub(super) fn label_block<F>(
    label: &str,
    max_width: f32,
    measure: F,
    font_size: f32,
    max_lines: usize,
) -> TextBlock
where
    F: Fn(&str) -> Option<f32>,
{
    let lines = wrap(label, max_width, measure, font_size, max_lines);
    let offsets = line_offsets(lines.len(), font_size);
    TextBlock {
        lines,
        font_size,
        line_height: line_height(font_size),
        offsets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(text: &str) -> Option<f32> {
        Some(text.chars().count() as f32 * 6.0)
    }

    #[test]
    fn quality_assurance_review_wraps_within_budget() {
        let lines = wrap("Quality Assurance Review", 60.0, mono, 12.0, 3);
        assert_eq!(lines, vec!["Quality", "Assurance", "Review"]);
        for line in &lines {
            assert!(mono(line).unwrap() <= 60.0);
        }
    }

    #[test]
    fn short_label_stays_on_one_line() {
        assert_eq!(wrap("Mix", 60.0, mono, 12.0, 3), vec!["Mix"]);
    }

    #[test]
    fn greedy_packing_fills_lines() {
        let lines = wrap("a b c d e f", 30.0, mono, 12.0, 3);
        assert_eq!(lines, vec!["a b c", "d e f"]);
    }

    #[test]
    fn overflow_is_truncated_on_last_line() {
        let lines = wrap("one two three four five six seven", 30.0, mono, 12.0, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "one");
        assert!(lines[1].ends_with('…'));
        assert!(mono(&lines[1]).unwrap() <= 30.0);
    }

    #[test]
    fn label_without_spaces_breaks_per_character() {
        let lines = wrap("원자재위해요소기준추가", 36.0, mono, 12.0, 3);
        assert_eq!(lines, vec!["원자재위해요", "소기준추가"]);
    }

    #[test]
    fn long_unbroken_label_gets_ellipsis() {
        let lines = wrap("abcdefghijklmnopqrstuvwxyz", 30.0, mono, 12.0, 2);
        assert_eq!(lines, vec!["abcde", "fghi…"]);
    }

    #[test]
    fn oversized_single_word_line_is_truncated() {
        let lines = wrap("Supercalifragilistic mix", 60.0, mono, 12.0, 3);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Supercali…");
        assert_eq!(lines[1], "mix");
    }

    #[test]
    fn empty_label_is_one_empty_line() {
        assert_eq!(wrap("   ", 60.0, mono, 12.0, 3), vec![String::new()]);
    }

    #[test]
    fn failing_measurer_falls_back_to_fixed_width() {
        let lines = wrap("Quality Assurance Review", 60.0, |_| None, 10.0, 3);
        assert_eq!(lines, vec!["Quality", "Assurance", "Review"]);
        let nan = wrap("Quality Assurance Review", 60.0, |_| Some(f32::NAN), 10.0, 3);
        assert_eq!(nan, lines);
    }

    #[test]
    fn nothing_fits_leaves_only_the_ellipsis() {
        assert_eq!(wrap("abc", 1.0, mono, 12.0, 1), vec!["…"]);
    }

    #[test]
    fn zero_max_lines_behaves_like_one() {
        let lines = wrap("alpha beta gamma", 1000.0, mono, 12.0, 0);
        assert_eq!(lines, vec!["alpha beta gamma"]);
    }

    #[test]
    fn offsets_centre_the_block() {
        assert_eq!(line_offsets(1, 12.0), vec![0.0]);
        assert_eq!(line_offsets(2, 12.0), vec![-7.0, 7.0]);
        assert_eq!(line_offsets(3, 12.0), vec![-14.0, 0.0, 14.0]);
    }
}
