//! Static glyph-width tables for the two PDF base fonts used by the report.
//!
//! Widths are in thousandths of an em, taken from the standard Adobe font
//! metrics for Helvetica and Helvetica-Bold. Tables cover ASCII 0x20..=0x7E.
//! Index = (char as usize) - 32. Anything else measures as `FALLBACK_WIDTH`.

const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    fn table(self) -> &'static [u16; 95] {
        match self {
            FontWeight::Regular => &HELVETICA,
            FontWeight::Bold => &HELVETICA_BOLD,
        }
    }
}

/// Width of `text` in points at `size_pt`.
pub fn text_width_pt(text: &str, weight: FontWeight, size_pt: f32) -> f32 {
    let table = weight.table();
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as usize;
            if (32..=126).contains(&code) {
                table[code - 32] as u32
            } else {
                FALLBACK_WIDTH as u32
            }
        })
        .sum();
    units as f32 * size_pt / 1000.0
}

/// Greedy word wrap to `max_width_pt`. Words wider than a line are split by character.
pub fn wrap_text(text: &str, weight: FontWeight, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width_pt(&candidate, weight, size_pt) <= max_width_pt {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width_pt(word, weight, size_pt) <= max_width_pt {
            current = word.to_string();
        } else {
            for c in word.chars() {
                current.push(c);
                if current.chars().count() > 1
                    && text_width_pt(&current, weight, size_pt) > max_width_pt
                {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_has_zero_width() {
        assert_eq!(text_width_pt("", FontWeight::Regular, 11.0), 0.0);
    }

    #[test]
    fn test_known_glyph_widths() {
        // "W" is 944 units in both weights.
        assert!((text_width_pt("W", FontWeight::Regular, 10.0) - 9.44).abs() < 1e-4);
        assert!((text_width_pt("W", FontWeight::Bold, 10.0) - 9.44).abs() < 1e-4);
        // "i" is narrower in regular than in bold.
        assert!(
            text_width_pt("i", FontWeight::Regular, 10.0)
                < text_width_pt("i", FontWeight::Bold, 10.0)
        );
    }

    #[test]
    fn test_non_ascii_uses_fallback_width() {
        let w = text_width_pt("é", FontWeight::Regular, 10.0);
        assert!((w - 5.56).abs() < 1e-4);
    }

    #[test]
    fn test_short_text_stays_on_one_line() {
        let lines = wrap_text("Rust engineer", FontWeight::Regular, 11.0, 400.0);
        assert_eq!(lines, vec!["Rust engineer"]);
    }

    #[test]
    fn test_long_text_wraps_within_width() {
        let text = "Built and operated event-driven payment services across three regions \
                    with strict latency budgets and on-call ownership for the platform team";
        let lines = wrap_text(text, FontWeight::Regular, 11.0, 200.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_pt(line, FontWeight::Regular, 11.0) <= 200.0);
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_overlong_word_is_split() {
        let word = "a".repeat(200);
        let lines = wrap_text(&word, FontWeight::Regular, 11.0, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_whitespace_only_yields_no_lines() {
        assert!(wrap_text("  \n\t ", FontWeight::Regular, 11.0, 100.0).is_empty());
    }
}
