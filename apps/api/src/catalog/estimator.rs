//! Capacity estimation — how much text a slot can visually hold.
//!
//! Character widths are approximated as a fixed ratio of font size per font
//! family. The ratios are averages measured from the families we ship
//! templates in; they are configurable constants, not physical law, and the
//! 10% safety margin absorbs the residual error. Real glyph metrics are out
//! of scope.

/// `(family, average char width as a fraction of font size)`.
///
/// Matched case-insensitively on the full family name.
const CHAR_WIDTH_RATIOS: &[(&str, f32)] = &[
    ("inter", 0.52),
    ("roboto", 0.51),
    ("lato", 0.55),
    ("montserrat", 0.58),
    ("oswald", 0.35),
    ("eb garamond", 0.44),
    ("computer modern", 0.47),
    ("georgia", 0.50),
    ("courier new", 0.60),
];

/// Fallback ratio for families not in the table.
pub const DEFAULT_CHAR_WIDTH_RATIO: f32 = 0.52;

const LINE_HEIGHT_FACTOR: f32 = 1.2;
const SAFETY_MARGIN: f32 = 0.9;
const MIN_BOX_CHARS: u32 = 10;
const MAX_BOX_CHARS: u32 = 400;

/// Bounds applied to a slot's current content length before deriving the
/// word baseline; empty slots are treated as if they held 60 characters.
const CONTENT_LEN_FALLBACK: usize = 60;
const CONTENT_LEN_MIN: usize = 20;
const CONTENT_LEN_MAX: usize = 400;
const CHARS_PER_WORD: f64 = 5.0;
const MIN_WORD_BASELINE: u32 = 4;

/// Average character width ratio for a font family.
pub fn char_width_ratio(family: &str) -> f32 {
    let lower = family.trim().to_lowercase();
    CHAR_WIDTH_RATIOS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, ratio)| *ratio)
        .unwrap_or(DEFAULT_CHAR_WIDTH_RATIO)
}

/// Characters that fit on a single line of the given box width.
pub fn line_char_capacity(font_size: f32, family: &str, width: f32) -> u32 {
    let avg_char_width = font_size.max(1.0) * char_width_ratio(family);
    ((width / avg_char_width).floor() as u32).max(1)
}

/// Characters the whole box can hold: lines × chars-per-line, reduced by the
/// safety margin and clamped to [10, 400].
pub fn box_char_capacity(font_size: f32, family: &str, width: f32, height: f32) -> u32 {
    let line_height = font_size.max(1.0) * LINE_HEIGHT_FACTOR;
    let lines = ((height / line_height).floor() as u32).max(1);
    let per_line = line_char_capacity(font_size, family, width);
    let raw = (lines as f32 * per_line as f32 * SAFETY_MARGIN).floor() as u32;
    raw.clamp(MIN_BOX_CHARS, MAX_BOX_CHARS)
}

/// Word-count baseline for a slot, seeded from its *current* content length
/// under the rough 5-characters-per-word heuristic — deliberately not from
/// the box geometry.
pub fn word_baseline(current_text_len: usize) -> u32 {
    let len = if current_text_len == 0 {
        CONTENT_LEN_FALLBACK
    } else {
        current_text_len
    }
    .clamp(CONTENT_LEN_MIN, CONTENT_LEN_MAX);
    ((len as f64 / CHARS_PER_WORD).round() as u32).max(MIN_WORD_BASELINE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_families_use_table_ratio() {
        assert_eq!(char_width_ratio("Inter"), 0.52);
        assert_eq!(char_width_ratio("OSWALD"), 0.35);
        assert_eq!(char_width_ratio(" EB Garamond "), 0.44);
    }

    #[test]
    fn test_unlisted_family_uses_default_ratio() {
        assert_eq!(char_width_ratio("Wingdings"), DEFAULT_CHAR_WIDTH_RATIO);
    }

    #[test]
    fn test_line_capacity_matches_formula() {
        // 400 / (16 * 0.52) = 48.07… → 48
        assert_eq!(line_char_capacity(16.0, "Inter", 400.0), 48);
    }

    #[test]
    fn test_box_capacity_applies_margin_and_clamps() {
        // 16pt Inter in a 400×96 box: 5 lines × 48 chars × 0.9 = 216
        assert_eq!(box_char_capacity(16.0, "Inter", 400.0, 96.0), 216);
        // Tiny box floors at 10.
        assert_eq!(box_char_capacity(40.0, "Inter", 30.0, 20.0), 10);
        // Huge box ceilings at 400.
        assert_eq!(box_char_capacity(10.0, "Inter", 2000.0, 2000.0), 400);
    }

    #[test]
    fn test_capacity_monotonic_in_width_and_height() {
        let base = box_char_capacity(16.0, "Inter", 300.0, 100.0);
        for w in [300, 350, 420, 600, 900] {
            let cap = box_char_capacity(16.0, "Inter", w as f32, 100.0);
            assert!(cap >= base, "wider box must never hold fewer chars");
        }
        let mut prev = 0;
        for h in [40, 80, 120, 240] {
            let cap = box_char_capacity(16.0, "Inter", 300.0, h as f32);
            assert!(cap >= prev, "taller box must never hold fewer chars");
            prev = cap;
        }
    }

    #[test]
    fn test_capacity_anti_monotonic_in_font_size() {
        let mut prev = u32::MAX;
        for size in [12, 16, 24, 40, 64] {
            let cap = box_char_capacity(size as f32, "Inter", 400.0, 200.0);
            assert!(cap <= prev, "larger font must never hold more chars");
            prev = cap;
        }
    }

    #[test]
    fn test_word_baseline_five_chars_per_word() {
        assert_eq!(word_baseline(100), 20);
        assert_eq!(word_baseline(250), 50);
    }

    #[test]
    fn test_word_baseline_bounds() {
        // Empty content uses the 60-char fallback → 12 words.
        assert_eq!(word_baseline(0), 12);
        // Short content clamps at 20 chars → 4 words (also the floor).
        assert_eq!(word_baseline(3), 4);
        // Long content clamps at 400 chars → 80 words.
        assert_eq!(word_baseline(10_000), 80);
    }

    #[test]
    fn test_capacities_always_positive() {
        assert!(line_char_capacity(200.0, "Inter", 1.0) >= 1);
        assert!(box_char_capacity(200.0, "Inter", 1.0, 1.0) >= MIN_BOX_CHARS);
        assert!(word_baseline(1) >= MIN_WORD_BASELINE);
    }
}
