//! Fitting text to the fixed-width rows of the display.

/// Separator used by streams that put "Artist - Title" into a single tag.
pub const ARTIST_TITLE_SEPARATOR: &str = " - ";

/// Center `text` in exactly `width` characters.
///
/// Text longer than `width` is cut at the right. When the padding is odd the
/// extra blank goes on the right. Characters are passed through as they are.
pub fn center(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().take(width).collect();
    let padding = width - chars.len();
    let left = padding / 2;
    let right = padding - left;

    let mut centered = String::with_capacity(width + text.len());
    centered.extend(std::iter::repeat_n(' ', left));
    centered.extend(chars);
    centered.extend(std::iter::repeat_n(' ', right));
    centered
}

/// Split now-playing metadata into (line 1, line 2).
///
/// With an artist tag the pair is returned as is. Without one the title is
/// split on the first [`ARTIST_TITLE_SEPARATOR`]; a title that legitimately
/// contains the separator gets split too, and one without it goes to line 2.
pub fn derive_lines(title: &str, artist: &str) -> (String, String) {
    if !artist.is_empty() {
        return (artist.to_string(), title.to_string());
    }

    match title.split_once(ARTIST_TITLE_SEPARATOR) {
        Some((artist, title)) => (artist.to_string(), title.to_string()),
        None => (String::new(), title.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_balances_padding() {
        assert_eq!(center("pause", 16), "     pause      ");
        assert_eq!(center("Radio One", 16), "   Radio One    ");
        assert_eq!(center("abcd", 8), "  abcd  ");
    }

    #[test]
    fn test_center_always_fills_width() {
        for text in ["", "a", "Morning Show", "exactly16chars!!", "much longer than the row"] {
            let centered = center(text, 16);
            assert_eq!(centered.chars().count(), 16, "{:?}", text);
        }
    }

    #[test]
    fn test_center_truncates_long_text() {
        assert_eq!(center("Bohemian Rhapsody (Remastered)", 16), "Bohemian Rhapsod");
        assert_eq!(center("anything", 0), "");
    }

    #[test]
    fn test_center_counts_characters_not_bytes() {
        assert_eq!(center("¯\\(°_o)/¯", 11), " ¯\\(°_o)/¯ ");
    }

    #[test]
    fn test_center_passes_control_characters_through() {
        assert_eq!(center("a\u{7}b", 5), " a\u{7}b ");
    }

    #[test]
    fn test_derive_lines_prefers_artist_tag() {
        assert_eq!(
            derive_lines("Song B", "Artist A"),
            ("Artist A".to_string(), "Song B".to_string())
        );
        // Title is kept whole when the artist is known.
        assert_eq!(
            derive_lines("Live - 1977", "Artist A"),
            ("Artist A".to_string(), "Live - 1977".to_string())
        );
    }

    #[test]
    fn test_derive_lines_splits_stream_titles() {
        assert_eq!(
            derive_lines("Artist A - Song B", ""),
            ("Artist A".to_string(), "Song B".to_string())
        );
        assert_eq!(
            derive_lines("Radio One - Morning Show - Part 2", ""),
            ("Radio One".to_string(), "Morning Show - Part 2".to_string())
        );
    }

    #[test]
    fn test_derive_lines_without_separator() {
        assert_eq!(
            derive_lines("No Separator Here", ""),
            (String::new(), "No Separator Here".to_string())
        );
        assert_eq!(derive_lines("", ""), (String::new(), String::new()));
        // Hyphen without surrounding blanks is not a separator.
        assert_eq!(
            derive_lines("Jay-Z", ""),
            (String::new(), "Jay-Z".to_string())
        );
    }
}
