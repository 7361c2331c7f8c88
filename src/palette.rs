/// Background colors a note can take, in swatch order. The first entry is the default.
pub const PALETTE: [&str; 10] = [
    "#ffffff", // White
    "#f28b82", // Red
    "#fbbc04", // Orange
    "#fff475", // Yellow
    "#ccff90", // Green
    "#a7ffeb", // Teal
    "#cbf0f8", // Blue
    "#aecbfa", // Dark Blue
    "#d7aefb", // Purple
    "#fdcfe8", // Pink
];

pub const DEFAULT_COLOR: &str = PALETTE[0];

#[must_use]
pub fn contains(color: &str) -> bool {
    PALETTE.iter().any(|c| c.eq_ignore_ascii_case(color))
}

/// Human name for a palette entry, used when listing swatches in the terminal
#[must_use]
pub fn name(color: &str) -> Option<&'static str> {
    let idx = PALETTE.iter().position(|c| c.eq_ignore_ascii_case(color))?;
    Some(
        [
            "White",
            "Red",
            "Orange",
            "Yellow",
            "Green",
            "Teal",
            "Blue",
            "Dark Blue",
            "Purple",
            "Pink",
        ][idx],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_first_swatch() {
        assert_eq!(DEFAULT_COLOR, "#ffffff");
        assert_eq!(name(DEFAULT_COLOR), Some("White"));
    }

    #[test]
    fn lookup_ignores_hex_case() {
        assert!(contains("#D7AEFB"));
        assert_eq!(name("#D7AEFB"), Some("Purple"));
        assert!(!contains("#000000"));
        assert_eq!(name("red"), None);
    }
}
