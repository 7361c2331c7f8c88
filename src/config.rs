/// Toolbar modules every editor gets
const BASE_MODULES: [&str; 9] = [
    "header",
    "color",
    "background",
    "direction",
    "align",
    "font",
    "size",
    "list",
    "link",
];

/// Switches between the editor variants (plain or colored notes, with or
/// without the image-resize toolbar) and the preview settings. The storage key
/// belongs to the `NoteStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub enable_color: bool,
    pub enable_image_resize: bool,
    pub preview_lines: usize,
    pub preview_width: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enable_color: true,
            enable_image_resize: true,
            preview_lines: 3,
            preview_width: 40,
        }
    }
}

impl SessionConfig {
    /// Modules to hand to the rich-text editor
    #[must_use]
    pub fn editor_modules(&self) -> Vec<&'static str> {
        let mut modules = BASE_MODULES.to_vec();
        modules.extend(["bold", "italic", "underline", "strike", "blockquote"]);
        modules.extend(["image", "video", "clipboard"]);
        if self.enable_image_resize {
            modules.push("imageResize");
        }
        modules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_resize_is_opt_in_per_variant() {
        let full = SessionConfig::default();
        assert!(full.editor_modules().contains(&"imageResize"));

        let plain = SessionConfig {
            enable_image_resize: false,
            ..SessionConfig::default()
        };
        assert!(!plain.editor_modules().contains(&"imageResize"));
        assert!(plain.editor_modules().contains(&"image"));
    }
}
