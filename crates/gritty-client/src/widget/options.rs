/// Fixed construction options of the terminal widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetOptions {
    /// Lines of history kept above the viewport.
    pub scrollback: usize,
    pub tab_stop_width: u16,
    pub theme: &'static str,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            scrollback: 1000,
            tab_stop_width: 4,
            theme: GRITTY_THEME.name,
        }
    }
}

impl WidgetOptions {
    /// Resolve the theme name. Unknown names fall back to the gritty theme.
    pub fn resolve_theme(&self) -> &'static Theme {
        BUILT_IN_THEMES
            .iter()
            .find(|theme| theme.name == self.theme)
            .unwrap_or(&GRITTY_THEME)
    }
}

/// Default colours pushed to the host terminal while the widget is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub foreground: &'static str,
    pub background: &'static str,
    pub cursor: &'static str,
}

pub const GRITTY_THEME: Theme = Theme {
    name: "gritty",
    foreground: "#d3d7cf",
    background: "#1d1f21",
    cursor: "#a0a0a0",
};

const BUILT_IN_THEMES: &[Theme] = &[GRITTY_THEME];

impl Theme {
    /// OSC 10/11/12 sequences setting foreground, background and cursor.
    pub fn apply_sequence(&self) -> String {
        format!(
            "\x1b]10;{}\x07\x1b]11;{}\x07\x1b]12;{}\x07",
            self.foreground, self.background, self.cursor
        )
    }

    /// OSC 110/111/112 sequences restoring the host terminal's own colours.
    pub fn reset_sequence() -> &'static str {
        "\x1b]110\x07\x1b]111\x07\x1b]112\x07"
    }
}
