//! Fixed visual theme shared by every chart.

pub const OFF_WHITE: &str = "#FDFDFD";
pub const LIGHT_SAGE_GRAY: &str = "#DBE0D7";
pub const WARM_TAN: &str = "#BBA178";
pub const MUTED_SAGE_GREEN: &str = "#8C9785";
pub const COOL_BLUE_GRAY: &str = "#BACCCC";
pub const SLATE_BLUE_GRAY: &str = "#5A6876";
pub const CHARCOAL: &str = "#201C1A";

/// The named palette, in declaration order.
pub static NAMED_COLORS: [(&str, &str); 7] = [
    ("off_white", OFF_WHITE),
    ("light_sage_gray", LIGHT_SAGE_GRAY),
    ("warm_tan", WARM_TAN),
    ("muted_sage_green", MUTED_SAGE_GREEN),
    ("cool_blue_gray", COOL_BLUE_GRAY),
    ("slate_blue_gray", SLATE_BLUE_GRAY),
    ("charcoal", CHARCOAL),
];

/// Series colors, cycled by series position.
pub static PALETTE: [&str; 5] = [
    SLATE_BLUE_GRAY,
    WARM_TAN,
    COOL_BLUE_GRAY,
    MUTED_SAGE_GREEN,
    LIGHT_SAGE_GRAY,
];

pub fn series_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Layout colors and sizes applied to the whole chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub plot_background: &'static str,
    pub paper_background: &'static str,
    pub font_color: &'static str,
    pub font_family: &'static str,
    pub grid_color: &'static str,
    pub grid_width: usize,
    pub legend_background: &'static str,
    pub legend_border: &'static str,
    pub legend_border_width: usize,
    pub line_width: f64,
}

pub const THEME: Theme = Theme {
    plot_background: OFF_WHITE,
    paper_background: OFF_WHITE,
    font_color: CHARCOAL,
    font_family: "Arial, sans-serif",
    grid_color: LIGHT_SAGE_GRAY,
    grid_width: 1,
    legend_background: "rgba(253, 253, 253, 0.8)",
    legend_border: LIGHT_SAGE_GRAY,
    legend_border_width: 1,
    line_width: 2.5,
};

impl Default for Theme {
    fn default() -> Self {
        THEME
    }
}
