//! Chart output through plotly. The plotly.js bundle is inlined, so a
//! written page opens without network access.

use crate::Result;
use crate::chart::{Chart, Series};
use crate::theme::Theme;
use crate::types::DISPLAY_FORMAT;
use plotly::common::{Anchor, Font, HoverInfo, Line, Mode, Title};
use plotly::layout::{Axis, HoverMode, Legend, RangeMode};
use plotly::{Layout, Plot, Scatter};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// One line trace per series. Missing values serialize as `null`, which
/// breaks the line instead of bridging the gap.
fn trace(series: &Series, theme: &Theme) -> Box<Scatter<Option<String>, Option<f64>>> {
    let times: Vec<Option<String>> = series
        .points
        .iter()
        .map(|p| p.time.map(|t| t.format(DISPLAY_FORMAT).to_string()))
        .collect();
    let values: Vec<Option<f64>> = series.points.iter().map(|p| p.value).collect();
    let hover: Vec<String> = series
        .hover_text
        .iter()
        .map(|text| text.clone().unwrap_or_default())
        .collect();

    Scatter::new(times, values)
        .mode(Mode::Lines)
        .name(series.name.as_str())
        .line(Line::new().color(series.color).width(theme.line_width))
        .hover_text_array(hover)
        .hover_info(HoverInfo::Text)
}

fn axis(label: &str, theme: &Theme) -> Axis {
    Axis::new()
        .title(Title::from(label))
        .show_grid(true)
        .grid_width(theme.grid_width)
        .grid_color(theme.grid_color)
        .zero_line(false)
}

fn layout(chart: &Chart) -> Layout {
    let theme = &chart.theme;
    let legend = Legend::new()
        .x(0.01)
        .x_anchor(Anchor::Left)
        .y(0.99)
        .y_anchor(Anchor::Top)
        .background_color(theme.legend_background)
        .border_color(theme.legend_border)
        .border_width(theme.legend_border_width);

    Layout::new()
        .title(Title::from(chart.title.as_str()))
        .hover_mode(HoverMode::Closest)
        .legend(legend)
        .plot_background_color(theme.plot_background)
        .paper_background_color(theme.paper_background)
        .font(Font::new().color(theme.font_color).family(theme.font_family))
        .x_axis(axis(&chart.x_label, theme))
        .y_axis(axis(&chart.y_label, theme).range_mode(RangeMode::ToZero))
}

/// Builds the plotly figure for a chart.
pub fn to_plot(chart: &Chart) -> Plot {
    let mut plot = Plot::new();
    // plotly.js is inlined by default under the `plotly_embed_js` feature.
    for series in &chart.series {
        plot.add_trace(trace(series, &chart.theme));
    }
    plot.set_layout(layout(chart));
    debug!(traces = chart.series.len(), "plot assembled");
    plot
}

pub fn to_html(chart: &Chart) -> String {
    to_plot(chart).to_html()
}

pub fn write_html(chart: &Chart, path: &Path) -> Result<()> {
    fs::write(path, to_html(chart))?;
    info!(path = %path.display(), "chart written");
    Ok(())
}

/// Opens the chart in the default browser.
pub fn show(chart: &Chart) {
    to_plot(chart).show();
}
