// SVG chart renderer
// Author: Gabriel Demetrios Lafis

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use super::{
    BarChart, BoxPlot, Chart, ChartError, ChartGrid, ChartImage, ChartRenderer, Heatmap,
    Orientation, ScatterChart,
};

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(70, 130, 180);
const BOX_COLOR: RGBColor = RGBColor(173, 216, 230);
const TREND_COLOR: RGBColor = RGBColor(214, 39, 40);
const MARKER_COLORS: [RGBColor; 3] = [
    RGBColor(214, 39, 40),
    RGBColor(44, 160, 44),
    RGBColor(148, 103, 189),
];
const GRID_TITLE_HEIGHT: u32 = 40;

/// Renders charts as standalone SVG documents
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    panel_width: u32,
    panel_height: u32,
}

impl SvgRenderer {
    /// Create a renderer drawing each panel at the given size in pixels
    pub fn new(panel_width: u32, panel_height: u32) -> Self {
        SvgRenderer {
            panel_width: panel_width.max(100),
            panel_height: panel_height.max(100),
        }
    }

    fn size(&self, chart: &Chart) -> (u32, u32) {
        match chart {
            Chart::Grid(grid) => {
                let title = if grid.title.is_some() { GRID_TITLE_HEIGHT } else { 0 };
                (
                    self.panel_width * grid_columns(grid) as u32,
                    self.panel_height * grid.rows().max(1) as u32 + title,
                )
            }
            _ => (self.panel_width, self.panel_height),
        }
    }

    fn draw(&self, area: &Area<'_>, chart: &Chart) -> Result<(), ChartError> {
        match chart {
            Chart::Grid(grid) => self.draw_grid(area, grid),
            Chart::Heatmap(heatmap) => draw_heatmap(area, heatmap),
            Chart::Histogram(histogram) => draw_histogram(area, histogram),
            Chart::BoxPlot(plot) => draw_box_plot(area, plot),
            Chart::Bar(bar) => draw_bar(area, bar),
            Chart::Scatter(scatter) => draw_scatter(area, scatter),
        }
    }

    fn draw_grid(&self, area: &Area<'_>, grid: &ChartGrid) -> Result<(), ChartError> {
        if grid.panels.is_empty() {
            return Err(ChartError::EmptyChart("grid without panels".to_string()));
        }

        let shape = (grid.rows(), grid_columns(grid));
        let panels = match &grid.title {
            Some(title) => area.titled(title, (FONT, 20)).map_err(render_error)?.split_evenly(shape),
            None => area.split_evenly(shape),
        };

        for (panel, chart) in panels.iter().zip(&grid.panels) {
            self.draw(panel, chart)?;
        }
        Ok(())
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        SvgRenderer::new(640, 420)
    }
}

impl ChartRenderer for SvgRenderer {
    fn render(&self, chart: &Chart) -> Result<ChartImage, ChartError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size(chart)).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            self.draw(&root, chart)?;
            root.present().map_err(render_error)?;
        }

        Ok(ChartImage::new("image/svg+xml", svg.into_bytes()))
    }
}

fn render_error<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

fn grid_columns(grid: &ChartGrid) -> usize {
    grid.columns.max(1).min(grid.panels.len().max(1))
}

fn centered(size: i32) -> TextStyle<'static> {
    TextStyle::from((FONT, size).into_font()).pos(Pos::new(HPos::Center, VPos::Center))
}

fn label_style(rotate: bool) -> TextStyle<'static> {
    let style = TextStyle::from((FONT, 11).into_font());
    if rotate {
        style.transform(FontTransform::Rotate90)
    } else {
        style
    }
}

fn format_tick(v: f64) -> String {
    if v.fract().abs() < 1e-9 && v.abs() < 1e9 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

/// Label of a segment center, blank for boundaries
fn segment_label(labels: &[String], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Label for a category position on a continuous axis
fn category_label(categories: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    categories.get(index as usize).cloned().unwrap_or_default()
}

/// Axis range covering the values, widened when degenerate
fn padded(lo: f64, hi: f64) -> std::ops::Range<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if hi > lo {
        let pad = (hi - lo) * 0.05;
        (lo - pad)..(hi + pad)
    } else {
        (lo - 0.5)..(hi + 0.5)
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn draw_no_data(area: &Area<'_>, title: &str) -> Result<(), ChartError> {
    let (width, height) = area.dim_in_pixel();
    let x = (width / 2) as i32;

    area.draw(&Text::new(title, (x, 20), centered(16))).map_err(render_error)?;
    area.draw(&Text::new("No data", (x, (height / 2) as i32), centered(12)))
        .map_err(render_error)?;
    Ok(())
}

fn interpolate(from: (f64, f64, f64), to: (f64, f64, f64), t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(channel(from.0, to.0), channel(from.1, to.1), channel(from.2, to.2))
}

fn palette_color(palette: super::Palette, value: f64, (lo, hi): (f64, f64)) -> RGBColor {
    let t = if hi > lo { (value - lo) / (hi - lo) } else { 0.5 };
    match palette {
        super::Palette::Diverging if t < 0.5 => {
            interpolate((59.0, 76.0, 192.0), (221.0, 221.0, 221.0), t * 2.0)
        }
        super::Palette::Diverging => {
            interpolate((221.0, 221.0, 221.0), (180.0, 4.0, 38.0), (t - 0.5) * 2.0)
        }
        super::Palette::Sequential => interpolate((255.0, 255.0, 204.0), (189.0, 0.0, 38.0), t),
    }
}

fn draw_heatmap(area: &Area<'_>, heatmap: &Heatmap) -> Result<(), ChartError> {
    let rows = heatmap.cells.len();
    let columns = heatmap.cells.iter().map(Vec::len).max().unwrap_or(0);
    if rows == 0 || columns == 0 {
        return Err(ChartError::EmptyChart(heatmap.title.clone()));
    }

    let rotate = columns > 8;
    let mut chart = ChartBuilder::on(area)
        .caption(&heatmap.title, (FONT, 16))
        .margin(10)
        .x_label_area_size(if rotate { 90 } else { 40 })
        .y_label_area_size(90)
        .build_cartesian_2d((0..columns as i32).into_segmented(), (0..rows as i32).into_segmented())
        .map_err(render_error)?;

    // First row on top
    let flipped: Vec<String> = heatmap.y_labels.iter().rev().cloned().collect();
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(columns)
        .y_labels(rows)
        .x_label_style(label_style(rotate))
        .x_label_formatter(&|v| segment_label(&heatmap.x_labels, v))
        .y_label_formatter(&|v| segment_label(&flipped, v))
        .draw()
        .map_err(render_error)?;

    let cells: Vec<(i32, i32, f64)> = heatmap
        .cells
        .iter()
        .enumerate()
        .flat_map(|(r, row)| {
            let y = (rows - 1 - r) as i32;
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.map(|v| (c as i32, y, v)))
        })
        .collect();

    chart
        .draw_series(cells.iter().map(|&(x, y, v)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                ],
                palette_color(heatmap.palette, v, heatmap.range).filled(),
            )
        }))
        .map_err(render_error)?;

    if heatmap.annotate {
        chart
            .draw_series(cells.iter().map(|&(x, y, v)| {
                Text::new(
                    format!("{:.2}", v),
                    (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
                    centered(10),
                )
            }))
            .map_err(render_error)?;
    }
    Ok(())
}

fn draw_histogram(area: &Area<'_>, histogram: &super::Histogram) -> Result<(), ChartError> {
    let (first, last) = match (histogram.bins.first(), histogram.bins.last()) {
        (Some(first), Some(last)) => (first.start, last.end),
        _ => return draw_no_data(area, &histogram.title),
    };
    let top = histogram.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.1;
    let (marker_lo, marker_hi) = bounds(histogram.markers.iter().map(|m| m.value));

    let mut chart = ChartBuilder::on(area)
        .caption(&histogram.title, (FONT, 16))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(padded(first.min(marker_lo), last.max(marker_hi)), 0.0..top)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(histogram.x_label.as_str())
        .y_desc("Frequency")
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(histogram.bins.iter().map(|bin| {
            Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], BAR_COLOR.mix(0.7).filled())
        }))
        .map_err(render_error)?;
    chart
        .draw_series(histogram.bins.iter().map(|bin| {
            Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], BLACK.stroke_width(1))
        }))
        .map_err(render_error)?;

    for (i, marker) in histogram.markers.iter().enumerate() {
        let color = MARKER_COLORS[i % MARKER_COLORS.len()];
        chart
            .draw_series(LineSeries::new(
                vec![(marker.value, 0.0), (marker.value, top)],
                color.stroke_width(2),
            ))
            .map_err(render_error)?
            .label(marker.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    if !histogram.markers.is_empty() {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_error)?;
    }
    Ok(())
}

fn draw_box_plot(area: &Area<'_>, plot: &BoxPlot) -> Result<(), ChartError> {
    let (lo, hi) = bounds(
        [plot.whisker_low, plot.whisker_high, plot.q1, plot.q3]
            .into_iter()
            .chain(plot.fliers.iter().copied()),
    );

    let mut chart = ChartBuilder::on(area)
        .caption(&plot.title, (FONT, 16))
        .margin(10)
        .x_label_area_size(20)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..1.0, padded(lo, hi))
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_desc(plot.y_label.as_str())
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series([
            Rectangle::new([(0.3, plot.q1), (0.7, plot.q3)], BOX_COLOR.filled()),
            Rectangle::new([(0.3, plot.q1), (0.7, plot.q3)], BLACK.stroke_width(1)),
        ])
        .map_err(render_error)?;

    chart
        .draw_series([
            PathElement::new(vec![(0.3, plot.median), (0.7, plot.median)], TREND_COLOR.stroke_width(2)),
            PathElement::new(vec![(0.5, plot.whisker_low), (0.5, plot.q1)], BLACK.stroke_width(1)),
            PathElement::new(vec![(0.5, plot.q3), (0.5, plot.whisker_high)], BLACK.stroke_width(1)),
            PathElement::new(vec![(0.4, plot.whisker_low), (0.6, plot.whisker_low)], BLACK.stroke_width(1)),
            PathElement::new(vec![(0.4, plot.whisker_high), (0.6, plot.whisker_high)], BLACK.stroke_width(1)),
        ])
        .map_err(render_error)?;

    chart
        .draw_series(plot.fliers.iter().map(|&v| Circle::new((0.5, v), 3, BLACK.stroke_width(1))))
        .map_err(render_error)?;
    Ok(())
}

fn draw_bar(area: &Area<'_>, bar: &BarChart) -> Result<(), ChartError> {
    let n = bar.labels.len().min(bar.values.len());
    if n == 0 {
        return draw_no_data(area, &bar.title);
    }

    let (lo, hi) = bounds(bar.values.iter().copied().chain([0.0]));
    let values = (lo.min(0.0))..(if hi > lo { hi * 1.1 } else { 1.0 });
    let data = bar.values.iter().take(n).enumerate().map(|(i, v)| (i as i32, *v));
    let annotate = TextStyle::from((FONT, 10).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));

    match bar.orientation {
        Orientation::Vertical => {
            let mut chart = ChartBuilder::on(area)
                .caption(&bar.title, (FONT, 16))
                .margin(10)
                .x_label_area_size(if bar.rotate_labels { 110 } else { 40 })
                .y_label_area_size(60)
                .build_cartesian_2d((0..n as i32).into_segmented(), values)
                .map_err(render_error)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n)
                .x_label_style(label_style(bar.rotate_labels))
                .x_label_formatter(&|v| segment_label(&bar.labels, v))
                .x_desc(bar.x_label.as_str())
                .y_desc(bar.y_label.as_str())
                .draw()
                .map_err(render_error)?;

            chart
                .draw_series(Histogram::vertical(&chart).style(BAR_COLOR.filled()).margin(4).data(data))
                .map_err(render_error)?;

            if bar.annotate {
                chart
                    .draw_series(bar.values.iter().take(n).enumerate().map(|(i, &v)| {
                        Text::new(format_tick(v), (SegmentValue::CenterOf(i as i32), v), annotate.clone())
                    }))
                    .map_err(render_error)?;
            }
        }
        Orientation::Horizontal => {
            let mut chart = ChartBuilder::on(area)
                .caption(&bar.title, (FONT, 16))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(110)
                .build_cartesian_2d(values, (0..n as i32).into_segmented())
                .map_err(render_error)?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(n)
                .y_label_formatter(&|v| segment_label(&bar.labels, v))
                .x_desc(bar.x_label.as_str())
                .y_desc(bar.y_label.as_str())
                .draw()
                .map_err(render_error)?;

            chart
                .draw_series(Histogram::horizontal(&chart).style(BAR_COLOR.filled()).margin(4).data(data))
                .map_err(render_error)?;
        }
    }
    Ok(())
}

fn draw_scatter(area: &Area<'_>, scatter: &ScatterChart) -> Result<(), ChartError> {
    let points = scatter.series.iter().flat_map(|s| s.points.iter());
    let trend = scatter.trend.iter().flatten();
    let all: Vec<(f64, f64)> = points.chain(trend).copied().collect();
    if all.is_empty() {
        return draw_no_data(area, &scatter.title);
    }

    let axis = |categories: &Option<Vec<String>>, values: (f64, f64)| match categories {
        Some(names) => -0.5..(names.len().max(1) as f64 - 0.5),
        None => padded(values.0, values.1),
    };
    let x_range = axis(&scatter.x_categories, bounds(all.iter().map(|p| p.0)));
    let y_range = axis(&scatter.y_categories, bounds(all.iter().map(|p| p.1)));

    let mut chart = ChartBuilder::on(area)
        .caption(&scatter.title, (FONT, 16))
        .margin(10)
        .x_label_area_size(if scatter.x_categories.is_some() { 90 } else { 40 })
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_error)?;

    let format_x = |v: &f64| match &scatter.x_categories {
        Some(names) => category_label(names, *v),
        None => format_tick(*v),
    };
    let format_y = |v: &f64| match &scatter.y_categories {
        Some(names) => category_label(names, *v),
        None => format_tick(*v),
    };
    chart
        .configure_mesh()
        .x_labels(scatter.x_categories.as_ref().map_or(8, Vec::len))
        .y_labels(scatter.y_categories.as_ref().map_or(8, Vec::len))
        .x_label_style(label_style(scatter.x_categories.is_some()))
        .x_label_formatter(&format_x)
        .y_label_formatter(&format_y)
        .x_desc(scatter.x_label.as_str())
        .y_desc(scatter.y_label.as_str())
        .draw()
        .map_err(render_error)?;

    let mut legend = false;
    for (i, series) in scatter.series.iter().enumerate() {
        let color = if scatter.series.len() == 1 {
            BAR_COLOR.to_rgba()
        } else {
            Palette99::pick(i).to_rgba()
        };
        let drawn = chart
            .draw_series(series.points.iter().map(|&p| Circle::new(p, 3, color.mix(0.6).filled())))
            .map_err(render_error)?;
        if let Some(name) = &series.name {
            drawn
                .label(name.as_str())
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
            legend = true;
        }
    }

    if let Some(trend) = &scatter.trend {
        chart
            .draw_series(LineSeries::new(trend.iter().copied(), TREND_COLOR.stroke_width(2)))
            .map_err(render_error)?;
    }

    if legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_error)?;
    }
    Ok(())
}
