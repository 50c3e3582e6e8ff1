// src/pie_chart.rs
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use resvg::{tiny_skia, usvg};
use tracing::{debug, info};

use crate::aggregation::RankedSummary;
use crate::error::ReportError;
use crate::html_report::escape_markup;

// --- Canvas layout ---

pub const CHART_WIDTH: u32 = 600;
pub const CHART_HEIGHT: u32 = 400;

/// Bounding square of the pie: x, y, side.
pub const PIE_BOUNDS: (f64, f64, f64) = (50.0, 50.0, 300.0);

pub const LEGEND_X: f64 = 380.0;
pub const LEGEND_TOP: f64 = 60.0;
pub const LEGEND_ROW_HEIGHT: f64 = 25.0;
pub const LEGEND_SWATCH_SIZE: f64 = 20.0;
pub const LEGEND_TEXT_X: f64 = 410.0;

const LEGEND_FONT_SIZE_PX: f64 = 13.0;

/// Legend font, shipped with the crate (DejaVu Sans, see assets/DejaVuSans-LICENSE.txt).
pub const LEGEND_FONT_FAMILY: &str = "DejaVu Sans";
const LEGEND_FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Slice colours, reused from the start once there are more employees than colours.
pub const PALETTE: [Rgb; 7] = [
    Rgb(255, 0, 0),   // red
    Rgb(0, 128, 0),   // green
    Rgb(0, 0, 255),   // blue
    Rgb(255, 165, 0), // orange
    Rgb(128, 0, 128), // purple
    Rgb(0, 255, 255), // cyan
    Rgb(255, 0, 255), // magenta
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub fn palette_color(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}

/// One slice of the pie. Angles are in degrees, clockwise from the positive x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub color: Rgb,
}

/// Computes consecutive slices starting at 0 degrees, in summary order.
pub fn slice_layout(summary: &RankedSummary) -> Result<Vec<PieSlice>, ReportError> {
    let grand_total = summary.grand_total_hours();
    if summary.is_empty() || grand_total <= 0.0 || !grand_total.is_finite() {
        return Err(ReportError::EmptyDataset);
    }

    let mut start_angle = 0.0;
    let slices = summary
        .iter()
        .enumerate()
        .map(|(i, total)| {
            let sweep_angle = total.total_hours / grand_total * 360.0;
            let slice = PieSlice {
                label: legend_label(&total.name, total.total_hours),
                start_angle,
                sweep_angle,
                color: palette_color(i),
            };
            start_angle += sweep_angle;
            slice
        })
        .collect();
    Ok(slices)
}

pub fn legend_label(name: &str, hours: f64) -> String {
    format!("{} - {:.1} h", name, hours)
}

fn point_on_circle(cx: f64, cy: f64, r: f64, angle_deg: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (cx + r * rad.cos(), cy + r * rad.sin())
}

fn arc_segment(cx: f64, cy: f64, r: f64, to_angle: f64, sweep: f64) -> String {
    let (x, y) = point_on_circle(cx, cy, r, to_angle);
    let sweep_flag = u8::from(sweep >= 0.0);
    format!("A {r:.3} {r:.3} 0 0 {sweep_flag} {x:.3} {y:.3}")
}

fn slice_shape(slice: &PieSlice, cx: f64, cy: f64, r: f64) -> String {
    let fill = slice.color.hex();
    if slice.sweep_angle.abs() >= 360.0 {
        return format!(
            "<circle cx='{cx:.3}' cy='{cy:.3}' r='{r:.3}' fill='{fill}' stroke='black' stroke-width='1'/>"
        );
    }

    let (x0, y0) = point_on_circle(cx, cy, r, slice.start_angle);
    let end_angle = slice.start_angle + slice.sweep_angle;
    // Wide arcs are drawn as two halves: one arc's rounded endpoints may coincide.
    let arcs = if slice.sweep_angle.abs() > 180.0 {
        let mid_angle = slice.start_angle + slice.sweep_angle / 2.0;
        format!(
            "{} {}",
            arc_segment(cx, cy, r, mid_angle, slice.sweep_angle),
            arc_segment(cx, cy, r, end_angle, slice.sweep_angle)
        )
    } else {
        arc_segment(cx, cy, r, end_angle, slice.sweep_angle)
    };
    format!(
        "<path d='M {cx:.3} {cy:.3} L {x0:.3} {y0:.3} {arcs} Z' fill='{fill}' stroke='black' stroke-width='1'/>"
    )
}

/// Vector form of the chart: pie on the left, legend on the right.
pub fn render_svg(summary: &RankedSummary) -> Result<String, ReportError> {
    let slices = slice_layout(summary)?;
    let (px, py, side) = PIE_BOUNDS;
    let r = side / 2.0;
    let (cx, cy) = (px + r, py + r);

    let mut svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}' viewBox='0 0 {w} {h}'>\n",
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    );
    svg.push_str(&format!(
        "  <rect width='{}' height='{}' fill='white'/>\n",
        CHART_WIDTH, CHART_HEIGHT
    ));

    for slice in &slices {
        svg.push_str(&format!("  {}\n", slice_shape(slice, cx, cy, r)));
    }

    for (i, slice) in slices.iter().enumerate() {
        let y = LEGEND_TOP + i as f64 * LEGEND_ROW_HEIGHT;
        svg.push_str(&format!(
            "  <rect x='{}' y='{}' width='{s}' height='{s}' fill='{}'/>\n",
            LEGEND_X,
            y,
            slice.color.hex(),
            s = LEGEND_SWATCH_SIZE
        ));
        svg.push_str(&format!(
            "  <text x='{}' y='{}' font-family='{}' font-size='{}' fill='black'>{}</text>\n",
            LEGEND_TEXT_X,
            y + LEGEND_FONT_SIZE_PX,
            LEGEND_FONT_FAMILY,
            LEGEND_FONT_SIZE_PX,
            escape_markup(&slice.label)
        ));
    }

    svg.push_str("</svg>\n");
    debug!("Built chart markup with {} slices", slices.len());
    Ok(svg)
}

/// Font database holding only the bundled legend font, so output does not
/// depend on what the host has installed.
fn load_fonts() -> Result<usvg::fontdb::Database, ReportError> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_font_data(LEGEND_FONT_DATA.to_vec());
    let registered = fontdb
        .faces()
        .any(|face| face.families.iter().any(|(name, _)| name == LEGEND_FONT_FAMILY));
    if !registered {
        return Err(ReportError::render(
            "pie chart",
            format!("bundled font {} could not be loaded", LEGEND_FONT_FAMILY),
        ));
    }
    fontdb.set_sans_serif_family(LEGEND_FONT_FAMILY);
    Ok(fontdb)
}

/// Rasterizes the chart to PNG bytes (CHART_WIDTH x CHART_HEIGHT).
pub fn render_png(summary: &RankedSummary) -> Result<Vec<u8>, ReportError> {
    let svg = render_svg(summary)?;
    let mut options = usvg::Options::default();
    options.fontdb = Arc::new(load_fonts()?);
    let tree = usvg::Tree::from_str(&svg, &options)
        .map_err(|e| ReportError::render("pie chart", e))?;

    let mut pixmap = tiny_skia::Pixmap::new(CHART_WIDTH, CHART_HEIGHT)
        .ok_or_else(|| ReportError::render("pie chart", "could not allocate drawing surface"))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ReportError::render("pie chart", e))
}

/// Renders the chart and saves it as PNG at `path`.
pub fn write_pie_chart(summary: &RankedSummary, path: &Path) -> Result<(), ReportError> {
    let png = render_png(summary)?;
    write_png(&png, path)
}

pub(crate) fn write_png(png: &[u8], path: &Path) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|e| ReportError::render("pie chart", e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(png)
        .and_then(|_| writer.flush())
        .map_err(|e| ReportError::render("pie chart", e))?;
    info!("Pie chart saved at {}", path.display());
    Ok(())
}
