use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use byte_unit::{Byte, UnitType};
use plotters::{
    coord::{
        cartesian::Cartesian2d,
        ranged1d::{DefaultFormatting, KeyPointHint, Ranged},
        types::RangedCoordf64,
        Shift,
    },
    drawing::DrawingAreaErrorKind,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{
    components::{
        figure::{AxisScale, Figure, Panel, TickFormat},
        style::{LineStyle, Marker, Rgb},
    },
    error::{Error, Result},
};

// Sizes in points, scaled by dpi / 72 when drawn.
const TITLE_FONT_PT: f64 = 14.0;
const PANEL_TITLE_FONT_PT: f64 = 12.0;
const AXIS_LABEL_FONT_PT: f64 = 12.0;
const TICK_LABEL_FONT_PT: f64 = 10.0;
const LEGEND_FONT_PT: f64 = 9.0;
const ANNOTATION_FONT_PT: f64 = 8.0;
const LINE_WIDTH_PT: f64 = 2.0;
const MARKER_RADIUS_PT: f64 = 4.0;

/// Draws composed figures to files.
pub trait Renderer {
    /// Checks that the backend can draw on this system.
    fn probe(&self) -> Result<()>;

    fn render(&self, figure: &Figure, path: &Path) -> Result<()>;
}

/// PNG output through the plotters bitmap backend.
#[derive(Clone, Debug)]
pub struct PlottersRenderer {
    dpi: u32,
    font_family: String,
}

impl PlottersRenderer {
    pub fn new(dpi: u32, font_family: impl Into<String>) -> Self {
        Self {
            dpi: dpi.max(1),
            font_family: font_family.into(),
        }
    }

    fn px(&self, points: f64) -> u32 {
        (points * f64::from(self.dpi) / 72.0).round().max(1.0) as u32
    }

    fn font(&self, points: f64) -> FontDesc<'_> {
        FontDesc::new(
            FontFamily::from(self.font_family.as_str()),
            f64::from(self.px(points)),
            FontStyle::Normal,
        )
    }

    fn legend_swatch(&self) -> u32 {
        self.px(20.0)
    }

    /// Room left of each legend label, wide enough for the swatch plus a gap.
    fn legend_area(&self) -> u32 {
        self.legend_swatch() + self.px(6.0)
    }

    fn pixel_size(&self, figure: &Figure) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        let (width, height) = figure.size;
        (
            (width * dpi).round().max(1.0) as u32,
            (height * dpi).round().max(1.0) as u32,
        )
    }

    fn draw<DB: DrawingBackend>(
        &self,
        figure: &Figure,
        root: &DrawingArea<DB, Shift>,
    ) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;
        let body = if figure.title.is_empty() {
            root.clone()
        } else {
            root.titled(
                &figure.title,
                self.font(TITLE_FONT_PT)
                    .style(FontStyle::Bold)
                    .color(&BLACK),
            )?
        };

        let body = match &figure.annotation {
            Some(annotation) => {
                let (_, height) = body.dim_in_pixel();
                let footer_height = self.px(ANNOTATION_FONT_PT) * 3;
                let (body, footer) = body.split_vertically(height.saturating_sub(footer_height));
                let (width, height) = footer.dim_in_pixel();
                let style = self
                    .font(ANNOTATION_FONT_PT)
                    .color(&RGBColor(0x80, 0x80, 0x80))
                    .pos(Pos::new(HPos::Center, VPos::Center));
                footer.draw_text(
                    annotation,
                    &style,
                    ((width / 2) as i32, (height / 2) as i32),
                )?;
                body
            }
            None => body,
        };

        let (rows, cols) = figure.grid;
        let areas = body.split_evenly((rows.max(1), cols.max(1)));
        for (panel, area) in figure.panels.iter().zip(areas.iter()) {
            self.draw_panel(panel, area)?;
        }
        Ok(())
    }

    fn draw_panel<DB: DrawingBackend>(
        &self,
        panel: &Panel,
        area: &DrawingArea<DB, Shift>,
    ) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let (y_lo, y_hi) = y_range(panel);
        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, self.font(PANEL_TITLE_FONT_PT))
            .margin(self.px(6.0))
            .x_label_area_size(self.px(32.0))
            .y_label_area_size(self.px(48.0))
            .build_cartesian_2d(SweepAxis::new(panel), y_lo..y_hi)?;

        let tick_format = panel.tick_format;
        chart
            .configure_mesh()
            .x_labels(panel.ticks.as_ref().map_or(10, |ticks| ticks.len().max(1)))
            .x_label_formatter(&|x: &f64| format_tick(*x, tick_format))
            .x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_str())
            .bold_line_style(BLACK.mix(0.12))
            .light_line_style(WHITE)
            .label_style(self.font(TICK_LABEL_FONT_PT))
            .axis_desc_style(self.font(AXIS_LABEL_FONT_PT))
            .draw()?;

        let legend_len = self.legend_swatch() as i32;
        for line in &panel.lines {
            let color = rgb(line.style.color);
            let stroke = color.stroke_width(self.px(LINE_WIDTH_PT));
            let anno = match line.style.line {
                LineStyle::Solid => {
                    chart.draw_series(LineSeries::new(line.points.clone(), stroke))?
                }
                LineStyle::Dashed => chart.draw_series(DashedLineSeries::new(
                    line.points.clone(),
                    self.px(6.0),
                    self.px(4.0),
                    stroke,
                ))?,
            };
            match line.style.line {
                LineStyle::Solid => anno.label(line.label.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + legend_len, y)], stroke)
                }),
                LineStyle::Dashed => anno.label(line.label.as_str()).legend(move |(x, y)| {
                    let third = legend_len / 3;
                    EmptyElement::at((x, y))
                        + PathElement::new(vec![(0, 0), (third, 0)], stroke)
                        + PathElement::new(vec![(2 * third, 0), (legend_len, 0)], stroke)
                }),
            };
            self.draw_markers(&mut chart, &line.points, line.style.marker, color)?;
        }

        if !panel.lines.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .legend_area_size(self.legend_area())
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK.mix(0.3))
                .label_font(self.font(LEGEND_FONT_PT))
                .draw()?;
        }
        Ok(())
    }

    fn draw_markers<DB: DrawingBackend>(
        &self,
        chart: &mut ChartContext<'_, DB, Cartesian2d<SweepAxis, RangedCoordf64>>,
        points: &[(f64, f64)],
        marker: Marker,
        color: RGBColor,
    ) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let size = self.px(MARKER_RADIUS_PT);
        let style = color.filled();
        match marker {
            Marker::Circle => {
                chart.draw_series(points.iter().map(|&p| Circle::new(p, size, style)))?;
            }
            Marker::Square => {
                let half = size as i32;
                chart.draw_series(points.iter().map(|&p| {
                    EmptyElement::at(p) + Rectangle::new([(-half, -half), (half, half)], style)
                }))?;
            }
            Marker::Triangle => {
                chart.draw_series(
                    points
                        .iter()
                        .map(|&p| TriangleMarker::new(p, size + size / 2, style)),
                )?;
            }
        }
        Ok(())
    }
}

impl Renderer for PlottersRenderer {
    fn probe(&self) -> Result<()> {
        self.font(TICK_LABEL_FONT_PT)
            .box_size("Throughput 0123456789")
            .map(|_| ())
            .map_err(|err| Error::DependencyUnavailable {
                reason: format!("no usable `{}` font: {err}", self.font_family),
                remediation: "install fontconfig and a TrueType font \
                              (e.g. `apt install fontconfig fonts-dejavu-core`), \
                              or point `font_family` at an installed font"
                    .into(),
            })
    }

    fn render(&self, figure: &Figure, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, self.pixel_size(figure)).into_drawing_area();
        self.draw(figure, &root)
            .map_err(|err| Error::render_failed(path, err))?;
        root.present().map_err(|err| Error::render_failed(path, err))
    }
}

/// Writes figures into an output directory.
pub struct FigureWriter<R> {
    renderer: R,
}

impl<R: Renderer> FigureWriter<R> {
    /// Fails with [`Error::DependencyUnavailable`] if the renderer cannot draw.
    pub fn new(renderer: R) -> Result<Self> {
        renderer.probe()?;
        Ok(Self { renderer })
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn write(&self, figure: &Figure, output_dir: &Path, filename: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(output_dir).map_err(|source| Error::Write {
            path: output_dir.to_path_buf(),
            source,
        })?;
        let path = output_dir.join(filename);
        self.renderer.render(figure, &path)?;
        tracing::info!(path = %path.display(), "saved figure");
        Ok(path)
    }
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn format_tick(value: f64, format: TickFormat) -> String {
    match format {
        TickFormat::Bytes => Byte::from_u64(value.round().max(0.0) as u64)
            .get_appropriate_unit(UnitType::Binary)
            .to_string(),
        TickFormat::Plain if value.fract() == 0.0 => format!("{}", value as i64),
        TickFormat::Plain => format!("{value:.2}"),
    }
}

fn y_range(panel: &Panel) -> (f64, f64) {
    let (min, max) = panel
        .lines
        .iter()
        .flat_map(|line| line.points.iter().map(|(_, y)| *y))
        .filter(|y| y.is_finite())
        .fold((0.0_f64, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
    if max <= min {
        return (min, min + 1.0);
    }
    let pad = (max - min) * 0.1;
    (if min < 0.0 { min - pad } else { min }, max + pad)
}

/// X axis over sweep values, linear or log2, with optionally forced ticks.
#[derive(Clone, Debug)]
struct SweepAxis {
    lo: f64,
    hi: f64,
    scale: AxisScale,
    ticks: Option<Vec<f64>>,
}

impl SweepAxis {
    fn new(panel: &Panel) -> Self {
        let log = panel.scale == AxisScale::Log2;
        let (min, max) = panel
            .lines
            .iter()
            .flat_map(|line| line.points.iter().map(|(x, _)| *x))
            .chain(panel.ticks.iter().flatten().copied())
            .filter(|x| x.is_finite() && (!log || *x > 0.0))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });

        let (lo, hi) = match (panel.scale, min <= max) {
            (AxisScale::Linear, false) => (0.0, 1.0),
            (AxisScale::Log2, false) => (1.0, 2.0),
            (AxisScale::Linear, true) => {
                let pad = if max > min { (max - min) * 0.05 } else { 0.5 };
                (min - pad, max + pad)
            }
            (AxisScale::Log2, true) => {
                let pad = if max > min { 2f64.powf(0.25) } else { 2.0 };
                (min / pad, max * pad)
            }
        };

        Self {
            lo,
            hi,
            scale: panel.scale,
            ticks: panel.ticks.clone(),
        }
    }

    fn position(&self, value: f64) -> f64 {
        match self.scale {
            AxisScale::Linear => value,
            AxisScale::Log2 => value.max(f64::MIN_POSITIVE).log2(),
        }
    }
}

impl Ranged for SweepAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let lo = self.position(self.lo);
        let hi = self.position(self.hi);
        let t = (self.position(*value) - lo) / (hi - lo);
        limit.0 + (t * f64::from(limit.1 - limit.0)).round() as i32
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        let light = hint.weight().allow_light_points();
        if let Some(ticks) = &self.ticks {
            return if light { Vec::new() } else { ticks.clone() };
        }
        match self.scale {
            AxisScale::Linear => RangedCoordf64::from(self.lo..self.hi).key_points(hint),
            AxisScale::Log2 if light => Vec::new(),
            AxisScale::Log2 => {
                let first = self.lo.log2().ceil() as i32;
                let last = self.hi.log2().floor() as i32;
                (first..=last).map(|exp| 2f64.powi(exp)).collect()
            }
        }
    }

    fn range(&self) -> Range<f64> {
        self.lo..self.hi
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use plotters::coord::ranged1d::BoldPoints;

    use super::*;
    use crate::components::{
        figure::Line,
        style::{LineStyle, Marker, SeriesStyle},
    };

    fn panel(points: Vec<(f64, f64)>, scale: AxisScale, ticks: Option<Vec<f64>>) -> Panel {
        Panel {
            title: "Throughput".into(),
            x_label: "Message Size".into(),
            y_label: "Throughput (Gbps)".into(),
            scale,
            ticks,
            tick_format: TickFormat::Plain,
            lines: vec![Line {
                label: "Two-Copy".into(),
                points,
                style: SeriesStyle {
                    color: Rgb::from_hex(0xe74c3c),
                    marker: Marker::Circle,
                    line: LineStyle::Solid,
                },
            }],
        }
    }

    fn figure() -> Figure {
        let mut dashed = panel(
            vec![(1024.0, 4.0), (4096.0, 9.4), (65536.0, 62.1)],
            AxisScale::Log2,
            Some(vec![1024.0, 4096.0, 65536.0]),
        );
        dashed.lines[0].style.line = LineStyle::Dashed;
        dashed.lines[0].style.marker = Marker::Triangle;
        let mut empty = panel(vec![], AxisScale::Linear, None);
        empty.lines.clear();

        Figure {
            title: "run: Throughput".into(),
            annotation: Some("run | test rig".into()),
            size: (4.0, 3.0),
            grid: (1, 2),
            panels: vec![dashed, empty],
        }
    }

    #[test]
    fn legend_labels_start_after_the_swatch() {
        for dpi in [72, 150, 300] {
            let renderer = PlottersRenderer::new(dpi, "sans-serif");
            assert!(renderer.legend_area() > renderer.legend_swatch());
        }
        assert_eq!(PlottersRenderer::new(150, "sans-serif").legend_area(), 42 + 13);
    }

    #[test]
    fn byte_ticks_use_binary_units() {
        assert_eq!(format_tick(16384.0, TickFormat::Bytes), "16 KiB");
        assert_eq!(format_tick(1024.0, TickFormat::Bytes), "1 KiB");
    }

    #[test]
    fn plain_ticks_drop_trailing_zeros_for_integers() {
        assert_eq!(format_tick(8.0, TickFormat::Plain), "8");
        assert_eq!(format_tick(2.5, TickFormat::Plain), "2.50");
    }

    #[test]
    fn exact_ticks_are_key_points() {
        let ticks = vec![1024.0, 4096.0, 16384.0, 65536.0];
        let axis = SweepAxis::new(&panel(
            vec![(1024.0, 1.0), (65536.0, 2.0)],
            AxisScale::Log2,
            Some(ticks.clone()),
        ));
        assert_eq!(axis.key_points(BoldPoints(3)), ticks);
    }

    #[test]
    fn log2_axis_spaces_powers_of_two_evenly() {
        let axis = SweepAxis::new(&panel(
            vec![(1024.0, 1.0), (65536.0, 2.0)],
            AxisScale::Log2,
            None,
        ));
        let a = axis.map(&1024.0, (0, 1000));
        let b = axis.map(&4096.0, (0, 1000));
        let c = axis.map(&16384.0, (0, 1000));
        assert!(((b - a) - (c - b)).abs() <= 1);
        assert!(axis.range().start < 1024.0 && axis.range().end > 65536.0);
    }

    #[test]
    fn empty_panel_has_default_ranges() {
        let mut empty = panel(vec![], AxisScale::Linear, None);
        empty.lines.clear();
        assert_eq!(y_range(&empty), (0.0, 1.0));
        assert_eq!(SweepAxis::new(&empty).range(), 0.0..1.0);
    }

    #[test]
    fn y_range_starts_at_zero_and_pads_top() {
        let p = panel(vec![(1.0, 10.0), (2.0, 20.0)], AxisScale::Linear, None);
        assert_eq!(y_range(&p), (0.0, 22.0));
    }

    struct FakeRenderer {
        available: bool,
        renders: Cell<usize>,
    }

    impl FakeRenderer {
        fn new(available: bool) -> Self {
            Self {
                available,
                renders: Cell::new(0),
            }
        }
    }

    impl Renderer for FakeRenderer {
        fn probe(&self) -> Result<()> {
            if self.available {
                Ok(())
            } else {
                Err(Error::DependencyUnavailable {
                    reason: "no backend".into(),
                    remediation: "install one".into(),
                })
            }
        }

        fn render(&self, figure: &Figure, path: &Path) -> Result<()> {
            self.renders.set(self.renders.get() + 1);
            let body = format!("{} #{}", figure.title, self.renders.get());
            std::fs::write(path, body).map_err(|source| Error::Write {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    #[test]
    fn unavailable_renderer_is_rejected() {
        let err = FigureWriter::new(FakeRenderer::new(false)).err().unwrap();
        assert!(matches!(err, Error::DependencyUnavailable { .. }));
    }

    #[test]
    fn writing_twice_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("plots");
        let writer = FigureWriter::new(FakeRenderer::new(true)).unwrap();

        let first = writer.write(&figure(), &out, "run_Plot.png").unwrap();
        let second = writer.write(&figure(), &out, "run_Plot.png").unwrap();

        assert_eq!(first, second);
        assert_eq!(first, out.join("run_Plot.png"));
        assert_eq!(
            std::fs::read_to_string(&second).unwrap(),
            "run: Throughput #2"
        );
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn uncreatable_directory_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let writer = FigureWriter::new(FakeRenderer::new(true)).unwrap();

        let err = writer
            .write(&figure(), &blocker.join("plots"), "run_Plot.png")
            .unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }

    #[test]
    fn plotters_output_is_reproducible() {
        let renderer = PlottersRenderer::new(72, "sans-serif");
        if renderer.probe().is_err() {
            // No fonts on this machine.
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let writer = FigureWriter::new(renderer).unwrap();

        let path = writer.write(&figure(), dir.path(), "a.png").unwrap();
        let first = std::fs::read(&path).unwrap();
        writer.write(&figure(), dir.path(), "a.png").unwrap();
        let second = std::fs::read(&path).unwrap();

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}
