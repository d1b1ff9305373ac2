// In-process candlestick chart: series buffers, visible range and the
// pixel <-> time/price mapping used by the SVG components.

use shared::models::{Bar, Marker, MarkerPosition, MarkerShape, Timestamp, ValuePoint, VolumePoint};
use shared::utils::format_timestamp;

use super::{ChartOptions, ChartSurface, SeriesKind, SeriesSpec};
use crate::error::BootstrapError;

pub const PRICE_AXIS_WIDTH: f64 = 64.0;
pub const TIME_AXIS_HEIGHT: f64 = 26.0;
const PRICE_MARGIN_BOTTOM: f64 = 0.25;
const DEFAULT_MARKER_COLOR: &str = "#2196f3";
const MARKER_OFFSET: f64 = 10.0;
const MARKER_SIZE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CandleGlyph {
    pub x: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub body_left: f64,
    pub body_top: f64,
    pub body_width: f64,
    pub body_height: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeGlyph {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineGlyph {
    pub title: String,
    pub color: String,
    pub width: u32,
    /// SVG `points` attribute.
    pub points: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerGlyph {
    pub x: f64,
    pub y: f64,
    pub shape: MarkerShape,
    pub color: String,
    pub text: String,
    pub text_y: f64,
}

impl MarkerGlyph {
    /// Polygon outline for arrows and squares; circles are drawn natively.
    pub fn polygon_points(&self) -> String {
        let (x, y, s) = (self.x, self.y, MARKER_SIZE);
        match self.shape {
            MarkerShape::ArrowUp => format!("{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}", x, y - s, x - s, y + s, x + s, y + s),
            MarkerShape::ArrowDown => format!("{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}", x, y + s, x - s, y - s, x + s, y - s),
            MarkerShape::Square | MarkerShape::Circle => format!(
                "{:.1},{:.1} {:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
                x - s, y - s, x + s, y - s, x + s, y + s, x - s, y + s
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    options: ChartOptions,
    series: Vec<SeriesSpec>,
    width: f64,
    height: f64,
    candles: Vec<Bar>,
    volume: Vec<VolumePoint>,
    vwap: Vec<ValuePoint>,
    ema: Vec<ValuePoint>,
    markers: Vec<Marker>,
    visible: Option<(Timestamp, Timestamp)>,
}

impl ChartModel {
    pub fn new(options: ChartOptions) -> Self {
        Self {
            width: options.width.max(1.0),
            height: options.height.max(1.0),
            options,
            series: Vec::with_capacity(SeriesKind::ALL.len()),
            candles: Vec::new(),
            volume: Vec::new(),
            vwap: Vec::new(),
            ema: Vec::new(),
            markers: Vec::new(),
            visible: None,
        }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn series(&self) -> &[SeriesSpec] {
        &self.series
    }

    pub fn has_data(&self) -> bool {
        !self.candles.is_empty()
    }

    fn spec(&self, kind: SeriesKind) -> Option<&SeriesSpec> {
        self.series.iter().find(|s| s.kind == kind)
    }

    pub fn plot_width(&self) -> f64 {
        (self.width - PRICE_AXIS_WIDTH).max(1.0)
    }

    pub fn plot_height(&self) -> f64 {
        let axis = if self.options.time_visible { TIME_AXIS_HEIGHT } else { 0.0 };
        (self.height - axis).max(1.0)
    }

    pub fn visible_bars(&self) -> &[Bar] {
        match self.visible {
            Some((from, to)) => {
                let start = self.candles.partition_point(|b| b.time < from);
                let end = self.candles.partition_point(|b| b.time <= to);
                &self.candles[start..end.max(start)]
            }
            None => &self.candles,
        }
    }

    fn slot_width(&self) -> f64 {
        let n = self.visible_bars().len().max(1);
        self.plot_width() / n as f64
    }

    fn x_for_index(&self, index: usize) -> f64 {
        (index as f64 + 0.5) * self.slot_width()
    }

    fn index_of_time(&self, time: Timestamp) -> Option<usize> {
        self.visible_bars().binary_search_by_key(&time, |b| b.time).ok()
    }

    pub fn x_for_time(&self, time: Timestamp) -> Option<f64> {
        self.index_of_time(time).map(|i| self.x_for_index(i))
    }

    /// Time of the bar under the pointer, snapping to the nearest slot.
    pub fn time_at_x(&self, x: f64) -> Option<Timestamp> {
        let bars = self.visible_bars();
        if bars.is_empty() || x < 0.0 || x > self.plot_width() {
            return None;
        }
        let index = ((x / self.slot_width()).floor() as usize).min(bars.len() - 1);
        Some(bars[index].time)
    }

    /// Autoscaled price range over visible candles and line series.
    pub fn price_range(&self) -> (f64, f64) {
        let bars = self.visible_bars();
        let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
            return (0.0, 1.0);
        };
        let (from, to) = (first.time, last.time);
        let line_values = self
            .vwap
            .iter()
            .chain(self.ema.iter())
            .filter(|p| p.time >= from && p.time <= to)
            .map(|p| p.value);
        let bar_values = bars.iter().flat_map(|b| [b.low, b.high, b.open, b.close]).flatten();

        let (min, max) = bar_values
            .chain(line_values)
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        if (max - min).abs() < f64::EPSILON {
            let pad = (min.abs() * 0.01).max(1.0);
            return (min - pad, max + pad);
        }
        (min, max)
    }

    pub fn price_to_y(&self, price: f64) -> f64 {
        let (min, max) = self.price_range();
        let plot_h = self.plot_height();
        let margin_top = self.spec(SeriesKind::Candles).map_or(0.1, |s| s.scale_margin_top);
        let top = plot_h * margin_top;
        let bottom = plot_h * (1.0 - PRICE_MARGIN_BOTTOM);
        bottom - (price - min) / (max - min) * (bottom - top)
    }

    pub fn candle_glyphs(&self) -> Vec<CandleGlyph> {
        let Some(spec) = self.spec(SeriesKind::Candles) else {
            return Vec::new();
        };
        let up = spec.color.as_str();
        let down = spec.down_color.as_deref().unwrap_or(up);
        let body_width = (self.slot_width() * 0.7).max(1.0);

        self.visible_bars()
            .iter()
            .enumerate()
            .filter_map(|(i, bar)| {
                let (open, high, low, close) = bar.prices()?;
                let x = self.x_for_index(i);
                let body_top = self.price_to_y(open.max(close));
                let body_bottom = self.price_to_y(open.min(close));
                Some(CandleGlyph {
                    x,
                    wick_top: self.price_to_y(high),
                    wick_bottom: self.price_to_y(low),
                    body_left: x - body_width / 2.0,
                    body_top,
                    body_width,
                    body_height: (body_bottom - body_top).max(1.0),
                    color: if bar.is_bullish() { up } else { down }.to_string(),
                })
            })
            .collect()
    }

    pub fn volume_glyphs(&self) -> Vec<VolumeGlyph> {
        let Some(spec) = self.spec(SeriesKind::Volume) else {
            return Vec::new();
        };
        let visible: Vec<(f64, &VolumePoint)> = self
            .volume
            .iter()
            .filter_map(|p| self.x_for_time(p.time).map(|x| (x, p)))
            .collect();
        let max = visible.iter().map(|(_, p)| p.value).fold(0.0_f64, f64::max);
        if max <= 0.0 {
            return Vec::new();
        }
        let plot_h = self.plot_height();
        let available = plot_h * (1.0 - spec.scale_margin_top);
        let width = (self.slot_width() * 0.7).max(1.0);

        visible
            .into_iter()
            .map(|(x, p)| {
                let height = (p.value.max(0.0) / max) * available;
                VolumeGlyph {
                    x: x - width / 2.0,
                    y: plot_h - height,
                    width,
                    height,
                    color: p.color.clone().unwrap_or_else(|| spec.color.clone()),
                }
            })
            .collect()
    }

    pub fn line_glyph(&self, kind: SeriesKind) -> Option<LineGlyph> {
        let points = match kind {
            SeriesKind::Vwap => &self.vwap,
            SeriesKind::Ema => &self.ema,
            SeriesKind::Candles | SeriesKind::Volume => return None,
        };
        let spec = self.spec(kind)?;
        let coords: Vec<String> = points
            .iter()
            .filter_map(|p| {
                let x = self.x_for_time(p.time)?;
                Some(format!("{:.2},{:.2}", x, self.price_to_y(p.value)))
            })
            .collect();
        if coords.is_empty() {
            return None;
        }
        Some(LineGlyph {
            title: spec.title.clone(),
            color: spec.color.clone(),
            width: spec.line_width,
            points: coords.join(" "),
        })
    }

    pub fn marker_glyphs(&self) -> Vec<MarkerGlyph> {
        let bars = self.visible_bars();
        self.markers
            .iter()
            .filter_map(|marker| {
                let index = self.index_of_time(marker.time)?;
                let bar = bars[index];
                let x = self.x_for_index(index);
                let (y, text_y) = match marker.position {
                    MarkerPosition::AboveBar => {
                        let y = self.price_to_y(bar.high?) - MARKER_OFFSET;
                        (y, y - MARKER_SIZE - 4.0)
                    }
                    MarkerPosition::BelowBar => {
                        let y = self.price_to_y(bar.low?) + MARKER_OFFSET;
                        (y, y + MARKER_SIZE + 12.0)
                    }
                    MarkerPosition::InBar => {
                        let y = self.price_to_y(bar.close?);
                        (y, y - MARKER_SIZE - 4.0)
                    }
                };
                Some(MarkerGlyph {
                    x,
                    y,
                    shape: marker.shape,
                    color: marker.color.clone().unwrap_or_else(|| DEFAULT_MARKER_COLOR.to_string()),
                    text: marker.text.clone(),
                    text_y,
                })
            })
            .collect()
    }

    pub fn time_ticks(&self, max_ticks: usize) -> Vec<AxisTick> {
        let bars = self.visible_bars();
        if bars.is_empty() || max_ticks == 0 || !self.options.time_visible {
            return Vec::new();
        }
        let pattern = if self.options.seconds_visible { "%m-%d %H:%M:%S" } else { "%m-%d %H:%M" };
        let step = bars.len().div_ceil(max_ticks).max(1);
        (0..bars.len())
            .step_by(step)
            .map(|i| AxisTick {
                position: self.x_for_index(i),
                label: format_timestamp(bars[i].time, pattern),
            })
            .collect()
    }

    pub fn price_ticks(&self, count: usize) -> Vec<AxisTick> {
        if !self.has_data() || count == 0 {
            return Vec::new();
        }
        let (min, max) = self.price_range();
        (0..=count)
            .map(|k| {
                let price = min + (max - min) * k as f64 / count as f64;
                AxisTick {
                    position: self.price_to_y(price),
                    label: format!("{:.2}", price),
                }
            })
            .collect()
    }
}

impl ChartSurface for ChartModel {
    fn add_series(&mut self, spec: &SeriesSpec) -> Result<(), BootstrapError> {
        if self.spec(spec.kind).is_some() {
            return Err(BootstrapError::InvalidOptions(format!(
                "{:?} series already exists",
                spec.kind
            )));
        }
        self.series.push(spec.clone());
        Ok(())
    }

    fn set_candles(&mut self, bars: Vec<Bar>) {
        self.candles = bars;
    }

    fn set_volume(&mut self, points: Vec<VolumePoint>) {
        self.volume = points;
    }

    fn set_vwap(&mut self, points: Vec<ValuePoint>) {
        self.vwap = points;
    }

    fn set_ema(&mut self, points: Vec<ValuePoint>) {
        self.ema = points;
    }

    fn set_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
    }

    fn fit_content(&mut self) {
        self.visible = match (self.candles.first(), self.candles.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        };
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn plot_area(&self) -> (f64, f64) {
        (self.plot_width(), self.plot_height())
    }

    fn bar_at(&self, time: Timestamp) -> Option<Bar> {
        self.candles
            .binary_search_by_key(&time, |b| b.time)
            .ok()
            .map(|i| self.candles[i])
    }

    fn volume_at(&self, time: Timestamp) -> Option<f64> {
        self.volume.iter().find(|p| p.time == time).map(|p| p.value)
    }
}
