use std::{
    f64::consts::PI,
    fmt::Write as _,
};

use serde::Serialize;

use crate::{
    analysis::format_optional,
    core::SentimentClass,
};

const WIDTH: f64 = 320.0;
const HEIGHT: f64 = 200.0;
const CENTER_X: f64 = WIDTH / 2.0;
const CENTER_Y: f64 = 165.0;
const OUTER_RADIUS: f64 = 120.0;
const INNER_RADIUS: f64 = 80.0;
const BAR_OUTER: f64 = 108.0;
const BAR_INNER: f64 = 92.0;

// Half-width of the neutral band on the percentage scale; the band is a single point otherwise.
const NEUTRAL_HALF_WIDTH: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeKind {
    /// Share of positive reviews on 0..=100.
    Percentage,
    /// Mean signed class indicator on -1..=1.
    Overview,
}

impl GaugeKind {
    pub fn range(&self) -> (f64, f64) {
        match self {
            GaugeKind::Percentage => (0.0, 100.0),
            GaugeKind::Overview => (-1.0, 1.0),
        }
    }

    pub fn title(&self) -> &'static str {
        "Average Sentiment"
    }

    fn suffix(&self) -> &'static str {
        match self {
            GaugeKind::Percentage => "%",
            GaugeKind::Overview => "",
        }
    }

    /// Band boundaries are fixed: [0,50) / {50} / (50,100] and [-1,-0.33) / [-0.33,0.33] / (0.33,1].
    pub fn band_for(&self, value: f64) -> SentimentClass {
        match self {
            GaugeKind::Percentage => {
                if value < 50.0 {
                    SentimentClass::Negative
                } else if value == 50.0 {
                    SentimentClass::Neutral
                } else {
                    SentimentClass::Positive
                }
            }
            GaugeKind::Overview => {
                if value < -0.33 {
                    SentimentClass::Negative
                } else if value <= 0.33 {
                    SentimentClass::Neutral
                } else {
                    SentimentClass::Positive
                }
            }
        }
    }

    fn drawn_bands(&self) -> [(f64, f64, SentimentClass); 3] {
        match self {
            GaugeKind::Percentage => [
                (0.0, 50.0 - NEUTRAL_HALF_WIDTH, SentimentClass::Negative),
                (50.0 - NEUTRAL_HALF_WIDTH, 50.0 + NEUTRAL_HALF_WIDTH, SentimentClass::Neutral),
                (50.0 + NEUTRAL_HALF_WIDTH, 100.0, SentimentClass::Positive),
            ],
            GaugeKind::Overview => [
                (-1.0, -0.33, SentimentClass::Negative),
                (-0.33, 0.33, SentimentClass::Neutral),
                (0.33, 1.0, SentimentClass::Positive),
            ],
        }
    }

    fn ticks(&self) -> Vec<(f64, String)> {
        match self {
            GaugeKind::Percentage => vec![
                (0.0, "Negative".to_string()),
                (50.0, "Neutral".to_string()),
                (100.0, "Positive".to_string()),
            ],
            GaugeKind::Overview => {
                vec![(-1.0, "-1".to_string()), (0.0, "0".to_string()), (1.0, "1".to_string())]
            }
        }
    }

    fn bar_color(&self) -> &'static str {
        match self {
            GaugeKind::Percentage => "rgb(59, 130, 246)",
            GaugeKind::Overview => "darkblue",
        }
    }

    fn fraction(&self, value: f64) -> f64 {
        let (min, max) = self.range();
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    }
}

fn band_color(class: SentimentClass) -> &'static str {
    match class {
        SentimentClass::Negative => "red",
        SentimentClass::Neutral => "yellow",
        SentimentClass::Positive => "green",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub kind: GaugeKind,
    pub value: Option<f64>,
    pub band: Option<SentimentClass>,
    pub label: String,
    pub svg: String,
}

pub fn render_gauge(kind: GaugeKind, value: Option<f64>) -> Gauge {
    let value = value.filter(|v| v.is_finite());
    let label = format_optional(value, kind.suffix());

    Gauge {
        kind,
        value,
        band: value.map(|v| kind.band_for(v)),
        svg: gauge_svg(kind, value, &label),
        label,
    }
}

// Fraction 0 is the left end of the half circle, 1 the right end.
fn point(fraction: f64, radius: f64) -> (f64, f64) {
    let angle = PI * (1.0 - fraction);
    (CENTER_X + radius * angle.cos(), CENTER_Y - radius * angle.sin())
}

fn arc_segment(from: f64, to: f64, outer: f64, inner: f64) -> String {
    let (ox0, oy0) = point(from, outer);
    let (ox1, oy1) = point(to, outer);
    let (ix1, iy1) = point(to, inner);
    let (ix0, iy0) = point(from, inner);
    format!(
        "M {ox0:.2} {oy0:.2} A {outer} {outer} 0 0 1 {ox1:.2} {oy1:.2} \
         L {ix1:.2} {iy1:.2} A {inner} {inner} 0 0 0 {ix0:.2} {iy0:.2} Z"
    )
}

fn gauge_svg(kind: GaugeKind, value: Option<f64>, label: &str) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{CENTER_X}" y="22" text-anchor="middle" font-family="sans-serif" font-size="16">{}</text>"#,
        kind.title()
    );

    for (start, end, class) in kind.drawn_bands() {
        let path = arc_segment(kind.fraction(start), kind.fraction(end), OUTER_RADIUS, INNER_RADIUS);
        let _ = writeln!(
            svg,
            r#"  <path class="band band-{}" d="{}" fill="{}"/>"#,
            class.label().to_lowercase(),
            path,
            band_color(class)
        );
    }

    for (tick, text) in kind.ticks() {
        let (x, y) = point(kind.fraction(tick), OUTER_RADIUS + 14.0);
        let _ = writeln!(
            svg,
            r#"  <text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-family="sans-serif" font-size="11">{text}</text>"#
        );
    }

    if let Some(v) = value {
        let fraction = kind.fraction(v);
        if fraction > 0.0 {
            let bar = arc_segment(0.0, fraction, BAR_OUTER, BAR_INNER);
            let _ = writeln!(
                svg,
                r#"  <path class="value-bar" d="{}" fill="{}"/>"#,
                bar,
                kind.bar_color()
            );
        }

        let (x0, y0) = point(fraction, INNER_RADIUS - 4.0);
        let (x1, y1) = point(fraction, OUTER_RADIUS + 4.0);
        let _ = writeln!(
            svg,
            r#"  <line class="threshold" x1="{x0:.2}" y1="{y0:.2}" x2="{x1:.2}" y2="{y1:.2}" stroke="black" stroke-width="4"/>"#
        );
    }

    let _ = writeln!(
        svg,
        r#"  <text class="gauge-value" x="{CENTER_X}" y="{:.2}" text-anchor="middle" font-family="sans-serif" font-size="28">{}</text>"#,
        CENTER_Y - 8.0,
        label
    );
    let _ = writeln!(svg, "</svg>");

    svg
}
