use std::collections::BTreeMap;

use itertools::Itertools;

use crate::alignment::TelemetrySeries;
use crate::ranking::RankingEntry;

// Padding below/above the fastest and slowest bar so no bar is clipped
const LAP_TIME_AXIS_PADDING_S: f64 = 0.2;
// Pedal inputs are recorded 0..1 and charted on a percentage axis
const INPUT_PCT_SCALE: f64 = 100.0;

/// One labeled, colored polyline.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesLine {
    pub label: String,
    /// '#'-prefixed hex color for the renderer
    pub color: String,
    pub points: Vec<[f64; 2]>,
}

/// A renderer-agnostic line chart.
#[derive(Clone, Debug, PartialEq)]
pub struct LineChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub lines: Vec<SeriesLine>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankingBar {
    pub driver: String,
    pub lap_time_s: f64,
    /// '#'-prefixed hex color for the renderer
    pub color: String,
}

/// A renderer-agnostic bar chart of the lap-time table.
#[derive(Clone, Debug, PartialEq)]
pub struct BarChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Fastest first, matching the ranking order
    pub bars: Vec<RankingBar>,
    /// Fixed y axis range, seconds
    pub y_bounds: (f64, f64),
    /// Present whenever drivers were dropped from the table for having no
    /// time; the renderer must display it
    pub annotation: Option<String>,
}

/// The three coordinated charts of one qualifying request.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSet {
    pub speed: LineChartSpec,
    pub lap_times: BarChartSpec,
    pub inputs: LineChartSpec,
}

/// Build all three chart specs. Pure transform, no I/O; identical inputs
/// always produce identical specs.
pub fn build_charts(
    location: &str,
    year: i32,
    ranking: &[RankingEntry],
    absent: &[String],
    telemetry: &BTreeMap<String, TelemetrySeries>,
) -> ChartSet {
    ChartSet {
        speed: speed_chart(location, year, telemetry),
        lap_times: lap_time_chart(location, year, ranking, absent),
        inputs: input_chart(location, year, telemetry),
    }
}

/// Speed vs distance, one line per driver present in the telemetry mapping.
/// Drivers skipped during alignment are simply absent from the legend.
pub fn speed_chart(
    location: &str,
    year: i32,
    telemetry: &BTreeMap<String, TelemetrySeries>,
) -> LineChartSpec {
    let lines = telemetry
        .values()
        .map(|series| SeriesLine {
            label: series.driver.clone(),
            color: format!("#{}", series.team_color),
            points: series
                .samples
                .iter()
                .map(|s| [s.distance_m, s.speed_kmh])
                .collect(),
        })
        .collect();

    LineChartSpec {
        title: format!("Speed vs Distance for Top Qualifiers in {location} {year}"),
        x_label: "Distance (meters)".to_string(),
        y_label: "Speed (km/h)".to_string(),
        lines,
    }
}

/// Lap-time bars for the ranking table, fastest first.
pub fn lap_time_chart(
    location: &str,
    year: i32,
    ranking: &[RankingEntry],
    absent: &[String],
) -> BarChartSpec {
    let bars: Vec<RankingBar> = ranking
        .iter()
        .map(|entry| RankingBar {
            driver: entry.driver.clone(),
            lap_time_s: entry.lap_time_s,
            color: format!("#{}", entry.team_color),
        })
        .collect();

    let y_bounds = match (
        bars.iter().map(|b| b.lap_time_s).reduce(f64::min),
        bars.iter().map(|b| b.lap_time_s).reduce(f64::max),
    ) {
        (Some(min), Some(max)) => (min - LAP_TIME_AXIS_PADDING_S, max + LAP_TIME_AXIS_PADDING_S),
        _ => (0.0, 1.0),
    };

    let annotation = if absent.is_empty() {
        None
    } else {
        Some(format!("No time set: {}", absent.iter().join(", ")))
    };

    BarChartSpec {
        title: format!("Fastest Lap Times for Q3 Qualifiers in {location} {year}"),
        x_label: "Driver".to_string(),
        y_label: "Fastest Lap Time (seconds)".to_string(),
        bars,
        y_bounds,
        annotation,
    }
}

/// Throttle and brake vs distance, two lines per mapped driver, both scaled
/// onto a shared 0-100 input-percentage axis.
pub fn input_chart(
    location: &str,
    year: i32,
    telemetry: &BTreeMap<String, TelemetrySeries>,
) -> LineChartSpec {
    let mut lines = Vec::with_capacity(telemetry.len() * 2);
    for series in telemetry.values() {
        let color = format!("#{}", series.team_color);
        lines.push(SeriesLine {
            label: format!("{} throttle", series.driver),
            color: color.clone(),
            points: series
                .samples
                .iter()
                .map(|s| [s.distance_m, s.throttle * INPUT_PCT_SCALE])
                .collect(),
        });
        lines.push(SeriesLine {
            label: format!("{} brake", series.driver),
            color,
            points: series
                .samples
                .iter()
                .map(|s| [s.distance_m, s.brake * INPUT_PCT_SCALE])
                .collect(),
        });
    }

    LineChartSpec {
        title: format!("Throttle and Brake for Top Qualifiers in {location} {year}"),
        x_label: "Distance (meters)".to_string(),
        y_label: "Input (%)".to_string(),
        lines,
    }
}
