use std::collections::BTreeMap;

use log::warn;

use crate::errors::QualigraphError;
use crate::session::{DriverResult, LapSampleProvider, RawSample};

/// How many drivers get a telemetry comparison trace.
pub const DEFAULT_COMPARISON_SIZE: usize = 3;

// The representative time and the lap record travel through separate
// document fields; half a millisecond is far below timing resolution but
// absorbs float round-tripping.
const LAP_TIME_MATCH_TOLERANCE_S: f64 = 0.0005;

/// One telemetry measurement re-indexed by distance along the lap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignedSample {
    /// Meters traveled since the start of the lap
    pub distance_m: f64,
    pub speed_kmh: f64,
    /// Throttle input, 0..1
    pub throttle: f64,
    /// Brake input, 0..1
    pub brake: f64,
}

/// A driver's distance-indexed trace of their representative lap.
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetrySeries {
    pub driver: String,
    /// Team color hex string, without the leading '#'; carried along so all
    /// charts color a driver the same way
    pub team_color: String,
    /// Time of the lap the samples were taken from, seconds
    pub lap_time_s: f64,
    /// Samples in recording order, non-decreasing in `distance_m`
    pub samples: Vec<AlignedSample>,
}

/// Build distance-indexed telemetry for the first `top_m` classified drivers.
///
/// The lap is matched by equality with the driver's final-segment time, not
/// by a generic "fastest lap" pick, so the trace always belongs to the same
/// lap the ranking table reports. Drivers with no recorded time are skipped
/// under the same rule the ranking applies; drivers whose matched lap has no
/// usable sample stream are skipped with a warning. Absence from the
/// returned mapping is the only signal of "no usable telemetry" — a present
/// series is always complete.
///
/// # Errors
///
/// `SessionSchema` when a considered row lacks the final segment field.
pub fn align_telemetry<P: LapSampleProvider>(
    results: &[DriverResult],
    top_m: usize,
    provider: &P,
) -> Result<BTreeMap<String, TelemetrySeries>, QualigraphError> {
    let mut series_by_driver = BTreeMap::new();

    for row in results.iter().take(top_m) {
        let Some(lap_time_s) = row.final_segment_time()? else {
            continue;
        };

        let laps = provider.laps_for_driver(&row.abbreviation);
        let matched = laps.iter().find(|lap| {
            lap.lap_time_s
                .is_some_and(|t| (t - lap_time_s).abs() < LAP_TIME_MATCH_TOLERANCE_S)
        });
        let Some(lap) = matched else {
            warn!(
                "No lap matching the {:.3}s qualifying time recorded for {}, skipping",
                lap_time_s, row.abbreviation
            );
            continue;
        };

        let samples = provider.telemetry_for_lap(lap);
        if samples.is_empty() {
            warn!(
                "No telemetry recorded for {}'s {:.3}s lap, skipping",
                row.abbreviation, lap_time_s
            );
            continue;
        }

        series_by_driver.insert(
            row.abbreviation.clone(),
            TelemetrySeries {
                driver: row.abbreviation.clone(),
                team_color: row.team_color.clone(),
                lap_time_s,
                samples: add_distance(&samples),
            },
        );
    }

    Ok(series_by_driver)
}

// Cumulative Euclidean distance over consecutive world positions, starting
// at zero. Step lengths are never negative, so the sequence is
// non-decreasing by construction.
fn add_distance(samples: &[RawSample]) -> Vec<AlignedSample> {
    let mut aligned = Vec::with_capacity(samples.len());
    let mut distance_m = 0.0;
    let mut prev: Option<&RawSample> = None;

    for sample in samples {
        if let Some(p) = prev {
            let dx = sample.world_position_x - p.world_position_x;
            let dy = sample.world_position_y - p.world_position_y;
            distance_m += (dx * dx + dy * dy).sqrt();
        }
        aligned.push(AlignedSample {
            distance_m,
            speed_kmh: sample.speed_kmh,
            throttle: sample.throttle,
            brake: sample.brake,
        });
        prev = Some(sample);
    }

    aligned
}
