pub mod store;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::QualigraphError;

/// Deserializes a field that was present in the document, preserving the
/// missing/null/value three-state split: a present `null` becomes
/// `Some(None)` instead of collapsing into the outer `None`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// One row of the qualifying classification.
///
/// Rows arrive in elimination order (the order the session finished in), not
/// in lap-time order. Each segment time is three-state: the field can be
/// missing from the document entirely (an upstream schema break), recorded as
/// `null` (the driver set no time in that segment), or a duration in seconds.
/// Serde's double-`Option` maps those states onto `None`, `Some(None)` and
/// `Some(Some(secs))` respectively.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriverResult {
    /// Driver short code, e.g. "VER"
    pub abbreviation: String,
    /// Team color as a hex string without the leading '#', e.g. "3671C6"
    pub team_color: String,
    /// First qualifying segment time in seconds
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub q1: Option<Option<f64>>,
    /// Second qualifying segment time in seconds
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub q2: Option<Option<f64>>,
    /// Final qualifying segment time in seconds; decides the grid
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub q3: Option<Option<f64>>,
}

impl DriverResult {
    /// The representative lap time for this driver: the final-segment time
    /// when the session recorded one.
    ///
    /// # Errors
    ///
    /// Returns `SessionSchema` when the final segment field is missing from
    /// the document altogether. A driver who simply set no time is
    /// `Ok(None)`, never an error.
    pub fn final_segment_time(&self) -> Result<Option<f64>, QualigraphError> {
        self.q3.ok_or_else(|| QualigraphError::SessionSchema {
            field: "q3".to_string(),
            driver: self.abbreviation.clone(),
        })
    }
}

/// A single recorded lap with its raw sample stream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lap {
    /// Driver short code this lap belongs to
    pub driver: String,
    /// Lap number within the session
    pub lap_number: u32,
    /// Lap time in seconds; in-laps and out-laps carry no time
    pub lap_time_s: Option<f64>,
    /// Raw samples in recording order
    #[serde(default)]
    pub samples: Vec<RawSample>,
}

/// One raw telemetry measurement along a lap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Session time of the measurement in seconds
    pub session_time_s: f64,
    /// World position, meters
    pub world_position_x: f64,
    /// World position, meters
    pub world_position_y: f64,
    /// Speed in km/h
    pub speed_kmh: f64,
    /// Throttle input, 0=released to 1=full throttle
    pub throttle: f64,
    /// Brake input, 0=released to 1=max pedal force
    pub brake: f64,
}

/// A fully loaded qualifying session: classification plus lap records.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionHandle {
    pub location: String,
    pub year: i32,
    /// Classification rows in elimination order
    pub results: Vec<DriverResult>,
    /// All recorded laps of the session
    pub laps: Vec<Lap>,
}

/// Resolves a (year, location) request to a loaded qualifying session.
///
/// Implementations own their transport and caching; the pipeline only sees
/// the typed `SessionHandle`. The file-backed store in [`store`] is the
/// production implementation, tests substitute their own.
pub trait SessionDataSource {
    /// Fetch the qualifying session for the given event.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` when the pair does not resolve to a recorded
    /// session, `SessionIo`/`SessionParse` for transport and decoding
    /// failures.
    fn fetch_session(
        &self,
        year: i32,
        location: &str,
    ) -> Result<SessionHandle, QualigraphError>;
}

/// Supplies lap records and per-lap sample streams for a session.
pub trait LapSampleProvider {
    /// All laps recorded for the given driver, session order.
    fn laps_for_driver(&self, driver: &str) -> Vec<Lap>;

    /// The raw sample stream of a lap. Empty when nothing was recorded,
    /// never an error.
    fn telemetry_for_lap(&self, lap: &Lap) -> Vec<RawSample>;
}

impl LapSampleProvider for SessionHandle {
    fn laps_for_driver(&self, driver: &str) -> Vec<Lap> {
        self.laps.iter().filter(|l| l.driver == driver).cloned().collect()
    }

    fn telemetry_for_lap(&self, lap: &Lap) -> Vec<RawSample> {
        lap.samples.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_time_three_states_from_json() {
        let row: DriverResult = serde_json::from_str(
            r#"{"abbreviation":"VER","team_color":"3671C6","q1":80.1,"q2":79.4,"q3":null}"#,
        )
        .unwrap();
        assert_eq!(row.q1, Some(Some(80.1)));
        assert_eq!(row.q3, Some(None));
        assert_eq!(row.final_segment_time().unwrap(), None);

        let row: DriverResult = serde_json::from_str(
            r#"{"abbreviation":"LEC","team_color":"E8002D","q1":80.3,"q2":79.6}"#,
        )
        .unwrap();
        assert_eq!(row.q3, None);
        assert!(matches!(
            row.final_segment_time(),
            Err(QualigraphError::SessionSchema { .. })
        ));
    }

    #[test]
    fn test_laps_for_driver_filters_by_abbreviation() {
        let session = SessionHandle {
            location: "Monza".to_string(),
            year: 2024,
            results: Vec::new(),
            laps: vec![
                Lap {
                    driver: "VER".to_string(),
                    lap_number: 1,
                    lap_time_s: None,
                    samples: Vec::new(),
                },
                Lap {
                    driver: "LEC".to_string(),
                    lap_number: 1,
                    lap_time_s: Some(80.2),
                    samples: Vec::new(),
                },
                Lap {
                    driver: "VER".to_string(),
                    lap_number: 2,
                    lap_time_s: Some(79.9),
                    samples: Vec::new(),
                },
            ],
        };

        let laps = session.laps_for_driver("VER");
        assert_eq!(laps.len(), 2);
        assert!(laps.iter().all(|l| l.driver == "VER"));
        assert!(session.laps_for_driver("HAM").is_empty());
    }
}
