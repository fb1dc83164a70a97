use std::collections::BTreeMap;

use log::info;

use crate::alignment::{DEFAULT_COMPARISON_SIZE, TelemetrySeries, align_telemetry};
use crate::charts::{ChartSet, build_charts};
use crate::errors::QualigraphError;
use crate::ranking::{DEFAULT_RANKING_SIZE, RankingEntry, extract_ranking};
use crate::session::SessionDataSource;

// First world-championship season to a generous future bound
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1950..=2100;

/// Per-request knobs, passed explicitly into every call. Both default to the
/// policy values: the Q3 field of ten, and the podium three.
#[derive(Clone, Copy, Debug)]
pub struct RequestOptions {
    /// Drivers considered for the lap-time table
    pub ranking_size: usize,
    /// Drivers considered for telemetry comparison
    pub comparison_size: usize,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            ranking_size: DEFAULT_RANKING_SIZE,
            comparison_size: DEFAULT_COMPARISON_SIZE,
        }
    }
}

/// Everything one qualifying request produces, handed to the rendering layer.
#[derive(Clone, Debug)]
pub struct QualiReport {
    pub location: String,
    pub year: i32,
    /// Lap-time table, fastest first
    pub ranking: Vec<RankingEntry>,
    /// Considered drivers with no recorded time, session order
    pub absent: Vec<String>,
    /// Distance-indexed traces keyed by driver code
    pub telemetry: BTreeMap<String, TelemetrySeries>,
    pub charts: ChartSet,
}

/// Validate a raw year string before anything touches the data source.
pub fn validate_year(raw: &str) -> Result<i32, QualigraphError> {
    let year: i32 =
        raw.trim()
            .parse()
            .map_err(|_| QualigraphError::InvalidUserInput {
                field: "year".to_string(),
                reason: format!("'{raw}' is not a number"),
            })?;
    if !YEAR_RANGE.contains(&year) {
        return Err(QualigraphError::InvalidUserInput {
            field: "year".to_string(),
            reason: format!(
                "{year} is outside the supported range {}-{}",
                YEAR_RANGE.start(),
                YEAR_RANGE.end()
            ),
        });
    }
    Ok(year)
}

/// Validate and normalize a raw location string.
pub fn validate_location(raw: &str) -> Result<String, QualigraphError> {
    let location = raw.trim();
    if location.is_empty() {
        return Err(QualigraphError::InvalidUserInput {
            field: "location".to_string(),
            reason: "location cannot be empty".to_string(),
        });
    }
    Ok(location.to_string())
}

/// Run the full pipeline for an already-validated request: fetch the
/// session, rank the top qualifiers, align telemetry for the podium group,
/// and build the chart specs. One synchronous pass, fresh entities every
/// call.
pub fn run_session<S: SessionDataSource>(
    source: &S,
    location: &str,
    year: i32,
    options: &RequestOptions,
) -> Result<QualiReport, QualigraphError> {
    let session = source.fetch_session(year, location)?;

    let (ranking, absent) = extract_ranking(&session.results, options.ranking_size)?;
    let telemetry = align_telemetry(&session.results, options.comparison_size, &session)?;
    let charts = build_charts(location, year, &ranking, &absent, &telemetry);

    info!(
        "{} {}: ranked {} drivers ({} without a time), telemetry for {}",
        location,
        year,
        ranking.len(),
        absent.len(),
        telemetry.len()
    );

    Ok(QualiReport {
        location: location.to_string(),
        year,
        ranking,
        absent,
        telemetry,
        charts,
    })
}

/// Boundary entry point taking raw user input. Both fields are validated
/// before the data source is consulted, so a malformed year never turns
/// into a pipeline fault.
pub fn run_request<S: SessionDataSource>(
    source: &S,
    location_raw: &str,
    year_raw: &str,
    options: &RequestOptions,
) -> Result<QualiReport, QualigraphError> {
    let year = validate_year(year_raw)?;
    let location = validate_location(location_raw)?;
    run_session(source, &location, year, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionHandle;

    // Fails the test if the pipeline reaches the data source
    struct UnreachableSource;

    impl SessionDataSource for UnreachableSource {
        fn fetch_session(
            &self,
            _year: i32,
            _location: &str,
        ) -> Result<SessionHandle, QualigraphError> {
            panic!("data source must not be consulted for invalid input");
        }
    }

    #[test]
    fn test_malformed_year_rejected_before_fetch() {
        let result = run_request(
            &UnreachableSource,
            "Monza",
            "abc",
            &RequestOptions::default(),
        );
        assert!(matches!(
            result,
            Err(QualigraphError::InvalidUserInput { .. })
        ));
    }

    #[test]
    fn test_out_of_range_year_rejected_before_fetch() {
        let result = run_request(
            &UnreachableSource,
            "Monza",
            "1949",
            &RequestOptions::default(),
        );
        assert!(matches!(
            result,
            Err(QualigraphError::InvalidUserInput { .. })
        ));
    }

    #[test]
    fn test_empty_location_rejected_before_fetch() {
        let result = run_request(
            &UnreachableSource,
            "   ",
            "2024",
            &RequestOptions::default(),
        );
        assert!(matches!(
            result,
            Err(QualigraphError::InvalidUserInput { .. })
        ));
    }

    #[test]
    fn test_validate_year_trims_and_parses() {
        assert_eq!(validate_year(" 2024 ").unwrap(), 2024);
    }

    #[test]
    fn test_validate_location_trims() {
        assert_eq!(validate_location("  Monza ").unwrap(), "Monza");
    }

    #[test]
    fn test_default_options_match_policy() {
        let options = RequestOptions::default();
        assert_eq!(options.ranking_size, 10);
        assert_eq!(options.comparison_size, 3);
    }
}
