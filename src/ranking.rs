use crate::errors::QualigraphError;
use crate::session::DriverResult;

/// How many classified drivers are considered for the lap-time table.
pub const DEFAULT_RANKING_SIZE: usize = 10;

/// One row of the lap-time table.
#[derive(Clone, Debug, PartialEq)]
pub struct RankingEntry {
    pub driver: String,
    /// Representative lap time in seconds
    pub lap_time_s: f64,
    /// Team color hex string, without the leading '#'
    pub team_color: String,
}

/// Build the lap-time table for the first `top_n` classified drivers.
///
/// Candidacy is decided by input order, which is the session's elimination
/// order; the surviving entries are then sorted ascending by lap time for
/// display. These two orderings differ on purpose: the cut selects the
/// field, the sort ranks it. The sort is stable, so duplicate times keep
/// their session order.
///
/// Drivers whose final-segment time was recorded as unset are returned in
/// the second element, in session order, never silently dropped.
///
/// # Errors
///
/// `SessionSchema` when any considered row lacks the final segment field
/// entirely, see [`DriverResult::final_segment_time`].
pub fn extract_ranking(
    results: &[DriverResult],
    top_n: usize,
) -> Result<(Vec<RankingEntry>, Vec<String>), QualigraphError> {
    let mut entries = Vec::with_capacity(top_n.min(results.len()));
    let mut absent = Vec::new();

    for row in results.iter().take(top_n) {
        match row.final_segment_time()? {
            Some(lap_time_s) => entries.push(RankingEntry {
                driver: row.abbreviation.clone(),
                lap_time_s,
                team_color: row.team_color.clone(),
            }),
            None => absent.push(row.abbreviation.clone()),
        }
    }

    entries.sort_by(|a, b| a.lap_time_s.total_cmp(&b.lap_time_s));
    Ok((entries, absent))
}
