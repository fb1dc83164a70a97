// Error types for qualigraph

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum QualigraphError {
    // User input validation errors, caught before the session store is touched
    #[snafu(display("Invalid user input: {field} - {reason}"))]
    InvalidUserInput { field: String, reason: String },

    // Session store errors
    #[snafu(display("No qualifying session recorded for {location} {year}"))]
    SessionNotFound { location: String, year: i32 },
    #[snafu(display("Error reading session document"))]
    SessionIo { source: io::Error },
    #[snafu(display("Error parsing session document"))]
    SessionParse { source: serde_json::Error },
    #[snafu(display("Could not find application data directory for the session store"))]
    NoDataDir,

    // Upstream contract breaks: the session loaded but lacks an expected column
    #[snafu(display("Session results are missing the {field} field for {driver}"))]
    SessionSchema { field: String, driver: String },
}
