//! parkcheck-instruments
//!
//! Screening instrument definitions. Pure data and pure functions, no IO.
//!
//! - [`clinical`]: the ten voice-measurement fields, their plausible
//!   ranges, and validation of raw form input into a
//!   [`ClinicalReading`](parkcheck_core::models::reading::ClinicalReading).
//! - [`assessment`]: the seven-question symptom questionnaire and its
//!   positional weighted-sum risk score.

pub mod assessment;
pub mod clinical;
pub mod error;
pub mod scoring;
