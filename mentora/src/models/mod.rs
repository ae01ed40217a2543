//! Data models shared across candidate sources, the index, and the ranker

mod batch;
mod course;
mod profile;

pub use batch::{CandidateBatch, RankedCourse, RankedResult, SourceTag};
pub use course::{Course, Difficulty, Platform, LINK_UNAVAILABLE};
pub use profile::UserProfile;
