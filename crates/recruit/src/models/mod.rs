//! Domain models for recruiting entities

mod candidate;
mod job;
mod rate_limit;

pub use candidate::{
    Candidate, CandidateDetail, CandidateId, EducationEntry, ExperienceEntry, JobRef, Location,
    SocialProfile,
};
pub use job::{Job, Stage, StagesResponse};
pub use rate_limit::{RateLimitHeaders, RateLimitState};
