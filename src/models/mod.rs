// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AgeStance, CandidateProfile, CleaningFrequency, CookingStyle, CriterionWeights, DietTolerance,
    DietType, Gender, HomeVibe, HostingPreference, InteractionEvent, InteractionKind, Lifestyle,
    MatchFilters, Occupation, ScoredCandidate, SurveyAnswers, Tolerance,
};
pub use requests::{FindMatchesRequest, RecordEventRequest, ScorePairRequest};
pub use responses::{
    ErrorResponse, FindMatchesResponse, HealthResponse, RecordEventResponse, ScorePairResponse,
};
