// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Adopter, Adoption, Denial, MatchEvent, MatchTotal, PendingMatch, Pet, PetStatus, RankedPet};
pub use requests::{AuditTotalsQuery, MatchActionRequest, RecommendationsQuery};
pub use responses::{AuditTotalsResponse, CompleteMatchResponse, DenyMatchResponse, ErrorResponse, HealthResponse, ProposeMatchResponse, RecommendationsResponse};
