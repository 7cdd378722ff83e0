//! Domain models for CropMate rentals.

pub mod decision;
pub mod profile;
pub mod provider_application;
pub mod rental_request;
pub mod session;

pub use decision::{Decision, DecisionStatus, DecisionSubject, RequestDecision, RequestKind};
pub use profile::{Credentials, NewProfile, Profile, ProfileRole};
pub use provider_application::{
    NewProviderApplication, ProviderApplication, SubmitProviderApplication,
};
pub use rental_request::{
    DecideRentalRequest, EquipmentDescriptor, NewRentalRequest, PriceInput, RentalRequest,
    RentalRequestWithRequester, RequestStatus, Requester, ReviewQueue, SubmitRentalRequest,
};
pub use session::{AdminCapability, NewSession, Session};
