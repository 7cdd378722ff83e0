//! Domain services for CropMate rentals.
//!
//! Services contain business logic that operates on domain models and
//! reach storage and email only through the traits in [`store`] and
//! [`notification`].

pub mod change_feed;
pub mod decision_email;
pub mod decision_notifier;
pub mod memory;
pub mod notification;
pub mod rental_workflow;
pub mod store;

pub use change_feed::{ChangeFeed, RequestChange};
pub use decision_email::{render_decision_email, RenderedEmail};
pub use decision_notifier::{DecisionNotifier, NotificationOutcome};
pub use memory::InMemoryStore;
pub use notification::{
    Delivery, EmailTransport, MockEmailTransport, OutboundEmail, TransportError,
};
pub use rental_workflow::{RentalWorkflow, ReviewDecision};
pub use store::{
    ProfileStore, ProviderApplicationStore, RentalRequestStore, SessionStore, StoreError,
    StoreHealth,
};
