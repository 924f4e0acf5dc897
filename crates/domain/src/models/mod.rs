//! Domain model definitions.

pub mod contact_message;
pub mod contact_request;
pub mod donation;
pub mod donation_request;
pub mod user;

pub use contact_message::ContactMessage;
pub use contact_request::{
    ContactDecision, ContactRequest, ContactRequestStatus, DISCLOSURE_WINDOW_MINUTES,
};
pub use donation::{Donation, DonationStatus};
pub use donation_request::{DonationRequest, RequestStatus};
pub use user::{BloodType, DonorSummary, Role, User, UserSummary, COOLDOWN_DAYS};
