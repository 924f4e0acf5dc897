//! Repository implementations.

pub mod contact_message;
pub mod contact_request;
pub mod donation;
pub mod donation_request;
pub mod user;

pub use contact_message::ContactMessageRepository;
pub use contact_request::ContactRequestRepository;
pub use donation::{AcceptError, CompleteError, DonationRepository};
pub use donation_request::DonationRequestRepository;
pub use user::{RoleCounts, UserRepository};
