//! Entity definitions (database row mappings).

pub mod contact_message;
pub mod contact_request;
pub mod donation;
pub mod donation_request;
pub mod user;

pub use contact_message::ContactMessageEntity;
pub use contact_request::{
    ContactRequestEntity, ContactRequestStatusDb, PendingContactRequestEntity,
};
pub use donation::{DonationEntity, DonationStatusDb};
pub use donation_request::{DonationRequestEntity, RequestStatusDb};
pub use user::{BloodTypeDb, RoleDb, UserEntity};
