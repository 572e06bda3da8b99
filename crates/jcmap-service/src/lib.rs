//! JCMap Service — domain services layered over the repository traits.
//!
//! Every service is generic over the `jcmap-core` repository traits, so
//! this crate carries no database dependency and tests can run against
//! any implementation.

pub mod access;
pub mod events;
pub mod notifications;
pub mod organizations;
pub mod users;

pub use access::require_role;
pub use events::EventsService;
pub use notifications::NotificationsService;
pub use organizations::OrganizationsService;
pub use users::{UsersService, promote_to_organizer_if_plain_user};
