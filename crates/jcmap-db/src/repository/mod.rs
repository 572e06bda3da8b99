//! SurrealDB repository implementations.

mod event;
mod notification;
mod organization;
mod user;

pub use event::SurrealEventRepository;
pub use notification::SurrealNotificationRepository;
pub use organization::SurrealOrganizationRepository;
pub use user::SurrealUserRepository;
