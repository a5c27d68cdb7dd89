pub mod resource;
pub mod user;

pub use resource::{Resource, ResourceKind, ResourceView};
pub use user::{NewUser, User, UserChanges, UserProfile};
