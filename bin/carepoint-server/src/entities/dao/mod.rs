pub mod interaction;
pub mod user;

pub use interaction::Interaction;
pub use user::UserRecord;
