pub mod assessment;
pub mod chat;
pub mod clinical;
pub mod health;
pub mod sessions;
