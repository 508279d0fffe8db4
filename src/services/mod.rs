pub mod flood;
pub mod moderation;
pub mod roles;
