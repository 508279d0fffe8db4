pub mod ban_service;
pub mod duration;
pub mod warn_service;
