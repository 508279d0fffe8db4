pub mod bans;
pub mod warnings;
