pub mod cache;
pub mod chat;
pub mod client;
pub mod forecast;
pub mod geocode;
