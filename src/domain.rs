pub mod chat;
pub mod projection;
pub mod sun;
pub mod weather;
