pub mod chat;
pub mod explore;
pub mod recommend;
pub mod resolve;
pub mod vision;
