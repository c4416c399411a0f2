pub mod appeal;
pub mod appeal_store;
pub mod moderators;
pub mod notification;
pub mod unban;
