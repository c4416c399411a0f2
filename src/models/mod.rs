pub mod appeal;

pub use appeal::{AppealStatus, Entity as Appeal, Model as AppealModel};
