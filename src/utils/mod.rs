pub mod format;

pub use format::{format_datetime, format_user_mention, truncate_text};
