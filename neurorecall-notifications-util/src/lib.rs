pub mod badge;
pub mod notification;
pub mod time_ago;
pub mod timestamp;

pub use badge::{badge_label, BADGE_MAX};
pub use notification::{Notification, BILINGUAL_DELIMITER};
pub use time_ago::time_ago;
pub use timestamp::parse_server_timestamp;
