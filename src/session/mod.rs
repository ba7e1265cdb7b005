pub mod record;

pub use record::{SessionRecord, UserProfile};
