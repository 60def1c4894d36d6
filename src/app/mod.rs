pub mod event;
pub mod session;

pub use event::AppEvent;
pub use session::{Feedback, Session};
