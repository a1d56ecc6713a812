// Application state, background jobs and the actions keys trigger

pub mod actions;
pub mod events;
pub mod input;
pub mod jobs;
pub mod redeem_flow;
pub mod state;

pub use input::handle_input;
pub use jobs::FetchEvent;
pub use state::{App, AppScreen};
