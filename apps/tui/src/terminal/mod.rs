mod setup;

pub use setup::{cleanup_terminal_state, install_panic_hook, setup_terminal};
