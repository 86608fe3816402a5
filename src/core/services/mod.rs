pub mod key_state;
pub mod sanitizer;
pub mod workbench;
