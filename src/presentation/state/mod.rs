mod app_state;

pub use app_state::{AppState, DEFAULT_PROGRESS_CAPACITY};
