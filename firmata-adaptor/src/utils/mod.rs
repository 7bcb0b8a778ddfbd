pub use tokio;

pub use events::{EventHandler, EventManager};

pub mod events;
pub mod task;
