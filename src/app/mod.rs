mod state;

pub use state::{App, Dialog, Focus};
