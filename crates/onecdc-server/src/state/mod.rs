mod store;

pub use store::{AppState, ViewLease};
