mod account;
mod cookbook;
pub mod dto;
pub mod response;
mod router;
pub mod validation;

pub use account::account_router;
pub use cookbook::cookbook_router;
pub use router::{AppState, create_router};
