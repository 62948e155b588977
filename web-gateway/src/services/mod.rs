pub mod identity;
pub mod relay_client;

pub use identity::{IdentityClient, IdentityError};
pub use relay_client::RelayClient;
