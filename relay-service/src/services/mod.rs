pub mod completion;
pub mod key_reload;
pub mod providers;

pub use completion::{complete, map_provider_error};
pub use providers::{CompletionProvider, ProviderError};
