pub mod apis;
pub mod auth;
pub mod loader;

pub use apis::{DATA_MAINTENANCE, KNOWN_APIS, PSEUDO_SERVICE, all_api_urls, api_url};
pub use auth::TokenSource;
pub use loader::{ConfigRequest, ResolvedConfig, resolve};
