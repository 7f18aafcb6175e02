pub mod credentials;
pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config};
pub use schema::{
    Config, MisskeyConfig, RelayConfig, ServerConfig, TwitterConfig, VideoStrategy,
    WEB_BEARER_TOKEN,
};
