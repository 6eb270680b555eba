pub mod helper;

pub use helper::body_json;
pub use helper::build_get_request;
pub use helper::build_post_request;
pub use helper::get_app;
pub use helper::spawn_server;
pub use helper::token_for;
pub use helper::get_app_with_config;
pub use helper::test_config;
pub use helper::test_mongodb_uri;
