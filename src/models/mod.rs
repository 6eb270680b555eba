pub mod request_schema;
pub mod response_schema;
pub mod review;
pub mod settings;
pub mod user;

pub use request_schema::*;
pub use response_schema::*;
pub use review::*;
pub use settings::*;
pub use user::*;
