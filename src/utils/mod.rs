pub(crate) mod error_handler;
pub(crate) mod misc;
pub(crate) mod validation;

pub use error_handler::AppError;
pub use misc::*;
pub use validation::first_validation_message;
pub use validation::validate_target_type;
pub use validation::ValidatedBody;
pub use validation::ValidatedQuery;
