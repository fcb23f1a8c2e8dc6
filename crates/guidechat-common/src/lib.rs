pub mod defaults;
pub mod errors;
pub mod id;

pub use errors::{ConfigError, GuidechatError};
pub use id::{new_id, SessionId};
