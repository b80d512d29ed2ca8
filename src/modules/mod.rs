pub mod auth;
pub mod users;

pub use self::auth::model::LoginRequest;
pub use self::users::model::User;
