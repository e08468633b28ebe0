mod identity_auth;

pub use identity_auth::*;
