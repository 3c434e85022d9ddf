pub mod authenticator;
pub mod token_accessor;
