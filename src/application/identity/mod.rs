//! Identity module: token resolution, authentication and user management

pub mod resolver;
pub mod service;

pub use resolver::IdentityResolver;
pub use service::{
    parse_roles, AdminBootstrap, AuthResult, IdentitySettings, SignupCommand, UserService,
};
