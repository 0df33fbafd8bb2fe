pub mod account_service;
pub mod account_service_impl;
pub mod token_service;
pub mod token_service_impl;

pub use account_service::{AccountError, AccountInfo, AccountService, NewAccount, ProfileUpdate};
pub use account_service_impl::SeaOrmAccountService;
pub use token_service::TokenService;
pub use token_service_impl::SeaOrmTokenService;
