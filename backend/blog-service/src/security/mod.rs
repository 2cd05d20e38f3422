pub mod password;
pub mod token;

pub use password::{check_password, hash_password, verify_password};
pub use token::generate_token_key;
