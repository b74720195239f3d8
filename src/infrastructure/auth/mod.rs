mod bcrypt_password_hasher;
mod jwt_token_signer;

pub use bcrypt_password_hasher::BcryptPasswordHasher;
pub use jwt_token_signer::JwtTokenSigner;
