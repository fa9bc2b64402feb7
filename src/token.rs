pub mod issuer;
pub mod remote;
pub mod signer;

pub use issuer::{ConfiguredIssuer, TokenIssuer, TokenPayload};
pub use remote::RemoteTokenIssuer;
pub use signer::{HmacTokenIssuer, SigningKey, TokenClaims};
