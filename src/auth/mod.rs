/// Authentication module
///
/// Token encoding/decoding, claims, the token issuer with its type
/// discipline, the clock and password hashing.

mod claims;
mod clock;
pub mod codec;
mod issuer;
mod password;

pub use claims::{Claims, RESERVED_CLAIMS};
pub use clock::{Clock, FixedClock, SystemClock};
pub use issuer::{ensure_token_type, TokenIssuer};
pub use password::{BcryptHasher, PasswordHasher};
