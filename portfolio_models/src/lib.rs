pub mod contact;
pub mod delivery;
pub mod email_address;
mod macros;
