pub mod backup;
pub mod email;
pub mod serve;
