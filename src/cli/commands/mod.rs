pub mod audit_helpers;
pub mod decrypt;
pub mod encrypt;
pub mod generate;
pub mod history;
pub mod inspect;
pub mod session;
pub mod sign;
pub mod verify;
