pub mod audit;
pub mod crypto_provider;
pub mod key_observer;
