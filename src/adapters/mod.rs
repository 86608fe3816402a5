pub mod audit;
pub mod provider;
