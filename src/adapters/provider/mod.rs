pub mod sequoia_provider;
