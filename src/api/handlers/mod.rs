pub mod auth;
pub mod health;
pub mod logs;
pub mod public;
pub mod qr_codes;
pub mod stats;
pub mod videos;
