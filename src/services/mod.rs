pub mod auth_service;
pub mod log_service;
pub mod qr_code_service;
pub mod qr_generator;
pub mod stats_service;
pub mod storage;
pub mod video_service;
