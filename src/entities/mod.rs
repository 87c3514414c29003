pub mod prelude;

pub mod admin_users;
pub mod play_logs;
pub mod qr_codes;
pub mod scan_logs;
pub mod videos;
