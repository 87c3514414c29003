pub use super::admin_users::Entity as AdminUsers;
pub use super::play_logs::Entity as PlayLogs;
pub use super::qr_codes::Entity as QrCodes;
pub use super::scan_logs::Entity as ScanLogs;
pub use super::videos::Entity as Videos;
