pub mod home_controller;
pub mod check_alerts_controller;
pub mod alerts_admin_controller;
