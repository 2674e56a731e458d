pub mod academics;
pub mod analytics;
pub mod auth;
pub mod communication;
pub mod exports;
pub mod finance;
pub mod gamification;
pub mod health;
pub mod library;
pub mod parents;
pub mod students;
pub mod system;
pub mod teaching;
pub mod users;

pub use academics::configure_academic_routes;
pub use analytics::configure_analytics_routes;
pub use auth::configure_auth_routes;
pub use communication::configure_communication_routes;
pub use exports::configure_export_routes;
pub use finance::configure_finance_routes;
pub use gamification::configure_gamification_routes;
pub use health::configure_health_routes;
pub use library::configure_library_routes;
pub use parents::configure_parent_routes;
pub use students::configure_student_routes;
pub use system::configure_system_routes;
pub use teaching::configure_teaching_routes;
pub use users::configure_user_routes;
