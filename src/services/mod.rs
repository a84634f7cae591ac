pub mod auth_service;
pub mod reminder_service;
pub mod telegram_service;
pub mod user_service;
