// Categories module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::configure;
pub use models::{Category, CategorySummary, NewCategory};
pub use repositories::{CategoryRepository, MySqlCategoryRepository};
pub use services::CategoryService;
