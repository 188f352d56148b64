// Products module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::configure;
pub use models::{NewProduct, Product, ProductRow};
pub use repositories::{MySqlProductRepository, ProductFilter, ProductRepository};
pub use services::ProductService;
