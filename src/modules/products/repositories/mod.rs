pub mod product_repository;

pub use product_repository::{
    MySqlProductRepository, ProductFilter, ProductRepository, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
