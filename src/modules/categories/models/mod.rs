mod category;

pub use category::{
    Category, CategorySummary, CreateCategoryRequest, NewCategory, UpdateCategoryRequest,
};
