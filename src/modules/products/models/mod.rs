mod product;

pub use product::{
    CreateProductRequest, NewProduct, Product, ProductRow, UpdateProductRequest,
    DEFAULT_BARCODE_SYMBOLOGY,
};
