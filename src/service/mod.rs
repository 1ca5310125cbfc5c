//! ProductService: the four catalogue operations over a `DataStore`.

mod product;
mod validation;
pub use product::ProductService;
pub use validation::RequestValidator;
