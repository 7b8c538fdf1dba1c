pub mod category;
pub mod manage_product;
pub mod paging;
pub mod public_product;
pub mod requests;
pub mod views;

pub use category::CategoryService;
pub use manage_product::ManageProductService;
pub use public_product::PublicProductService;
