pub mod attribute;
pub mod error;
pub mod params;
pub mod recipe;

pub use attribute::{order_by_name_desc, AttributeFilter};
pub use error::FilterError;
pub use params::{parse_flag, parse_id_list};
pub use recipe::{order_by_id_desc, RecipeFilter};
