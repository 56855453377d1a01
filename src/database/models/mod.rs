pub mod preference;
pub mod product;
pub mod user;

pub use preference::*;
pub use product::*;
pub use user::*;
