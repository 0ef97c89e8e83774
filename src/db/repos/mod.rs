mod accounts;
mod brands;
mod companies;
mod labels;
mod manufacturers;
mod products;
mod submissions;

pub use accounts::*;
pub use brands::*;
pub use companies::*;
pub use labels::*;
pub use manufacturers::*;
pub use products::*;
pub use submissions::*;
