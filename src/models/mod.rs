mod account;
mod catalog;
mod company;
mod label;
mod status;
mod submission;
mod validators;

pub use account::*;
pub use catalog::*;
pub use company::*;
pub use label::*;
pub use status::*;
pub use submission::*;
