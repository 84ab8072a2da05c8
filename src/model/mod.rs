pub mod common;
pub mod entity;
pub mod kind;
pub mod output;
pub mod plan;
pub mod relationship;
pub mod request;

pub use common::*;
pub use entity::*;
pub use kind::*;
pub use output::*;
pub use plan::*;
pub use relationship::*;
pub use request::*;
