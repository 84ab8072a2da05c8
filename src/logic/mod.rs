pub mod analysis;
pub mod assemble;
pub mod clean;
pub mod compare;
pub mod fill;
pub mod generate;
pub mod optimize;
pub mod pipeline;
pub mod validate;

pub use analysis::*;
pub use assemble::*;
pub use clean::*;
pub use compare::*;
pub use fill::*;
pub use generate::*;
pub use optimize::*;
pub use pipeline::*;
pub use validate::*;
