pub mod cost;
pub mod nearest;
pub mod policy;

#[cfg(test)]
mod selection_tests;

pub use cost::CostPolicy;
pub use nearest::NearestPolicy;
pub use policy::PolicyKind;
pub use policy::SelectionPolicy;
