//! Inference over the joint distribution of two discrete variables.
//!
//! The usual workflow: build a joint prior from two independent marginals with
//! [`JointTable::build`], evaluate the observation with [`LikelihoodGrid::evaluate`], combine
//! them with [`update::update`], then read off [`JointTable::marginal`] or
//! [`JointTable::conditional`] distributions.
pub mod distribution;
pub mod error;
pub mod extract;
mod grid;
pub mod joint;
pub mod likelihood;
pub mod output;
pub mod support;
pub mod update;

pub use distribution::DiscreteDistribution;
pub use error::ProbabilityError;
pub use joint::{JointTable, Variable};
pub use likelihood::LikelihoodGrid;
pub use support::Support;
pub use update::update;
