//! GRAFT Query
//!
//! Backend-neutral query/mutation IR and read-access compilation.
//!
//! Responsibilities:
//! - Define the closed IR vocabulary handed to executors
//! - Allocate bound variables for list transforms and object bindings
//! - Compile field reads with null- and shape-safe guards

mod error;
mod field_access;
mod node;
mod var;

pub use error::{QueryError, QueryResult};
pub use field_access::FieldAccess;
pub use node::{BinaryOperator, QueryNode, UnaryOperator, ValueShape};
pub use var::{VarGen, Variable};
