//! Spokenform command AST
//!
//! Typed command trees sent to the editor engine, plus the builders that
//! assemble them from resolved spoken words.
//!
//! ```text
//!   spoken words ──► grammar::Vocabulary ──► compiler::build_* ──► ActionDescriptor
//!                       (table snapshots)      (structural rules)      (serde wire shape)
//!                                                                          │
//!                          describe::describe_action ◄─────────────────────┘
//! ```
//!
//! Every node serializes as a plain record tagged by `type` (`name` for
//! actions), matching what the engine expects.

pub mod action;
pub mod compiler;
pub mod describe;
pub mod destination;
pub mod grammar;
pub mod mark;
pub mod modifier;
pub mod scope;
pub mod target;

mod tagged;

pub use action::{ActionDescriptor, ComplexAction, SimpleAction, SimpleActionName};
pub use compiler::{AmbiguousTargetError, CompileError, RangeConnective, RangeConnectiveWithType};
pub use describe::{describe_action, describe_target, DescribeError};
pub use destination::{Destination, InsertionMode, ListDestination, PrimitiveDestination};
pub use grammar::{ActionKind, Vocabulary};
pub use mark::Mark;
pub use modifier::{Modifier, TargetPosition};
pub use scope::ScopeType;
pub use target::{ListElement, ListTarget, PrimitiveTarget, RangeAnchor, RangeTarget, RangeType, Target};
