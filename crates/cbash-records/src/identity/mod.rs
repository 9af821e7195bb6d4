//! Cross-file symbolic references.
//!
//! Records refer to each other by `(namespace, local id)`, where the
//! namespace is the file the target was defined in. The engine only
//! understands the *short form*: the namespace's load-order position packed
//! with the local id. Short forms are only meaningful within one collection,
//! so a [`SymbolicRef`] caches the short form together with the collection
//! it was resolved for and re-resolves when used anywhere else.

mod filter;
mod kind;
mod reference;
mod scope;

pub use filter::{
    filter_valid, filter_valid_dict, filter_valid_dict_shorts, filter_valid_dict_values, filter_valid_shorts,
};
pub use kind::{ActorValueKind, FormIdKind, MgefCodeKind, RefKind};
pub use reference::{ActorValue, FormId, MgefCode, RefState, SymbolicRef};
pub use scope::{EngineScope, LoadOrder, Scope};
