mod alias;
mod declaration;
mod fragment;
mod members;

pub(crate) use alias::AliasLinks;
pub use alias::{Alias, FreeFunction};
pub(crate) use declaration::DeclLinks;
pub use declaration::{
    CompositionDetails, Declaration, EnumDetails, ExtensionRecord, InheritedEdge, KindTag,
    ProtocolDetails, TypeKind,
};
pub use fragment::{AliasFragment, FileParseResult, TypeFragment};
pub use members::{AssociatedValue, EnumCase, Method, MethodParameter, Subscript, Variable};
