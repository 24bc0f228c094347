mod type_name;

pub use type_name::{
    ArrayType, ClosureSignature, DictionaryType, GenericType, GenericTypeParameter, TupleElement,
    TypeName,
};
