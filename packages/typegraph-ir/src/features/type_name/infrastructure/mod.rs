mod parser;

pub use parser::parse_type_name;
