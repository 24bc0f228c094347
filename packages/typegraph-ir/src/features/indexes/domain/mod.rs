mod error;
mod indexes;

pub use error::IndexQueryError;
pub use indexes::Indexes;
