mod snapshot_differ;

pub use snapshot_differ::diff_declarations;
