//! Security validation modules.

pub mod containment;

pub use containment::canonicalize_lenient;
pub use containment::check_containment;
