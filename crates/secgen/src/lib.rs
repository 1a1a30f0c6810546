//! Top-level facade crate for secgen.
//!
//! Re-exports the core policy compiler and the generator library so users can
//! depend on a single crate.

pub mod core {
    pub use secgen_core::*;
}

pub mod generator {
    pub use secgen_cli::*;
}
