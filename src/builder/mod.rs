//! Builder API for ergonomic wheel construction.
//!
//! ```rust
//! use fairspin::builder::SpinMachineBuilder;
//!
//! let machine = SpinMachineBuilder::new()
//!     .participants(["Ada", "Grace", "Linus"])
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(machine.participants().len(), 3);
//! ```

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::SpinMachineBuilder;
