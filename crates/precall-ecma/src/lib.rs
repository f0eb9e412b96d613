//! Compile-time expansion of `precall` invocations in ECMAScript sources.
//!
//! ```text
//! precall(`module.exports = 1555`)       =>  1555
//! precall`module.exports = {a: 1}`       =>  {"a": 1}
//! require("precall`module.exports = './a.js'`")  =>  require("./a.js")
//! ```
//!
//! Each invocation's literal text is compiled and run as an isolated module;
//! whatever it assigns to `module.exports` is printed back in its place.

pub mod context;
pub mod extract;
pub mod host;
pub mod matcher;
pub mod replace;
pub mod sandbox;
pub mod serialize;
pub mod transform;
pub mod visitor;

pub use context::MatchContext;
pub use host::Host;
pub use sandbox::{CompiledUnit, EngineSandbox, ModuleRecord, Sandbox};
pub use serialize::ExecutionResult;
pub use transform::{Precall, SandboxFactory};
pub use visitor::PrecallVisitor;

pub use precall_core::{Error, PrecallOptions, Result};
