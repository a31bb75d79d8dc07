pub mod collaborator;
pub mod process;

pub use collaborator::Collaborator;
pub use process::{Invocation, InvocationOutcome, Invoker, ProcessInvoker, StdinMode, StdoutMode};
