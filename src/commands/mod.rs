//! Command framework: commands, check chains, and the registry the
//! dispatch gate looks invocations up in.

mod check;
mod command;
mod context;
mod registry;

pub use check::{AdminOnly, Check, CheckFailure, GuildOnly, OwnerOnly};
pub use command::Command;
pub use context::{CommandContext, Invocation};
pub use registry::{CommandGroup, CommandRegistry, InvokeOutcome, RegistryError};
