mod layout;
mod mode;
mod probe;
mod resolver;
mod spec;

pub(crate) use resolver::InterpreterCandidate;

pub use {
    layout::{AppLayout, ShellProfile, ShellSyntax, defaults},
    mode::{LaunchMode, ModeController},
    probe::{HostPaths, PathProbe},
    resolver::CommandResolver,
    spec::{LaunchSpec, Visibility, quote_arg},
};
