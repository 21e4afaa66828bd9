//! Command-line interface definitions for the `piwait` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI for the `piwait` binary.
#[derive(Debug, Parser)]
#[command(
    name = "piwait",
    version,
    about = "Wait for Power Virtual Server resources to reach a target state",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Log filter directive (for example `debug` or `piwait=trace`).
    ///
    /// Falls back to `RUST_LOG`, then to `info`.
    #[arg(long, global = true, value_name = "FILTER")]
    pub(crate) log: Option<String>,
    /// Subcommand to run.
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Subcommands of the `piwait` binary.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Poll a resource until it reaches the requested state.
    #[command(name = "wait", about = "Poll a resource until it reaches the requested state")]
    Wait(WaitCommand),
}

/// Arguments for the `piwait wait` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct WaitCommand {
    /// Kind of resource to wait on.
    #[arg(value_enum)]
    pub(crate) kind: ResourceKind,
    /// Resource identifier.
    ///
    /// For nested kinds this names the parent: the network of a port, the
    /// security group of a member, or the network peer of a route filter.
    #[arg(value_name = "ID")]
    pub(crate) id: String,
    /// Identifier of the nested resource (port, member, or route filter).
    #[arg(long = "sub", value_name = "ID")]
    pub(crate) sub_id: Option<String>,
    /// State to wait for.
    #[arg(long, value_enum, default_value_t = Until::Ready)]
    pub(crate) until: Until,
    /// Instance health accepted as ready in addition to `OK`.
    #[arg(long, value_enum, ignore_case = true, default_value_t = ReadyHealth::Ok)]
    pub(crate) ready_status: ReadyHealth,
    /// Overall timeout in seconds; overrides the preset and configuration.
    #[arg(long, value_name = "SECONDS")]
    pub(crate) timeout: Option<u64>,
}

/// Resource kinds that can be awaited.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum ResourceKind {
    /// Virtual server instance.
    Instance,
    /// Block storage volume.
    Volume,
    /// Port on a workspace network.
    NetworkPort,
    /// Virtual persistent memory volume.
    Vpmem,
    /// DHCP server.
    Dhcp,
    /// Member of a network security group.
    NsgMember,
    /// Route filter on a network peer.
    RouteFilter,
}

/// Target state of a wait.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum Until {
    /// Created and usable.
    Ready,
    /// Instance powered off.
    Stopped,
    /// Instance resize applied.
    Resized,
    /// Gone.
    Deleted,
}

/// Instance health that counts as ready.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum ReadyHealth {
    /// Healthy.
    #[value(name = "OK")]
    Ok,
    /// Running with warnings.
    #[value(name = "WARNING")]
    Warning,
}
