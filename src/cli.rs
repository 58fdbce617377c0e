//! Command-line interface for vcdctl
//!
//! The interface is a verb/noun tree built with clap derive:
//!
//! - `get`, `create`, `set` and `delete` act on named resources
//! - `get`, `delete`, `post` and `put` also accept a raw API path and print
//!   the response body unchanged
//! - `config` manages the site list in the configuration file
//!
//! Nouns carry short aliases (`vdc`, `vn`, `e`, `a`, `t`, ...) so common
//! commands stay short at the prompt.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::api::vapp::DEFAULT_LEASE_SECONDS;

/// Top-level command line.
///
/// `--config` and `--debug` are global and may appear after any subcommand.
#[derive(Parser, Debug)]
#[command(
    name = "vcdctl",
    about = "Command-line client for VMware Cloud Director",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the site configuration file
    /// Defaults to $HOME/.config/vcdctl.json
    #[arg(short = 'c', long, global = true, env = "VCDCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log requests (method, path, headers, body) to stderr
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get resources, or GET an API path
    Get(GetArgs),

    /// Create resources
    Create {
        #[command(subcommand)]
        resource: CreateCommand,
    },

    /// Change resource state
    Set {
        #[command(subcommand)]
        resource: SetCommand,
    },

    /// Delete resources, or DELETE an API path
    Delete(DeleteArgs),

    /// POST to an API path
    Post(RawArgs),

    /// PUT to an API path, or renew a vApp lease
    Put(PutArgs),

    /// Manage configured sites
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true)]
pub struct GetArgs {
    /// API path for a raw GET (e.g. /api/org)
    pub path: Option<String>,

    #[command(subcommand)]
    pub resource: Option<GetCommand>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum GetCommand {
    /// Organizations
    Org,

    /// Org VDCs [vdc]
    #[command(name = "orgvdc", visible_alias = "vdc")]
    OrgVdc,

    /// Networks of an org VDC [vn]
    #[command(name = "vdc-network", visible_alias = "vn")]
    VdcNetwork {
        /// Org VDC name
        vdc: String,
    },

    /// Edge gateways of an org VDC [e]
    #[command(visible_alias = "e")]
    Edge {
        /// Org VDC name
        vdc: String,
    },

    /// Uplinks of an edge gateway [en]
    #[command(name = "edge-network", visible_alias = "en")]
    EdgeNetwork {
        #[arg(short = 'v', long)]
        orgvdc: String,
        #[arg(short = 'e', long)]
        edge: String,
    },

    /// Tier-0 backed provider gateways [gw]
    #[command(name = "provider-gateway", visible_alias = "gw")]
    ProviderGateway,

    /// External networks [xn]
    #[command(name = "external-network", visible_alias = "xn")]
    ExternalNetwork,

    /// vApps, or details of the first vApp whose name contains NAME [a]
    #[command(visible_alias = "a")]
    Vapp {
        name: Option<String>,
        /// Show deployment lease expiry
        #[arg(short = 'l', long)]
        showlease: bool,
    },

    /// Networks of a vApp [an]
    #[command(name = "vapp-network", visible_alias = "an")]
    VappNetwork {
        /// vApp name or id
        vapp: String,
    },

    /// VMs of a vApp [vm]
    #[command(name = "vapp-vm", visible_alias = "vm")]
    VappVm {
        /// vApp name or id
        vapp: String,
    },

    /// NICs of every VM in a vApp [vmn]
    #[command(name = "vapp-vmnetwork", visible_alias = "vmn")]
    VappVmNetwork {
        /// vApp name or id
        vapp: String,
    },

    /// Recent tasks of an org, or of all orgs [t]
    #[command(visible_alias = "t")]
    Task {
        /// Org name (defaults to the site's org)
        org: Option<String>,
        /// Show one task in detail
        #[arg(short = 'i', long)]
        id: Option<String>,
        /// Show the most recent task in detail
        #[arg(short = 'l', long, conflicts_with = "id")]
        latest: bool,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum CreateCommand {
    /// Organization
    Org { name: String },

    /// Org VDC with the Flex allocation model [vdc]
    #[command(name = "orgvdc", visible_alias = "vdc")]
    OrgVdc {
        name: String,
        #[arg(short = 'o', long)]
        org: String,
        #[arg(short = 'p', long)]
        provider_vdc: String,
        #[arg(short = 's', long)]
        storage_policy: String,
        #[arg(short = 'n', long)]
        network_pool: String,
    },

    /// Org VDC network [vn]
    #[command(name = "vdc-network", visible_alias = "vn")]
    VdcNetwork(CreateNetworkArgs),

    /// Edge gateway on a provider gateway [e]
    #[command(visible_alias = "e")]
    Edge {
        name: String,
        #[arg(long)]
        orgvdc: String,
        #[arg(long)]
        provider_gateway: String,
        /// Fixed uplink IP; allocated automatically when omitted
        #[arg(long)]
        primary_ip: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Args, Debug, PartialEq)]
pub struct CreateNetworkArgs {
    pub name: String,

    #[arg(long)]
    pub orgvdc: String,

    #[arg(long = "type", value_enum)]
    pub network_type: NetworkTypeArg,

    /// Gateway address with prefix length (e.g. 192.168.10.1/24)
    #[arg(long, required_if_eq_any = [("network_type", "isolated"), ("network_type", "nat-routed")])]
    pub gateway: Option<String>,

    #[arg(long)]
    pub dns1: Option<String>,

    #[arg(long)]
    pub dns2: Option<String>,

    #[arg(long)]
    pub dns_suffix: Option<String>,

    /// Static pool range START-END, repeatable
    #[arg(long = "ip-range")]
    pub ip_ranges: Vec<String>,

    /// External network a direct network is bridged to
    #[arg(long, required_if_eq("network_type", "direct"))]
    pub parent: Option<String>,

    /// Share a direct network with other VDCs of the org
    #[arg(long)]
    pub shared: bool,

    /// Edge gateway a routed network is connected to
    #[arg(long, required_if_eq("network_type", "nat-routed"))]
    pub edge: Option<String>,

    #[arg(long)]
    pub distributed: bool,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkTypeArg {
    Direct,
    Isolated,
    NatRouted,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum SetCommand {
    /// Connect a VDC network to an edge gateway, or disconnect it [vn]
    #[command(name = "vdc-network", visible_alias = "vn")]
    VdcNetwork {
        name: String,
        #[arg(long)]
        orgvdc: String,
        /// Required when connecting
        #[arg(long)]
        edge: Option<String>,
        /// `--connected false` detaches the network
        #[arg(
            long,
            action = ArgAction::Set,
            num_args = 0..=1,
            default_value_t = true,
            default_missing_value = "true"
        )]
        connected: bool,
        #[arg(long)]
        distributed: bool,
    },

    /// vApp power state
    Power {
        #[command(subcommand)]
        action: PowerCommand,
    },

    /// Replace a vApp's deployment lease
    Lease {
        /// vApp name or id
        vapp: String,
        /// Lease in seconds
        #[arg(long, default_value_t = DEFAULT_LEASE_SECONDS)]
        leasetime: u64,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum PowerCommand {
    /// Power on the first vApp whose name contains VAPP
    On { vapp: String },
}

#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true)]
pub struct DeleteArgs {
    /// API path for a raw DELETE
    pub path: Option<String>,

    #[command(subcommand)]
    pub resource: Option<DeleteCommand>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum DeleteCommand {
    /// Organization
    Org { name: String },

    /// Org VDC network [vn]
    #[command(name = "vdc-network", visible_alias = "vn")]
    VdcNetwork {
        name: String,
        #[arg(long)]
        orgvdc: String,
    },
}

/// Arguments of the raw `post` passthrough.
#[derive(Args, Debug, PartialEq)]
pub struct RawArgs {
    /// API path (e.g. /api/vApp/vapp-1/action/deploy)
    pub path: String,

    #[command(flatten)]
    pub body: RawBody,
}

/// Request body and extra headers of a raw `post` or `put`.
#[derive(Args, Debug, Default, PartialEq)]
pub struct RawBody {
    /// File whose contents are sent as the request body
    #[arg(short = 'f', long = "filename")]
    pub file: Option<PathBuf>,

    /// Extra header "Name: value", repeatable
    #[arg(long)]
    pub header: Vec<String>,
}

#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true)]
pub struct PutArgs {
    /// API path for a raw PUT
    pub path: Option<String>,

    #[command(flatten)]
    pub body: RawBody,

    #[command(subcommand)]
    pub resource: Option<PutCommand>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum PutCommand {
    /// Renew a vApp's deployment lease at its current length
    Lease {
        /// vApp name or id
        vapp: String,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommand {
    /// List configured sites
    GetSites,

    /// Add a site or replace one with the same name
    SetSite {
        name: String,
        /// Base URL, e.g. https://vcd.example.com
        #[arg(long)]
        endpoint: String,
        #[arg(long)]
        user: String,
        #[arg(long, env = "VCDCTL_PASSWORD", hide_env_values = true)]
        password: String,
        /// Default org for task listings
        #[arg(long, default_value = "")]
        orgname: String,
        #[arg(long)]
        apiversion: Option<String>,
        /// Skip TLS certificate verification (default true)
        #[arg(long)]
        insecure: Option<bool>,
        /// Include "System" org tasks in org task listings (default true)
        #[arg(long)]
        include_system_tasks: Option<bool>,
    },

    /// Select the current site
    UseSite { name: String },

    /// Remove a site
    DeleteSite { name: String },
}
