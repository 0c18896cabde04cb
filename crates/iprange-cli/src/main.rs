use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use iprange_cidr::{Address, AddressRange, Prefix};
use iprange_classify::{registry, AddressClass, ClassificationConfig};
use serde::Serialize;
use tracing::{debug, Level};

/// IPv4 range arithmetic: CIDR decomposition, subtraction and classification
#[derive(Parser)]
#[command(name = "iprange")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the minimal CIDR blocks covering a range
    Cidr(CidrArgs),
    /// Merge two overlapping or adjacent ranges
    Merge(PairArgs),
    /// Subtract the second range from the first
    Subtract(PairArgs),
    /// Show network details for a prefix
    Prefix(PrefixArgs),
    /// Classify addresses as host-local, link-local, multicast, private or exit
    Classify(ClassifyArgs),
    /// Derive a MAC-like identifier from an address
    Mac(MacArgs),
}

#[derive(Parser)]
struct CidrArgs {
    /// Range as START-END, a CIDR prefix, or a single address
    #[arg(value_name = "RANGE")]
    range: String,
}

#[derive(Parser)]
struct PairArgs {
    /// First range (START-END, prefix, or address)
    #[arg(value_name = "A")]
    first: String,

    /// Second range (START-END, prefix, or address)
    #[arg(value_name = "B")]
    second: String,
}

#[derive(Parser)]
struct PrefixArgs {
    /// Prefix as a.b.c.d/len, a.b.c.d/mask, or a.b.c.d
    #[arg(value_name = "PREFIX")]
    prefix: String,
}

#[derive(Parser)]
struct ClassifyArgs {
    /// Addresses to classify
    #[arg(value_name = "ADDR", required = true)]
    addresses: Vec<String>,

    /// Private prefix to use instead of the RFC 1918 defaults (repeatable)
    #[arg(long = "private", value_name = "CIDR")]
    private: Vec<String>,
}

#[derive(Parser)]
struct MacArgs {
    /// Address to convert
    #[arg(value_name = "ADDR")]
    address: String,

    /// Leading MAC octets
    #[arg(short, long, default_value = "02:00")]
    prefix: String,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// JSON output (compact)
    JsonCompact,
}

#[derive(Serialize)]
struct BlockRow {
    cidr: String,
    network: Address,
    mask: Address,
    size: u64,
}

#[derive(Serialize)]
struct CidrResult {
    range: AddressRange,
    count: u64,
    blocks: Vec<BlockRow>,
}

#[derive(Serialize)]
struct MergeResult {
    first: AddressRange,
    second: AddressRange,
    merged: Option<AddressRange>,
}

#[derive(Serialize)]
struct SubtractResult {
    first: AddressRange,
    second: AddressRange,
    remaining: Vec<AddressRange>,
    overlap: Option<AddressRange>,
}

#[derive(Serialize)]
struct PrefixResult {
    prefix: Prefix,
    network: Address,
    broadcast: Address,
    netmask: Address,
    mask_len: u8,
    size: u64,
}

#[derive(Serialize)]
struct ClassifyRow {
    address: Address,
    class: AddressClass,
}

#[derive(Serialize)]
struct MacResult {
    address: Address,
    mac: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Cidr(args) => handle_cidr(args, cli.output)?,
        Commands::Merge(args) => handle_merge(args, cli.output)?,
        Commands::Subtract(args) => handle_subtract(args, cli.output)?,
        Commands::Prefix(args) => handle_prefix(args, cli.output)?,
        Commands::Classify(args) => handle_classify(args, cli.output)?,
        Commands::Mac(args) => handle_mac(args, cli.output)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_range(text: &str) -> Result<AddressRange> {
    text.parse::<AddressRange>()
        .with_context(|| format!("Invalid range '{}'", text))
}

fn parse_address(text: &str) -> Result<Address> {
    Address::parse(text).with_context(|| format!("Invalid address '{}'", text))
}

fn cidr_result(range: AddressRange) -> CidrResult {
    let blocks = range
        .to_cidr_blocks()
        .into_iter()
        .map(|block| BlockRow {
            cidr: block.to_string(),
            network: block.network(),
            mask: block.mask(),
            size: block.size(),
        })
        .collect();

    CidrResult {
        range,
        count: range.address_count(),
        blocks,
    }
}

fn classify_rows(addresses: &[String], private: &[String]) -> Result<Vec<ClassifyRow>> {
    let config = if private.is_empty() {
        registry::snapshot()
    } else {
        let (config, rejected) = ClassificationConfig::with_private_prefixes(private);
        if let Some(first) = rejected.into_iter().next() {
            bail!(first);
        }
        config
    };
    debug!(private_ranges = config.private_ranges().len(), "classifying");

    addresses
        .iter()
        .map(|text| {
            let address = parse_address(text)?;
            Ok(ClassifyRow {
                address,
                class: config.classify(address),
            })
        })
        .collect()
}

fn handle_cidr(args: CidrArgs, format: OutputFormat) -> Result<()> {
    let result = cidr_result(parse_range(&args.range)?);

    emit(&result, format, |result| {
        print_header("CIDR Blocks");
        print_field("Range", &result.range.to_string());
        print_field("Addresses", &result.count.to_string());
        for block in &result.blocks {
            println!("{:>15}  {}", "", block.cidr.green());
        }
        println!();
    })
}

fn handle_merge(args: PairArgs, format: OutputFormat) -> Result<()> {
    let first = parse_range(&args.first)?;
    let second = parse_range(&args.second)?;
    let result = MergeResult {
        first,
        second,
        merged: first.merge(&second),
    };

    emit(&result, format, |result| {
        print_header("Merge");
        match result.merged {
            Some(merged) => print_field("Merged", &merged.to_string().green().to_string()),
            None => print_field("Merged", &"ranges are disjoint".yellow().to_string()),
        }
        println!();
    })
}

fn handle_subtract(args: PairArgs, format: OutputFormat) -> Result<()> {
    let first = parse_range(&args.first)?;
    let second = parse_range(&args.second)?;
    let subtraction = first.subtract(&second);
    let result = SubtractResult {
        first,
        second,
        remaining: subtraction.remaining,
        overlap: subtraction.overlap,
    };

    emit(&result, format, |result| {
        print_header("Subtract");
        if result.remaining.is_empty() {
            print_field("Remaining", &"(none)".dimmed().to_string());
        }
        for rest in &result.remaining {
            print_field("Remaining", &rest.to_string().green().to_string());
        }
        let overlap = result
            .overlap
            .map_or_else(|| "(none)".dimmed().to_string(), |o| o.to_string());
        print_field("Overlap", &overlap);
        println!();
    })
}

fn handle_prefix(args: PrefixArgs, format: OutputFormat) -> Result<()> {
    let prefix = Prefix::parse(&args.prefix)
        .with_context(|| format!("Invalid prefix '{}'", args.prefix))?;
    let result = PrefixResult {
        prefix,
        network: prefix.network(),
        broadcast: prefix.broadcast(),
        netmask: prefix.netmask(),
        mask_len: prefix.mask_len(),
        size: prefix.size(),
    };

    emit(&result, format, |result| {
        print_header("Prefix");
        print_field("Prefix", &result.prefix.to_string().green().to_string());
        print_field("Network", &result.network.to_string());
        print_field("Broadcast", &result.broadcast.to_string());
        print_field("Netmask", &result.netmask.to_string());
        print_field("Length", &format!("/{}", result.mask_len));
        print_field("Addresses", &result.size.to_string());
        println!();
    })
}

fn handle_classify(args: ClassifyArgs, format: OutputFormat) -> Result<()> {
    let rows = classify_rows(&args.addresses, &args.private)?;

    emit(&rows, format, |rows| {
        print_header("Classification");
        for row in rows {
            let class = match row.class {
                AddressClass::Exit => row.class.to_string().green(),
                AddressClass::Private => row.class.to_string().cyan(),
                _ => row.class.to_string().yellow(),
            };
            print_field(&row.address.to_string(), &class.to_string());
        }
        println!();
    })
}

fn handle_mac(args: MacArgs, format: OutputFormat) -> Result<()> {
    let address = parse_address(&args.address)?;
    let result = MacResult {
        address,
        mac: address.to_mac_string(&args.prefix),
    };

    emit(&result, format, |result| {
        print_header("MAC");
        print_field("Address", &result.address.to_string());
        print_field("MAC", &result.mac.green().to_string());
        println!();
    })
}

fn emit<T: Serialize>(value: &T, format: OutputFormat, human: impl FnOnce(&T)) -> Result<()> {
    match format {
        OutputFormat::Human => human(value),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::JsonCompact => println!("{}", serde_json::to_string(value)?),
    }
    Ok(())
}

fn print_header(title: &str) {
    println!();
    println!("{}", title.bold().cyan());
    println!("{}", "─".repeat(50).dimmed());
}

fn print_field(label: &str, value: &str) {
    println!("{:>15}: {}", label.bold(), value);
}
