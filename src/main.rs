use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use mapping_cardinality::mapping::{classify, Mapping, Representation};
use mapping_cardinality::mapping_type::{parse_mapping_type, MappingType};
use mapping_cardinality::pprint::{pprint_taxonomy, pprint_type, TablePrintStyle};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    subcmd: Subcommand,
}

#[derive(clap::Subcommand)]
enum Subcommand {
    #[command(about = "Print all mapping types")]
    Table {
        /// Table style
        #[arg(long, value_enum, default_value_t = TablePrintStyle::Full)]
        style: TablePrintStyle,
    },
    #[command(about = "Print the properties of one mapping type")]
    Inspect {
        /// Mapping type name or ordinal
        #[arg(value_parser = parse_mapping_type)]
        mapping_type: MappingType,
    },
    #[command(about = "Find the strictest mapping type admitting some pairs")]
    Classify {
        #[command(flatten)]
        domains: Domains,
    },
    #[command(about = "Build a mapping of a given type and print it with its inverse")]
    Create {
        /// Mapping type name or ordinal
        #[arg(value_parser = parse_mapping_type)]
        mapping_type: MappingType,

        #[command(flatten)]
        domains: Domains,
    },
}

#[derive(clap::Args)]
struct Domains {
    /// Size of the source domain
    #[arg(long, short)]
    sources: usize,

    /// Size of the target domain
    #[arg(long, short)]
    targets: usize,

    /// Pairs, written as SOURCE:TARGET
    #[arg(value_parser = parse_pair)]
    pairs: Vec<(usize, usize)>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    match &args.subcmd {
        Subcommand::Table { style } => pprint_taxonomy(*style),
        Subcommand::Inspect { mapping_type } => pprint_type(*mapping_type),
        Subcommand::Classify { domains } => {
            let mapping_type =
                classify(domains.sources, domains.targets, domains.pairs.iter().copied())?;
            info!(
                "Classified {} pairs between {} sources and {} targets",
                domains.pairs.len(),
                domains.sources,
                domains.targets
            );
            println!(
                "{mapping_type} ({}), stored as {}",
                mapping_type.ordinal(),
                Representation::for_type(mapping_type)
            );
        }
        Subcommand::Create {
            mapping_type,
            domains,
        } => {
            let mapping = Mapping::from_pairs(
                *mapping_type,
                domains.sources,
                domains.targets,
                domains.pairs.iter().copied(),
            )?;
            mapping
                .validate()
                .with_context(|| format!("Pairs do not form a complete {mapping_type}"))?;
            print_mapping(&mapping);
            println!();
            print_mapping(&mapping.inverse());
        }
    }
    Ok(())
}

fn print_mapping(mapping: &Mapping) {
    println!(
        "{} from {} sources to {} targets, stored as {}:",
        mapping.mapping_type(),
        mapping.source_count(),
        mapping.target_count(),
        mapping.representation()
    );
    for (source, target) in mapping.pairs() {
        println!("  {source} -> {target}");
    }
}

fn parse_pair(s: &str) -> Result<(usize, usize), String> {
    let (source, target) = s
        .split_once(':')
        .ok_or_else(|| format!("expected SOURCE:TARGET, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid index {v:?}: {e}"))
    };
    Ok((parse(source)?, parse(target)?))
}
