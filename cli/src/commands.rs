use clap::{Arg, ArgAction, Command};

fn verbose() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Debug mode. -v for info, -vv for debug, -vvv for trace.")
}

fn subcommand_format_metadata() -> Command {
    Command::new("format_metadata")
        .version("0.1")
        .author("Bansho Masutani")
        .about("Extract sample information from gnomAD metadata for HGDP + 1000G samples.")
        .arg(verbose())
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("TSV")
                .required(true)
                .help("Input gnomAD metadata .tsv"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("TSV")
                .required(true)
                .help("Output cohort table .tsv"),
        )
        .arg(
            Arg::new("cohort")
                .short('c')
                .long("cohort")
                .value_name("NAME")
                .action(ArgAction::Append)
                .default_values(definitions::DEFAULT_COHORTS)
                .help("Cohort to keep. Can be given multiple times."),
        )
}

fn subcommand_subset_pop() -> Command {
    Command::new("subset_pop")
        .version("0.1")
        .author("Bansho Masutani")
        .about("Subset the cohort table to a list of unrelated samples from a single population.")
        .arg(verbose())
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("TSV")
                .required(true)
                .help("Input cohort table .tsv (output of format_metadata)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("TXT")
                .required(true)
                .help("Output sample list, one ID per line."),
        )
        .arg(
            Arg::new("pop")
                .short('p')
                .long("pop")
                .value_name("CODE")
                .required(true)
                .help("Population code."),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .action(ArgAction::SetTrue)
                .help("Write the samples in lexicographic order instead of the input order."),
        )
}

fn subcommand_get_exons() -> Command {
    Command::new("get_exons")
        .version("0.1")
        .author("Bansho Masutani")
        .about("Extract exons from a .gtf into a sorted, merged BED.")
        .arg(verbose())
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("GTF")
                .required(true)
                .help("Input GTF."),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("BED")
                .required(true)
                .help("Output BED."),
        )
        .arg(
            Arg::new("genome")
                .short('g')
                .long("genome")
                .value_name("FILE")
                .help("BEDTools-style genome file (optional, used for sorting output)"),
        )
        .arg(
            Arg::new("feature")
                .short('f')
                .long("feature")
                .default_value("exon")
                .help("Feature type (3rd column) to extract."),
        )
}

fn subcommand_pipeline() -> Command {
    Command::new("pipeline")
        .version("0.1")
        .author("BanshoMasutani")
        .about("Run pipeline based on the given TOML file.")
        .arg(
            Arg::new("profile")
                .short('p')
                .long("profile")
                .required(true)
                .help("TOML configuration file. See example.toml for an example."),
        )
}

pub fn popprep_parser() -> Command {
    Command::new("popprep")
        .version("0.1")
        .author("Bansho Masutani <ban-m@g.ecc.u-tokyo.ac.jp>")
        .about("Metadata preparation for HGDP + 1000 Genomes population studies")
        .arg_required_else_help(true)
        .subcommand(subcommand_format_metadata())
        .subcommand(subcommand_subset_pop())
        .subcommand(subcommand_get_exons())
        .subcommand(subcommand_pipeline())
}
