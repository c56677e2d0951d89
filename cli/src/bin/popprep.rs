use popprep::*;
use std::io::{BufReader, BufWriter};
#[macro_use]
extern crate log;

fn main() -> std::io::Result<()> {
    let matches = popprep_cli::commands::popprep_parser().get_matches();
    if let Some(("pipeline", sub_m)) = matches.subcommand() {
        let path: &String = sub_m.get_one("profile").unwrap();
        let file = std::fs::read_to_string(path)?;
        let config: popprep_cli::pipeline::PipelineConfig = toml::from_str(&file)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        return popprep_cli::pipeline::run_pipeline(&config);
    }
    if let Some((_, sub_m)) = matches.subcommand() {
        let level = match sub_m.get_count("verbose") {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    }
    match matches.subcommand() {
        Some(("format_metadata", sub_m)) => format(sub_m),
        Some(("subset_pop", sub_m)) => subset(sub_m),
        Some(("get_exons", sub_m)) => get_exons(sub_m),
        _ => unreachable!(),
    }
}

fn open(matches: &clap::ArgMatches, name: &str) -> std::io::Result<BufReader<std::fs::File>> {
    let file: &String = matches.get_one(name).unwrap();
    debug!("Opening {}", file);
    std::fs::File::open(file).map(BufReader::new)
}

fn create(matches: &clap::ArgMatches, name: &str) -> std::io::Result<BufWriter<std::fs::File>> {
    let file: &String = matches.get_one(name).unwrap();
    std::fs::File::create(file).map(BufWriter::new)
}

fn format(matches: &clap::ArgMatches) -> std::io::Result<()> {
    debug!("START\tFormat metadata");
    let cohorts: Vec<&String> = matches.get_many("cohort").unwrap().collect();
    let config = FormatConfig::new(cohorts.as_slice());
    let written = format_metadata(open(matches, "input")?, create(matches, "output")?, &config)?;
    debug!("END\tFormat metadata\t{written}");
    Ok(())
}

fn subset(matches: &clap::ArgMatches) -> std::io::Result<()> {
    debug!("START\tSubset population");
    let pop: &String = matches.get_one("pop").unwrap();
    let order = match matches.get_flag("sort") {
        true => SampleOrder::Lexicographic,
        false => SampleOrder::Input,
    };
    let config = SubsetConfig::new(pop, order);
    let result = subset_population(open(matches, "input")?, create(matches, "output")?, &config)?;
    debug!(
        "END\tSubset population\t{}\t{}\t{}",
        result.loaded(),
        result.retained.len(),
        result.iterations
    );
    Ok(())
}

fn get_exons(matches: &clap::ArgMatches) -> std::io::Result<()> {
    debug!("START\tGet exons");
    let genome = match matches.get_one::<String>("genome") {
        Some(_) => Some(exons::read_genome(open(matches, "genome")?)?),
        None => None,
    };
    let feature: &String = matches.get_one("feature").unwrap();
    let config = ExonConfig::new(feature);
    let bed = create(matches, "output")?;
    let written = extract_exons(open(matches, "input")?, genome.as_ref(), bed, &config)?;
    debug!("END\tGet exons\t{written}");
    Ok(())
}
