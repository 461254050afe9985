use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command, value_parser};
use rand::{SeedableRng, rngs::StdRng};

use memsched::{
    config::{Config, SchedulingPolicy},
    input::{format_processes, read_processes},
    kernel::Kernel,
    paging::MemoryPolicy,
    workload::{self, WorkloadConfig},
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = cli().get_matches();

    if let Some(&count) = matches.get_one::<usize>("generate") {
        return generate(count, matches.get_one::<u64>("seed").copied());
    }

    let config = parse_config(&matches)?;
    let path = matches
        .get_one::<String>("file")
        .context("an input file is required (-f)")?;
    let processes = read_processes(path).with_context(|| format!("failed to load {}", path))?;

    let kernel = Kernel::new(&config, processes).context("invalid simulation setup")?;
    let summary = kernel.run(|event| println!("{}", event));
    print!("{}", summary);

    Ok(())
}

fn cli() -> Command {
    Command::new("memsched")
        .about("Simulates CPU scheduling over a paged memory manager")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("PATH")
                .help("process list: `arrival pid memory_kb time` per line")
                .required_unless_present("generate"),
        )
        .arg(
            Arg::new("algorithm")
                .short('a')
                .long("algorithm")
                .value_name("ff|rr|cs")
                .default_value("ff")
                .help("scheduling algorithm"),
        )
        .arg(
            Arg::new("memory")
                .short('m')
                .long("memory")
                .value_name("u|p|v|cm")
                .default_value("u")
                .help("memory allocation policy"),
        )
        .arg(
            Arg::new("size")
                .short('s')
                .long("size")
                .value_name("KB")
                .value_parser(value_parser!(u32))
                .help("memory size in KB, required unless memory is unlimited"),
        )
        .arg(
            Arg::new("quantum")
                .short('q')
                .long("quantum")
                .value_name("SECONDS")
                .value_parser(value_parser!(u32))
                .help("round-robin quantum, 10 by default"),
        )
        .arg(
            Arg::new("generate")
                .short('g')
                .long("generate")
                .value_name("COUNT")
                .value_parser(value_parser!(usize))
                .help("print a random process list instead of simulating"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .value_parser(value_parser!(u64))
                .requires("generate")
                .help("seed for --generate"),
        )
}

fn parse_config(matches: &ArgMatches) -> Result<Config> {
    let scheduling: SchedulingPolicy = matches
        .get_one::<String>("algorithm")
        .map(String::as_str)
        .unwrap_or("ff")
        .parse()?;
    let memory: MemoryPolicy = matches
        .get_one::<String>("memory")
        .map(String::as_str)
        .unwrap_or("u")
        .parse()?;

    let mut config = Config::new(scheduling, memory);
    if let Some(&size) = matches.get_one::<u32>("size") {
        config = config.with_memory_size(size);
    }
    if let Some(&quantum) = matches.get_one::<u32>("quantum") {
        config = config.with_quantum(quantum);
    }
    config.validate()?;

    Ok(config)
}

fn generate(count: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let config = WorkloadConfig {
        process_count: count,
        ..WorkloadConfig::default()
    };
    print!("{}", format_processes(&workload::generate(&mut rng, &config)));
    Ok(())
}
