use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::error::Error;
use std::path::PathBuf;
use vellum::build::{build_site, clean_site};
use vellum::config::Config;

fn main() {
    let output_arg = Arg::with_name("output")
        .short("o")
        .long("output")
        .value_name("DIR")
        .takes_value(true)
        .help("The directory to render into (default: `_site` in the project)");

    let matches = App::new("vellum")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("project")
                .short("p")
                .long("project")
                .value_name("DIR")
                .takes_value(true)
                .global(true)
                .help("A directory inside the project (default: current directory)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .global(true)
                .help("Log debug output"),
        )
        .subcommand(
            SubCommand::with_name("build")
                .about("Renders the site and its sitemap")
                .arg(output_arg.clone()),
        )
        .subcommand(
            SubCommand::with_name("clean")
                .about("Removes the rendered site")
                .arg(output_arg),
        )
        .get_matches();

    // Global flags may be given before or after the subcommand.
    let verbose = matches.is_present("verbose")
        || matches
            .subcommand()
            .1
            .map_or(false, |m| m.is_present("verbose"));
    init_logging(verbose);

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  caused by: {}", err);
            source = err.source();
        }
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let (command, sub_matches) = match matches.subcommand() {
        (command, Some(sub_matches)) => (command, sub_matches),
        _ => return Err("no subcommand given".into()),
    };

    let project = std::env::current_dir()?
        .join(sub_matches.value_of("project").unwrap_or("."));
    let output = sub_matches.value_of("output").map(PathBuf::from);
    let config = Config::from_directory(&project, output.as_deref())?;

    match command {
        "build" => build_site(&config, chrono::Utc::now())?,
        "clean" => clean_site(&config)?,
        _ => return Err(format!("unknown subcommand `{}`", command).into()),
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Failed to initialize logging: {}", e);
    }
}
