//! NBA rest and travel feature CLI
//!
//! Scrapes a season of schedule pages and writes the winner/loser feature
//! table used for outcome modeling.

use clap::{Parser, Subcommand};
use hoops::{Config, Result};

#[derive(Parser)]
#[command(name = "hoops")]
#[command(about = "Rest and travel features for NBA game outcome modeling", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new project with default config
    Init,
    /// Build the team directory and save it as CSV
    Teams,
    /// Scrape the season and write the feature table
    Build {
        /// Use only cached schedule pages (no network requests)
        #[arg(long)]
        offline: bool,
        /// Cache directory for schedule HTML files
        #[arg(long)]
        cache: Option<String>,
    },
    /// Summarize the written feature table
    Status,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Init => commands::init(&cli.config),
        Commands::Teams => commands::teams(&config),
        Commands::Build { offline, cache } => commands::build(&config, offline, cache),
        Commands::Status => commands::status(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use hoops::data::export::{read_features, summarize, write_features};
    use hoops::data::teams::{ArcGisResolver, CityTable, LocationResolver};
    use hoops::data::{ScheduleScraper, TeamDirectory};
    use hoops::features::build_features;
    use hoops::ResolverKind;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data")?;
        println!("Created data/ directory");

        println!("\nNext steps:");
        println!("  1. Edit {} to pick the season and months", config_path);
        println!("  2. Run 'hoops teams' to build the team directory");
        println!("  3. Run 'hoops build' to write the feature table");

        Ok(())
    }

    fn resolver(config: &Config) -> Result<Box<dyn LocationResolver>> {
        let resolver: Box<dyn LocationResolver> = match config.teams.resolver {
            ResolverKind::Builtin => Box::new(CityTable::new()),
            ResolverKind::Arcgis => Box::new(ArcGisResolver::new()?),
        };
        Ok(resolver)
    }

    fn fetch_directory(config: &Config) -> Result<TeamDirectory> {
        let resolver = resolver(config)?;
        let directory = TeamDirectory::fetch(&config.teams.api_url, resolver.as_ref())?;
        directory.save_csv(&config.output.teams_path)?;
        println!(
            "Saved {} teams to {}",
            directory.len(),
            config.output.teams_path
        );
        Ok(directory)
    }

    pub fn teams(config: &Config) -> Result<()> {
        let directory = fetch_directory(config)?;
        for team in directory.iter() {
            println!(
                "  {:>3}  {:<28} {:<16} {}",
                team.id, team.full_name, team.city, team.location
            );
        }
        Ok(())
    }

    pub fn build(config: &Config, offline: bool, cache: Option<String>) -> Result<()> {
        let directory_path = std::path::Path::new(&config.output.teams_path);
        let directory = if directory_path.exists() {
            log::info!("Using team directory {}", directory_path.display());
            TeamDirectory::load_csv(directory_path)?
        } else {
            fetch_directory(config)?
        };

        let mut scraper = ScheduleScraper::from_config(&config.source)?;
        if let Some(cache_dir) = cache {
            println!("Using cache directory: {}", cache_dir);
            scraper = scraper.with_cache(&cache_dir);
        }
        if offline {
            println!("Offline mode: using cached files only");
            scraper = scraper.offline_only(true);
        }

        println!("Fetching {} season...", config.season.year);
        let season = scraper.fetch_season(config.season.year, &config.season.months)?;
        println!("Fetched {} games", season.len());

        let rows = build_features(&season, &directory)?;
        write_features(&config.output.data_path, &rows)?;
        println!("Wrote {} rows to {}", rows.len(), config.output.data_path);

        Ok(())
    }

    pub fn status(config: &Config) -> Result<()> {
        let rows = read_features(&config.output.data_path)?;
        let summary = summarize(&rows);

        println!("Feature Table");
        println!("───────────────────────────────");
        println!("  Path:     {}", config.output.data_path);
        println!("  Games:    {}", summary.rows);
        println!("  Teams:    {}", summary.teams);
        if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
            println!("  Range:    {} to {}", first, last);
        }
        println!("  Travel:   {:.0} km per team-game", summary.mean_travel_km);

        Ok(())
    }
}
