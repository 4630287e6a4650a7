use blog_router::config::{self, RouterConfig};
use blog_router::fetch::{ContentFetcher, Fetch, SiteRoot};
use blog_router::html::HtmlSurface;
use blog_router::manifest::{self, ManifestError};
use blog_router::output::{self, TextSurface};
use blog_router::router::{Router, Surface};
use blog_router::types::Manifest;
use blog_router::{check, session};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blog-router")]
#[command(about = "Read markdown blog series by address")]
#[command(long_about = "\
Read markdown blog series by address

A JSON manifest lists series and their ordered parts; each part is a
markdown file. Addresses select what to show:

  (empty)          home: every series and its parts
  #ai/intro        part `intro` of series `ai`
  ai/intro         the leading # is optional

Site layout (local directory or http(s) base URL):

  site/
  ├── config.toml                  # Optional, see 'blog-router gen-config'
  └── blogs/
      ├── blogs.json               # {\"blogs\": [{id, title, parts: [{id, title, description, file}]}]}
      └── ai/
          ├── intro.md
          └── deep-dive.md

Unknown addresses show the home screen.")]
#[command(version)]
struct Cli {
    /// Site root: a directory or an http(s) base URL
    #[arg(long, default_value = ".", global = true)]
    root: String,

    /// Config file (default: config.toml in a local site root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log navigation and fetches to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Text,
}

#[derive(Subcommand)]
enum Command {
    /// Render the home screen
    Home {
        #[arg(long, value_enum, default_value = "html")]
        format: Format,
    },
    /// Render the screen for an address
    Show {
        /// Address such as `#ai/intro` (the `#` is optional)
        address: String,
        #[arg(long, value_enum, default_value = "html")]
        format: Format,
    },
    /// Browse interactively: one address per line, `:q` to quit
    Browse {
        /// Starting address
        address: Option<String>,
    },
    /// Fetch every part and report missing sources and broken links
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// Everything a command needs to reach the site.
struct Site {
    root: SiteRoot,
    config: RouterConfig,
    fetcher: Arc<dyn Fetch>,
}

impl Site {
    fn open(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let root = SiteRoot::parse(&cli.root)?;
        let config = match (&cli.config, &root) {
            (Some(path), _) => config::load_config_file(path)?,
            (None, SiteRoot::Local(dir)) => config::load_config(dir)?,
            (None, SiteRoot::Remote(_)) => config::resolve_config(config::stock_defaults_value(), None)?,
        };
        let fetcher: Arc<dyn Fetch> = Arc::new(ContentFetcher::new(root.clone(), config.fetch.timeout()));
        Ok(Self {
            root,
            config,
            fetcher,
        })
    }

    fn load_manifest(&self) -> Result<Manifest, ManifestError> {
        manifest::load(self.fetcher.as_ref(), &self.config.manifest)
    }

    /// Load the manifest and present the screen for `fragment` on `surface`.
    fn boot<S: Surface>(&self, surface: S, fragment: &str) -> Result<Router<S>, ManifestError> {
        Router::boot(
            self.load_manifest(),
            Arc::clone(&self.fetcher),
            surface,
            self.config.site.chrome(),
            fragment,
        )
    }

    fn render(&self, fragment: &str, format: Format) -> Result<(), Box<dyn std::error::Error>> {
        match format {
            Format::Html => {
                let mut surface = HtmlSurface::new(io::stdout().lock());
                self.boot(&mut surface, fragment)?;
                surface.finish()?;
            }
            Format::Text => {
                let mut surface = TextSurface::new(io::stdout().lock());
                self.boot(&mut surface, fragment)?;
                surface.finish()?;
            }
        }
        Ok(())
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Home { format } => {
            Site::open(&cli)?.render("", *format)?;
        }
        Command::Show { address, format } => {
            Site::open(&cli)?.render(address, *format)?;
        }
        Command::Browse { address } => {
            let site = Site::open(&cli)?;
            let mut surface = TextSurface::new(io::stdout());
            let mut router = site.boot(&mut surface, address.as_deref().unwrap_or(""))?;
            let manifest = router.manifest();
            eprintln!(
                "{} series, {} parts. Enter an address (empty for home), {} to quit",
                manifest.blogs.len(),
                manifest.part_count(),
                session::QUIT_COMMAND
            );
            let stats = session::run(&mut router, BufReader::new(io::stdin()));
            drop(router);
            surface.finish()?;
            eprintln!(
                "{} navigations, {} superseded fetches discarded",
                stats.navigations, stats.discarded
            );
        }
        Command::Check => {
            let site = Site::open(&cli)?;
            println!("==> Checking {}", site.root);
            let manifest = site.load_manifest()?;
            let checks = check::check(&manifest, site.fetcher.as_ref());
            output::print_check_report(&checks);
            let failed = check::failure_count(&checks);
            if failed > 0 {
                return Err(format!("{failed} part(s) failed the check").into());
            }
            println!("==> Site is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
