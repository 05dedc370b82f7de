//! These structs provide the CLI interface for the product-sales CLI.

use crate::model::{Month, DEFAULT_PAGE, DEFAULT_PER_PAGE};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// product-sales: a reporting API over product-sale transactions.
///
/// The records are seeded from a JSON feed into a local SQLite database. From there they can be
/// listed and searched, and summarized per calendar month as sales statistics, a price
/// histogram and a category breakdown. The same reports are served over HTTP by `serve`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory, the configuration file and an empty database.
    ///
    /// This is the first command you should run. By default the home directory is
    /// $HOME/product-sales; pass --home or set PRODUCT_SALES_HOME to put it somewhere else.
    Init(InitArgs),
    /// Replace the stored transactions with the contents of the seed feed.
    Seed,
    /// Serve the reporting API over HTTP until interrupted.
    Serve,
    /// List and search transactions, one page at a time.
    List(ListArgs),
    /// Print the sales statistics of a month.
    Statistics(MonthArgs),
    /// Print the price histogram of a month.
    BarChart(MonthArgs),
    /// Print the category breakdown of a month.
    PieChart(MonthArgs),
    /// Print every report of a month at once.
    Combined(MonthArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the configuration and database are held. Defaults to ~/product-sales
    #[arg(long, env = "PRODUCT_SALES_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `product-sales init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL of the JSON feed that `seed` and `/transactions/initialize` load records from.
    /// Defaults to the public sample feed.
    #[arg(long)]
    seed_url: Option<String>,
}

impl InitArgs {
    pub fn seed_url(&self) -> Option<&str> {
        self.seed_url.as_deref()
    }
}

/// (Not shown): Args for the reports that need a month.
#[derive(Debug, Parser, Clone)]
pub struct MonthArgs {
    /// The month, 1 (January) through 12 (December). Sales from every year are included.
    #[arg(long)]
    month: Month,
}

impl MonthArgs {
    pub fn month(&self) -> Month {
        self.month
    }
}

/// (Not shown): Args for the `product-sales list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// Only list sales from this month, 1 through 12.
    #[arg(long)]
    month: Option<Month>,

    /// Only list records whose title or description contains this text, or whose price equals
    /// it when it is a number.
    #[arg(long)]
    search: Option<String>,

    /// The page to list, starting at 1.
    #[arg(long, default_value_t = DEFAULT_PAGE)]
    page: u32,

    /// The number of records per page.
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    per_page: u32,
}

impl ListArgs {
    pub fn new(month: Option<Month>, search: Option<String>, page: u32, per_page: u32) -> Self {
        Self {
            month,
            search,
            page,
            per_page,
        }
    }

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("product-sales"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or PRODUCT_SALES_HOME instead of relying on the default \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("product-sales")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
