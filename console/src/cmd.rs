//! Subcommands.

use crate::output::print_json;
use anyhow::Context as _;
use chrono::NaiveDate;
use newsdesk_api::resources::news::{NewsFilter, NewsStatus};
use newsdesk_api::resources::public::{DEFAULT_LANG, PublicNewsQuery};
use newsdesk_api::{ApiError, AuthenticatedHttpClient, PageRequest};

/// Top-level subcommands.
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        /// Login name
        username: String,

        /// Password
        #[arg(long, env = "NEWSDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out, on the server and locally
    Logout,

    /// Show the signed-in operator, refreshing the stored role
    Whoami,

    /// Articles
    #[command(subcommand)]
    News(NewsCommands),

    /// Categories
    #[command(subcommand)]
    Categories(CategoryCommands),

    /// Tags
    #[command(subcommand)]
    Tags(PagedCommands),

    /// Ad campaigns
    #[command(subcommand)]
    Campaigns(ListCommands),

    /// Ad placements
    #[command(subcommand)]
    Placements(ListCommands),

    /// Published articles, as the public site sees them
    #[command(subcommand)]
    PublicNews(PublicNewsCommands),

    /// The ad currently served on a placement
    Ad {
        /// Placement code (e.g. "home-top")
        placement: String,

        /// Language
        #[arg(long, default_value = DEFAULT_LANG)]
        lang: String,

        /// Category the page belongs to
        #[arg(long)]
        category: Option<i64>,
    },
}

/// Paging flags.
#[derive(Debug, clap::Args)]
pub struct PageArgs {
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: u32,

    /// Page size
    #[arg(long, default_value_t = 10)]
    size: u32,
}

impl From<&PageArgs> for PageRequest {
    fn from(args: &PageArgs) -> Self {
        Self::new(args.page, args.size)
    }
}

/// Resources that only support listing everything.
#[derive(Debug, clap::Subcommand)]
pub enum ListCommands {
    /// List all
    #[command(alias = "ls")]
    List,
}

/// Resources listed page by page.
#[derive(Debug, clap::Subcommand)]
pub enum PagedCommands {
    /// List one page
    #[command(alias = "ls")]
    List(PageArgs),
}

/// Article subcommands.
#[derive(Debug, clap::Subcommand)]
pub enum NewsCommands {
    /// List one page of articles
    #[command(alias = "ls")]
    List {
        /// Only this status (draft, review, published, unpublished, archived)
        #[arg(long, value_parser = parse_news_status)]
        status: Option<NewsStatus>,

        /// Only this category
        #[arg(long)]
        category: Option<i64>,

        /// Only articles with this tag code
        #[arg(long)]
        tag: Option<String>,

        /// Translation language
        #[arg(long)]
        lang: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },
}

/// Category subcommands.
#[derive(Debug, clap::Subcommand)]
pub enum CategoryCommands {
    /// List categories, with all translations or resolved to one language
    #[command(alias = "ls")]
    List {
        /// Resolve to this language
        #[arg(long)]
        lang: Option<String>,
    },
}

/// Public feed subcommands.
#[derive(Debug, clap::Subcommand)]
pub enum PublicNewsCommands {
    /// Search the published feed
    #[command(alias = "ls")]
    List {
        /// Full-text keyword
        #[arg(long)]
        keyword: Option<String>,

        /// Language
        #[arg(long, default_value = DEFAULT_LANG)]
        lang: String,

        /// Only articles with this tag code
        #[arg(long)]
        tag: Option<String>,

        /// Only this category
        #[arg(long)]
        category: Option<i64>,

        /// Published on or after (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Published on or before (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        #[command(flatten)]
        page: PageArgs,
    },
}

fn parse_news_status(raw: &str) -> Result<NewsStatus, String> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_ascii_uppercase()))
        .map_err(|_| format!("unknown status `{raw}`"))
}

/// Execute `command` against `client`.
pub async fn run(client: &AuthenticatedHttpClient, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { username, password } => {
            let user = client
                .auth()
                .login(&username, &password)
                .await
                .context("login failed")?;
            let user = match client.auth().sync_profile().await {
                Ok(synced) => synced,
                Err(e) => {
                    tracing::warn!(error = %e, "Could not load profile, keeping assumed role");
                    user
                }
            };
            print_json(&user)?;
        }
        Commands::Logout => {
            client.auth().logout().await?;
            tracing::info!("Signed out");
        }
        Commands::Whoami => {
            require_session(client)?;
            print_json(&client.auth().sync_profile().await?)?;
        }
        Commands::News(NewsCommands::List {
            status,
            category,
            tag,
            lang,
            page,
        }) => {
            require_session(client)?;
            let filter = NewsFilter {
                status,
                category_id: category,
                tag,
                lang,
                ..NewsFilter::default()
            };
            print_json(&client.news().list(&filter, (&page).into()).await?)?;
        }
        Commands::Categories(CategoryCommands::List { lang }) => {
            require_session(client)?;
            match lang {
                Some(lang) => print_json(&client.categories().list_by_lang(&lang).await?)?,
                None => print_json(&client.categories().list().await?)?,
            }
        }
        Commands::Tags(PagedCommands::List(page)) => {
            require_session(client)?;
            print_json(&client.tags().list((&page).into()).await?)?;
        }
        Commands::Campaigns(ListCommands::List) => {
            require_session(client)?;
            print_json(&client.campaigns().list().await?)?;
        }
        Commands::Placements(ListCommands::List) => {
            require_session(client)?;
            print_json(&client.placements().list().await?)?;
        }
        Commands::PublicNews(PublicNewsCommands::List {
            keyword,
            lang,
            tag,
            category,
            from,
            to,
            page,
        }) => {
            let query = PublicNewsQuery {
                keyword,
                lang,
                tag,
                category_id: category,
                from,
                to,
                page: (&page).into(),
            };
            print_json(&client.public().news(&query).await?)?;
        }
        Commands::Ad {
            placement,
            lang,
            category,
        } => {
            let ad = client
                .public()
                .ad_for_placement(&placement, &lang, category)
                .await
                .with_context(|| format!("no ad served on `{placement}`"))?;
            print_json(&ad)?;
        }
    }

    Ok(())
}

/// Fail fast on protected commands when nobody is signed in.
fn require_session(client: &AuthenticatedHttpClient) -> Result<(), ApiError> {
    if client.session().is_authenticated() {
        Ok(())
    } else {
        Err(ApiError::Unauthenticated)
    }
}
