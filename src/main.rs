//! feedlite CLI
//!
//! A thin front-end over the identity and feed services. The session is
//! kept in the store, so `login` in one invocation carries over to the next.
//!
//! Usage:
//!   cargo run --bin seed_feed                       # optional demo data
//!   cargo run --bin feedlite -- signup -n Ana -e ana@x.com -p secret1
//!   cargo run --bin feedlite -- login -e ana@x.com -p secret1
//!   cargo run --bin feedlite -- post -t "hello"
//!   cargo run --bin feedlite -- feed --sort liked --search hello

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use feedlite::config::FeedConfig;
use feedlite::error::FeedResult;
use feedlite::feed::{created_notice, deleted_notice, edited_notice};
use feedlite::format::post_card;
use feedlite::image::{FsImageLoader, ImageInput};
use feedlite::notify::{ConsoleNotifier, Notice, Notifier};
use feedlite::query::{FeedQuery, SortKey};
use feedlite::{logging, FeedApp};

#[derive(Parser)]
#[command(name = "feedlite")]
#[command(about = "Local social feed", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Store directory (overrides FEED_DATA_DIR)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    Signup {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    Logout,
    Whoami,
    Post {
        #[arg(short, long, default_value = "")]
        text: String,
        #[arg(short = 'u', long, default_value = "")]
        image_url: String,
        /// JPG or PNG file; wins over --image-url
        #[arg(short = 'f', long)]
        image_file: Option<PathBuf>,
    },
    /// Options left out keep the post's current value
    Edit {
        #[arg(short, long)]
        id: String,
        #[arg(short, long)]
        text: Option<String>,
        #[arg(short = 'u', long)]
        image_url: Option<String>,
        #[arg(short = 'f', long)]
        image_file: Option<PathBuf>,
    },
    Delete {
        #[arg(short, long)]
        id: String,
    },
    Like {
        #[arg(short, long)]
        id: String,
    },
    Feed {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = SortKey::Latest)]
        sort: SortKey,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = FeedConfig::from_env();
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    let _log_guard = logging::init(&config.log);

    let notifier = ConsoleNotifier;
    match run(cli.command, &config, &notifier).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            notifier.notify(&err.to_notice());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &FeedConfig, notifier: &dyn Notifier) -> FeedResult<()> {
    let app = FeedApp::open(config)?;

    match command {
        Commands::Signup { name, email, password } => {
            let notice = app.identity.signup(&name, &email, &password)?;
            notifier.notify(&notice);
        }
        Commands::Login { email, password } => {
            app.identity.login(&email, &password)?;
            notifier.notify(&Notice::success("Login successful!"));
        }
        Commands::Logout => {
            app.identity.logout()?;
            notifier.notify(&Notice::success("Logged out"));
        }
        Commands::Whoami => match app.session()? {
            Some(session) => println!("{} <{}>", session.name, session.email),
            None => println!("Not logged in"),
        },
        Commands::Post { text, image_url, image_file } => {
            let image = ImageInput { url: image_url, file: image_file };
            let post = app.create_post(&text, &image, &FsImageLoader).await?;
            notifier.notify(&created_notice());
            println!("{}", post.id);
        }
        Commands::Edit { id, text, image_url, image_file } => {
            let image = match (image_url, image_file) {
                (url, Some(file)) => Some(ImageInput { url: url.unwrap_or_default(), file: Some(file) }),
                (Some(url), None) => Some(ImageInput::url(url)),
                (None, None) => None,
            };
            app.revise_post(&id, text.as_deref(), image.as_ref(), &FsImageLoader).await?;
            notifier.notify(&edited_notice());
        }
        Commands::Delete { id } => {
            app.delete_post(&id)?;
            notifier.notify(&deleted_notice());
        }
        Commands::Like { id } => {
            let post = app.toggle_like(&id)?;
            let viewer = app.session()?;
            println!("{}", post_card(&post, viewer.as_ref().map(|s| s.id.as_str()), Utc::now()));
        }
        Commands::Feed { search, sort } => {
            let posts = app.query(&FeedQuery::new(search, sort))?;
            if posts.is_empty() {
                println!("No posts yet");
            }
            let viewer = app.session()?;
            let now = Utc::now();
            for post in &posts {
                println!("{}\n", post_card(post, viewer.as_ref().map(|s| s.id.as_str()), now));
            }
        }
    }

    Ok(())
}
