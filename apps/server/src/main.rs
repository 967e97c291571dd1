use anyhow::Context;
use clap::{Parser, Subcommand};
use minipress_auth::RegistrationData;
use minipress_config::load as load_config;
use minipress_database::{CreatePostRequest, PostRepository, UserRepository};
use minipress_gateway::{create_router, GatewayState};
use minipress_runtime::{telemetry, BackendServices};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "minipress")]
#[command(about = "Minipress blog backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Seed the database with demo users and posts
    SeedData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::SeedData => seed_data().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting Minipress backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(services.db_pool.clone(), &config);
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(minipress_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = UserRepository::new(services.db_pool.clone());
    if users.count().await? > 0 {
        info!("database already contains users, skipping seed");
        return Ok(());
    }

    let demo_users = [
        ("jane", "Jane", "Doe"),
        ("bob", "Bob", "Stone"),
        ("alice", "Alice", "Hart"),
    ];

    let mut ids = Vec::new();
    for (username, first_name, last_name) in demo_users {
        let user = services
            .authenticator
            .register(&RegistrationData {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                password: "password".to_string(),
            })
            .await
            .with_context(|| format!("failed to seed user {username}"))?;
        info!(username, "seeded user (password: password)");
        ids.push(user.id);
    }

    let posts = PostRepository::new(services.db_pool.clone());
    let demo_posts = [
        (ids[0], "Welcome", "First post on this instance."),
        (ids[1], "Introductions", "Hello from Bob Stone, say hi to Jane Doe."),
        (ids[2], "Notes", "Alice Hart was here."),
    ];

    for (author_id, title, content) in demo_posts {
        posts
            .create(
                author_id,
                &CreatePostRequest {
                    title: title.to_string(),
                    content: content.to_string(),
                },
            )
            .await
            .with_context(|| format!("failed to seed post '{title}'"))?;
        info!(title, "seeded post");
    }

    info!("seed data written");
    Ok(())
}
