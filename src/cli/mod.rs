//! Command-line front end for myFlix.
//!
//! Subcommands map onto the client's pages:
//! - `register` / `login` / `logout` / `status` - welcome page and shell
//! - `movies ...` - catalog browsing and detail views
//! - `favorites ...` - favorite list management
//! - `profile ...` - view, edit or delete the account

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::models::{Credentials, Movie, UserDetails};
use crate::views::{ProfileDelete, ProfileUpdate, Route};
use crate::AppState;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "myflix")]
#[command(author, version, about = "Browse the myFlix movie catalog", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "myflix.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API URL to connect to (overrides the config file)
    #[arg(long, env = "MYFLIX_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new account
    Register(RegisterArgs),

    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: String,
        /// Read from MYFLIX_PASSWORD or prompted for when omitted
        #[arg(short, long, env = "MYFLIX_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show whether a session is stored
    Status,

    /// Movie catalog commands
    #[command(subcommand)]
    Movies(MoviesCommands),

    /// Favorite movie commands
    #[command(subcommand)]
    Favorites(FavoritesCommands),

    /// Account commands
    #[command(subcommand)]
    Profile(ProfileCommands),
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub username: String,
    /// Read from MYFLIX_PASSWORD or prompted for when omitted
    #[arg(short, long, env = "MYFLIX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    #[arg(short, long)]
    pub email: String,
    /// Birthday as YYYY-MM-DD
    #[arg(short, long)]
    pub birthday: Option<String>,
}

/// Movies subcommands
#[derive(Subcommand, Debug)]
pub enum MoviesCommands {
    /// List all movies
    List {
        /// Only show favorites
        #[arg(short, long)]
        favorites: bool,
    },
    /// Show one movie with its synopsis, genre and director
    Show {
        /// Movie title
        title: String,
    },
    /// Show a genre
    Genre { name: String },
    /// Show a director
    Director { name: String },
}

/// Favorites subcommands
#[derive(Subcommand, Debug)]
pub enum FavoritesCommands {
    /// List favorite movie ids
    List,
    /// Add a movie to favorites
    Add { movie_id: String },
    /// Remove a movie from favorites
    Remove { movie_id: String },
    /// Add the movie if missing, remove it otherwise
    Toggle { movie_id: String },
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the current user
    Show,
    /// Change account fields; unspecified fields keep their value
    Update {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        birthday: Option<String>,
    },
    /// Delete the account
    Delete {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

// ============================================================================
// CLI Command Handlers
// ============================================================================

/// Run a CLI command
pub async fn run_command(cli: &Cli, state: &AppState) -> Result<()> {
    match &cli.command {
        Commands::Register(args) => cmd_register(state, args).await,
        Commands::Login { username, password } => {
            cmd_login(state, username, password.as_deref()).await
        }
        Commands::Logout => cmd_logout(state),
        Commands::Status => cmd_status(state),
        Commands::Movies(MoviesCommands::List { favorites }) => {
            cmd_movies_list(state, *favorites).await
        }
        Commands::Movies(MoviesCommands::Show { title }) => cmd_movie_show(state, title).await,
        Commands::Movies(MoviesCommands::Genre { name }) => cmd_genre(state, name).await,
        Commands::Movies(MoviesCommands::Director { name }) => cmd_director(state, name).await,
        Commands::Favorites(FavoritesCommands::List) => cmd_favorites_list(state).await,
        Commands::Favorites(FavoritesCommands::Add { movie_id }) => {
            cmd_favorite_change(state, movie_id, FavoriteAction::Add).await
        }
        Commands::Favorites(FavoritesCommands::Remove { movie_id }) => {
            cmd_favorite_change(state, movie_id, FavoriteAction::Remove).await
        }
        Commands::Favorites(FavoritesCommands::Toggle { movie_id }) => {
            cmd_favorite_change(state, movie_id, FavoriteAction::Toggle).await
        }
        Commands::Profile(ProfileCommands::Show) => cmd_profile_show(state).await,
        Commands::Profile(ProfileCommands::Update {
            username,
            password,
            email,
            birthday,
        }) => {
            let changes = ProfileChanges {
                username: username.clone(),
                password: password.clone(),
                email: email.clone(),
                birthday: birthday.clone(),
            };
            cmd_profile_update(state, changes).await
        }
        Commands::Profile(ProfileCommands::Delete { yes }) => cmd_profile_delete(state, *yes).await,
    }
}

async fn cmd_register(state: &AppState, args: &RegisterArgs) -> Result<()> {
    let password = password_or_prompt(args.password.as_deref(), std::io::stdin().lock())?;
    let details = UserDetails {
        username: args.username.clone(),
        password,
        email: args.email.clone(),
        birthday: args.birthday.clone(),
    };
    state.shell().register(&details).await?;
    println!("{}", crate::views::notice::REGISTERED);
    Ok(())
}

async fn cmd_login(state: &AppState, username: &str, password: Option<&str>) -> Result<()> {
    let password = password_or_prompt(password, std::io::stdin().lock())?;
    let route = state
        .shell()
        .login(&Credentials::new(username, &password))
        .await?;
    println!("{}", crate::views::notice::LOGGED_IN);
    print_route_hint(route);
    Ok(())
}

fn cmd_logout(state: &AppState) -> Result<()> {
    let route = state.shell().logout()?;
    println!("Logged out.");
    print_route_hint(route);
    Ok(())
}

fn cmd_status(state: &AppState) -> Result<()> {
    let shell = state.shell();
    println!("API:      {}", state.config.api.url);
    match shell.current_user() {
        Some(user) => println!("Session:  logged in as {}", user),
        None => println!("Session:  not logged in"),
    }
    print_route_hint(shell.start_route());
    Ok(())
}

async fn cmd_movies_list(state: &AppState, favorites_only: bool) -> Result<()> {
    let mut view = state.movie_list();
    view.load().await?;

    let movies: Vec<&Movie> = if favorites_only {
        view.favorite_movies().collect()
    } else {
        view.movies().iter().collect()
    };

    if movies.is_empty() {
        println!("No movies found.");
        return Ok(());
    }

    println!();
    println!(
        "{:<3}  {:<26}  {:<32}  {:<16}  {:<24}",
        "FAV", "ID", "TITLE", "GENRE", "DIRECTOR"
    );
    println!("{}", "-".repeat(108));
    for movie in movies {
        let fav = if view.is_favorite(&movie.id) { "*" } else { "" };
        println!(
            "{:<3}  {:<26}  {:<32}  {:<16}  {:<24}",
            fav,
            truncate(&movie.id, 26),
            truncate(&movie.name, 32),
            truncate(&movie.genre.name, 16),
            truncate(&movie.director.name, 24)
        );
    }
    println!();
    Ok(())
}

async fn cmd_movie_show(state: &AppState, title: &str) -> Result<()> {
    let movie = state.api.movie(title).await?;
    let view = state.movie_list();

    let synopsis = view.synopsis(&movie);
    let genre = view.genre(&movie);
    let director = view.director(&movie);

    println!();
    println!("=== {} ===", synopsis.name);
    println!();
    println!("ID:        {}", movie.id);
    println!("Synopsis:  {}", synopsis.description);
    println!();
    println!("Genre:     {}", genre.name);
    println!("           {}", genre.description);
    println!();
    println!("Director:  {}", director.name);
    if let Some(birth) = &director.birth {
        println!("Born:      {}", birth);
    }
    println!("           {}", director.bio);
    println!();
    Ok(())
}

async fn cmd_genre(state: &AppState, name: &str) -> Result<()> {
    let genre = state.api.genre(name).await?;
    println!();
    println!("=== Genre: {} ===", genre.name);
    println!();
    println!("{}", genre.description);
    println!();
    Ok(())
}

async fn cmd_director(state: &AppState, name: &str) -> Result<()> {
    let director = state.api.director(name).await?;
    println!();
    println!("=== Director: {} ===", director.name);
    println!();
    if let Some(birth) = &director.birth {
        println!("Born:  {}", birth);
    }
    if let Some(death) = &director.death {
        println!("Died:  {}", death);
    }
    println!("{}", director.bio);
    println!();
    Ok(())
}

async fn cmd_favorites_list(state: &AppState) -> Result<()> {
    let mut view = state.movie_list();
    view.refresh_favorites().await?;

    if view.favorites().is_empty() {
        println!("No favorite movies yet.");
        return Ok(());
    }
    for id in view.favorites() {
        println!("{}", id);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum FavoriteAction {
    Add,
    Remove,
    Toggle,
}

async fn cmd_favorite_change(state: &AppState, movie_id: &str, action: FavoriteAction) -> Result<()> {
    let mut view = state.movie_list();
    let label = match action {
        FavoriteAction::Add => {
            view.add_favorite(movie_id).await?;
            "Added to"
        }
        FavoriteAction::Remove => {
            view.remove_favorite(movie_id).await?;
            "Removed from"
        }
        FavoriteAction::Toggle => {
            // toggling decides from the server's current list
            view.refresh_favorites().await?;
            view.toggle_favorite(movie_id).await?.label()
        }
    };
    println!("{} favorites: {}", label, movie_id);
    println!("Favorites now: {}", view.favorites().len());
    Ok(())
}

async fn cmd_profile_show(state: &AppState) -> Result<()> {
    let mut view = state.profile();
    let user = view.load().await?;

    println!();
    println!("=== Profile: {} ===", user.username);
    println!();
    println!("Username:   {}", user.username);
    println!("Email:      {}", user.email);
    println!(
        "Birthday:   {}",
        view.draft.birthday.as_deref().unwrap_or("-")
    );
    println!("Favorites:  {}", view.user().map_or(0, |u| u.favorite_movies.len()));
    println!();
    Ok(())
}

struct ProfileChanges {
    username: Option<String>,
    password: Option<String>,
    email: Option<String>,
    birthday: Option<String>,
}

async fn cmd_profile_update(state: &AppState, changes: ProfileChanges) -> Result<()> {
    let mut view = state.profile();
    view.load().await?;

    if let Some(username) = changes.username {
        view.draft.username = username;
    }
    if let Some(password) = changes.password {
        view.draft.password = password;
    }
    if let Some(email) = changes.email {
        view.draft.email = email;
    }
    if let Some(birthday) = changes.birthday {
        view.draft.birthday = Some(birthday);
    }

    match view.update().await? {
        ProfileUpdate::Updated { notice, .. } => println!("{}", notice),
        ProfileUpdate::ReloginRequired { notice, route, .. } => {
            println!("{}", notice);
            print_route_hint(route);
        }
    }
    Ok(())
}

async fn cmd_profile_delete(state: &AppState, assume_yes: bool) -> Result<()> {
    let mut view = state.profile();
    let outcome = view
        .delete(|warning| assume_yes || prompt_confirm(warning).unwrap_or(false))
        .await?;

    match outcome {
        ProfileDelete::Cancelled => println!("Account deletion cancelled."),
        ProfileDelete::Deleted { notice, route } => {
            println!("{}", notice);
            print_route_hint(route);
        }
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn prompt_confirm(message: &str) -> Result<bool> {
    print!("{} [y/N] ", message);
    std::io::stdout().flush().context("Failed to write prompt")?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Use the given password, or read one line from `input` after prompting.
fn password_or_prompt<R: BufRead>(given: Option<&str>, mut input: R) -> Result<String> {
    if let Some(password) = given {
        return Ok(password.to_string());
    }
    print!("Password: ");
    std::io::stdout().flush().context("Failed to write prompt")?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read password")?;
    let password = line.trim_end_matches(&['\r', '\n'][..]);
    if password.is_empty() {
        anyhow::bail!("A password is required");
    }
    Ok(password.to_string())
}

fn print_route_hint(route: Route) {
    match route {
        Route::Welcome => println!("Run `myflix login` to sign in."),
        Route::Movies => println!("Run `myflix movies list` to browse the catalog."),
        Route::Profile => println!("Run `myflix profile show` to see your account."),
    }
}

/// Truncate a string to a maximum display width
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
