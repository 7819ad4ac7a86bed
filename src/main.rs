use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotlight::{config, error, server, spotify::Spotify, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the dashboard server
    Serve(ServeOptions),

    /// Print the Spotify authorization URL
    AuthUrl,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Port to listen on (overrides PORT)
    #[clap(long)]
    pub port: Option<u16>,

    /// Open the login page in the default browser
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let mut settings = match config::Settings::from_env() {
        Ok(s) => s,
        Err(e) => error!("{}", e),
    };

    match cli.command {
        Command::Serve(opt) => {
            if let Some(port) = opt.port {
                settings.port = port;
            }

            if opt.open {
                let url = format!("http://{}/", settings.server_addr());
                if webbrowser::open(&url).is_err() {
                    warning!(
                        "Failed to open browser. Please navigate to the following URL manually:\n{}",
                        url
                    )
                }
            }

            if let Err(e) = server::start_server(settings).await {
                error!("{}", e);
            }
        }
        Command::AuthUrl => {
            let url = Spotify::new(settings).and_then(|s| s.build_authorization_url());
            match url {
                Ok(url) => println!("{url}"),
                Err(e) => error!("{}", e),
            }
        }
        Command::Completions(_) => {}
    }
}
