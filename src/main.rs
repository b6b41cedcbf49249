use clap::Parser;
use myvakeel::commands::{self, Config, ConfigOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// myvakeel - plain-language explanations of legal documents
///
/// Upload a policy, contract or claim form (or paste its text) and get a
/// summary, a mind map of its key concepts, the clauses that put you at risk,
/// and a practical tip. Ask the assistant about legal terms with `chat`.
///
/// Examples:
///   myvakeel register --name Asha --email asha@example.com
///   myvakeel analyze policy.pdf
///   myvakeel chat "What is a deductible?"
#[derive(Parser, Debug)]
#[command(author, version = env!("MYVAKEEL_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Origin of the web app; the API lives under /api (also via MYVAKEEL_ORIGIN)
    #[arg(long, env = "MYVAKEEL_ORIGIN", value_name = "URL", global = true)]
    origin: Option<String>,

    /// Directory for stored identity and preferences (also via MYVAKEEL_HOME)
    #[arg(long, env = "MYVAKEEL_HOME", value_name = "PATH", global = true)]
    home: Option<PathBuf>,

    /// Attempts per request before giving up on server or network errors
    #[arg(long, env = "MYVAKEEL_MAX_ATTEMPTS", value_name = "N", global = true)]
    max_attempts: Option<u32>,

    /// Base delay between attempts; the n-th retry waits n times this long
    #[arg(long, env = "MYVAKEEL_RETRY_DELAY_MS", value_name = "MS", global = true)]
    retry_delay_ms: Option<u64>,

    /// Print raw response payloads instead of formatted output
    #[arg(long, global = true)]
    json: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Check that the analysis service is reachable
    Health,

    /// Register and remember your identity
    Register(RegisterArgs),

    /// Show the stored identity and language
    Whoami,

    /// Forget the stored identity
    Logout {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Upload a document for analysis
    Analyze {
        /// PDF, image or text file to analyze
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Analyze pasted text (reads standard input when TEXT is omitted)
    AnalyzeText {
        #[arg(value_name = "TEXT")]
        text: Option<String>,
    },

    /// Ask the assistant about a legal term
    Chat {
        #[arg(value_name = "QUERY")]
        query: String,

        /// Read the answer aloud where speech is supported
        #[arg(long)]
        speak: bool,
    },

    /// Show or set the answer language (e.g. en, hi)
    Language {
        #[arg(value_name = "CODE")]
        code: Option<String>,
    },

    /// Sign in to the admin area
    AdminLogin(AdminLoginArgs),
}

#[derive(clap::Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,
}

#[derive(clap::Args, Debug)]
struct AdminLoginArgs {
    #[arg(long)]
    username: String,

    /// Admin password (also via MYVAKEEL_ADMIN_PASSWORD)
    #[arg(long, env = "MYVAKEEL_ADMIN_PASSWORD", hide_env_values = true)]
    password: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", commands::describe_error(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let options = ConfigOptions {
        origin: cli.origin,
        home: cli.home,
        max_attempts: cli.max_attempts,
        retry_delay_ms: cli.retry_delay_ms,
    };
    let config = Config::new(myvakeel::runtime::RealRuntime, options)?;
    let json = cli.json;

    match cli.command {
        Commands::Health => commands::health(&config, json).await,
        Commands::Register(args) => commands::register(&config, &args.name, &args.email, json).await,
        Commands::Whoami => commands::whoami(&config),
        Commands::Logout { yes } => commands::logout(&config, yes),
        Commands::Analyze { file } => commands::analyze_file(&config, &file, json).await,
        Commands::AnalyzeText { text } => commands::analyze_text(&config, text, json).await,
        Commands::Chat { query, speak } => commands::chat(&config, &query, speak, json).await,
        Commands::Language { code } => commands::language(&config, code.as_deref()),
        Commands::AdminLogin(args) => {
            commands::admin_login(&config, &args.username, &args.password, json).await
        }
    }
}
