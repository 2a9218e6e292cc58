use cardgame::{
    client,
    config::{
        self,
        ParsedArgs,
        RunMode,
    },
    logging,
};
use color_eyre::eyre::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = match config::parse_args(std::env::args().skip(1))? {
        ParsedArgs::Run(config) => config,
        ParsedArgs::Help => {
            println!("{}", config::usage());
            return Ok(());
        }
    };
    let _guard = logging::init_tracing(&config.log_dir)?;
    tracing::info!(
        state_file = %config.state_file.display(),
        variant = ?config.variant,
        print = matches!(config.mode, RunMode::Print { .. }),
        "cardgame starting"
    );
    client::run_app(config).await
}
