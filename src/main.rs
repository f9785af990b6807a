use clap::Parser;
use libsys_deploy::app;
use libsys_deploy::utils::logger;
use libsys_deploy::{CliConfig, DeployError};

#[tokio::main]
async fn main() {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::debug!("CLI args: {:?}", args);

    let code = match run(&args).await {
        Ok(code) => code,
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "{} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            e.severity().exit_code()
        }
    };

    std::process::exit(code);
}

async fn run(args: &CliConfig) -> Result<i32, DeployError> {
    let cwd = std::env::current_dir()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app::dispatch(args, &cwd, &mut out).await
}
