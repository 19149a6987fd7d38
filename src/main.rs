use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use secret_santa::app::{history, roster, summary};
use secret_santa::core::santa::preview;
use secret_santa::domain::model::{PriorAssignments, RunOutcome};
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{
    CliConfig, LocalStorage, MailConfig, RunReport, SantaError, SecretSanta, SmtpNotifier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("🎅 Starting secret-santa");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    match run(&config).await {
        Ok(()) => Ok(()),
        Err(e) => fail(&e),
    }
}

async fn run(config: &CliConfig) -> secret_santa::Result<()> {
    let storage = LocalStorage::new(".".to_string());

    let roster = roster::load_roster(&storage, &config.participants).await?;
    let prior = match &config.history {
        Some(path) => Some(history::load_history(&storage, path).await?),
        None => None,
    };
    let prior_len = prior.as_ref().map(PriorAssignments::len).unwrap_or(0);

    let mut rng = match config.seed {
        Some(seed) => {
            tracing::info!("🎲 Using fixed seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written or sent");
        summary::print_summary(&roster);
        return match preview(&roster, prior.as_ref(), &mut rng)? {
            RunOutcome::Assigned(assignment) => {
                println!();
                println!("✅ Draw is valid ({} pairings)", assignment.len());
                Ok(())
            }
            RunOutcome::Aborted { repeats } => {
                summary::print_abort(&repeats, prior_len);
                Ok(())
            }
        };
    }

    // 載入郵件設定
    let mail_config = MailConfig::from_file(&config.config)?;
    mail_config.validate()?;
    tracing::info!("✅ Mail settings loaded from: {}", config.config);

    let notifier = SmtpNotifier::new(&mail_config)?;
    let santa = SecretSanta::new(
        storage,
        notifier,
        mail_config.template(),
        config.output.clone(),
    );

    summary::print_summary(&roster);

    match santa.run(&roster, prior.as_ref(), &mut rng).await? {
        RunReport::Completed {
            output_path,
            notified,
            ..
        } => {
            tracing::info!("✅ {} notifications sent", notified);
            println!("...Done ! Assignment saved to {}", output_path);
        }
        // 與上期重複時正常結束 (exit 0)，由操作者重新執行
        RunReport::Aborted { repeats } => summary::print_abort(&repeats, prior_len),
    }

    Ok(())
}

fn fail(e: &SantaError) -> ! {
    tracing::error!(
        "❌ secret-santa failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}
