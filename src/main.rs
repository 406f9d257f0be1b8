use rustls::crypto::CryptoProvider;
use std::fmt::{Debug, Display};
use tokio::task::JoinError;

use trick_board::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // the redis session store connects over rustls, install a provider before anything dials out
    let _ = CryptoProvider::install_default(rustls::crypto::aws_lc_rs::default_provider());

    init_logging();

    let configuration = get_configuration().expect("Failed to read configuration.");
    let application = Application::build(configuration).await?;
    let application_task = tokio::spawn(application.run_until_stopped());

    tokio::select! {
        o = application_task => report_exit("API", o)
    }

    Ok(())
}

#[cfg(feature = "console")]
fn init_logging() {
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        console_subscriber::init();
        return;
    }
    let subscriber = get_subscriber("trick_board".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);
}

#[cfg(not(feature = "console"))]
fn init_logging() {
    let subscriber = get_subscriber("trick_board".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);
}

fn report_exit(task_name: &str, outcome: Result<Result<(), impl Debug + Display>, JoinError>) {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{} has exited", task_name);
        }
        Ok(Err(e)) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} failed",
                task_name
            );
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{}' task failed to complete",
                task_name
            );
        }
    }
}
