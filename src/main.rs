use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match survival_predictor::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("survival-predictor: {e}");
            ExitCode::FAILURE
        }
    }
}
