//! Manual smoke test against a running server.
//!
//! Posts a sample event to `/create-event` and sends a test message
//! through the Telegram notifier. Reads the same environment variables
//! as the server (`PORT`, `TELEGRAM_TOKEN`, `CHAT_ID`).

use std::process::ExitCode;

use calinvite_server::{Notifier, ServerConfig};

async fn post_sample_event(port: u16) -> Result<(), String> {
    let url = format!("http://localhost:{}/create-event", port);
    let body = serde_json::json!({
        "summary": "Configurable Team Meeting",
        "description": "A meeting with all the details passed via a request body.",
        "start": "2025-09-18T14:00:00+05:30",
        "end": "2025-09-18T15:00:00+05:30",
        "timeZone": "Asia/Kolkata",
        "attendees": ["someone@example.com"],
    });

    let response = reqwest::Client::new()
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| format!("POST {} failed: {}", url, e))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| format!("reading response body failed: {}", e))?;

    println!("create-event: {} {}", status, text);
    Ok(())
}

async fn run() -> Result<(), String> {
    let config = ServerConfig::from_env()?;

    post_sample_event(config.port).await?;

    let notifier = Notifier::new(config.notifier);
    match notifier.notify("Test message from send-event-tester", None).await {
        Ok(body) => println!("telegram: {}", body),
        Err(e) => println!("telegram: {}", e),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
