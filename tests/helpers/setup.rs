use remedi_api::Application;
use remedi_infra::{setup_context, Config, RemediContext};
use remedi_sdk::RemediSDK;

pub struct TestApp {
    pub config: Config,
    /// Handle to the application context so tests can seed the store,
    /// pin the clock or attach to the local notification channel.
    pub ctx: RemediContext,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, RemediSDK, String) {
    let mut ctx = setup_context().await;
    ctx.config.port = 0; // Random port

    let config = ctx.config.clone();
    let shared_ctx = ctx.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp {
        config,
        ctx: shared_ctx,
    };
    let sdk = RemediSDK::new(address.clone());
    (app, sdk, address)
}
