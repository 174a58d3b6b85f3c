use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use log::{error, info};

use linreg_api::config::Config;
use linreg_api::inference::LinearModel;
use linreg_api::routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    if let Err(e) = run().await {
        error!("{e:#}");
        return Err(e);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    info!("Starting linear regression prediction API");

    let config = Config::from_env().context("reading configuration")?;

    let model = LinearModel::embedded().context("fitting embedded model")?;
    info!(
        "Model fitted: coefficients={:?} intercept={:.6} r2={:.6}",
        model.coefficients(),
        model.intercept(),
        model.training_r2()
    );
    let model_data = web::Data::new(model);

    let bind_address = config.bind_address();
    info!("Listening on http://{}", bind_address);
    info!("Workers: {}", config.workers);
    info!("Endpoints:");
    info!("   GET  /            - welcome");
    info!("   POST /predict/    - predict from feature1, feature2");
    info!("   GET  /model-info  - fitted coefficients");

    let max_body_bytes = config.max_body_bytes;
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(routes::security_headers())
            .app_data(model_data.clone())
            .app_data(web::PayloadConfig::new(max_body_bytes))
            .configure(routes::configure)
            .default_service(web::to(routes::not_found))
    })
    .workers(config.workers)
    .bind(&bind_address)
    .with_context(|| format!("binding {bind_address}"))?
    .run()
    .await
    .context("running HTTP server")
}
