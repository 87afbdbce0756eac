#[cfg(feature = "lambda")]
use climb_gear::utils::logger;
#[cfg(feature = "lambda")]
use climb_gear::{GearFinder, LambdaRequest, LambdaResponse};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<LambdaRequest>) -> Result<LambdaResponse, Error> {
    tracing::info!("Starting gear search Lambda function");

    // 搜尋本身是同步且很快的，直接在 handler 裡執行
    let finder = GearFinder::new(event.payload);
    let result = finder
        .run()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    tracing::info!("Gear search Lambda function completed successfully");
    Ok(LambdaResponse::from(&result))
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
