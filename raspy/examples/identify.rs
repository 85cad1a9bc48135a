//! Identification example

use raspy::{Identification, Sensor, TcpTransport};

#[tokio::main]
async fn main() -> raspy::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let ip = std::env::var("SENSOR_ADDR").unwrap_or_else(|_| "192.168.1.50".to_string());
    let port = std::env::var("SENSOR_PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(4001);

    let transport = TcpTransport::connect(ip, port).await?;
    let mut sensor = Sensor::new(transport);

    println!("Comparison level: {}", sensor.comparison_level().await?);
    println!("Capture timeout: {}", sensor.capture_timeout().await?);

    println!("Place a finger on the sensor...");
    match sensor.identify().await {
        Ok(Identification::Match { user, permission }) => {
            println!("Matched user {} (permission {})", user, permission)
        }
        Ok(Identification::NoMatch) => println!("No match"),
        Err(e) if e.status().is_some() => println!("Sensor refused: {}", e),
        Err(e) => return Err(e),
    }

    sensor.close().await?;

    Ok(())
}
