//! List enrolled users

use raspy::{Sensor, TcpTransport};

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

    println!("{} users enrolled", sensor.user_count().await?);
    for user in sensor.users().await? {
        println!("  {}", user);
    }

    let stats = sensor.session().stats();
    println!(
        "Frames sent: {}, received: {}, framing faults: {}",
        stats.sent, stats.received, stats.framing_faults
    );

    sensor.close().await?;

    Ok(())
}
