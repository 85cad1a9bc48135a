//! Enrollment example
//!
//! Enrolls a finger under `SENSOR_USER` (default 1) and prints the template.

use raspy::{EnrollState, Permission, SerialSettings, Sensor, TcpTransport, UserId};

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
    let id = std::env::var("SENSOR_USER")
        .ok()
        .and_then(|id| id.parse().ok())
        .unwrap_or(1);

    tracing::info!("Bridge must drive the module at {}", SerialSettings::MODULE);

    let transport = TcpTransport::connect(ip, port).await?;
    let mut sensor = Sensor::new(transport);

    let user = UserId::new(id)?;
    println!("Place the finger on the sensor three times...");

    let report = sensor.enroll_with_template(user, Permission::Level1).await?;
    match report.state {
        EnrollState::Done => {
            println!("Enrolled user {}", user);
            if let Some(template) = &report.template {
                println!("Template: {:?}", template);
            }
        }
        _ => println!("Enrollment aborted: {}", report.status),
    }

    sensor.close().await?;

    Ok(())
}
