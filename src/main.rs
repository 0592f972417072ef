#[tokio::main]
async fn main() {
    ride_client::run().await;
}
