#[tokio::main]
async fn main() {
    artisan_booking::run().await;
}
