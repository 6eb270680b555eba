#[tokio::main]
async fn main() {
    listings_backend::start_web_server().await;
}
