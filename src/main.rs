#[tokio::main]
async fn main() {
    matjar::start_server().await;
}
