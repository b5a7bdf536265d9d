#[tokio::main]
async fn main() -> anyhow::Result<()> {
    desktop_camera_lib::run().await
}
