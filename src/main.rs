#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bottledesk_api::cli::run_with_sys_args().await
}
