// Secret lister service: lists Key Vault secret properties with the node's
// managed identity

use sfmi_probe::api::secret_lister::secret_lister_routes;
use sfmi_probe::core::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::run("secret-lister", secret_lister_routes()).await
}
