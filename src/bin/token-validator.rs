// Token validator service: fetches a Key Vault token from the Service Fabric
// identity endpoint and checks its shape

use sfmi_probe::api::token_validator::token_validator_routes;
use sfmi_probe::core::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::run("token-validator", token_validator_routes()).await
}
