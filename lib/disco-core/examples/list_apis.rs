use disco_core::{DiscoveryClient, GOOGLE_DISCOVERY_DIRECTORY, Params};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().pretty().init();

    // Public APIs only, fetches logged at info level
    let client = DiscoveryClient::builder().with_debug(true).build();

    let registry = client.discover_all_apis(GOOGLE_DISCOVERY_DIRECTORY).await?;

    for name in registry.names() {
        let Some(versions) = registry.get(name) else {
            continue;
        };
        let versions = versions.versions().collect::<Vec<_>>();
        println!("{name}: {}", versions.join(", "));
    }

    // Build an endpoint and walk its top-level tree
    let discovery = registry.select("discovery", "v1")?;
    for (name, resource) in discovery.resources() {
        let methods = resource.methods().map(|(it, _)| it).collect::<Vec<_>>();
        println!("discovery.{name}: {}", methods.join(", "));
    }

    // Calls go through the client's executor
    let response = discovery
        .lookup("apis.list")
        .ok_or_else(|| anyhow::anyhow!("apis.list not found"))?
        .call(Params::new())
        .await?;
    println!("status: {}", response.status);

    Ok(())
}
