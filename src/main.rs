use tracing_subscriber::{EnvFilter, fmt};

use coldchain::{MemLedger, SeedConfig, dispatch, init_ledger};

fn call(ledger: &mut MemLedger, function: &str, args: &[&str]) -> anyhow::Result<()> {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let resp = dispatch(ledger, function, &args);
    if !resp.is_success() {
        anyhow::bail!("{function} failed: {}", resp.message);
    }
    if !resp.payload.is_empty() {
        println!("{function}: {}", String::from_utf8_lossy(&resp.payload));
    }
    Ok(())
}

/// Walks the full rental flow against the in-memory ledger: seed the
/// world state, list a commodity, open an order and complete it six
/// hours later, then show the settled balances.
fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,coldchain=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();

    let mut ledger = MemLedger::new();

    let seeds = match std::env::args().nth(1) {
        Some(path) => SeedConfig::load(std::path::Path::new(&path))?,
        None => SeedConfig::default(),
    };
    init_ledger(&mut ledger, &seeds)?;

    let commodity_id = uuid::Uuid::new_v4().to_string();
    let order_id = uuid::Uuid::new_v4().to_string();

    call(&mut ledger, "createCommodity", &["冷柜", &commodity_id, "中国", "10", "1"])?;
    call(&mut ledger, "queryCommodityList", &[&commodity_id])?;

    call(
        &mut ledger,
        "createOrder",
        &[&commodity_id, &order_id, "2021-01-01 00:00:00", "New", "3", "1"],
    )?;
    call(&mut ledger, "updateOrderStatus", &[&order_id, "Processing", "2021-01-01 02:00:00"])?;
    call(&mut ledger, "updateOrderStatus", &[&order_id, "Done", "2021-01-01 06:00:00"])?;

    call(&mut ledger, "queryOrderList", &[&order_id])?;
    call(&mut ledger, "queryAccount", &["all"])?;

    Ok(())
}
