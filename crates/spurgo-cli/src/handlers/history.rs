use reqwest::Method;
use spurgo_api_types::{ConfirmRequest, HistoryPage};

use crate::args::HistoryCmd;
use crate::client::{CliError, Ctx};
use crate::io::{confirm, to_value};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: HistoryCmd) -> Result<(), CliError> {
    match cmd {
        HistoryCmd::List { limit } => list(ctx, limit).await,
        HistoryCmd::Clear { yes } => clear(ctx, yes).await,
    }
}

async fn list(ctx: &Ctx, limit: usize) -> Result<(), CliError> {
    let query = [("limit", limit.to_string())];
    let res: HistoryPage = ctx
        .request(Method::GET, "admin/history", Some(&query), None)
        .await?;
    print_json(&res)
}

async fn clear(ctx: &Ctx, yes: bool) -> Result<(), CliError> {
    if !yes && !confirm("Clear the entire purge history?")? {
        println!("aborted");
        return Ok(());
    }

    let payload = to_value(ConfirmRequest { confirm: true })?;
    ctx.request_unit(Method::POST, "admin/history/clear", None, Some(payload))
        .await?;
    println!("history cleared");
    Ok(())
}
